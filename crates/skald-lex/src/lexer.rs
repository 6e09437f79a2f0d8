//! The tokenizer: pulls tokens from a source cursor using a compiled
//! rule set.
//!
//! Token resolution order per call: skip whitespace and comments (when
//! enabled), quoted strings, the static guard (whole word first, then the
//! longest-literal prefix scan), the dynamic guards in declared order.
//! Peaceful end of input is `Ok(None)`; lexical problems are failures at
//! the offending position.

use skald_util::{Failure, ParseError, ParseResult, SourcePosition, Token, NUMBER_NO_FOLLOW};

use crate::escapes::decode_escape;
use crate::rules::NestedComment;
use crate::ruleset::RuleSet;

/// Message for a number glued to an identifier character.
const NO_FOLLOW_MSG: &str = "missing separator between a number and indistinguishable stuff";

/// Resolves the next token from `pos`, or `Ok(None)` at end of input.
///
/// This is the lexing core; [`Lexer`] wraps it with an owned cursor, and
/// the parser-side token combinators call it directly on their own cursor.
///
/// # Errors
///
/// [`ParseError::Failure`] for an unknown token, a malformed escape, a line
/// break inside a single-line string, or a number running into an
/// identifier character; [`ParseError::UnexpectedEof`] when input ends
/// inside a string, escape or block comment.
pub fn next_token(rules: &RuleSet, pos: &mut SourcePosition) -> ParseResult<Option<Token>> {
    if rules.skip_spaces() {
        skip_whites(rules, pos)?;
    }
    if pos.at_eof() {
        return Ok(None);
    }
    if let Some(token) = lex_quoted(rules, pos)? {
        return Ok(Some(token));
    }
    let token = match lex_static(rules, pos)? {
        Some(token) => token,
        None => match lex_dynamic(rules, pos)? {
            Some(token) => token,
            None => return Err(pos.failure("invalid token")),
        },
    };
    if token.kind == NUMBER_NO_FOLLOW {
        return Err(ParseError::Failure(Failure::new(
            NO_FOLLOW_MSG,
            token.source_name,
            token.line,
            token.column,
        )));
    }
    Ok(Some(token))
}

/// Consumes whitespace, line comments and block comments until none of the
/// three makes progress.
pub fn skip_whites(rules: &RuleSet, pos: &mut SourcePosition) -> ParseResult<()> {
    loop {
        let before = pos.offset();
        while matches!(pos.current_char(), Some(' ' | '\t' | '\n')) {
            pos.advance()?;
        }
        if let Some(prefix) = rules.line_comment() {
            if pos.starts_with(prefix) {
                pos.advance_over(prefix);
                while matches!(pos.current_char(), Some(c) if c != '\n') {
                    pos.advance()?;
                }
            }
        }
        if let Some(comment) = rules.nested_comment() {
            if pos.starts_with(&comment.begin) {
                skip_block_comment(comment, pos)?;
            }
        }
        if pos.offset() == before {
            return Ok(());
        }
    }
}

/// Skips one block comment, counting depth when the rule nests.
fn skip_block_comment(comment: &NestedComment, pos: &mut SourcePosition) -> ParseResult<()> {
    let open = pos.clone();
    pos.advance_over(&comment.begin);
    let mut depth: u32 = 1;
    while depth > 0 {
        if pos.at_eof() {
            return Err(open.eof_failure("unterminated block comment"));
        }
        if comment.nested && pos.starts_with(&comment.begin) {
            depth += 1;
            pos.advance_over(&comment.begin);
        } else if pos.starts_with(&comment.end) {
            depth -= 1;
            pos.advance_over(&comment.end);
        } else {
            pos.advance()?;
        }
    }
    Ok(())
}

/// Lexes a quoted string if one of the registered opening delimiters is
/// next. The emitted token carries the decoded body and the position of
/// the opening delimiter.
fn lex_quoted(rules: &RuleSet, pos: &mut SourcePosition) -> ParseResult<Option<Token>> {
    let Some((open, spec)) = rules.quote_match(pos.rest()) else {
        return Ok(None);
    };
    let start = pos.clone();
    pos.advance_over(open);
    let mut decoded = String::new();
    loop {
        if pos.starts_with(&spec.stop) {
            pos.advance_over(&spec.stop);
            break;
        }
        let Some(c) = pos.current_char() else {
            return Err(start.eof_failure("unterminated string"));
        };
        if spec.escape == Some(c) {
            pos.advance()?;
            decoded.push(decode_escape(pos)?);
            continue;
        }
        if c == '\n' && !spec.multiline {
            return Err(pos.failure("line break in single-line string"));
        }
        decoded.push(c);
        pos.advance()?;
    }
    Ok(Some(Token::new(
        spec.kind.clone(),
        decoded,
        start.name(),
        start.line(),
        start.column(),
    )))
}

/// Tries the static guard: the whole space-delimited word first, then the
/// longest-literal prefix scan.
fn lex_static(rules: &RuleSet, pos: &mut SourcePosition) -> ParseResult<Option<Token>> {
    let word_end = pos
        .rest()
        .find([' ', '\t', '\n'])
        .unwrap_or(pos.rest().len());
    let word = &pos.rest()[..word_end];

    let hit = if word.is_empty() {
        None
    } else {
        rules
            .static_action(word)
            .map(|action| (word.to_string(), action.clone()))
    };
    let hit = match hit {
        Some(hit) => Some(hit),
        None => rules
            .static_prefix_scan(pos.rest())
            .map(|(key, action)| (key.to_string(), action.clone())),
    };
    let Some((lexeme, action)) = hit else {
        return Ok(None);
    };

    let start = pos.clone();
    pos.advance_over(&lexeme);
    let raw = Token::new(
        lexeme.clone(),
        lexeme,
        start.name(),
        start.line(),
        start.column(),
    );
    Ok(Some(action.apply(raw)))
}

/// Tries the dynamic guards in declared order; the first non-empty match
/// wins.
fn lex_dynamic(rules: &RuleSet, pos: &mut SourcePosition) -> ParseResult<Option<Token>> {
    for rule in rules.dynamic_rules() {
        let Some(m) = rule.regex.find(pos.rest()) else {
            continue;
        };
        if m.is_empty() {
            continue;
        }
        let lexeme = m.as_str().to_string();
        let start = pos.clone();
        pos.advance_over(&lexeme);
        let raw = Token::new(
            lexeme.clone(),
            lexeme,
            start.name(),
            start.line(),
            start.column(),
        );
        return Ok(Some(rule.action.apply(raw)));
    }
    Ok(None)
}

/// A tokenizer owning its cursor.
///
/// Clones share the compiled rule set but advance independently, so a
/// clone taken before any token is read yields the same token stream as
/// the original.
#[derive(Debug, Clone)]
pub struct Lexer {
    rules: RuleSet,
    pos: SourcePosition,
}

impl Lexer {
    /// Creates a lexer reading from an existing cursor.
    pub fn new(rules: RuleSet, pos: SourcePosition) -> Self {
        Self { rules, pos }
    }

    /// Creates a lexer over `source`.
    pub fn from_source(rules: RuleSet, source: &str, name: impl Into<String>) -> Self {
        Self {
            pos: SourcePosition::new(source, name),
            rules,
        }
    }

    /// Resolves the next token, or `Ok(None)` at end of input.
    pub fn next(&mut self) -> ParseResult<Option<Token>> {
        next_token(&self.rules, &mut self.pos)
    }

    /// Resolves the next token, turning end of input into an
    /// unexpected-EOF failure.
    pub fn next_expected(&mut self) -> ParseResult<Token> {
        match self.next()? {
            Some(token) => Ok(token),
            None => Err(self.pos.eof_failure("unexpected end of input")),
        }
    }

    /// Drains the remaining input into a vector of tokens.
    pub fn tokens(&mut self) -> ParseResult<Vec<Token>> {
        let mut out = Vec::new();
        while let Some(token) = self.next()? {
            out.push(token);
        }
        Ok(out)
    }

    /// Iterates tokens lazily, ending after the first error.
    pub fn iter(&mut self) -> impl Iterator<Item = ParseResult<Token>> + '_ {
        let mut failed = false;
        std::iter::from_fn(move || {
            if failed {
                return None;
            }
            match self.next().transpose() {
                Some(Err(err)) => {
                    failed = true;
                    Some(Err(err))
                }
                other => other,
            }
        })
    }

    /// The current cursor.
    pub fn position(&self) -> &SourcePosition {
        &self.pos
    }

    /// The unconsumed remainder of the source.
    pub fn remaining_source(&self) -> &str {
        self.pos.rest()
    }

    /// The compiled rule set driving this lexer.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }
}
