//! Token readers: the bridge from the rule-driven lexer to the
//! combinator algebra.
//!
//! Each reader pulls one token on demand through `skald_lex::next_token`
//! on a probe cursor and commits only when the token is acceptable, so a
//! failed read never consumes input and ordered choice can move on to
//! another alternative.

use skald_lex::{next_token, RuleSet};
use skald_util::{Failure, ParseError, Token};

use crate::combinators::trivial;
use crate::Parser;

/// Reads the next token, whatever its kind.
///
/// Fails without consuming at end of input; lexical errors surface as
/// non-consuming failures at the offending position.
pub fn any_token(rules: &RuleSet) -> Parser<Token> {
    let rules = rules.clone();
    Parser::new(move |pos| {
        let mut probe = pos.clone();
        match next_token(&rules, &mut probe)? {
            Some(token) => {
                pos.assign(&probe);
                Ok(token)
            }
            None => Err(pos.eof_failure("unexpected end of input")),
        }
    })
    .tagged("any token")
}

/// Reads the next token and requires its kind to be `kind`.
///
/// On a kind mismatch the cursor is restored to where it was before the
/// read, so a failed `token` never consumes.
pub fn token(rules: &RuleSet, kind: &str) -> Parser<Token> {
    let rules = rules.clone();
    let want = kind.to_string();
    let parser = Parser::new(move |pos| {
        let mut probe = pos.clone();
        match next_token(&rules, &mut probe)? {
            Some(tok) if tok.kind == want => {
                pos.assign(&probe);
                Ok(tok)
            }
            Some(tok) => Err(ParseError::Failure(Failure::new(
                format!("expected {want}, found {} {:?}", tok.kind, tok.literal),
                tok.source_name,
                tok.line,
                tok.column,
            ))),
            None => Err(pos.eof_failure(format!("unexpected end of input, expected {want}"))),
        }
    });
    parser.tagged(kind)
}

/// Reads the next token and requires both its kind and its decoded
/// literal.
pub fn token_literal(rules: &RuleSet, kind: &str, literal: &str) -> Parser<Token> {
    let rules = rules.clone();
    let want_kind = kind.to_string();
    let want_literal = literal.to_string();
    let parser = Parser::new(move |pos| {
        let mut probe = pos.clone();
        match next_token(&rules, &mut probe)? {
            Some(tok) if tok.kind == want_kind && tok.literal == want_literal => {
                pos.assign(&probe);
                Ok(tok)
            }
            Some(tok) => Err(ParseError::Failure(Failure::new(
                format!(
                    "expected {want_kind} {want_literal:?}, found {} {:?}",
                    tok.kind, tok.literal
                ),
                tok.source_name,
                tok.line,
                tok.column,
            ))),
            None => Err(pos.eof_failure(format!(
                "unexpected end of input, expected {want_kind} {want_literal:?}"
            ))),
        }
    });
    parser.tagged(format!("{kind} {literal:?}"))
}

/// Matches a literal at the character level, bypassing the tokenizer.
///
/// No whitespace is skipped and no rules are consulted; the cursor either
/// starts with `lit` or the parser fails without consuming.
pub fn string(lit: &str) -> Parser<String> {
    let want = lit.to_string();
    let parser = Parser::new(move |pos| {
        if pos.starts_with(&want) {
            pos.advance_over(&want);
            Ok(want.clone())
        } else {
            Err(pos.failure(format!("expected {want:?}")))
        }
    });
    parser.tagged(format!("{lit:?}"))
}

/// Succeeds only at end of input (after whitespace and comments).
pub fn eof(rules: &RuleSet) -> Parser<()> {
    trivial(()).end(rules)
}
