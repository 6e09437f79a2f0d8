//! Declarative token rule configuration.
//!
//! A lexer is configured from two inputs: a list of free [`Rule`]s and a
//! [`LexerConfig`] of presets (comments, parentheses, numbers, quoted
//! strings, keywords, operators). [`crate::RuleSet::compile`] turns the
//! pair into matchable guards.

use std::fmt;
use std::rc::Rc;

use skald_util::Token;
use thiserror::Error;

mod numbers;

pub(crate) use numbers::number_patterns;

/// A lexeme pattern: an exact literal or a regular expression.
///
/// Literals become static guards matched by string equality; regexes become
/// dynamic guards tried in declared order.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches this exact text.
    Literal(String),
    /// Matches this regular expression at the current position.
    Regex(String),
}

impl Pattern {
    /// A literal pattern.
    pub fn literal(lexeme: impl Into<String>) -> Self {
        Pattern::Literal(lexeme.into())
    }

    /// A regex pattern.
    pub fn regex(pattern: impl Into<String>) -> Self {
        Pattern::Regex(pattern.into())
    }
}

impl From<&str> for Pattern {
    fn from(lexeme: &str) -> Self {
        Pattern::Literal(lexeme.to_string())
    }
}

/// What a guard does with a matched lexeme.
#[derive(Clone)]
pub enum RuleAction {
    /// Tag the token with this kind.
    Kind(String),
    /// Rewrite the raw token into the final one.
    Transform(Rc<dyn Fn(Token) -> Token>),
}

impl RuleAction {
    /// Applies this action to a raw token.
    ///
    /// The raw token arrives with its kind equal to the matched lexeme.
    pub(crate) fn apply(&self, raw: Token) -> Token {
        match self {
            RuleAction::Kind(kind) => raw.with_kind(kind.clone()),
            RuleAction::Transform(f) => f(raw),
        }
    }
}

impl fmt::Debug for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleAction::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
            RuleAction::Transform(_) => f.debug_tuple("Transform").field(&"<fn>").finish(),
        }
    }
}

/// A free token rule: a pattern and the action for its matches.
#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: Pattern,
    pub action: RuleAction,
}

impl Rule {
    /// A literal lexeme tagged with `kind`.
    pub fn literal(lexeme: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            pattern: Pattern::Literal(lexeme.into()),
            action: RuleAction::Kind(kind.into()),
        }
    }

    /// A regex pattern tagged with `kind`.
    pub fn regex(pattern: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            pattern: Pattern::Regex(pattern.into()),
            action: RuleAction::Kind(kind.into()),
        }
    }

    /// A pattern whose matches are rewritten by `f`.
    pub fn transform(pattern: Pattern, f: impl Fn(Token) -> Token + 'static) -> Self {
        Self {
            pattern,
            action: RuleAction::Transform(Rc::new(f)),
        }
    }
}

/// Operator associativity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Assoc {
    /// No associativity declared.
    #[default]
    None,
    Left,
    Right,
}

/// One operator inside a precedence group.
#[derive(Debug, Clone)]
pub struct OperatorRule {
    pub pattern: Pattern,
    pub assoc: Assoc,
}

impl OperatorRule {
    /// A literal operator with no declared associativity.
    pub fn new(lexeme: impl Into<String>) -> Self {
        Self {
            pattern: Pattern::Literal(lexeme.into()),
            assoc: Assoc::None,
        }
    }

    /// A regex operator with no declared associativity.
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self {
            pattern: Pattern::Regex(pattern.into()),
            assoc: Assoc::None,
        }
    }

    /// Sets the associativity.
    pub fn assoc(mut self, assoc: Assoc) -> Self {
        self.assoc = assoc;
        self
    }
}

/// Which bracket pairs to install as literal guards.
///
/// Each enabled pair contributes two static guards whose token kind equals
/// the lexeme itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Parentheses {
    pub round: bool,
    pub square: bool,
    pub curly: bool,
}

impl Parentheses {
    /// Enables `()`, `[]` and `{}`.
    pub fn all() -> Self {
        Self {
            round: true,
            square: true,
            curly: true,
        }
    }
}

/// Block comment configuration.
#[derive(Debug, Clone)]
pub struct NestedComment {
    /// Opening delimiter.
    pub begin: String,
    /// Closing delimiter.
    pub end: String,
    /// Whether inner `begin`/`end` pairs nest (depth counted) or matching
    /// is flat (first `end` closes).
    pub nested: bool,
}

impl NestedComment {
    /// A flat block comment delimited by `begin`/`end`.
    pub fn flat(begin: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            begin: begin.into(),
            end: end.into(),
            nested: false,
        }
    }

    /// A depth-counted block comment delimited by `begin`/`end`.
    pub fn nested(begin: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            begin: begin.into(),
            end: end.into(),
            nested: true,
        }
    }

    /// A flat block comment opened and closed by the same `delim`.
    pub fn block(delim: impl Into<String>) -> Self {
        let delim = delim.into();
        Self {
            begin: delim.clone(),
            end: delim,
            nested: false,
        }
    }
}

/// Numeric literal configuration.
///
/// The compiled rule set turns this into generated regex guards; see
/// [`crate::RuleSet::compile`].
#[derive(Debug, Clone)]
pub struct NumberConfig {
    /// Accept integer literals (`42`, `0xFF`, `0o77`, `0b1010`).
    pub integer: bool,
    /// Accept float literals (`3.14`, `1.0e-3`).
    pub float: bool,
    /// Digit separator, allowed between digits. Must not be a digit or a
    /// hex letter.
    pub separator: char,
    /// Reject numbers glued to an identifier character (`123abc`).
    pub no_follow: bool,
    /// Accept a leading `+`/`-` sign.
    pub signed: bool,
}

impl Default for NumberConfig {
    fn default() -> Self {
        Self {
            integer: true,
            float: true,
            separator: '_',
            no_follow: true,
            signed: false,
        }
    }
}

/// One quoted-string rule.
#[derive(Debug, Clone)]
pub struct QuoteRule {
    /// Token kind; defaults to `__quoted_by_<start>` when `None`.
    pub kind: Option<String>,
    /// Opening delimiter.
    pub start: String,
    /// Closing delimiter.
    pub stop: String,
    /// Escape sigil inside the body, or `None` for raw bodies.
    pub escape: Option<char>,
    /// Whether a literal newline is allowed inside the body.
    pub multiline: bool,
}

impl QuoteRule {
    /// A string opened and closed by the same delimiter, `\`-escaped.
    pub fn delim(delim: impl Into<String>) -> Self {
        let delim = delim.into();
        Self {
            kind: None,
            start: delim.clone(),
            stop: delim,
            escape: Some('\\'),
            multiline: false,
        }
    }

    /// A string with distinct open/close delimiters, `\`-escaped.
    pub fn pair(start: impl Into<String>, stop: impl Into<String>) -> Self {
        Self {
            kind: None,
            start: start.into(),
            stop: stop.into(),
            escape: Some('\\'),
            multiline: false,
        }
    }

    /// A raw string: no escape processing inside the body.
    pub fn raw(start: impl Into<String>, stop: impl Into<String>) -> Self {
        Self {
            kind: None,
            start: start.into(),
            stop: stop.into(),
            escape: None,
            multiline: false,
        }
    }

    /// Sets the token kind.
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Allows literal newlines inside the body.
    pub fn multiline(mut self) -> Self {
        self.multiline = true;
        self
    }

    /// Sets the escape sigil.
    pub fn escape_char(mut self, sigil: char) -> Self {
        self.escape = Some(sigil);
        self
    }
}

/// Preset configuration compiled alongside the free rules.
///
/// `operators` is indexed by precedence: the outer position is the level
/// (0 = loosest binding), entries of one inner group share that level.
#[derive(Debug, Clone)]
pub struct LexerConfig {
    /// Skip whitespace and comments before each token. Default `true`.
    pub skip_spaces: bool,
    /// Line comment prefix, consumed to the next newline.
    pub line_comment: Option<String>,
    /// Block comment delimiters.
    pub nested_comment: Option<NestedComment>,
    /// Bracket pairs installed as literal guards.
    pub parentheses: Parentheses,
    /// Numeric literal rules.
    pub numbers: Option<NumberConfig>,
    /// Quoted-string rules, in declared order.
    pub strings: Vec<QuoteRule>,
    /// Keywords: literals tagged `__kw_<word>`, regexes tagged from the
    /// matched lexeme.
    pub keywords: Vec<Pattern>,
    /// Operator precedence groups, loosest first.
    pub operators: Vec<Vec<OperatorRule>>,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            skip_spaces: true,
            line_comment: None,
            nested_comment: None,
            parentheses: Parentheses::default(),
            numbers: None,
            strings: Vec::new(),
            keywords: Vec::new(),
            operators: Vec::new(),
        }
    }
}

/// Error raised while compiling a rule configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The digit separator would be ambiguous with the digits themselves.
    #[error("invalid digit separator {0:?}: must not be a digit or letter")]
    InvalidSeparator(char),

    /// A quoted-string rule with an empty delimiter.
    #[error("string rule has an empty delimiter")]
    EmptyQuote,

    /// A literal rule with an empty lexeme.
    #[error("literal rule has an empty lexeme")]
    EmptyLiteral,

    /// A regex pattern that failed to compile.
    #[error("invalid pattern {pattern:?}: {source}")]
    BadPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// An operator precedence group with no members.
    #[error("operator group at precedence level {0} is empty")]
    EmptyOperatorGroup(usize),
}

/// Result type alias for rule compilation.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
