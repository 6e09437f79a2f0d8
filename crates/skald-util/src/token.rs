//! Token type and well-known token kinds.
//!
//! Token kinds are strings because the rule set is assembled at runtime;
//! built-in presets use the reserved `__`-prefixed kinds defined here.

/// Token kind emitted by the integer number rules.
pub const INTEGER: &str = "integer";

/// Token kind emitted by the float number rules.
pub const FLOAT: &str = "float";

/// Internal kind marking a number glued to an identifier character.
///
/// The lexer never returns a token of this kind; it converts it into a
/// failure at the token's position.
pub const NUMBER_NO_FOLLOW: &str = "__number_nofollow";

/// Returns the token kind for a literal keyword, e.g. `__kw_let`.
pub fn keyword_kind(word: &str) -> String {
    format!("__kw_{word}")
}

/// Returns the default token kind for a quoted string opened by `delim`,
/// e.g. `__quoted_by_"`.
pub fn quoted_kind(delim: &str) -> String {
    format!("__quoted_by_{delim}")
}

/// A single token produced by the lexer.
///
/// `literal` holds the decoded lexeme: for quoted strings the escape
/// sequences are already translated, for everything else it is the matched
/// source text. `line`/`column` point at the first character of the lexeme
/// (for quoted strings, the opening delimiter).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Kind tag, either user-chosen or one of the reserved kinds.
    pub kind: String,
    /// Decoded lexeme.
    pub literal: String,
    /// Name of the source this token came from.
    pub source_name: String,
    /// Line of the first character (1-based).
    pub line: u32,
    /// Column of the first character (1-based).
    pub column: u32,
}

impl Token {
    /// Creates a token.
    pub fn new(
        kind: impl Into<String>,
        literal: impl Into<String>,
        source_name: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            kind: kind.into(),
            literal: literal.into(),
            source_name: source_name.into(),
            line,
            column,
        }
    }

    /// Replaces the kind, keeping everything else.
    ///
    /// Used by rule transformers that re-tag a raw token.
    pub fn with_kind(self, kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..self
        }
    }
}
