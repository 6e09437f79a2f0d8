//! Error types shared by the lexer and the parser combinators.
//!
//! Failures carry the source name and a 1-based line/column. They combine
//! into flat sets when several alternatives fail, and the set keeps every
//! constituent in order (duplicates included).

use std::fmt;

use thiserror::Error;

/// A single failure at a known source location.
///
/// Renders as `<name> - parse error at line L, column C: <msg>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Human-readable description of what went wrong.
    pub msg: String,
    /// Name of the source the failure occurred in.
    pub source_name: String,
    /// Line number (1-based; 0 when no position is known).
    pub line: u32,
    /// Column number (1-based; 0 when no position is known).
    pub column: u32,
}

impl Failure {
    /// Creates a failure at the given location.
    pub fn new(
        msg: impl Into<String>,
        source_name: impl Into<String>,
        line: u32,
        column: u32,
    ) -> Self {
        Self {
            msg: msg.into(),
            source_name: source_name.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - parse error at line {}, column {}: {}",
            self.source_name, self.line, self.column, self.msg
        )
    }
}

/// An ordered collection of failures from several alternatives.
///
/// Renders as a count line followed by one failure per line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FailureSet(pub Vec<Failure>);

impl fmt::Display for FailureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} parse errors:", self.0.len())?;
        for (i, failure) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{failure}")?;
        }
        Ok(())
    }
}

/// Error produced by lexing or parsing.
///
/// `UnexpectedEof` marks end of input interrupting an in-flight token or
/// parse; peaceful end of input is not an error (the lexer returns
/// `Ok(None)`). `Ambiguous` marks two parallel branches accepting the same
/// span, which is a grammar bug rather than an input error, so the
/// backtracking combinators never catch it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A single lexical or syntactic failure.
    #[error("{0}")]
    Failure(Failure),

    /// Several alternatives failed; all of their failures, in order.
    #[error("{0}")]
    Multiple(FailureSet),

    /// End of input interrupted an in-flight token or parse.
    #[error("{0}")]
    UnexpectedEof(Failure),

    /// Two parallel branches both accepted the same span.
    #[error("{0}")]
    Ambiguous(Failure),
}

impl ParseError {
    /// An `UnexpectedEof` with no better position than the conventional 0,0.
    pub fn unexpected_eof(source_name: impl Into<String>) -> Self {
        ParseError::UnexpectedEof(Failure::new("unexpected end of input", source_name, 0, 0))
    }

    /// Whether a speculative combinator may catch this error and retry.
    ///
    /// Everything except [`ParseError::Ambiguous`] is recoverable.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ParseError::Ambiguous(_))
    }

    /// Combines two errors into one holding the union of their failures.
    ///
    /// Associative and commutative up to ordering; duplicates are kept.
    pub fn combine(self, other: ParseError) -> ParseError {
        let mut failures = self.into_failures();
        failures.extend(other.into_failures());
        ParseError::Multiple(FailureSet(failures))
    }

    /// Flattens this error into its constituent failures.
    pub fn into_failures(self) -> Vec<Failure> {
        match self {
            ParseError::Failure(f) | ParseError::UnexpectedEof(f) | ParseError::Ambiguous(f) => {
                vec![f]
            }
            ParseError::Multiple(set) => set.0,
        }
    }
}

/// Result type alias for lexing and parsing operations.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(msg: &str, line: u32, column: u32) -> Failure {
        Failure::new(msg, "input", line, column)
    }

    #[test]
    fn test_failure_display() {
        let f = failure("invalid token", 3, 14);
        assert_eq!(
            f.to_string(),
            "input - parse error at line 3, column 14: invalid token"
        );
    }

    #[test]
    fn test_failure_set_display() {
        let set = FailureSet(vec![failure("expected a", 1, 1), failure("expected b", 1, 5)]);
        let rendered = set.to_string();
        assert!(rendered.starts_with("2 parse errors:\n"));
        assert!(rendered.contains("expected a"));
        assert!(rendered.contains("line 1, column 5"));
    }

    #[test]
    fn test_combine_flattens() {
        let a = ParseError::Failure(failure("a", 1, 1));
        let b = ParseError::Multiple(FailureSet(vec![failure("b", 1, 2), failure("c", 1, 3)]));
        let combined = a.combine(b);
        let failures = combined.into_failures();
        assert_eq!(failures.len(), 3);
        assert_eq!(failures[0].msg, "a");
        assert_eq!(failures[2].msg, "c");
    }

    #[test]
    fn test_combine_keeps_duplicates() {
        let a = ParseError::Failure(failure("same", 2, 2));
        let b = ParseError::Failure(failure("same", 2, 2));
        assert_eq!(a.combine(b).into_failures().len(), 2);
    }

    #[test]
    fn test_unexpected_eof_position() {
        let err = ParseError::unexpected_eof("input");
        let ParseError::UnexpectedEof(f) = err else {
            panic!("expected UnexpectedEof");
        };
        assert_eq!((f.line, f.column), (0, 0));
    }

    #[test]
    fn test_ambiguous_is_not_recoverable() {
        let amb = ParseError::Ambiguous(failure("both branches match", 1, 1));
        assert!(!amb.is_recoverable());
        assert!(ParseError::Failure(failure("x", 1, 1)).is_recoverable());
    }
}
