//! Source cursor with line/column tracking.
//!
//! A `SourcePosition` owns its (shared) source text, so independent clones
//! can advance separately and later be compared or committed back. Carriage
//! returns are stripped at construction, so the cursor only ever sees `\n`
//! line endings.

use std::fmt;
use std::rc::Rc;

use crate::error::{Failure, ParseError, ParseResult};

/// Relative ordering of two cursors over the same source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionOrder {
    /// Same source, same remaining input, same line/column.
    Equal,
    /// Self has consumed more of the same source than the other cursor.
    Ahead,
    /// Self has consumed less of the same source than the other cursor.
    Behind,
    /// Different source names, or suffixes that belong to different texts.
    Unrelated,
}

/// A cursor over a source string.
///
/// Cloning yields an independent cursor over the same (shared) text; a
/// speculative clone is committed back with [`SourcePosition::assign`].
///
/// # Example
///
/// ```
/// use skald_util::SourcePosition;
///
/// let mut pos = SourcePosition::new("ab\nc", "input");
/// pos.advance().unwrap();
/// assert_eq!((pos.line(), pos.column()), (1, 2));
/// pos.advance().unwrap();
/// assert_eq!((pos.line(), pos.column()), (2, 1));
/// ```
#[derive(Clone)]
pub struct SourcePosition {
    /// Full source text with `\r` stripped.
    text: Rc<str>,

    /// Name of the source, used in failure messages.
    name: Rc<str>,

    /// Current byte offset into `text`.
    offset: usize,

    /// Current line number (1-based).
    line: u32,

    /// Current column number (1-based, counted in characters).
    column: u32,
}

impl SourcePosition {
    /// Creates a cursor at the start of `source`.
    ///
    /// All `\r` characters are removed, so CRLF line endings become `\n`.
    pub fn new(source: &str, name: impl Into<String>) -> Self {
        let cleaned: String = source.chars().filter(|&c| c != '\r').collect();
        Self {
            text: Rc::from(cleaned),
            name: Rc::from(name.into()),
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Returns the source name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current line number (1-based).
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Returns the current column number (1-based).
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Returns the current byte offset into the source.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns true if all input has been consumed.
    pub fn at_eof(&self) -> bool {
        self.offset >= self.text.len()
    }

    /// Returns the character under the cursor, or `None` at end of input.
    pub fn current_char(&self) -> Option<char> {
        self.text[self.offset..].chars().next()
    }

    /// Returns the unconsumed suffix of the source.
    pub fn rest(&self) -> &str {
        &self.text[self.offset..]
    }

    /// Returns true if the unconsumed input starts with `prefix`.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    /// Consumes one character, updating line/column bookkeeping.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedEof`] when the cursor is already at
    /// end of input.
    pub fn advance(&mut self) -> ParseResult<()> {
        let Some(c) = self.current_char() else {
            return Err(self.eof_failure("unexpected end of input"));
        };
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Ok(())
    }

    /// Consumes `n` characters by single steps.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnexpectedEof`] if the input ends before all
    /// `n` characters are consumed; the cursor stays where the step failed.
    pub fn advance_by(&mut self, n: usize) -> ParseResult<()> {
        for _ in 0..n {
            self.advance()?;
        }
        Ok(())
    }

    /// Consumes the literal `lit`, which must be the next input.
    ///
    /// # Panics
    ///
    /// Panics if the unconsumed input does not start with `lit`; callers
    /// check with [`SourcePosition::starts_with`] first.
    pub fn advance_over(&mut self, lit: &str) {
        assert!(
            self.starts_with(lit),
            "advance_over: input does not start with {lit:?}"
        );
        for _ in lit.chars() {
            // Cannot hit EOF: the prefix check above covers every step.
            let _ = self.advance();
        }
    }

    /// Overwrites this cursor in place, committing a speculative branch.
    pub fn assign(&mut self, other: &SourcePosition) {
        *self = other.clone();
    }

    /// Compares two cursors for relative progress.
    ///
    /// Cursors over the same text compare by offset. Cursors over different
    /// texts are related only when one unconsumed suffix is a suffix of the
    /// other; otherwise they are [`PositionOrder::Unrelated`].
    pub fn compare(&self, other: &SourcePosition) -> PositionOrder {
        if self.name != other.name {
            return PositionOrder::Unrelated;
        }
        if Rc::ptr_eq(&self.text, &other.text) || self.text == other.text {
            return match self.offset.cmp(&other.offset) {
                std::cmp::Ordering::Equal => PositionOrder::Equal,
                std::cmp::Ordering::Greater => PositionOrder::Ahead,
                std::cmp::Ordering::Less => PositionOrder::Behind,
            };
        }
        let (a, b) = (self.rest(), other.rest());
        if a == b {
            if self.line == other.line && self.column == other.column {
                PositionOrder::Equal
            } else {
                PositionOrder::Unrelated
            }
        } else if a.len() < b.len() && b.ends_with(a) {
            PositionOrder::Ahead
        } else if b.len() < a.len() && a.ends_with(b) {
            PositionOrder::Behind
        } else {
            PositionOrder::Unrelated
        }
    }

    /// Builds a [`ParseError::Failure`] at the current location.
    pub fn failure(&self, msg: impl Into<String>) -> ParseError {
        ParseError::Failure(Failure::new(msg, self.name.to_string(), self.line, self.column))
    }

    /// Builds a [`ParseError::UnexpectedEof`] at the current location.
    pub fn eof_failure(&self, msg: impl Into<String>) -> ParseError {
        ParseError::UnexpectedEof(Failure::new(
            msg,
            self.name.to_string(),
            self.line,
            self.column,
        ))
    }
}

impl fmt::Debug for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourcePosition")
            .field("name", &self.name)
            .field("offset", &self.offset)
            .field("line", &self.line)
            .field("column", &self.column)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_position() {
        let pos = SourcePosition::new("let x = 42;", "input");
        assert_eq!(pos.line(), 1);
        assert_eq!(pos.column(), 1);
        assert_eq!(pos.current_char(), Some('l'));
        assert!(!pos.at_eof());
    }

    #[test]
    fn test_strips_carriage_returns() {
        let pos = SourcePosition::new("a\r\nb\rc", "input");
        assert_eq!(pos.rest(), "a\nbc");
    }

    #[test]
    fn test_advance_tracks_lines() {
        let mut pos = SourcePosition::new("ab\ncd", "input");
        pos.advance_by(2).unwrap();
        assert_eq!((pos.line(), pos.column()), (1, 3));
        pos.advance().unwrap();
        assert_eq!((pos.line(), pos.column()), (2, 1));
        pos.advance().unwrap();
        assert_eq!((pos.line(), pos.column()), (2, 2));
    }

    #[test]
    fn test_advance_at_eof_is_error() {
        let mut pos = SourcePosition::new("a", "input");
        pos.advance().unwrap();
        assert!(pos.at_eof());
        let err = pos.advance().unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof(_)));
    }

    #[test]
    fn test_advance_multibyte() {
        let mut pos = SourcePosition::new("αβ", "input");
        pos.advance().unwrap();
        assert_eq!(pos.current_char(), Some('β'));
        assert_eq!(pos.column(), 2);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut pos = SourcePosition::new("abc", "input");
        let saved = pos.clone();
        pos.advance_by(2).unwrap();
        assert_eq!(saved.rest(), "abc");
        assert_eq!(pos.rest(), "c");
    }

    #[test]
    fn test_assign_commits() {
        let mut pos = SourcePosition::new("abc", "input");
        let mut probe = pos.clone();
        probe.advance_by(2).unwrap();
        pos.assign(&probe);
        assert_eq!(pos.rest(), "c");
        assert_eq!(pos.column(), 3);
    }

    #[test]
    fn test_compare_same_text() {
        let a = SourcePosition::new("abc", "input");
        let mut b = a.clone();
        assert_eq!(a.compare(&b), PositionOrder::Equal);
        b.advance().unwrap();
        assert_eq!(a.compare(&b), PositionOrder::Behind);
        assert_eq!(b.compare(&a), PositionOrder::Ahead);
    }

    #[test]
    fn test_compare_different_names() {
        let a = SourcePosition::new("abc", "one");
        let b = SourcePosition::new("abc", "two");
        assert_eq!(a.compare(&b), PositionOrder::Unrelated);
    }

    #[test]
    fn test_compare_suffix_containment() {
        let a = SourcePosition::new("xabc", "input");
        let mut b = SourcePosition::new("abc", "input");
        assert_eq!(b.compare(&a), PositionOrder::Ahead);
        assert_eq!(a.compare(&b), PositionOrder::Behind);
        b.advance().unwrap();
        let mut c = SourcePosition::new("xyz", "input");
        c.advance().unwrap();
        assert_eq!(b.compare(&c), PositionOrder::Unrelated);
    }

    #[test]
    fn test_failure_carries_position() {
        let mut pos = SourcePosition::new("ab\ncd", "input");
        pos.advance_by(3).unwrap();
        let err = pos.failure("bad input");
        assert_eq!(
            err.to_string(),
            "input - parse error at line 2, column 1: bad input"
        );
    }
}
