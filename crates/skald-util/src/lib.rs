//! skald-util - Foundation types for the skald lexing/parsing workspace.
//!
//! This crate holds the pieces both layers share: the source cursor
//! ([`SourcePosition`]), the runtime-tagged [`Token`], and the failure
//! types every lexer and combinator returns. It has no knowledge of rule
//! sets or grammars.

pub mod error;
pub mod position;
pub mod token;

pub use error::{Failure, FailureSet, ParseError, ParseResult};
pub use position::{PositionOrder, SourcePosition};
pub use token::{keyword_kind, quoted_kind, Token, FLOAT, INTEGER, NUMBER_NO_FOLLOW};
