//! skald-lex - Rule-driven tokenizer.
//!
//! This crate turns a declarative rule configuration into a compiled
//! [`RuleSet`] and pulls tokens from a [`skald_util::SourcePosition`] with
//! it. Rules come in two families: static guards (literal lexemes, longest
//! match preferred) and dynamic guards (anchored regexes tried in declared
//! order). Presets cover the usual language front-end needs: line and
//! block comments, bracket pairs, keywords, quoted strings with escape
//! decoding, numeric literals with digit separators, and operator tables
//! with precedence levels exported for expression parsers.
//!
//! ```
//! use skald_lex::{Lexer, LexerConfig, NumberConfig, RuleSet};
//!
//! let rules = RuleSet::from_config(LexerConfig {
//!     numbers: Some(NumberConfig::default()),
//!     ..LexerConfig::default()
//! })
//! .unwrap();
//! let mut lexer = Lexer::from_source(rules, "1 2 3", "demo");
//! let tokens = lexer.tokens().unwrap();
//! assert_eq!(tokens.len(), 3);
//! ```

mod edge_cases;
mod escapes;
pub mod lexer;
mod proptests;
pub mod rules;
pub mod ruleset;

pub use lexer::{next_token, skip_whites, Lexer};
pub use rules::{
    Assoc, ConfigError, ConfigResult, LexerConfig, NestedComment, NumberConfig, OperatorRule,
    Parentheses, Pattern, QuoteRule, Rule, RuleAction,
};
pub use ruleset::{OperatorInfo, PrecedenceTable, QuoteSpec, RuleSet};
