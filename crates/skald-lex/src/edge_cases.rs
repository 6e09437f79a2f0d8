//! Edge case tests for skald-lex
