//! Generated regex rules for numeric literals.
//!
//! Number lexing is regex-driven so it composes with the other dynamic
//! guards. For each accepted shape an optional "no-follow" guard is emitted
//! *before* the accepting rule: it matches the same literal glued to an
//! identifier character and tags it [`NUMBER_NO_FOLLOW`], which the lexer
//! converts into a failure.

use skald_util::{FLOAT, INTEGER, NUMBER_NO_FOLLOW};

use super::{ConfigError, ConfigResult, NumberConfig};

/// Characters that must not directly follow a number.
const FOLLOW_CLASS: &str = "[A-Za-z_]";

/// Builds the `(pattern, kind)` pairs for a number configuration, in the
/// order they are appended to the dynamic guard.
///
/// Float rules precede integer rules so that `3.14` is not split into the
/// integer `3` and a stray `.14`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSeparator`] when the digit separator is a
/// digit or a letter (it would be indistinguishable from hex digits).
pub(crate) fn number_patterns(config: &NumberConfig) -> ConfigResult<Vec<(String, String)>> {
    if config.separator.is_ascii_alphanumeric() {
        return Err(ConfigError::InvalidSeparator(config.separator));
    }
    let sep = regex::escape(&config.separator.to_string());
    let run = |class: &str| format!("{class}(?:{sep}?{class})*");

    let decimal = run("[0-9]");
    let sign = if config.signed { "[+-]?" } else { "" };

    let mut rules = Vec::new();
    if config.float {
        let float = format!("{sign}{decimal}\\.(?:{decimal})?(?:[eE][+-]?[0-9]+)?");
        if config.no_follow {
            rules.push((format!("(?:{float}){FOLLOW_CLASS}"), NUMBER_NO_FOLLOW.to_string()));
        }
        rules.push((float, FLOAT.to_string()));
    }
    if config.integer {
        let hex = run("[0-9a-fA-F]");
        let octal = run("[0-7]");
        let binary = run("[01]");
        let integer = format!("{sign}(?:0[xX]{hex}|0[oO]{octal}|0[bB]{binary}|{decimal})");
        if config.no_follow {
            rules.push((
                format!("(?:{integer}){FOLLOW_CLASS}"),
                NUMBER_NO_FOLLOW.to_string(),
            ));
        }
        rules.push((integer, INTEGER.to_string()));
    }
    Ok(rules)
}
