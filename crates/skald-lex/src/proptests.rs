//! Property tests for the lexer.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::lexer::Lexer;
    use crate::rules::{LexerConfig, NumberConfig, QuoteRule};
    use crate::ruleset::RuleSet;

    fn string_ruleset() -> RuleSet {
        RuleSet::from_config(LexerConfig {
            strings: vec![QuoteRule::delim("\"")],
            ..LexerConfig::default()
        })
        .unwrap()
    }

    fn number_ruleset() -> RuleSet {
        RuleSet::from_config(LexerConfig {
            numbers: Some(NumberConfig::default()),
            ..LexerConfig::default()
        })
        .unwrap()
    }

    /// Escapes `body` so that wrapping it in double quotes re-lexes to the
    /// original text.
    fn escape_body(body: &str) -> String {
        let mut out = String::new();
        for c in body.chars() {
            match c {
                '\\' => out.push_str("\\\\"),
                '"' => out.push_str("\\\""),
                '\n' => out.push_str("\\n"),
                other => out.push(other),
            }
        }
        out
    }

    proptest! {
        #[test]
        fn string_round_trip(body in "\\PC*") {
            let source = format!("\"{}\"", escape_body(&body));
            let mut lexer = Lexer::from_source(string_ruleset(), &source, "input");
            let token = lexer.next().unwrap().unwrap();
            prop_assert_eq!(token.literal, body);
            prop_assert!(lexer.next().unwrap().is_none());
        }

        #[test]
        fn clone_reads_identical_stream(count in 0usize..40) {
            let source = (0..count).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
            let lexer = Lexer::from_source(number_ruleset(), &source, "input");
            let mut a = lexer.clone();
            let mut b = lexer;
            prop_assert_eq!(a.tokens().unwrap(), b.tokens().unwrap());
        }

        #[test]
        fn decimal_integers_lex_to_themselves(value in 0u64..u64::MAX) {
            let source = value.to_string();
            let mut lexer = Lexer::from_source(number_ruleset(), &source, "input");
            let token = lexer.next().unwrap().unwrap();
            prop_assert_eq!(token.kind.as_str(), "integer");
            prop_assert_eq!(token.literal, source);
        }

        #[test]
        fn whitespace_never_changes_the_stream(padding in "[ \t\n]{0,10}") {
            let source = format!("{padding}42{padding}");
            let mut lexer = Lexer::from_source(number_ruleset(), &source, "input");
            let token = lexer.next().unwrap().unwrap();
            prop_assert_eq!(token.literal.as_str(), "42");
            prop_assert!(lexer.next().unwrap().is_none());
        }
    }
}
