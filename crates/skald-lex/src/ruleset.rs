//! Compiled rule set: the matchable form of a lexer configuration.
//!
//! Compilation turns free rules and presets into two guard families: a
//! static table of literal lexemes (matched first, longest literal
//! preferred) and an ordered list of anchored regexes. Operator precedence
//! is compiled into a lookup table for callers building expression parsers;
//! the lexer itself never reads it.

use std::rc::Rc;

use indexmap::IndexMap;
use regex::Regex;
use rustc_hash::FxHashMap;
use skald_util::{keyword_kind, quoted_kind, Token};

use crate::rules::{
    number_patterns, Assoc, ConfigError, ConfigResult, LexerConfig, NestedComment, Pattern, Rule,
    RuleAction,
};

/// Precedence and associativity of one operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorInfo {
    /// Precedence level; 0 binds loosest.
    pub level: u32,
    /// Declared associativity.
    pub assoc: Assoc,
}

/// Operator precedence lookup, populated by declaration order.
#[derive(Debug, Default)]
pub struct PrecedenceTable {
    static_ops: FxHashMap<String, OperatorInfo>,
    dynamic_ops: Vec<(Regex, OperatorInfo)>,
}

impl PrecedenceTable {
    /// Looks up an operator lexeme: literal entries first, then the regex
    /// entries in declared order (full-lexeme matches only).
    pub fn lookup(&self, lexeme: &str) -> Option<OperatorInfo> {
        if let Some(&info) = self.static_ops.get(lexeme) {
            return Some(info);
        }
        self.dynamic_ops
            .iter()
            .find(|(re, _)| re.is_match(lexeme))
            .map(|(_, info)| *info)
    }

    /// Number of precedence entries.
    pub fn len(&self) -> usize {
        self.static_ops.len() + self.dynamic_ops.len()
    }

    /// True if no operators were declared.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One compiled dynamic guard.
#[derive(Debug)]
pub(crate) struct DynamicRule {
    pub regex: Regex,
    pub action: RuleAction,
}

/// Compiled quoted-string rule, keyed by its opening delimiter.
#[derive(Debug, Clone)]
pub struct QuoteSpec {
    /// Kind of the emitted token.
    pub kind: String,
    /// Closing delimiter.
    pub stop: String,
    /// Escape sigil, or `None` for raw bodies.
    pub escape: Option<char>,
    /// Whether literal newlines are allowed in the body.
    pub multiline: bool,
}

#[derive(Debug)]
struct Inner {
    skip_spaces: bool,
    static_guard: IndexMap<String, RuleAction>,
    /// Static keys sorted by descending character length, declaration order
    /// within a length. Drives the longest-literal prefix scan.
    static_by_len: Vec<String>,
    dynamic_guard: Vec<DynamicRule>,
    line_comment: Option<String>,
    nested_comment: Option<NestedComment>,
    quotes: IndexMap<String, QuoteSpec>,
    precedence: PrecedenceTable,
}

/// A compiled, immutable rule set.
///
/// Cloning is cheap and clones share the compiled guards, so one rule set
/// can drive any number of lexers.
#[derive(Debug, Clone)]
pub struct RuleSet {
    inner: Rc<Inner>,
}

impl RuleSet {
    /// Compiles free rules and a preset configuration into guards.
    ///
    /// Guard ordering is deterministic: free rules first (in declared
    /// order), then parentheses, keywords and operators; generated number
    /// rules are appended after all user regexes, each accepting rule
    /// preceded by its no-follow guard.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an empty literal or quote delimiter,
    /// a regex that fails to compile, an alphanumeric digit separator, or
    /// an empty operator group.
    pub fn compile(free_rules: Vec<Rule>, config: LexerConfig) -> ConfigResult<RuleSet> {
        let mut static_guard: IndexMap<String, RuleAction> = IndexMap::new();
        let mut dynamic_guard: Vec<DynamicRule> = Vec::new();
        let mut precedence = PrecedenceTable::default();

        let mut add_static = |lexeme: String, action: RuleAction| -> ConfigResult<()> {
            if lexeme.is_empty() {
                return Err(ConfigError::EmptyLiteral);
            }
            static_guard.entry(lexeme).or_insert(action);
            Ok(())
        };

        for rule in free_rules {
            match rule.pattern {
                Pattern::Literal(lexeme) => add_static(lexeme, rule.action)?,
                Pattern::Regex(pattern) => dynamic_guard.push(DynamicRule {
                    regex: anchored(&pattern)?,
                    action: rule.action,
                }),
            }
        }

        let parens = config.parentheses;
        for (enabled, pair) in [
            (parens.round, ["(", ")"]),
            (parens.square, ["[", "]"]),
            (parens.curly, ["{", "}"]),
        ] {
            if enabled {
                for lexeme in pair {
                    add_static(lexeme.to_string(), RuleAction::Kind(lexeme.to_string()))?;
                }
            }
        }

        for keyword in config.keywords {
            match keyword {
                Pattern::Literal(word) => {
                    let kind = keyword_kind(&word);
                    add_static(word, RuleAction::Kind(kind))?;
                }
                Pattern::Regex(pattern) => dynamic_guard.push(DynamicRule {
                    regex: anchored(&pattern)?,
                    action: RuleAction::Transform(Rc::new(|token: Token| {
                        let kind = keyword_kind(&token.literal);
                        token.with_kind(kind)
                    })),
                }),
            }
        }

        for (level, group) in config.operators.into_iter().enumerate() {
            if group.is_empty() {
                return Err(ConfigError::EmptyOperatorGroup(level));
            }
            for op in group {
                let info = OperatorInfo {
                    level: level as u32,
                    assoc: op.assoc,
                };
                match op.pattern {
                    Pattern::Literal(lexeme) => {
                        precedence.static_ops.insert(lexeme.clone(), info);
                        add_static(lexeme.clone(), RuleAction::Kind(lexeme))?;
                    }
                    Pattern::Regex(pattern) => {
                        precedence.dynamic_ops.push((full_match(&pattern)?, info));
                        dynamic_guard.push(DynamicRule {
                            regex: anchored(&pattern)?,
                            action: RuleAction::Transform(Rc::new(|token: Token| {
                                let kind = token.literal.clone();
                                token.with_kind(kind)
                            })),
                        });
                    }
                }
            }
        }

        let mut quotes: IndexMap<String, QuoteSpec> = IndexMap::new();
        for rule in config.strings {
            if rule.start.is_empty() || rule.stop.is_empty() {
                return Err(ConfigError::EmptyQuote);
            }
            let kind = rule.kind.unwrap_or_else(|| quoted_kind(&rule.start));
            quotes.entry(rule.start).or_insert(QuoteSpec {
                kind,
                stop: rule.stop,
                escape: rule.escape,
                multiline: rule.multiline,
            });
        }

        if let Some(numbers) = &config.numbers {
            for (pattern, kind) in number_patterns(numbers)? {
                dynamic_guard.push(DynamicRule {
                    regex: anchored(&pattern)?,
                    action: RuleAction::Kind(kind),
                });
            }
        }

        let mut static_by_len: Vec<String> = static_guard.keys().cloned().collect();
        static_by_len.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

        log::debug!(
            "compiled rule set: {} static guards, {} dynamic guards, {} quote rules, {} operators",
            static_guard.len(),
            dynamic_guard.len(),
            quotes.len(),
            precedence.len(),
        );

        Ok(RuleSet {
            inner: Rc::new(Inner {
                skip_spaces: config.skip_spaces,
                static_guard,
                static_by_len,
                dynamic_guard,
                line_comment: config.line_comment,
                nested_comment: config.nested_comment,
                quotes,
                precedence,
            }),
        })
    }

    /// Compiles a configuration with no free rules.
    pub fn from_config(config: LexerConfig) -> ConfigResult<RuleSet> {
        Self::compile(Vec::new(), config)
    }

    /// The operator precedence table, for precedence-climbing callers.
    pub fn precedence(&self) -> &PrecedenceTable {
        &self.inner.precedence
    }

    pub(crate) fn skip_spaces(&self) -> bool {
        self.inner.skip_spaces
    }

    pub(crate) fn line_comment(&self) -> Option<&str> {
        self.inner.line_comment.as_deref()
    }

    pub(crate) fn nested_comment(&self) -> Option<&NestedComment> {
        self.inner.nested_comment.as_ref()
    }

    /// First quote rule whose opening delimiter prefixes `rest`.
    pub(crate) fn quote_match(&self, rest: &str) -> Option<(&str, &QuoteSpec)> {
        self.inner
            .quotes
            .iter()
            .find(|(open, _)| rest.starts_with(open.as_str()))
            .map(|(open, spec)| (open.as_str(), spec))
    }

    /// Exact static lookup for a whole word.
    pub(crate) fn static_action(&self, word: &str) -> Option<&RuleAction> {
        self.inner.static_guard.get(word)
    }

    /// Longest-literal prefix scan over the static guard.
    pub(crate) fn static_prefix_scan(&self, rest: &str) -> Option<(&str, &RuleAction)> {
        self.inner
            .static_by_len
            .iter()
            .find(|key| rest.starts_with(key.as_str()))
            .and_then(|key| {
                self.inner
                    .static_guard
                    .get(key)
                    .map(|action| (key.as_str(), action))
            })
    }

    pub(crate) fn dynamic_rules(&self) -> &[DynamicRule] {
        &self.inner.dynamic_guard
    }
}

/// Compiles a pattern anchored to the current position.
fn anchored(pattern: &str) -> ConfigResult<Regex> {
    Regex::new(&format!("^(?:{pattern})")).map_err(|source| ConfigError::BadPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Compiles a pattern that must cover a whole lexeme.
fn full_match(pattern: &str) -> ConfigResult<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| ConfigError::BadPattern {
        pattern: pattern.to_string(),
        source,
    })
}
