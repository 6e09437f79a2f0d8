//! skald-par - Monadic parser combinators over the skald lexer.
//!
//! A [`Parser<T>`] is a value wrapping a parse function from a source
//! cursor to a result. Grammars are assembled from the combinators in
//! [`combinators`] and the token readers in [`tokens`], and run with
//! [`Parser::parse`].
//!
//! # Backtracking discipline
//!
//! The central contract is *consumption*: a parser consumes input iff it
//! advances the cursor past its entry point before returning, whether it
//! succeeds or fails. Ordered choice ([`combinators::if_else`]) only tries
//! its second branch when the first failed **without** consuming; a branch
//! that fails after consuming input aborts the whole choice. When two
//! branches share a prefix, wrap the first in [`combinators::attempt`] so
//! its failure rewinds the cursor and the choice can move on:
//!
//! ```
//! use skald_lex::{LexerConfig, Rule, RuleSet};
//! use skald_par::combinators::{attempt, if_else};
//! use skald_par::tokens::token;
//!
//! let rules = RuleSet::compile(
//!     vec![Rule::literal("a", "a"), Rule::literal("b", "b")],
//!     LexerConfig::default(),
//! )
//! .unwrap();
//!
//! // aa | ab: without attempt, the first branch would consume the shared
//! // `a` prefix on failure and the second branch would never run.
//! let grammar = if_else(
//!     attempt(token(&rules, "a").then(token(&rules, "a"))),
//!     token(&rules, "a").then(token(&rules, "b")),
//! );
//! let token_b = grammar.parse_source("ab", "demo").unwrap();
//! assert_eq!(token_b.kind, "b");
//! ```
//!
//! There is also a non-backtracking choice, [`combinators::parallel`]:
//! both branches run on independent cursors and the one that consumes more
//! wins; two successes over the same span are an ambiguity error, which no
//! combinator catches (it marks a grammar bug, not an input bug).
//!
//! Recursive grammars tie the knot with [`lazy`], which defers (and
//! memoizes) construction of the inner parser until the first parse.

use std::rc::Rc;

use once_cell::unsync::OnceCell;
use skald_lex::RuleSet;
use skald_util::{ParseResult, SourcePosition};

pub mod combinators;
pub mod tokens;

mod edge_cases;

pub use skald_util::{Failure, FailureSet, ParseError, PositionOrder, Token};

/// A composable parser producing a `T`.
///
/// Parsers are cheap to clone (the parse function is shared) and are
/// values: build them once during grammar setup, run them many times.
/// Two parsers built by the same combinator from the same arguments
/// behave identically.
pub struct Parser<T> {
    run: Rc<dyn Fn(&mut SourcePosition) -> ParseResult<T>>,
    tag: Option<Rc<str>>,
}

impl<T> Clone for Parser<T> {
    fn clone(&self) -> Self {
        Self {
            run: Rc::clone(&self.run),
            tag: self.tag.clone(),
        }
    }
}

impl<T: 'static> Parser<T> {
    /// Wraps a parse function.
    pub fn new(run: impl Fn(&mut SourcePosition) -> ParseResult<T> + 'static) -> Self {
        Self {
            run: Rc::new(run),
            tag: None,
        }
    }

    /// Runs this parser on `pos`. This is the entry point; `pos` is
    /// advanced past whatever the parser consumed.
    pub fn parse(&self, pos: &mut SourcePosition) -> ParseResult<T> {
        (self.run)(pos)
    }

    /// Runs this parser on a fresh cursor over `source`.
    pub fn parse_source(&self, source: &str, name: impl Into<String>) -> ParseResult<T> {
        let mut pos = SourcePosition::new(source, name);
        self.parse(&mut pos)
    }

    /// Attaches a display label, used in look-ahead failure messages.
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(Rc::from(tag.into()));
        self
    }

    /// The display label, if any.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Monadic sequencing: feed the result into `f` to pick the next
    /// parser.
    pub fn bind<U: 'static>(self, f: impl Fn(T) -> Parser<U> + 'static) -> Parser<U> {
        Parser::new(move |pos| {
            let value = (self.run)(pos)?;
            f(value).parse(pos)
        })
    }

    /// Sequencing that discards this parser's result.
    pub fn then<U: 'static>(self, next: Parser<U>) -> Parser<U> {
        Parser::new(move |pos| {
            (self.run)(pos)?;
            next.parse(pos)
        })
    }

    /// Maps the success value.
    pub fn translate<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Parser<U> {
        Parser::new(move |pos| (self.run)(pos).map(&f))
    }

    /// Replaces a failure that consumed nothing with `expected <msg>`.
    ///
    /// Failures that consumed input, and ambiguity errors, pass through
    /// unchanged.
    pub fn expect(self, msg: impl Into<String>) -> Parser<T> {
        let msg = msg.into();
        Parser::new(move |pos| {
            let entry = pos.clone();
            match (self.run)(pos) {
                Ok(value) => Ok(value),
                Err(err) if !err.is_recoverable() => Err(err),
                Err(err) => {
                    if pos.offset() > entry.offset() {
                        Err(err)
                    } else {
                        Err(entry.failure(format!("expected {msg}")))
                    }
                }
            }
        })
    }

    /// Succeeds with this parser's result only if `look` does not match
    /// afterwards. The look-ahead runs on a probe cursor and never
    /// consumes.
    pub fn not_followed_by<U: 'static>(self, look: Parser<U>) -> Parser<T> {
        let label: Rc<str> = Rc::from(look.tag().unwrap_or("forbidden input").to_string());
        Parser::new(move |pos| {
            let value = (self.run)(pos)?;
            let mut probe = pos.clone();
            match look.parse(&mut probe) {
                Ok(_) => Err(pos.failure(format!("expected not to be followed by {label}"))),
                Err(err) if !err.is_recoverable() => Err(err),
                Err(_) => Ok(value),
            }
        })
    }

    /// Requires end of input after this parser.
    pub fn end(self, rules: &RuleSet) -> Parser<T> {
        self.not_followed_by(tokens::any_token(rules))
            .expect("end of file")
    }
}

/// Defers grammar construction until the first parse, memoizing the built
/// parser.
///
/// This is the recursion knot: a grammar function can refer to itself
/// through `lazy` without infinite construction.
///
/// ```
/// use skald_lex::{LexerConfig, NumberConfig, Parentheses, Rule, RuleSet};
/// use skald_par::combinators::{choices, many_separated};
/// use skald_par::tokens::token;
/// use skald_par::{lazy, Parser};
///
/// fn rules() -> RuleSet {
///     RuleSet::compile(
///         vec![Rule::literal(",", ",")],
///         LexerConfig {
///             parentheses: Parentheses::all(),
///             numbers: Some(NumberConfig::default()),
///             ..LexerConfig::default()
///         },
///     )
///     .unwrap()
/// }
///
/// // nested ::= integer | "[" nested* "]"
/// fn nested(rules: &RuleSet) -> Parser<usize> {
///     let inner = {
///         let rules = rules.clone();
///         lazy(move || nested(&rules))
///     };
///     choices(vec![
///         token(rules, "integer").translate(|_| 0),
///         token(rules, "[")
///             .then(many_separated(inner, token(rules, ",")))
///             .bind({
///                 let rules = rules.clone();
///                 move |items: Vec<usize>| {
///                     let depth = items.iter().max().map_or(0, |d| d + 1);
///                     token(&rules, "]").translate(move |_| depth)
///                 }
///             }),
///     ])
/// }
///
/// let rules = rules();
/// assert_eq!(nested(&rules).parse_source("[[1], 2]", "demo").unwrap(), 2);
/// ```
pub fn lazy<T: 'static>(build: impl Fn() -> Parser<T> + 'static) -> Parser<T> {
    let cell: Rc<OnceCell<Parser<T>>> = Rc::new(OnceCell::new());
    Parser::new(move |pos| cell.get_or_init(|| build()).parse(pos))
}
