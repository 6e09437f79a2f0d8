//! The combinator algebra.
//!
//! Every combinator here is defined in terms of consumption (see the
//! crate docs): whether a failing sub-parser advanced the cursor decides
//! if the combinator retries another alternative or gives up. Speculative
//! branches always run on cursor clones and are committed by assigning the
//! clone back.

use std::cmp::Ordering;

use skald_util::ParseError;

use crate::Parser;

/// Default bound on repetitions of a single `many`.
///
/// The bound exists to stop `many(p)` from spinning forever when `p`
/// succeeds without consuming input. Hitting it logs a warning and returns
/// the partial result; grammars whose repeated parsers always consume can
/// never reach it. Use [`many_bounded`] to pick a different bound.
pub const DEFAULT_MAX_REPEAT: usize = 1_000_000;

/// Succeeds with `value` without reading input.
pub fn trivial<T: Clone + 'static>(value: T) -> Parser<T> {
    Parser::new(move |_pos| Ok(value.clone()))
}

/// Ordered choice with backtracking.
///
/// Runs `first`; on a failure that consumed nothing the cursor is restored
/// and `second` runs. A failure that consumed input aborts the choice with
/// that failure. When both fail without consuming, the failures are
/// combined; when `second` fails after consuming, only its failure is
/// reported.
pub fn if_else<T: 'static>(first: Parser<T>, second: Parser<T>) -> Parser<T> {
    Parser::new(move |pos| {
        let entry = pos.clone();
        match first.parse(pos) {
            Ok(value) => Ok(value),
            Err(err) if !err.is_recoverable() => Err(err),
            Err(err) => {
                if pos.offset() > entry.offset() {
                    return Err(err);
                }
                pos.assign(&entry);
                match second.parse(pos) {
                    Ok(value) => Ok(value),
                    Err(other) if !other.is_recoverable() => Err(other),
                    Err(other) => {
                        if pos.offset() > entry.offset() {
                            Err(other)
                        } else {
                            Err(err.combine(other))
                        }
                    }
                }
            }
        }
    })
}

/// Runs `inner` on a probe cursor; commits only on success.
///
/// A failure leaves the caller's cursor untouched, so an `attempt`-wrapped
/// parser never "fails with consumption". This is the tool for giving
/// [`if_else`] a first branch that shares a prefix with the second.
pub fn attempt<T: 'static>(inner: Parser<T>) -> Parser<T> {
    Parser::new(move |pos| {
        let mut probe = pos.clone();
        let value = inner.parse(&mut probe)?;
        pos.assign(&probe);
        Ok(value)
    })
}

/// Runs `inner` on a probe cursor without ever committing.
///
/// Pure look-ahead: the result (success or failure) is reported but the
/// caller's cursor never moves.
pub fn test<T: 'static>(inner: Parser<T>) -> Parser<T> {
    Parser::new(move |pos| inner.parse(&mut pos.clone()))
}

/// Unordered choice: both branches run on independent cursors.
///
/// One success commits that branch. Two successes are resolved by
/// consumption: the branch that advanced further wins, and equal progress
/// is an ambiguity error (a grammar bug; nothing catches it). Two failures
/// combine.
pub fn parallel<T: 'static>(left: Parser<T>, right: Parser<T>) -> Parser<T> {
    Parser::new(move |pos| {
        let mut left_pos = pos.clone();
        let mut right_pos = pos.clone();
        let left_result = left.parse(&mut left_pos);
        let right_result = right.parse(&mut right_pos);
        match (left_result, right_result) {
            (Err(l), Err(r)) => {
                if !l.is_recoverable() {
                    return Err(l);
                }
                if !r.is_recoverable() {
                    return Err(r);
                }
                Err(l.combine(r))
            }
            (Ok(value), Err(r)) => {
                if !r.is_recoverable() {
                    return Err(r);
                }
                pos.assign(&left_pos);
                Ok(value)
            }
            (Err(l), Ok(value)) => {
                if !l.is_recoverable() {
                    return Err(l);
                }
                pos.assign(&right_pos);
                Ok(value)
            }
            (Ok(left_value), Ok(right_value)) => {
                match left_pos.offset().cmp(&right_pos.offset()) {
                    Ordering::Greater => {
                        pos.assign(&left_pos);
                        Ok(left_value)
                    }
                    Ordering::Less => {
                        pos.assign(&right_pos);
                        Ok(right_value)
                    }
                    Ordering::Equal => {
                        Err(ParseError::Ambiguous(skald_util::Failure::new(
                            "ambiguous input: both parallel branches match",
                            pos.name(),
                            pos.line(),
                            pos.column(),
                        )))
                    }
                }
            }
        }
    })
}

/// Tries each option in order on a fresh cursor clone; the first success
/// commits.
///
/// When every option fails, the reported failure comes from the option(s)
/// whose cursor advanced furthest; several options tied at the maximum are
/// combined.
pub fn choices<T: 'static>(options: Vec<Parser<T>>) -> Parser<T> {
    Parser::new(move |pos| {
        let entry = pos.clone();
        let mut failures: Vec<(usize, ParseError)> = Vec::new();
        for option in &options {
            let mut probe = entry.clone();
            match option.parse(&mut probe) {
                Ok(value) => {
                    pos.assign(&probe);
                    return Ok(value);
                }
                Err(err) if !err.is_recoverable() => return Err(err),
                Err(err) => failures.push((probe.offset(), err)),
            }
        }
        let furthest = failures
            .iter()
            .map(|(offset, _)| *offset)
            .max()
            .unwrap_or(entry.offset());
        let mut combined: Option<ParseError> = None;
        for (offset, err) in failures {
            if offset == furthest {
                combined = Some(match combined {
                    None => err,
                    Some(acc) => acc.combine(err),
                });
            }
        }
        Err(combined.unwrap_or_else(|| entry.failure("no alternatives")))
    })
}

/// Zero or more repetitions of `item`, with the default repetition bound.
///
/// Stops at the first failure that consumed nothing; a failure that
/// consumed input fails the whole repetition.
pub fn many<T: 'static>(item: Parser<T>) -> Parser<Vec<T>> {
    many_bounded(item, DEFAULT_MAX_REPEAT)
}

/// [`many`] with an explicit repetition bound.
///
/// Reaching the bound logs a warning and returns the partial vector.
pub fn many_bounded<T: 'static>(item: Parser<T>, max_repeat: usize) -> Parser<Vec<T>> {
    Parser::new(move |pos| {
        let mut out = Vec::new();
        loop {
            if out.len() >= max_repeat {
                log::warn!(
                    "repetition bound {} reached at {} line {}, column {}; returning partial result",
                    max_repeat,
                    pos.name(),
                    pos.line(),
                    pos.column(),
                );
                return Ok(out);
            }
            let entry = pos.clone();
            match item.parse(pos) {
                Ok(value) => out.push(value),
                Err(err) if !err.is_recoverable() => return Err(err),
                Err(err) => {
                    if pos.offset() > entry.offset() {
                        return Err(err);
                    }
                    pos.assign(&entry);
                    return Ok(out);
                }
            }
        }
    })
}

/// One or more repetitions of `item`.
pub fn more<T: 'static>(item: Parser<T>) -> Parser<Vec<T>> {
    let rest = many(item.clone());
    Parser::new(move |pos| {
        let first = item.parse(pos)?;
        let mut out = rest.parse(pos)?;
        out.insert(0, first);
        Ok(out)
    })
}

/// Zero or one occurrence of `item`.
///
/// Equivalent to an ordered choice between `item` and succeeding with
/// nothing: a failure that consumed input still fails.
pub fn optional<T: 'static>(item: Parser<T>) -> Parser<Option<T>> {
    Parser::new(move |pos| {
        let entry = pos.clone();
        match item.parse(pos) {
            Ok(value) => Ok(Some(value)),
            Err(err) if !err.is_recoverable() => Err(err),
            Err(err) => {
                if pos.offset() > entry.offset() {
                    return Err(err);
                }
                pos.assign(&entry);
                Ok(None)
            }
        }
    })
}

/// One or more `item`s separated by `sep`; separator results are dropped.
pub fn more_separated<T: 'static, S: 'static>(item: Parser<T>, sep: Parser<S>) -> Parser<Vec<T>> {
    let tail = many(sep.then(item.clone()));
    Parser::new(move |pos| {
        let first = item.parse(pos)?;
        let mut out = tail.parse(pos)?;
        out.insert(0, first);
        Ok(out)
    })
}

/// Zero or more `item`s separated by `sep`.
pub fn many_separated<T: 'static, S: 'static>(item: Parser<T>, sep: Parser<S>) -> Parser<Vec<T>> {
    optional(more_separated(item, sep)).translate(Option::unwrap_or_default)
}

/// Like [`more_separated`], but tolerates a trailing separator.
///
/// Each `sep item` pair is attempted as a unit so a dangling separator at
/// the end does not commit; the trailing separator itself is then consumed
/// if present.
pub fn more_separated_optional_end<T: 'static, S: 'static>(
    item: Parser<T>,
    sep: Parser<S>,
) -> Parser<Vec<T>> {
    let tail = many(attempt(sep.clone().then(item.clone())));
    let trailing = optional(sep);
    Parser::new(move |pos| {
        let first = item.parse(pos)?;
        let mut out = tail.parse(pos)?;
        out.insert(0, first);
        trailing.parse(pos)?;
        Ok(out)
    })
}

/// One or more `item end` pairs, keeping the item values.
pub fn more_end_with<T: 'static, E: 'static>(item: Parser<T>, end: Parser<E>) -> Parser<Vec<T>> {
    more(terminated(item, end))
}

/// Zero or more `item end` pairs, keeping the item values.
pub fn many_end_with<T: 'static, E: 'static>(item: Parser<T>, end: Parser<E>) -> Parser<Vec<T>> {
    many(terminated(item, end))
}

/// `item` followed by `end`, keeping the item's value.
fn terminated<T: 'static, E: 'static>(item: Parser<T>, end: Parser<E>) -> Parser<T> {
    Parser::new(move |pos| {
        let value = item.parse(pos)?;
        end.parse(pos)?;
        Ok(value)
    })
}

/// Left-associative operator chain: `item (op item)*`, folded as it goes.
///
/// `op` produces the combining function. A non-consuming `op` failure ends
/// the chain with the accumulated value; once an `op` has matched, the
/// following `item` must parse.
pub fn chain_left_more<T, F>(item: Parser<T>, op: Parser<F>) -> Parser<T>
where
    T: 'static,
    F: Fn(T, T) -> T + 'static,
{
    Parser::new(move |pos| {
        let mut acc = item.parse(pos)?;
        loop {
            let entry = pos.clone();
            let combine = match op.parse(pos) {
                Ok(f) => f,
                Err(err) if !err.is_recoverable() => return Err(err),
                Err(err) => {
                    if pos.offset() > entry.offset() {
                        return Err(err);
                    }
                    pos.assign(&entry);
                    return Ok(acc);
                }
            };
            let rhs = item.parse(pos)?;
            acc = combine(acc, rhs);
        }
    })
}

/// Right-associative operator chain: like [`chain_left_more`] but folded
/// from the right.
pub fn chain_right_more<T, F>(item: Parser<T>, op: Parser<F>) -> Parser<T>
where
    T: 'static,
    F: Fn(T, T) -> T + 'static,
{
    Parser::new(move |pos| {
        let first = item.parse(pos)?;
        let mut rest: Vec<(F, T)> = Vec::new();
        loop {
            let entry = pos.clone();
            match op.parse(pos) {
                Ok(f) => {
                    let rhs = item.parse(pos)?;
                    rest.push((f, rhs));
                }
                Err(err) if !err.is_recoverable() => return Err(err),
                Err(err) => {
                    if pos.offset() > entry.offset() {
                        return Err(err);
                    }
                    pos.assign(&entry);
                    break;
                }
            }
        }
        let mut pending: Option<(F, T)> = None;
        for (op, value) in rest.into_iter().rev() {
            pending = Some(match pending {
                None => (op, value),
                Some((right_op, acc)) => (op, right_op(value, acc)),
            });
        }
        Ok(match pending {
            None => first,
            Some((op, acc)) => op(first, acc),
        })
    })
}

/// Maps a parser's result; free-function form of [`Parser::translate`].
pub fn translate<T: 'static, U: 'static>(
    f: impl Fn(T) -> U + 'static,
    item: Parser<T>,
) -> Parser<U> {
    item.translate(f)
}

/// Runs two parsers in sequence and pairs their results.
pub fn combine2<A: 'static, B: 'static>(a: Parser<A>, b: Parser<B>) -> Parser<(A, B)> {
    Parser::new(move |pos| {
        let av = a.parse(pos)?;
        let bv = b.parse(pos)?;
        Ok((av, bv))
    })
}

/// Runs three parsers in sequence and bundles their results.
pub fn combine3<A: 'static, B: 'static, C: 'static>(
    a: Parser<A>,
    b: Parser<B>,
    c: Parser<C>,
) -> Parser<(A, B, C)> {
    Parser::new(move |pos| {
        let av = a.parse(pos)?;
        let bv = b.parse(pos)?;
        let cv = c.parse(pos)?;
        Ok((av, bv, cv))
    })
}

/// Runs four parsers in sequence and bundles their results.
pub fn combine4<A: 'static, B: 'static, C: 'static, D: 'static>(
    a: Parser<A>,
    b: Parser<B>,
    c: Parser<C>,
    d: Parser<D>,
) -> Parser<(A, B, C, D)> {
    Parser::new(move |pos| {
        let av = a.parse(pos)?;
        let bv = b.parse(pos)?;
        let cv = c.parse(pos)?;
        let dv = d.parse(pos)?;
        Ok((av, bv, cv, dv))
    })
}

/// Runs every parser in sequence, threading the cursor, and collects the
/// results.
pub fn combine_many<T: 'static>(parts: Vec<Parser<T>>) -> Parser<Vec<T>> {
    Parser::new(move |pos| parts.iter().map(|part| part.parse(pos)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use skald_util::{ParseError, SourcePosition};

    /// Consumes the given literal character.
    fn ch(expected: char) -> Parser<char> {
        Parser::new(move |pos| match pos.current_char() {
            Some(c) if c == expected => {
                pos.advance()?;
                Ok(c)
            }
            Some(c) => Err(pos.failure(format!("expected {expected:?}, found {c:?}"))),
            None => Err(pos.eof_failure(format!("expected {expected:?}"))),
        })
    }

    fn digit() -> Parser<i64> {
        Parser::new(|pos| match pos.current_char().and_then(|c| c.to_digit(10)) {
            Some(d) => {
                pos.advance()?;
                Ok(i64::from(d))
            }
            None => Err(pos.failure("expected digit")),
        })
    }

    /// Succeeds without consuming anything.
    fn epsilon() -> Parser<()> {
        Parser::new(|_pos| Ok(()))
    }

    #[test]
    fn test_trivial() {
        let mut pos = SourcePosition::new("abc", "input");
        assert_eq!(trivial(42).parse(&mut pos).unwrap(), 42);
        assert_eq!(pos.rest(), "abc");
    }

    #[test]
    fn test_if_else_first_wins() {
        let p = if_else(ch('a'), ch('b'));
        assert_eq!(p.parse_source("a", "input").unwrap(), 'a');
        assert_eq!(p.parse_source("b", "input").unwrap(), 'b');
    }

    #[test]
    fn test_if_else_combines_clean_failures() {
        let p = if_else(ch('a'), ch('b'));
        let err = p.parse_source("c", "input").unwrap_err();
        assert!(matches!(err, ParseError::Multiple(_)));
        assert_eq!(err.into_failures().len(), 2);
    }

    #[test]
    fn test_if_else_no_backtrack_after_consumption() {
        // First branch consumes `a` then fails; second branch never runs.
        let p = if_else(
            ch('a').then(ch('a')).translate(|_| "aa"),
            ch('a').then(ch('b')).translate(|_| "ab"),
        );
        let err = p.parse_source("ab", "input").unwrap_err();
        let failures = err.into_failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].msg.contains("'a'"));
    }

    #[test]
    fn test_if_else_attempt_restores_backtracking() {
        let p = if_else(
            attempt(ch('a').then(ch('a')).translate(|_| "aa")),
            ch('a').then(ch('b')).translate(|_| "ab"),
        );
        assert_eq!(p.parse_source("ab", "input").unwrap(), "ab");
        assert_eq!(p.parse_source("aa", "input").unwrap(), "aa");
    }

    #[test]
    fn test_if_else_second_consuming_failure_stands_alone() {
        let p = if_else(ch('x'), ch('a').then(ch('b')));
        let err = p.parse_source("ac", "input").unwrap_err();
        // Only the second branch's failure: it consumed the `a`.
        let failures = err.into_failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].msg.contains("'b'"));
    }

    #[test]
    fn test_attempt_failure_keeps_cursor() {
        let p = attempt(ch('a').then(ch('a')));
        let mut pos = SourcePosition::new("ab", "input");
        assert!(p.parse(&mut pos).is_err());
        assert_eq!(pos.rest(), "ab");
    }

    #[test]
    fn test_test_never_commits() {
        let p = test(ch('a'));
        let mut pos = SourcePosition::new("ab", "input");
        assert_eq!(p.parse(&mut pos).unwrap(), 'a');
        assert_eq!(pos.rest(), "ab");
    }

    #[test]
    fn test_parallel_single_success() {
        let p = parallel(ch('a'), ch('b'));
        assert_eq!(p.parse_source("a", "input").unwrap(), 'a');
        assert_eq!(p.parse_source("b", "input").unwrap(), 'b');
    }

    #[test]
    fn test_parallel_longer_consumption_wins() {
        let p = parallel(
            ch('a').translate(|_| 1usize),
            ch('a').then(ch('b')).translate(|_| 2usize),
        );
        let mut pos = SourcePosition::new("ab", "input");
        assert_eq!(p.parse(&mut pos).unwrap(), 2);
        assert_eq!(pos.rest(), "");
    }

    #[test]
    fn test_parallel_equal_consumption_is_ambiguous() {
        let p = parallel(ch('a').translate(|_| 1), ch('a').translate(|_| 2));
        let err = p.parse_source("a", "input").unwrap_err();
        assert!(matches!(err, ParseError::Ambiguous(_)));
    }

    #[test]
    fn test_parallel_both_failures_combine() {
        let p = parallel(ch('a'), ch('b'));
        let err = p.parse_source("c", "input").unwrap_err();
        assert_eq!(err.into_failures().len(), 2);
    }

    #[test]
    fn test_ambiguity_is_not_caught_by_choices() {
        let ambiguous = parallel(ch('a').translate(|_| 1), ch('a').translate(|_| 2));
        let p = choices(vec![ambiguous, ch('a').translate(|_| 3)]);
        let err = p.parse_source("a", "input").unwrap_err();
        assert!(matches!(err, ParseError::Ambiguous(_)));
    }

    #[test]
    fn test_choices_first_success() {
        let p = choices(vec![ch('a'), ch('b'), ch('c')]);
        assert_eq!(p.parse_source("b", "input").unwrap(), 'b');
    }

    #[test]
    fn test_choices_reports_furthest_failure() {
        // Branch 2 consumes `ab` before failing, further than the others.
        let p = choices(vec![
            ch('x').translate(|_| 0),
            ch('a').then(ch('b')).then(ch('y')).translate(|_| 1),
            ch('a').translate(|_| 2).then(ch('z')).translate(|_| 2),
        ]);
        let err = p.parse_source("abc", "input").unwrap_err();
        let failures = err.into_failures();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].msg.contains("'y'"), "{failures:?}");
    }

    #[test]
    fn test_choices_combines_tied_failures() {
        let p = choices(vec![ch('a'), ch('b')]);
        let err = p.parse_source("c", "input").unwrap_err();
        assert_eq!(err.into_failures().len(), 2);
    }

    #[test]
    fn test_many_collects_until_clean_failure() {
        let p = many(ch('a'));
        let mut pos = SourcePosition::new("aaab", "input");
        assert_eq!(p.parse(&mut pos).unwrap(), vec!['a', 'a', 'a']);
        assert_eq!(pos.rest(), "b");
    }

    #[test]
    fn test_many_empty_is_ok() {
        assert_eq!(many(ch('a')).parse_source("b", "input").unwrap(), vec![]);
    }

    #[test]
    fn test_many_fails_on_consuming_failure() {
        let p = many(ch('a').then(ch('b')));
        // Second iteration consumes `a` then fails on `c`.
        assert!(p.parse_source("abac", "input").is_err());
    }

    #[test]
    fn test_many_bounded_stops_spinning() {
        let p = many_bounded(epsilon(), 5);
        let out = p.parse_source("", "input").unwrap();
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn test_more_needs_at_least_one() {
        let p = more(ch('a'));
        assert_eq!(p.parse_source("aa", "input").unwrap(), vec!['a', 'a']);
        assert!(p.parse_source("b", "input").is_err());
    }

    #[test]
    fn test_optional() {
        let p = optional(ch('a'));
        assert_eq!(p.parse_source("a", "input").unwrap(), Some('a'));
        assert_eq!(p.parse_source("b", "input").unwrap(), None);
    }

    #[test]
    fn test_optional_consuming_failure_propagates() {
        let p = optional(ch('a').then(ch('b')));
        assert!(p.parse_source("ac", "input").is_err());
    }

    #[test]
    fn test_more_separated() {
        let p = more_separated(digit(), ch(','));
        assert_eq!(p.parse_source("1,2,3", "input").unwrap(), vec![1, 2, 3]);
        assert_eq!(p.parse_source("7", "input").unwrap(), vec![7]);
    }

    #[test]
    fn test_more_separated_dangling_separator_fails() {
        let p = more_separated(digit(), ch(','));
        // The trailing `,` commits to another item that never comes.
        assert!(p.parse_source("1,2,", "input").is_err());
    }

    #[test]
    fn test_many_separated_empty() {
        let p = many_separated(digit(), ch(','));
        assert_eq!(p.parse_source("x", "input").unwrap(), vec![]);
        assert_eq!(p.parse_source("4,2", "input").unwrap(), vec![4, 2]);
    }

    #[test]
    fn test_more_separated_optional_end() {
        let p = more_separated_optional_end(digit(), ch(','));
        let mut pos = SourcePosition::new("1,2,;", "input");
        assert_eq!(p.parse(&mut pos).unwrap(), vec![1, 2]);
        assert_eq!(pos.rest(), ";");

        assert_eq!(p.parse_source("1,2", "input").unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_more_end_with() {
        let p = more_end_with(digit(), ch(';'));
        assert_eq!(p.parse_source("1;2;3;", "input").unwrap(), vec![1, 2, 3]);
        assert!(p.parse_source("1;2", "input").is_err());
    }

    #[test]
    fn test_many_end_with_empty() {
        let p = many_end_with(digit(), ch(';'));
        assert_eq!(p.parse_source("x", "input").unwrap(), vec![]);
    }

    #[test]
    fn test_chain_left_more_folds_left() {
        let sub = ch('-').translate(|_| (|x: i64, y: i64| x - y) as fn(i64, i64) -> i64);
        let p = chain_left_more(digit(), sub);
        // ((9 - 2) - 3) = 4, not 9 - (2 - 3) = 10.
        assert_eq!(p.parse_source("9-2-3", "input").unwrap(), 4);
    }

    #[test]
    fn test_chain_left_single_item() {
        let sub = ch('-').translate(|_| (|x: i64, y: i64| x - y) as fn(i64, i64) -> i64);
        let p = chain_left_more(digit(), sub);
        assert_eq!(p.parse_source("5", "input").unwrap(), 5);
    }

    #[test]
    fn test_chain_left_requires_item_after_op() {
        let sub = ch('-').translate(|_| (|x: i64, y: i64| x - y) as fn(i64, i64) -> i64);
        let p = chain_left_more(digit(), sub);
        assert!(p.parse_source("5-", "input").is_err());
    }

    #[test]
    fn test_chain_right_more_folds_right() {
        let sub = ch('-').translate(|_| (|x: i64, y: i64| x - y) as fn(i64, i64) -> i64);
        let p = chain_right_more(digit(), sub);
        // 9 - (2 - 3) = 10.
        assert_eq!(p.parse_source("9-2-3", "input").unwrap(), 10);
    }

    #[test]
    fn test_combine2_is_sequential() {
        let p = combine2(ch('a'), ch('b'));
        assert_eq!(p.parse_source("ab", "input").unwrap(), ('a', 'b'));
        assert!(p.parse_source("ba", "input").is_err());
    }

    #[test]
    fn test_combine3_and_4() {
        let p = combine3(ch('a'), digit(), ch('b'));
        assert_eq!(p.parse_source("a7b", "input").unwrap(), ('a', 7, 'b'));

        let q = combine4(ch('('), digit(), digit(), ch(')'));
        assert_eq!(q.parse_source("(12)", "input").unwrap(), ('(', 1, 2, ')'));
    }

    #[test]
    fn test_combine_many_threads_cursor() {
        let p = combine_many(vec![ch('a'), ch('b'), ch('c')]);
        assert_eq!(p.parse_source("abc", "input").unwrap(), vec!['a', 'b', 'c']);
        assert!(p.parse_source("acb", "input").is_err());
    }

    #[test]
    fn test_translate_free_function() {
        let p = translate(|d: i64| d * 3, digit());
        assert_eq!(p.parse_source("3", "input").unwrap(), 9);
    }

    // Consumption-discipline invariants, checked directly on the cursor.

    #[test]
    fn test_clean_failure_leaves_cursor_at_entry() {
        let p = ch('a');
        let mut pos = SourcePosition::new("b", "input");
        let entry = pos.clone();
        assert!(p.parse(&mut pos).is_err());
        assert_eq!(
            pos.compare(&entry),
            skald_util::PositionOrder::Equal
        );
    }

    #[test]
    fn test_success_commits_consumption() {
        let p = ch('a').then(ch('b'));
        let mut pos = SourcePosition::new("abc", "input");
        let entry = pos.clone();
        p.parse(&mut pos).unwrap();
        assert_eq!(pos.compare(&entry), skald_util::PositionOrder::Ahead);
        assert_eq!(pos.rest(), "c");
    }
}
