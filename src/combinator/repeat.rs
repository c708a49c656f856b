//! Repetition and separated-sequence vocabulary, built on [`crate::combinator`]'s
//! core algebra and monoidal concatenation.

use std::rc::Rc;

use crate::combinator::{bind, cat, map, or_commit, pure, satisfy, then};
use crate::feed::feed;
use crate::monoid::Monoid;
use crate::parser::Parser;

/// Zero or more repetitions of `p`, concatenated monoidally.
///
/// The recursive call to `many0` is deferred inside a fresh `More` node
/// rather than made eagerly: `Parser` is an ordinary (non-lazy) value, so
/// `cat_commit(p, many0(p))` written directly would recurse at
/// *construction* time and blow the stack before a single token is ever
/// fed. Wrapping the tail in `More` defers that expansion to the first
/// token that actually needs it, growing the call stack by one frame per
/// repetition actually matched rather than all at once up front.
pub fn many0<S, R>(p: Parser<S, R>) -> Parser<S, R>
where
    S: Clone + 'static,
    R: Monoid + 'static,
{
    let p_for_tail = p.clone();
    let tail = Parser::More(Rc::new(move |x: S| feed(x, many0(p_for_tail.clone()))));
    crate::combinator::longest(or_commit(
        crate::combinator::cat_commit(p, tail),
        pure(R::mempty()),
    ))
}

/// One or more repetitions of `p`.
pub fn many1<S, R>(p: Parser<S, R>) -> Parser<S, R>
where
    S: Clone + 'static,
    R: Monoid + 'static,
{
    crate::combinator::cat_commit(p.clone(), many0(p))
}

/// `p`, or `R::mempty()` if `p` doesn't match.
pub fn optional<S, R>(p: Parser<S, R>) -> Parser<S, R>
where
    S: Clone + 'static,
    R: Monoid + 'static,
{
    or_commit(p, pure(R::mempty()))
}

/// Match `p` zero or more times, discarding every result.
pub fn skip<S, R>(p: Parser<S, R>) -> Parser<S, ()>
where
    S: Clone + 'static,
    R: Monoid + 'static,
{
    then(many0(p), pure(()))
}

/// `fmap(Some, p) <<|> return None`: like [`optional`], but reports whether
/// `p` actually matched instead of collapsing a miss into the monoid
/// identity. Doesn't require `R: Monoid`.
pub fn option_maybe<S, R>(p: Parser<S, R>) -> Parser<S, Option<R>>
where
    S: Clone + 'static,
    R: Clone + 'static,
{
    or_commit(map(Some, p), pure(None))
}

/// All leading tokens satisfying `pred`, collected into a `Vec`; may match
/// the empty prefix.
pub fn while_<S>(pred: impl Fn(&S) -> bool + Clone + 'static) -> Parser<S, Vec<S>>
where
    S: Clone + 'static,
{
    many0(map(|x| vec![x], satisfy(pred)))
}

/// Like [`while_`], but must consume at least one token.
pub fn while1<S>(pred: impl Fn(&S) -> bool + Clone + 'static) -> Parser<S, Vec<S>>
where
    S: Clone + 'static,
{
    many1(map(|x| vec![x], satisfy(pred)))
}

/// Repeat `item` until `end` matches, collecting `item`'s results into a
/// `Vec` in order; `end`'s own result is discarded.
///
/// The recursive call is deferred inside the closure passed to `bind`'s `k`,
/// not made eagerly, for the same reason `many0` defers its tail under
/// `More`; see that function's doc comment.
pub fn many_till<S, R, R2>(item: Parser<S, R>, end: Parser<S, R2>) -> Parser<S, Vec<R>>
where
    S: Clone + 'static,
    R: Clone + 'static,
    R2: Clone + 'static,
{
    let item_for_rest = item.clone();
    let end_for_rest = end.clone();
    or_commit(
        then(end, pure(Vec::new())),
        bind(item, move |r: R| {
            let item_for_rest = item_for_rest.clone();
            let end_for_rest = end_for_rest.clone();
            map(
                move |mut rest: Vec<R>| {
                    rest.insert(0, r.clone());
                    rest
                },
                many_till(item_for_rest.clone(), end_for_rest.clone()),
            )
        }),
    )
}

/// Commit every token fed to it, forever; always has a growing partial
/// result and never fails.
pub fn accept_all<S>() -> Parser<S, Vec<S>>
where
    S: Clone + 'static,
{
    many0(map(|x| vec![x], crate::combinator::any_token()))
}

/// `item`, separated by `sep`, collected into a `Vec` in order.
pub fn sep_by<S, R, Sep>(item: Parser<S, R>, sep: Parser<S, Sep>) -> Parser<S, Vec<R>>
where
    S: Clone + 'static,
    R: Clone + 'static,
    Sep: Clone + 'static,
{
    let first = map(|r: R| vec![r], item.clone());
    let rest_one = map(|r: R| vec![r], then(sep, item));
    or_commit(cat(first, many0(rest_one)), pure(Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::primitive::token;
    use crate::extract::results;
    use crate::feed::{feed_all, feed_eof};
    use std::collections::VecDeque;

    #[test]
    fn many0_matches_zero_repetitions() {
        let p = many0(token::<char>('a').map(|c| c.to_string()));
        let p = feed_eof(p);
        assert_eq!(results(&p), vec![(String::new(), Default::default())]);
    }

    #[test]
    fn many0_is_greedy() {
        let p = many0(token::<char>('a').map(|c| c.to_string()));
        let p = feed_all("aaab".chars(), p);
        let p = feed_eof(p);
        assert_eq!(
            results(&p),
            vec![("aaa".to_string(), std::collections::VecDeque::from(['b']))]
        );
    }

    #[test]
    fn many1_requires_at_least_one() {
        let p = many1(token::<char>('a').map(|c| c.to_string()));
        let p = feed_eof(p);
        assert!(results(&p).is_empty());
    }

    #[test]
    fn sep_by_collects_items() {
        let item = token::<char>('x');
        let sep = token::<char>(',');
        let p = sep_by(item, sep);
        let p = feed_all("x,x,x".chars(), p);
        let p = feed_eof(p);
        assert_eq!(
            results(&p),
            vec![(vec!['x', 'x', 'x'], std::collections::VecDeque::new())]
        );
    }

    #[test]
    fn option_maybe_reports_a_miss_as_none() {
        let p = option_maybe(token::<char>('a'));
        let p = feed_all("b".chars(), p);
        let p = feed_eof(p);
        assert_eq!(results(&p), vec![(None, VecDeque::from(['b']))]);
    }

    #[test]
    fn option_maybe_reports_a_hit_as_some() {
        let p = option_maybe(token::<char>('a'));
        let p = feed_all("a".chars(), p);
        let p = feed_eof(p);
        assert_eq!(results(&p), vec![(Some('a'), VecDeque::new())]);
    }

    #[test]
    fn while_matches_maximal_run() {
        let p = while_(|c: &char| c.is_ascii_digit());
        let p = feed_all("123x".chars(), p);
        let p = feed_eof(p);
        assert_eq!(
            results(&p),
            vec![(vec!['1', '2', '3'], VecDeque::from(['x']))]
        );
    }

    #[test]
    fn while1_fails_on_empty_match() {
        let p = while1(|c: &char| c.is_ascii_digit());
        let p = feed_all("x".chars(), p);
        let p = feed_eof(p);
        assert!(results(&p).is_empty());
    }

    #[test]
    fn many_till_collects_items_and_discards_terminator() {
        let item = crate::combinator::satisfy(|c: &char| c.is_ascii_digit());
        let end = token::<char>(';');
        let p = many_till(item, end);
        let p = feed_all("12;".chars(), p);
        let p = feed_eof(p);
        assert_eq!(results(&p), vec![(vec!['1', '2'], VecDeque::new())]);
    }

    #[test]
    fn accept_all_commits_every_token() {
        let p = accept_all::<char>();
        let p = feed_all("xyz".chars(), p);
        let p = feed_eof(p);
        assert_eq!(results(&p), vec![(vec!['x', 'y', 'z'], VecDeque::new())]);
    }
}
