//! C4, the internal rewrite helpers that keep a [`Parser`] term in canonical
//! form between token feeds.
//!
//! Most callers never need these directly; they exist so that [`feed`][1] and
//! the combinator algebra in [`crate::combinator`] can each build on the same
//! handful of primitive rewrites instead of re-deriving them.
//!
//! [1]: crate::feed::feed

use std::collections::VecDeque;
use std::rc::Rc;

use crate::erased::{erase, Erased};
use crate::parser::{ContFn, Parser, PrefixFn};

/// Push `f` under any existing `ResultPart`/`Result` rather than nesting.
///
/// Implements spec invariants 1 and 5: a `Result` never sits directly under
/// a fresh `ResultPart` wrapper (it gets `f` applied immediately instead),
/// and two directly-nested `ResultPart`s collapse their transformations into
/// one, composed left-to-right (`f ∘ g`).
pub(crate) fn result_part<S, R>(f: PrefixFn<R>, p: Parser<S, R>) -> Parser<S, R>
where
    R: 'static,
{
    match p {
        Parser::Result { tail, value } => Parser::Result {
            tail,
            value: f(value),
        },
        Parser::ResultPart { prefix, rest } => {
            let f = f;
            Parser::ResultPart {
                prefix: Rc::new(move |r: R| f(prefix(r))),
                rest,
            }
        }
        other => Parser::ResultPart {
            prefix: f,
            rest: Box::new(other),
        },
    }
}

/// Extend a `ResultPart`'s pending prefix into every variant it might sit
/// above at the moment `feed_eof` finalizes it.
///
/// This is the resolution to the spec's first Open Question: the original
/// source's `prepend` only defined this push-through for `Result`/`Choice`,
/// leaving `CommittedLeftChoice`, `More`, and the lookahead variants
/// undefined. Since `feed_eof` eliminates every `More` before this is called
/// (turning it into `Failure`), the `More`/lookahead arms below are dead in
/// practice for any term produced purely by `feed_eof`, but a caller could
/// still build such a term by hand (e.g. via `normalize::result_part`
/// directly), so they are filled in rather than left as an invariant-only
/// guarantee.
pub(crate) fn push_prefix<S, R>(prefix: PrefixFn<R>, p: Parser<S, R>) -> Parser<S, R>
where
    S: Clone + 'static,
    R: 'static,
{
    match p {
        Parser::Failure => Parser::Failure,
        Parser::Result { tail, value } => Parser::Result {
            tail,
            value: prefix(value),
        },
        Parser::ResultPart {
            prefix: inner,
            rest,
        } => {
            let prefix = prefix;
            Parser::ResultPart {
                prefix: Rc::new(move |r: R| prefix(inner(r))),
                rest,
            }
        }
        Parser::Choice(l, r) => Parser::Choice(
            Box::new(push_prefix(prefix.clone(), *l)),
            Box::new(push_prefix(prefix, *r)),
        ),
        Parser::CommittedLeftChoice(l, r) => Parser::CommittedLeftChoice(
            Box::new(push_prefix(prefix.clone(), *l)),
            Box::new(push_prefix(prefix, *r)),
        ),
        Parser::More(g) => Parser::More(Rc::new(move |x: S| push_prefix(prefix.clone(), g(x)))),
        Parser::LookAhead { inner, cont } => {
            let prefix2 = prefix;
            Parser::LookAhead {
                inner,
                cont: Rc::new(move |p| push_prefix(prefix2.clone(), cont(p))),
            }
        }
        Parser::LookAheadIgnore {
            inner,
            negate,
            cont,
        } => Parser::LookAheadIgnore {
            inner,
            negate,
            cont: Box::new(push_prefix(prefix, *cont)),
        },
    }
}

/// Push a continuation inward through `ResultPart`, `Choice`, and nested
/// lookaheads, merging continuation composition; terminal cases (`More`,
/// `LookAheadIgnore`) wrap the parser in a fresh `LookAhead` node, and a
/// `Result` invokes the continuation immediately since the sub-parser is
/// already determinate.
pub(crate) fn look_ahead_into<S, R>(p: Parser<S, R>, k: ContFn<S, R>) -> Parser<S, R>
where
    S: Clone + 'static,
    R: Clone + 'static,
{
    match p {
        Parser::Failure => Parser::Failure,
        Parser::Result { .. } => k(p),
        Parser::ResultPart { prefix, rest } => result_part(prefix, look_ahead_into(*rest, k)),
        Parser::Choice(l, r) => Parser::Choice(
            Box::new(look_ahead_into(*l, k.clone())),
            Box::new(look_ahead_into(*r, k)),
        ),
        Parser::CommittedLeftChoice(l, r) => Parser::CommittedLeftChoice(
            Box::new(look_ahead_into(*l, k.clone())),
            Box::new(look_ahead_into(*r, k)),
        ),
        Parser::LookAhead { inner, cont } => {
            let k2 = k;
            let merged: ContFn<S, R> = Rc::new(move |p2| k2(cont(p2)));
            Parser::LookAhead { inner, cont: merged }
        }
        p @ Parser::More(_) | p @ Parser::LookAheadIgnore { .. } => Parser::LookAhead {
            inner: Box::new(p),
            cont: k,
        },
    }
}

/// Resolve a type-erased probe's outcome against a continuation.
///
/// - If the probe already has a result: succeed (or, if `negate`, fail).
/// - If the probe has already failed: fail (or, if `negate`, succeed).
/// - Otherwise the probe is still live; keep it wrapped for the next feed.
pub(crate) fn look_ahead_ignore_into<S, R>(
    inner: Erased<S>,
    negate: bool,
    cont: Parser<S, R>,
) -> Parser<S, R>
where
    S: Clone + 'static,
    R: Clone + 'static,
{
    if inner.has_result() {
        if negate {
            Parser::Failure
        } else {
            cont
        }
    } else if inner.is_failure() {
        if negate {
            cont
        } else {
            Parser::Failure
        }
    } else {
        Parser::LookAheadIgnore {
            inner,
            negate,
            cont: Box::new(cont),
        }
    }
}

/// Drive an otherwise-unmatched parser shape generically.
///
/// Used when a combinator cannot pattern-match `p` directly because its
/// payload closures are tied to a type the combinator can't restructure in
/// place (e.g. `fmap` over a `ResultPart`, whose `prefix: R -> R` can't
/// become `R -> R2` without actually evaluating it). `resolve` produces a
/// `CommittedLeftChoice` of two branches:
///
/// - one that waits for exactly one more token, applies it to `p`, and
///   re-applies `trans`;
/// - one that assumes no more input is coming, applies `trans` to
///   `feed_eof(p)`, and is gated behind a negative lookahead on "another
///   token arrives" so it never wins over the first branch while more input
///   is actually possible.
pub(crate) fn resolve<S, R, R2>(
    trans: impl Fn(Parser<S, R>) -> Parser<S, R2> + Clone + 'static,
    p: Parser<S, R>,
) -> Parser<S, R2>
where
    S: Clone + 'static,
    R: Clone + 'static,
    R2: Clone + 'static,
{
    let trans_more = trans.clone();
    let p_more = p.clone();
    let branch_more = Parser::More(Rc::new(move |x: S| {
        trans_more(crate::feed::feed(x, p_more.clone()))
    }));

    let branch_eof = trans(crate::feed::feed_eof(p));

    // A minimal "there is at least one more token" probe, erased so it
    // doesn't force a concrete result type on the guard.
    let probe: Parser<S, ()> = Parser::More(Rc::new(|_: S| Parser::Result {
        tail: VecDeque::new(),
        value: (),
    }));

    let guarded_eof = Parser::LookAheadIgnore {
        inner: erase(probe),
        negate: true,
        cont: Box::new(branch_eof),
    };

    crate::combinator::or_commit(branch_more, guarded_eof)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{feed, feed_eof};

    #[test]
    fn result_part_collapses_over_result() {
        let p: Parser<char, String> = Parser::Result {
            tail: VecDeque::new(),
            value: "ab".to_string(),
        };
        let p = result_part(Rc::new(|s: String| format!("[{s}]")), p);
        match p {
            Parser::Result { value, .. } => assert_eq!(value, "[ab]"),
            _ => panic!("expected immediate Result"),
        }
    }

    #[test]
    fn result_part_merges_nested_prefixes() {
        let inner = Parser::More(Rc::new(|c: char| Parser::Result {
            tail: VecDeque::new(),
            value: c.to_string(),
        }));
        let once = result_part(Rc::new(|s: String| format!("g({s})")), inner);
        let twice = result_part(Rc::new(|s: String| format!("f({s})")), once);
        let done = feed_eof(feed('x', twice));
        match done {
            Parser::Result { value, .. } => assert_eq!(value, "f(g(x))"),
            other => panic!("expected Result, got {other:?}"),
        }
    }
}
