//! C5, the combinator algebra: the operations that build new [`Parser`]
//! values out of existing ones.
//!
//! [`primitive`] holds the primitive, token-level parsers; [`repeat`] holds
//! the repetition/sequencing vocabulary built on top of this module and on
//! `primitive`.

use std::rc::Rc;

use crate::monoid::Monoid;
use crate::normalize::resolve;
use crate::parser::Parser;

pub mod primitive;
pub mod repeat;

pub use primitive::{any_token, count, empty, eof, prefix_of, satisfy, string, while_prefix_of, token};
pub use repeat::{
    accept_all, many0, many1, many_till, option_maybe, optional, sep_by, skip, while1, while_,
};

/// A parser that immediately commits `value`, with nothing consumed.
pub fn pure<S, R>(value: R) -> Parser<S, R> {
    Parser::Result {
        tail: std::collections::VecDeque::new(),
        value,
    }
}

/// A parser that never succeeds.
pub fn fail<S, R>() -> Parser<S, R> {
    Parser::Failure
}

/// Apply `f` to every committed result of `p`.
///
/// `Result` and `More` rewrite directly; `Choice`/`CommittedLeftChoice`
/// distribute `f` into both branches; `LookAheadIgnore`'s probe is untyped
/// in `R` so it rewrites directly too. `ResultPart` and `LookAhead` can't be
/// restructured in place (their payload closures are fixed at type `R`), so
/// they fall back to [`resolve`].
pub fn map<S, R, R2>(
    f: impl Fn(R) -> R2 + Clone + 'static,
    p: Parser<S, R>,
) -> Parser<S, R2>
where
    S: Clone + 'static,
    R: Clone + 'static,
    R2: Clone + 'static,
{
    match p {
        Parser::Failure => Parser::Failure,
        Parser::Result { tail, value } => Parser::Result {
            tail,
            value: f(value),
        },
        Parser::Choice(l, r) => Parser::Choice(
            Box::new(map(f.clone(), *l)),
            Box::new(map(f, *r)),
        ),
        Parser::CommittedLeftChoice(l, r) => Parser::CommittedLeftChoice(
            Box::new(map(f.clone(), *l)),
            Box::new(map(f, *r)),
        ),
        Parser::More(g) => {
            let f = f;
            Parser::More(Rc::new(move |x| map(f.clone(), g(x))))
        }
        Parser::LookAheadIgnore {
            inner,
            negate,
            cont,
        } => Parser::LookAheadIgnore {
            inner,
            negate,
            cont: Box::new(map(f, *cont)),
        },
        p @ Parser::ResultPart { .. } | p @ Parser::LookAhead { .. } => {
            resolve(move |driven| map(f.clone(), driven), p)
        }
    }
}

/// Applicative sequencing: `pa` commits a function, `pb` commits its
/// argument, and the result is `f(b)`.
///
/// Once `pa` commits `(tail, f)`, `tail` is replayed into `pb` before `f` is
/// mapped over it.
pub fn apply<S, A, B, F>(pa: Parser<S, F>, pb: Parser<S, A>) -> Parser<S, B>
where
    S: Clone + 'static,
    A: Clone + 'static,
    B: Clone + 'static,
    F: Fn(A) -> B + Clone + 'static,
{
    match pa {
        Parser::Failure => Parser::Failure,
        Parser::Result { tail, value: f } => {
            let pb_fed = crate::feed::feed_list(tail, pb);
            map(f, pb_fed)
        }
        Parser::Choice(l, r) => or(apply(*l, pb.clone()), apply(*r, pb)),
        Parser::CommittedLeftChoice(l, r) => or_commit(apply(*l, pb.clone()), apply(*r, pb)),
        Parser::More(g) => {
            let pb = pb;
            Parser::More(Rc::new(move |x| apply(g(x), pb.clone())))
        }
        pa @ Parser::ResultPart { .. }
        | pa @ Parser::LookAhead { .. }
        | pa @ Parser::LookAheadIgnore { .. } => {
            resolve(move |driven| apply(driven, pb.clone()), pa)
        }
    }
}

/// Monadic bind: once `p` commits `value`, continue with `k(value)`, with
/// `p`'s buffered tail replayed into it first.
pub fn bind<S, R, R2>(
    p: Parser<S, R>,
    k: impl Fn(R) -> Parser<S, R2> + Clone + 'static,
) -> Parser<S, R2>
where
    S: Clone + 'static,
    R: Clone + 'static,
    R2: Clone + 'static,
{
    match p {
        Parser::Failure => Parser::Failure,
        Parser::Result { tail, value } => crate::feed::feed_list(tail, k(value)),
        Parser::Choice(l, r) => or(bind(*l, k.clone()), bind(*r, k)),
        Parser::More(g) => {
            let k = k;
            Parser::More(Rc::new(move |x| bind(g(x), k.clone())))
        }
        p @ Parser::ResultPart { .. }
        | p @ Parser::CommittedLeftChoice(..)
        | p @ Parser::LookAhead { .. }
        | p @ Parser::LookAheadIgnore { .. } => resolve(move |driven| bind(driven, k.clone()), p),
    }
}

/// Sequencing that discards the left result once committed.
///
/// A left-hand `ResultPart`'s pending transformation is thrown away along
/// with its value. A left-hand `LookAhead` becomes a `LookAheadIgnore`: its
/// own result type is no longer of interest, only whether it eventually
/// succeeds.
pub fn then<S, R, R2>(p: Parser<S, R>, q: Parser<S, R2>) -> Parser<S, R2>
where
    S: Clone + 'static,
    R: Clone + 'static,
    R2: Clone + 'static,
{
    match p {
        Parser::Failure => Parser::Failure,
        Parser::Result { tail, .. } => crate::feed::feed_list(tail, q),
        Parser::ResultPart { rest, .. } => then(*rest, q),
        Parser::Choice(l, r) => or(then(*l, q.clone()), then(*r, q)),
        Parser::CommittedLeftChoice(l, r) => or_commit(then(*l, q.clone()), then(*r, q)),
        Parser::More(g) => {
            let q = q;
            Parser::More(Rc::new(move |x| then(g(x), q.clone())))
        }
        p @ Parser::LookAhead { .. } => {
            let erased = crate::erased::erase(p);
            Parser::LookAheadIgnore {
                inner: erased,
                negate: false,
                cont: Box::new(q),
            }
        }
        Parser::LookAheadIgnore {
            inner,
            negate,
            cont,
        } => Parser::LookAheadIgnore {
            inner,
            negate,
            cont: Box::new(then(*cont, q)),
        },
    }
}

/// Nondeterministic alternation: both `p` and `q` remain live until one
/// commits. Identity element is [`Parser::Failure`]; a committed `Result`
/// is always pulled to the left of the resulting `Choice`, per invariant 2.
pub fn or<S, R>(p: Parser<S, R>, q: Parser<S, R>) -> Parser<S, R>
where
    S: Clone + 'static,
    R: Clone + 'static,
{
    match (p, q) {
        (Parser::Failure, q) => q,
        (p, Parser::Failure) => p,
        (Parser::Result { tail, value }, rest) => {
            Parser::Choice(Box::new(Parser::Result { tail, value }), Box::new(rest))
        }
        (rest, Parser::Result { tail, value }) => {
            Parser::Choice(Box::new(Parser::Result { tail, value }), Box::new(rest))
        }
        (Parser::More(f), Parser::More(g)) => {
            Parser::More(Rc::new(move |x: S| or(f(x.clone()), g(x))))
        }
        (p, q) => Parser::Choice(Box::new(p), Box::new(q)),
    }
}

/// Committed alternation: as soon as `p` has any result, `q` is discarded.
///
/// Identity element is [`Parser::Failure`] on either side. If `p` is itself
/// a `CommittedLeftChoice`, `q` is absorbed into its right branch rather
/// than building a fresh node (keeping the commit order of the original
/// chain of alternatives).
pub fn or_commit<S, R>(p: Parser<S, R>, q: Parser<S, R>) -> Parser<S, R>
where
    S: Clone + 'static,
    R: Clone + 'static,
{
    if matches!(p, Parser::Failure) {
        return q;
    }
    if matches!(q, Parser::Failure) {
        return p;
    }
    if crate::extract::has_result(&p) {
        return p;
    }
    match (p, q) {
        (Parser::CommittedLeftChoice(l, r), q) => {
            Parser::CommittedLeftChoice(l, Box::new(or_commit(*r, q)))
        }
        (Parser::More(f), Parser::More(g)) => {
            Parser::More(Rc::new(move |x: S| or_commit(f(x.clone()), g(x))))
        }
        (p, q) => Parser::CommittedLeftChoice(Box::new(p), Box::new(q)),
    }
}

/// Greedy concatenation (`p1 >< p2`): once `p1` commits `(tail, r1)`, `tail`
/// is replayed into `p2`, and the eventual combined result is
/// `r1.mappend(r2)`, streamed as a `ResultPart` so `r1` can be emitted before
/// `p2` has committed anything.
pub fn cat<S, R>(p1: Parser<S, R>, p2: Parser<S, R>) -> Parser<S, R>
where
    S: Clone + 'static,
    R: Monoid + 'static,
{
    match p1 {
        Parser::Failure => Parser::Failure,
        Parser::Result { tail, value } => {
            let p2_fed = crate::feed::feed_list(tail, p2);
            crate::normalize::result_part(Rc::new(move |r: R| value.mappend(&r)), p2_fed)
        }
        Parser::ResultPart { prefix, rest } => {
            crate::normalize::result_part(prefix, cat(*rest, p2))
        }
        Parser::Choice(l, r) => or(cat(*l, p2.clone()), cat(*r, p2)),
        Parser::CommittedLeftChoice(l, r) => or_commit(cat(*l, p2.clone()), cat(*r, p2)),
        Parser::More(g) => {
            let p2 = p2;
            Parser::More(Rc::new(move |x| cat(g(x), p2.clone())))
        }
        Parser::LookAhead { inner, cont } => {
            let p2 = p2;
            crate::normalize::look_ahead_into(
                *inner,
                Rc::new(move |finalized| cat(cont(finalized), p2.clone())),
            )
        }
        Parser::LookAheadIgnore {
            inner,
            negate,
            cont,
        } => Parser::LookAheadIgnore {
            inner,
            negate,
            cont: Box::new(cat(*cont, p2)),
        },
    }
}

/// Parallel concatenation (`p1 >>< p2`): like [`cat`], but when `p1` is a
/// `CommittedLeftChoice` (i.e. hasn't yet decided between its own
/// alternatives), `p2` is allowed to start advancing speculatively in
/// parallel rather than waiting for `p1` to settle first.
///
/// On the next token, two hypotheses race under [`or_commit`]: "`p1` is
/// still genuinely ambiguous, so just advance it and keep waiting on `p2`"
/// (preferred), versus "`p1` is already as resolved as it will ever be right
/// now, so finalize it and let `p2` see this token instead."
pub fn cat_commit<S, R>(p1: Parser<S, R>, p2: Parser<S, R>) -> Parser<S, R>
where
    S: Clone + 'static,
    R: Monoid + 'static,
{
    match p1 {
        Parser::Failure => Parser::Failure,
        Parser::Result { tail, value } => {
            let p2_fed = crate::feed::feed_list(tail, p2);
            crate::normalize::result_part(Rc::new(move |r: R| value.mappend(&r)), p2_fed)
        }
        Parser::ResultPart { prefix, rest } => {
            crate::normalize::result_part(prefix, cat_commit(*rest, p2))
        }
        Parser::Choice(l, r) => or(cat_commit(*l, p2.clone()), cat_commit(*r, p2)),
        Parser::CommittedLeftChoice(l, r) => {
            let p1_full = Parser::CommittedLeftChoice(l, r);
            let p2_outer = p2;
            Parser::More(Rc::new(move |x: S| {
                let p1_full = p1_full.clone();
                let p2_outer = p2_outer.clone();
                let still_ambiguous = cat_commit(crate::feed::feed(x.clone(), p1_full.clone()), p2_outer.clone());
                let assume_settled = cat_commit(
                    crate::feed::feed_eof(p1_full),
                    crate::feed::feed(x, p2_outer),
                );
                or_commit(still_ambiguous, assume_settled)
            }))
        }
        Parser::More(g) => {
            let p2 = p2;
            Parser::More(Rc::new(move |x| cat_commit(g(x), p2.clone())))
        }
        Parser::LookAhead { inner, cont } => {
            let p2 = p2;
            crate::normalize::look_ahead_into(
                *inner,
                Rc::new(move |finalized| cat_commit(cont(finalized), p2.clone())),
            )
        }
        Parser::LookAheadIgnore {
            inner,
            negate,
            cont,
        } => Parser::LookAheadIgnore {
            inner,
            negate,
            cont: Box::new(cat_commit(*cont, p2)),
        },
    }
}

/// Parallel conjunction: succeeds only when both `p1` and `p2` succeed over
/// the same input. As soon as either commits, the other is finalized with
/// [`crate::feed::feed_eof`] and the two results are paired.
pub fn and<S, R1, R2>(p1: Parser<S, R1>, p2: Parser<S, R2>) -> Parser<S, (R1, R2)>
where
    S: Clone + 'static,
    R1: Monoid + 'static,
    R2: Monoid + 'static,
{
    match (p1, p2) {
        (Parser::Failure, _) | (_, Parser::Failure) => Parser::Failure,
        (Parser::Result { tail, value: v1 }, p2) => match crate::feed::feed_eof(p2) {
            Parser::Result { value: v2, .. } => Parser::Result {
                tail,
                value: (v1, v2),
            },
            _ => Parser::Failure,
        },
        (p1, Parser::Result { tail, value: v2 }) => match crate::feed::feed_eof(p1) {
            Parser::Result { value: v1, .. } => Parser::Result {
                tail,
                value: (v1, v2),
            },
            _ => Parser::Failure,
        },
        (Parser::More(f), Parser::More(g)) => {
            Parser::More(Rc::new(move |x: S| and(f(x.clone()), g(x))))
        }
        (p1, p2) => Parser::More(Rc::new(move |x: S| {
            and(
                crate::feed::feed(x.clone(), p1.clone()),
                crate::feed::feed(x, p2.clone()),
            )
        })),
    }
}

/// Ordered conjunction: like [`and`], but the first slot of the pair is
/// available (as `R1::mempty()`-filled) the moment `p1` commits, and the
/// second slot fills in as `p2` commits, streamed via `ResultPart`.
pub fn and_then_ordered<S, R1, R2>(p1: Parser<S, R1>, p2: Parser<S, R2>) -> Parser<S, (R1, R2)>
where
    S: Clone + 'static,
    R1: Monoid + 'static,
    R2: Monoid + 'static,
{
    match p1 {
        Parser::Failure => Parser::Failure,
        Parser::Result { tail, value } => {
            let p2_fed = crate::feed::feed_list(tail, p2);
            let paired = map(move |r2: R2| (R1::mempty(), r2), p2_fed);
            crate::normalize::result_part(
                {
                    let value = value.clone();
                    Rc::new(move |pair: (R1, R2)| (value.clone(), pair.1))
                },
                paired,
            )
        }
        Parser::ResultPart { prefix, rest } => {
            // `prefix: R1 -> R1`, but the combined result needs `(R1, R2) ->
            // (R1, R2)`: lift it so it only touches the first slot.
            let prefix = prefix;
            crate::normalize::result_part(
                Rc::new(move |pair: (R1, R2)| (prefix(pair.0), pair.1)),
                and_then_ordered(*rest, p2),
            )
        }
        Parser::Choice(l, r) => or(
            and_then_ordered(*l, p2.clone()),
            and_then_ordered(*r, p2),
        ),
        Parser::CommittedLeftChoice(l, r) => or_commit(
            and_then_ordered(*l, p2.clone()),
            and_then_ordered(*r, p2),
        ),
        Parser::More(g) => {
            let p2 = p2;
            Parser::More(Rc::new(move |x| and_then_ordered(g(x), p2.clone())))
        }
        Parser::LookAhead { inner, cont } => {
            let p2 = p2;
            crate::normalize::look_ahead_into(
                *inner,
                Rc::new(move |finalized| and_then_ordered(cont(finalized), p2.clone())),
            )
        }
        Parser::LookAheadIgnore {
            inner,
            negate,
            cont,
        } => Parser::LookAheadIgnore {
            inner,
            negate,
            cont: Box::new(and_then_ordered(*cont, p2)),
        },
    }
}

/// Prefer whichever branch can still consume more input over one that has
/// already settled into a bare `Result` or a non-consuming `LookAhead`.
///
/// Used by the `many*` family (see [`crate::combinator::repeat`]) to make
/// repetition greedy: without it, `Choice` would let `feed_eof`/`results`
/// report the *first* alternative that committed, which for `p*` is always
/// the empty match.
pub fn longest<S, R>(p: Parser<S, R>) -> Parser<S, R>
where
    S: Clone + 'static,
    R: Monoid + 'static,
{
    match p {
        Parser::Choice(l, r) => match (*l, *r) {
            (l, Parser::Result { tail, value }) => Parser::CommittedLeftChoice(
                Box::new(longest(l)),
                Box::new(Parser::Result { tail, value }),
            ),
            (Parser::Result { tail, value }, r) => Parser::CommittedLeftChoice(
                Box::new(longest(r)),
                Box::new(Parser::Result { tail, value }),
            ),
            (l, r @ Parser::LookAhead { .. }) => {
                Parser::CommittedLeftChoice(Box::new(longest(l)), Box::new(r))
            }
            (l @ Parser::LookAhead { .. }, r) => {
                Parser::CommittedLeftChoice(Box::new(longest(r)), Box::new(l))
            }
            (l, r) => Parser::Choice(Box::new(longest(l)), Box::new(longest(r))),
        },
        Parser::CommittedLeftChoice(l, r) => {
            Parser::CommittedLeftChoice(Box::new(longest(*l)), Box::new(longest(*r)))
        }
        Parser::ResultPart { prefix, rest } => {
            crate::normalize::result_part(prefix, longest(*rest))
        }
        Parser::More(g) => Parser::More(Rc::new(move |x| longest(g(x)))),
        other => other,
    }
}

/// Peek at `p` without consuming: run it to a determinate form and continue
/// with that finalized form, but leave the input position untouched.
pub fn look_ahead<S, R>(p: Parser<S, R>) -> Parser<S, R>
where
    S: Clone + 'static,
    R: Clone + 'static,
{
    crate::normalize::look_ahead_into(p, Rc::new(|p: Parser<S, R>| p))
}

/// Peek at `p` without consuming and without caring about its result type:
/// continue with `cont` once `p` succeeds.
pub fn look_ahead_ignore<S, R1, R2>(p: Parser<S, R1>, cont: Parser<S, R2>) -> Parser<S, R2>
where
    S: Clone + 'static,
    R1: Clone + 'static,
    R2: Clone + 'static,
{
    crate::normalize::look_ahead_ignore_into(crate::erased::erase(p), false, cont)
}

/// Negative lookahead: continue with `cont` only if `p` fails to match
/// without consuming input.
pub fn look_ahead_not<S, R1, R2>(p: Parser<S, R1>, cont: Parser<S, R2>) -> Parser<S, R2>
where
    S: Clone + 'static,
    R1: Clone + 'static,
    R2: Clone + 'static,
{
    crate::normalize::look_ahead_ignore_into(crate::erased::erase(p), true, cont)
}

impl<S, R> Parser<S, R>
where
    S: Clone + 'static,
    R: Clone + 'static,
{
    /// See [`map`].
    pub fn map<R2: Clone + 'static>(
        self,
        f: impl Fn(R) -> R2 + Clone + 'static,
    ) -> Parser<S, R2> {
        map(f, self)
    }

    /// See [`bind`].
    pub fn bind<R2: Clone + 'static>(
        self,
        k: impl Fn(R) -> Parser<S, R2> + Clone + 'static,
    ) -> Parser<S, R2> {
        bind(self, k)
    }

    /// See [`then`].
    pub fn then<R2: Clone + 'static>(self, q: Parser<S, R2>) -> Parser<S, R2> {
        then(self, q)
    }

    /// See [`or`].
    pub fn or(self, q: Parser<S, R>) -> Parser<S, R> {
        or(self, q)
    }

    /// See [`or_commit`].
    pub fn or_commit(self, q: Parser<S, R>) -> Parser<S, R> {
        or_commit(self, q)
    }
}

impl<S, A, B, F> Parser<S, F>
where
    S: Clone + 'static,
    A: Clone + 'static,
    B: Clone + 'static,
    F: Fn(A) -> B + Clone + 'static,
{
    /// See [`apply`].
    pub fn apply(self, pb: Parser<S, A>) -> Parser<S, B> {
        apply(self, pb)
    }
}

impl<S, R> Parser<S, R>
where
    S: Clone + 'static,
    R: Monoid + 'static,
{
    /// See [`cat`].
    pub fn cat(self, q: Parser<S, R>) -> Parser<S, R> {
        cat(self, q)
    }

    /// See [`cat_commit`].
    pub fn cat_commit(self, q: Parser<S, R>) -> Parser<S, R> {
        cat_commit(self, q)
    }
}
