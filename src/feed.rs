//! C2, the derivation engine: rewriting a [`Parser`] one token, or one
//! end-of-input signal, at a time.

use std::collections::VecDeque;

use crate::combinator::{or, or_commit};
use crate::monoid::Monoid;
use crate::normalize::{push_prefix, result_part};
use crate::parser::{Parser, Tail};

/// Feed a single token, producing the parser that represents "what remains
/// to be parsed after `token`."
pub fn feed<S, R>(token: S, p: Parser<S, R>) -> Parser<S, R>
where
    S: Clone + 'static,
    R: Clone + 'static,
{
    match p {
        Parser::Failure => Parser::Failure,
        Parser::Result { mut tail, value } => {
            tail.push_back(token);
            Parser::Result { tail, value }
        }
        Parser::ResultPart { prefix, rest } => result_part(prefix, feed(token, *rest)),
        Parser::Choice(l, r) => or(feed(token.clone(), *l), feed(token, *r)),
        Parser::CommittedLeftChoice(l, r) => {
            or_commit(feed(token.clone(), *l), feed(token, *r))
        }
        Parser::More(g) => g(token),
        Parser::LookAhead { inner, cont } => {
            let fed_inner = feed(token.clone(), *inner);
            let cont2 = cont.clone();
            crate::normalize::look_ahead_into(
                fed_inner,
                std::rc::Rc::new(move |finalized| feed(token.clone(), cont2(finalized))),
            )
        }
        Parser::LookAheadIgnore {
            inner,
            negate,
            cont,
        } => {
            let fed_inner = inner.feed(token.clone());
            crate::normalize::look_ahead_ignore_into(fed_inner, negate, feed(token, *cont))
        }
    }
}

/// Signal end-of-input, fully resolving every still-live branch.
///
/// `More` always becomes `Failure` (no more tokens are coming to satisfy
/// it). `Choice`/`CommittedLeftChoice` recurse into both branches and
/// recombine via [`or`]/[`or_commit`]. `LookAhead`/`LookAheadIgnore` resolve
/// their probe against end-of-input and either fail or continue.
pub fn feed_eof<S, R>(p: Parser<S, R>) -> Parser<S, R>
where
    S: Clone + 'static,
    R: Clone + 'static,
{
    match p {
        Parser::Failure => Parser::Failure,
        p @ Parser::Result { .. } => p,
        Parser::ResultPart { prefix, rest } => push_prefix(prefix, feed_eof(*rest)),
        Parser::Choice(l, r) => or(feed_eof(*l), feed_eof(*r)),
        Parser::CommittedLeftChoice(l, r) => or_commit(feed_eof(*l), feed_eof(*r)),
        Parser::More(_) => Parser::Failure,
        Parser::LookAhead { inner, cont } => feed_eof(cont(feed_eof(*inner))),
        Parser::LookAheadIgnore {
            inner,
            negate,
            cont,
        } => {
            let inner_final = inner.feed_eof();
            let succeeded = if negate {
                !inner_final.has_result()
            } else {
                inner_final.has_result()
            };
            if succeeded {
                feed_eof(*cont)
            } else {
                Parser::Failure
            }
        }
    }
}

/// Fold [`feed`] over every token in `iter`.
///
/// Implemented iteratively (not via recursion) so that feeding a long input
/// doesn't grow the native call stack.
pub fn feed_all<S, R>(iter: impl IntoIterator<Item = S>, p: Parser<S, R>) -> Parser<S, R>
where
    S: Clone + 'static,
    R: Clone + 'static,
{
    let mut p = p;
    for token in iter {
        p = feed(token, p);
    }
    p
}

/// Replay a buffered `Tail<S>` into `p`, in order.
pub(crate) fn feed_list<S, R>(tail: Tail<S>, p: Parser<S, R>) -> Parser<S, R>
where
    S: Clone + 'static,
    R: Clone + 'static,
{
    let mut p = p;
    for token in tail {
        p = feed(token, p);
    }
    p
}

/// Feed `chunk` (a prefix of `whole`) into `p` one token at a time, stopping
/// as soon as `p` has any result. Returns the resulting parser together with
/// the tokens that were never fed: whatever remained of `chunk` when the
/// result appeared, followed by whatever of `whole` lies past `chunk`.
///
/// If no result ever appears, every token of `chunk` is fed, and the
/// leftover is just `whole`'s tail past `chunk`.
pub fn feed_list_prefix<S, R>(whole: &[S], chunk: &[S], p: Parser<S, R>) -> (Parser<S, R>, Vec<S>)
where
    S: Clone + 'static,
    R: Clone + 'static,
{
    let mut p = p;
    for (i, token) in chunk.iter().enumerate() {
        p = feed(token.clone(), p);
        if crate::extract::has_result(&p) {
            let mut leftover: Vec<S> = chunk[i + 1..].to_vec();
            leftover.extend_from_slice(&whole[chunk.len()..]);
            return (p, leftover);
        }
    }
    (p, whole[chunk.len()..].to_vec())
}

/// Feed tokens from `iter` one at a time until `p` first has any result,
/// then stop and return the unconsumed remainder of `iter` as a buffered
/// `Vec`.
pub fn feed_shortest_prefix<S, R>(
    iter: impl IntoIterator<Item = S>,
    p: Parser<S, R>,
) -> (Parser<S, R>, Vec<S>)
where
    S: Clone + 'static,
    R: Clone + 'static,
{
    let mut p = p;
    let mut it = iter.into_iter();
    for token in &mut it {
        p = feed(token, p);
        if crate::extract::has_result(&p) {
            return (p, it.collect());
        }
    }
    (p, Vec::new())
}

/// Find the longest prefix of `iter` that `p` accepts.
///
/// Wraps `p` in [`crate::combinator::longest`] (so a still-live branch is
/// always preferred over one that has already committed), feeds the whole of
/// `iter`, then finalizes with [`feed_eof`]. If finalizing commits to a
/// result, returns it rebuilt as a `Result` paired with its own leftover
/// `tail` (the tokens fed past the commit point, i.e. the unconsumed
/// remainder); on failure, returns `Failure` paired with the full input,
/// since nothing was committed.
pub fn feed_longest_prefix<S, R>(
    iter: impl IntoIterator<Item = S>,
    p: Parser<S, R>,
) -> (Parser<S, R>, Vec<S>)
where
    S: Clone + 'static,
    R: Monoid + 'static,
{
    let original: Vec<S> = iter.into_iter().collect();
    let longest_p = crate::combinator::longest(p);
    let fed = feed_all(original.iter().cloned(), longest_p);
    let finalized = feed_eof(fed);
    match finalized {
        Parser::Result { tail, value } => {
            let leftover: Vec<S> = tail.iter().cloned().collect();
            (Parser::Result { tail, value }, leftover)
        }
        _ => (Parser::Failure, original),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::string;
    use crate::extract::results;

    #[test]
    fn feed_all_then_eof_commits_result() {
        let p = string("abc".chars());
        let p = feed_all("abcd".chars(), p);
        let p = feed_eof(p);
        assert_eq!(
            results(&p),
            vec![("abc".to_string(), VecDeque::from(['d']))]
        );
    }

    #[test]
    fn feed_shortest_prefix_stops_early() {
        let p = string("ab".chars());
        let (p, leftover) = feed_shortest_prefix("abcd".chars(), p);
        assert!(crate::extract::has_result(&p));
        assert_eq!(leftover, vec!['c', 'd']);
    }
}
