//! Primitive, token-level parsers: the leaves every derived parser in
//! [`crate::combinator::repeat`] is eventually built out of.

use std::collections::VecDeque;
use std::rc::Rc;

use crate::combinator::{look_ahead_not, map, or_commit, pure};
use crate::parser::Parser;

/// A parser that never succeeds. Identity element of `<|>`/`<<|>`.
pub fn empty<S, R>() -> Parser<S, R> {
    Parser::Failure
}

/// Match any single token, committing it as the result.
pub fn any_token<S>() -> Parser<S, S>
where
    S: Clone + 'static,
{
    Parser::More(Rc::new(|x: S| Parser::Result {
        tail: VecDeque::new(),
        value: x,
    }))
}

/// Match a single token satisfying `pred`.
pub fn satisfy<S>(pred: impl Fn(&S) -> bool + Clone + 'static) -> Parser<S, S>
where
    S: Clone + 'static,
{
    Parser::More(Rc::new(move |x: S| {
        if pred(&x) {
            Parser::Result {
                tail: VecDeque::new(),
                value: x,
            }
        } else {
            Parser::Failure
        }
    }))
}

/// Match a single token equal to `expected`.
pub fn token<S>(expected: S) -> Parser<S, S>
where
    S: Clone + PartialEq + 'static,
{
    satisfy(move |x| x == &expected)
}

/// Match an exact sequence of characters, committing their concatenation.
///
/// Matches one character at a time (not the whole sequence at once), so a
/// prefix of `expected` already streams as a `ResultPart`-backed partial
/// result before the rest has arrived.
pub fn string(expected: impl IntoIterator<Item = char>) -> Parser<char, String> {
    let mut chars: Vec<char> = expected.into_iter().collect();
    if chars.is_empty() {
        return pure(String::new());
    }
    let first = chars.remove(0);
    let first_p = token(first).map(|c| c.to_string());
    chars.into_iter().fold(first_p, |acc, c| {
        crate::combinator::cat(acc, token(c).map(|c| c.to_string()))
    })
}

/// Succeed (consuming nothing) iff there is no more input.
pub fn eof<S>() -> Parser<S, ()>
where
    S: Clone + 'static,
{
    look_ahead_not(any_token(), pure(()))
}

/// Consume exactly `n` tokens into a `Vec`, in order.
///
/// Per spec §7 ("programmer misuse... is handled by returning a trivial
/// `Result([], [])`"), `n <= 0` commits an empty vector immediately rather
/// than failing or panicking.
pub fn count<S>(n: isize) -> Parser<S, Vec<S>>
where
    S: Clone + 'static,
{
    if n <= 0 {
        return pure(Vec::new());
    }
    Parser::More(Rc::new(move |x: S| {
        map(
            move |mut rest: Vec<S>| {
                rest.insert(0, x.clone());
                rest
            },
            count(n - 1),
        )
    }))
}

/// Consume the longest prefix of input whose tokens satisfy the
/// corresponding predicate in `preds`, positionally. Length is capped at
/// `preds.len()`; stops (without failing) at the first token that doesn't
/// satisfy its predicate, or at end of input.
pub fn while_prefix_of<S>(preds: Vec<Rc<dyn Fn(&S) -> bool>>) -> Parser<S, Vec<S>>
where
    S: Clone + 'static,
{
    if preds.is_empty() {
        return pure(Vec::new());
    }
    let first = preds[0].clone();
    let rest_preds = preds[1..].to_vec();
    or_commit(
        crate::combinator::bind(satisfy(move |x: &S| first(x)), move |x: S| {
            let rest_preds = rest_preds.clone();
            map(
                move |mut v: Vec<S>| {
                    v.insert(0, x.clone());
                    v
                },
                while_prefix_of(rest_preds.clone()),
            )
        }),
        pure(Vec::new()),
    )
}

/// Consume the longest prefix of input that also matches a prefix of `list`,
/// element-wise by equality.
pub fn prefix_of<S>(list: Vec<S>) -> Parser<S, Vec<S>>
where
    S: Clone + PartialEq + 'static,
{
    let preds: Vec<Rc<dyn Fn(&S) -> bool>> = list
        .into_iter()
        .map(|item| Rc::new(move |x: &S| x == &item) as Rc<dyn Fn(&S) -> bool>)
        .collect();
    while_prefix_of(preds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::results;
    use crate::feed::{feed_all, feed_eof};

    #[test]
    fn any_token_commits_whatever_arrives() {
        let p = feed_all("x".chars(), any_token());
        let p = feed_eof(p);
        assert_eq!(results(&p), vec![('x', VecDeque::new())]);
    }

    #[test]
    fn satisfy_rejects_non_matching_token() {
        let p = satisfy(|c: &char| c.is_ascii_digit());
        let p = feed_all("a".chars(), p);
        let p = feed_eof(p);
        assert!(results(&p).is_empty());
    }

    #[test]
    fn string_matches_exact_sequence_with_tail() {
        let p = string("abc".chars());
        let p = feed_all("abcd".chars(), p);
        let p = feed_eof(p);
        assert_eq!(
            results(&p),
            vec![("abc".to_string(), VecDeque::from(['d']))]
        );
    }

    #[test]
    fn eof_succeeds_only_at_end_of_input() {
        let p = feed_eof(eof::<char>());
        assert_eq!(results(&p), vec![((), VecDeque::new())]);

        let fed = feed_all("x".chars(), eof::<char>());
        let fed = feed_eof(fed);
        assert!(results(&fed).is_empty());
    }

    #[test]
    fn count_consumes_exactly_n() {
        let p = count::<char>(2);
        let p = feed_all("xyz".chars(), p);
        let p = feed_eof(p);
        assert_eq!(results(&p), vec![(vec!['x', 'y'], VecDeque::from(['z']))]);
    }

    #[test]
    fn count_nonpositive_returns_empty_immediately() {
        let p = count::<char>(0);
        assert_eq!(results(&p), vec![(Vec::new(), VecDeque::new())]);

        let p = count::<char>(-3);
        assert_eq!(results(&p), vec![(Vec::new(), VecDeque::new())]);
    }

    #[test]
    fn prefix_of_stops_at_first_mismatch() {
        let p = prefix_of(vec!['a', 'b', 'c']);
        let p = feed_all("abx".chars(), p);
        let p = feed_eof(p);
        assert_eq!(results(&p), vec![(vec!['a', 'b'], VecDeque::from(['x']))]);
    }

    #[test]
    fn prefix_of_caps_at_list_length() {
        let p = prefix_of(vec!['a', 'b']);
        let p = feed_all("abab".chars(), p);
        let p = feed_eof(p);
        assert_eq!(
            results(&p),
            vec![(vec!['a', 'b'], VecDeque::from(['a', 'b']))]
        );
    }
}
