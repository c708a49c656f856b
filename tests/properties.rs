//! Property-based checks for the universally-quantified properties of spec
//! §8, run over arbitrary finite token sequences via `proptest`.
//!
//! Colocated `#[cfg(test)]` modules throughout `src/` cover the concrete
//! scenarios (S1-S6) and per-combinator edge cases; this file is reserved for
//! the properties that genuinely range over arbitrary input (P1-P12).

use std::collections::VecDeque;

use proptest::prelude::*;

use ripple::prelude::*;

fn ascii_token() -> impl Strategy<Value = char> {
    prop_oneof![Just('a'), Just('b'), Just('c'), Just('x'), Just('y')]
}

fn token_seq() -> impl Strategy<Value = Vec<char>> {
    prop::collection::vec(ascii_token(), 0..8)
}

fn sorted<T: Ord + Clone>(mut v: Vec<T>) -> Vec<T> {
    v.sort();
    v
}

proptest! {
    /// P1: `p <|> empty ≡ p ≡ empty <|> p`.
    #[test]
    fn identity_of_empty(xs in token_seq()) {
        let p = || any_token::<char>();
        let empty = || ripple::combinator::empty::<char, char>();

        let lhs = feed_eof(feed_all(xs.clone(), or(p(), empty())));
        let mid = feed_eof(feed_all(xs.clone(), p()));
        let rhs = feed_eof(feed_all(xs, or(empty(), p())));

        prop_assert_eq!(sorted(results(&lhs)), sorted(results(&mid)));
        prop_assert_eq!(sorted(results(&mid)), sorted(results(&rhs)));
    }

    /// P2: `(p <|> q) <|> r ≡ p <|> (q <|> r)` up to result multiset.
    #[test]
    fn associativity_of_choice(xs in token_seq()) {
        let p = || ripple::combinator::token::<char>('a');
        let q = || ripple::combinator::token::<char>('x');
        let r = || ripple::combinator::token::<char>('y');

        let left = feed_eof(feed_all(xs.clone(), or(or(p(), q()), r())));
        let right = feed_eof(feed_all(xs, or(p(), or(q(), r()))));

        prop_assert_eq!(sorted(results(&left)), sorted(results(&right)));
    }

    /// P3: `return mempty >< p ≡ p ≡ p >< return mempty`.
    #[test]
    fn monoid_identity_of_cat(xs in token_seq()) {
        let p = || string("ab".chars());
        let lhs = feed_eof(feed_all(xs.clone(), pure(String::new()).cat(p())));
        let mid = feed_eof(feed_all(xs.clone(), p()));
        let rhs = feed_eof(feed_all(xs, p().cat(pure(String::new()))));

        prop_assert_eq!(results(&lhs), results(&mid));
        prop_assert_eq!(results(&mid), results(&rhs));
    }

    /// P4: feeding a `Result` only ever grows its buffered tail.
    #[test]
    fn feeding_a_result_buffers_the_tail(prefix in token_seq(), suffix in token_seq()) {
        let committed: Parser<char, String> = Parser::Result {
            tail: VecDeque::new(),
            value: "r".to_string(),
        };
        let fed = feed_all(suffix.clone(), committed);
        let got = results(&fed);
        prop_assert_eq!(got, vec![("r".to_string(), VecDeque::from(suffix))]);
        let _ = prefix;
    }

    /// P5: `any_token` is a one-step identity: feeding a token then EOF
    /// commits it; feeding EOF before the token never does.
    #[test]
    fn any_token_is_one_step(x in ascii_token()) {
        let early_eof = results(&feed_eof(any_token::<char>()));
        prop_assert!(early_eof.is_empty());

        let after = feed_eof(feed_all(std::iter::once(x), any_token::<char>()));
        prop_assert_eq!(results(&after), vec![(x, VecDeque::new())]);
    }

    /// P6: `count(n)` consumes exactly `n` tokens, for every `xs` with
    /// `|xs| >= n`.
    #[test]
    fn count_consumes_exactly_n(xs in token_seq(), n in 0usize..8) {
        prop_assume!(xs.len() >= n);
        let p = ripple::combinator::count::<char>(n as isize);
        let p = feed_eof(feed_all(xs.clone(), p));
        let got = results(&p);
        prop_assert_eq!(got.len(), 1);
        let (taken, tail): &(Vec<char>, VecDeque<char>) = &got[0];
        prop_assert_eq!(taken.clone(), xs[..n].to_vec());
        prop_assert_eq!(tail.clone(), VecDeque::from(xs[n..].to_vec()));
    }

    /// P7: `string(w)` matches iff `xs` starts with `w`.
    #[test]
    fn string_exact_match(xs in token_seq()) {
        let w: Vec<char> = vec!['a', 'b'];
        let p = string(w.clone());
        let p = feed_eof(feed_all(xs.clone(), p));
        let starts_with_w = xs.len() >= w.len() && xs[..w.len()] == w[..];
        if starts_with_w {
            let got = results(&p);
            prop_assert_eq!(got.len(), 1);
            prop_assert_eq!(&got[0].0, &"ab".to_string());
            prop_assert_eq!(&got[0].1, &VecDeque::from(xs[w.len()..].to_vec()));
        } else {
            prop_assert!(results(&p).is_empty());
        }
    }

    /// P8: `while_(p)` is maximal; `while1(p)` additionally rejects the empty
    /// match.
    #[test]
    fn while_is_maximal_and_while1_rejects_empty(xs in token_seq()) {
        let is_a = |c: &char| *c == 'a';
        let expected_len = xs.iter().take_while(|c| is_a(c)).count();

        let w = feed_eof(feed_all(xs.clone(), while_(is_a)));
        let got = results(&w);
        prop_assert_eq!(got.len(), 1);
        prop_assert_eq!(got[0].0.len(), expected_len);

        let w1 = feed_eof(feed_all(xs, while1(is_a)));
        if expected_len == 0 {
            prop_assert!(results(&w1).is_empty());
        } else {
            prop_assert_eq!(results(&w1)[0].0.len(), expected_len);
        }
    }

    /// P9: `many0(p)` matches the same total input as `many1(p) <<|> return
    /// mempty`, by construction.
    #[test]
    fn many0_equals_many1_or_commit_empty(xs in token_seq()) {
        let is_a = |c: &char| *c == 'a';
        let p = || while1(is_a);
        let via_many0 = feed_eof(feed_all(xs.clone(), many0(p())));
        let via_or_commit = feed_eof(feed_all(
            xs,
            or_commit(many1(p()), pure(Vec::<char>::new())),
        ));
        prop_assert_eq!(results(&via_many0), results(&via_or_commit));
    }

    /// P10: committed-left choice prunes the right branch once the left has
    /// any result.
    #[test]
    fn committed_left_choice_prunes_once_left_has_result(xs in token_seq()) {
        let left: Parser<char, String> = Parser::Result {
            tail: VecDeque::new(),
            value: "left".to_string(),
        };
        let right = string("zzzz".chars());
        let combined = or_commit(left.clone(), right);
        let a = feed_eof(feed_all(xs.clone(), combined));
        let b = feed_eof(feed_all(xs, left));
        prop_assert_eq!(results(&a), results(&b));
    }

    /// P11: lookahead doesn't consume -- `lookAhead(p) >< q` commits the same
    /// tail as `q` alone, as long as `p` matches some prefix of the input.
    #[test]
    fn lookahead_does_not_consume(xs in prop::collection::vec(Just('a'), 1..5)) {
        let probe = string("a".chars());
        let la = ripple::combinator::look_ahead(probe);
        let q = || many0(satisfy(|c: &char| *c == 'a').map(|c| c.to_string()));
        let combined = la.cat(q());

        let combined_result = feed_eof(feed_all(xs.clone(), combined));
        let q_alone_result = feed_eof(feed_all(xs, q()));

        let combined_tails: Vec<_> = results(&combined_result).into_iter().map(|(_, t)| t).collect();
        let q_tails: Vec<_> = results(&q_alone_result).into_iter().map(|(_, t)| t).collect();
        prop_assert_eq!(combined_tails, q_tails);
    }

    /// P12: `and(p, q)` succeeds on `xs` iff both `p` and `q` succeed on the
    /// same `xs`.
    #[test]
    fn and_succeeds_iff_both_succeed(xs in token_seq()) {
        let p = while1(|c: &char| *c == 'a');
        let q = while1(|c: &char| *c == 'a' || *c == 'b');
        let p_ok = has_result(&feed_eof(feed_all(xs.clone(), p.clone())));
        let q_ok = has_result(&feed_eof(feed_all(xs.clone(), q.clone())));

        let joined = and(p, q);
        let joined_ok = has_result(&feed_eof(feed_all(xs, joined)));
        prop_assert_eq!(joined_ok, p_ok && q_ok);
    }

    /// `andThen` streams the first slot as soon as `p1` commits, with the
    /// second slot filled in once `p2` does.
    #[test]
    fn and_then_ordered_fills_slots_in_order(xs in token_seq()) {
        let p1 = string("a".chars());
        let p2 = string("b".chars());
        let joined = and_then_ordered(p1, p2);
        let done = feed_eof(feed_all(xs.clone(), joined));
        let got = results(&done);
        let starts_ab = xs.len() >= 2 && xs[0] == 'a' && xs[1] == 'b';
        if starts_ab {
            prop_assert_eq!(got.len(), 1);
            prop_assert_eq!(&got[0].0, &("a".to_string(), "b".to_string()));
        } else {
            prop_assert!(got.is_empty());
        }
    }

    /// `option_maybe` always succeeds, reporting `None` on a miss rather than
    /// silently degrading to a monoid identity.
    #[test]
    fn option_maybe_always_succeeds(xs in token_seq()) {
        let p = option_maybe(ripple::combinator::token::<char>('a'));
        let done = feed_eof(feed_all(xs, p));
        prop_assert_eq!(results(&done).len(), 1);
    }
}

/// Concrete scenarios from spec §8.
mod scenarios {
    use super::*;

    #[test]
    fn s1_string_abc_on_abcd() {
        let p = string("abc".chars());
        let p = feed_eof(feed_all("abcd".chars(), p));
        assert_eq!(
            results(&p),
            vec![("abc".to_string(), VecDeque::from(['d']))]
        );
    }

    #[test]
    fn s2_token_choice() {
        let p = or(token('a'), token('b'));
        let p = feed_eof(feed_all("b".chars(), p));
        assert_eq!(results(&p), vec![('b', VecDeque::new())]);
    }

    #[test]
    fn s3_many0_digits() {
        let p = many0(satisfy(|c: &char| c.is_ascii_digit()).map(|c| c.to_string()));
        let p = feed_eof(feed_all("123x".chars(), p));
        assert_eq!(
            results(&p),
            vec![("123".to_string(), VecDeque::from(['x']))]
        );
    }

    #[test]
    fn s4_lookahead_does_not_consume() {
        let la = look_ahead(string("ab".chars()));
        let p = la.cat(string("abc".chars()));
        let p = feed_eof(feed_all("abc".chars(), p));
        assert_eq!(results(&p), vec![("abc".to_string(), VecDeque::new())]);
    }

    #[test]
    fn s5_count_choice_yields_two_results() {
        let p = or(count::<char>(2), count::<char>(3));
        let p = feed_eof(feed_all("xyz".chars(), p));
        assert_eq!(
            results(&p),
            vec![
                (vec!['x', 'y'], VecDeque::from(['z'])),
                (vec!['x', 'y', 'z'], VecDeque::new()),
            ]
        );
    }

    #[test]
    fn s6_feed_longest_prefix_of_as() {
        let (result, leftover) =
            feed_longest_prefix("aaab".chars(), many0(token('a').map(|c| c.to_string())));
        match result {
            Parser::Result { value, .. } => assert_eq!(value, "aaa"),
            other => panic!("expected a committed result, got {other:?}"),
        }
        assert_eq!(leftover, vec!['b']);
    }
}
