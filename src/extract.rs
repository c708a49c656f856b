//! C3, reading committed and partial results back out of a [`Parser`]
//! without feeding it any more input.

use crate::monoid::Monoid;
use crate::parser::{Parser, Phase, Tail};

/// Every committed `(value, tail)` pair reachable from `p` without feeding
/// any more input.
///
/// Walks through `ResultPart` (applying its pending transformation),
/// `Choice` (both branches), and `CommittedLeftChoice` (left branch only,
/// falling back to the right branch when the left has nothing). `More` and
/// the lookahead variants never contribute a result here: by construction
/// (see [`crate::normalize::look_ahead_into`]) they only ever wrap a still-live
/// sub-parser, so there is nothing to report until more input arrives.
pub fn results<S: Clone, R: Clone>(p: &Parser<S, R>) -> Vec<(R, Tail<S>)> {
    match p {
        Parser::Failure => Vec::new(),
        Parser::Result { tail, value } => vec![(value.clone(), tail.clone())],
        Parser::ResultPart { prefix, rest } => results(rest)
            .into_iter()
            .map(|(r, tail)| (prefix(r), tail))
            .collect(),
        Parser::Choice(l, r) => {
            let mut v = results(l);
            v.extend(results(r));
            v
        }
        Parser::CommittedLeftChoice(l, r) => {
            let lv = results(l);
            if lv.is_empty() {
                results(r)
            } else {
                lv
            }
        }
        Parser::More(_) | Parser::LookAhead { .. } | Parser::LookAheadIgnore { .. } => Vec::new(),
    }
}

/// `true` iff [`results`] would return anything.
pub fn has_result<S: Clone, R: Clone>(p: &Parser<S, R>) -> bool {
    !results(p).is_empty()
}

/// Peel the outermost `ResultPart` layer, reading its pending partial output
/// at `mempty` and returning a copy of `p` with that layer's transformation
/// reset to identity (so the same increment is never read twice).
///
/// Returns `(None, p)` unchanged for anything that isn't a `ResultPart`.
pub fn result_prefix<S, R>(p: Parser<S, R>) -> (Option<R>, Parser<S, R>)
where
    R: Monoid + 'static,
{
    match p {
        Parser::ResultPart { prefix, rest } => {
            let partial = prefix(R::mempty());
            (
                Some(partial),
                Parser::ResultPart {
                    prefix: std::rc::Rc::new(|r: R| r),
                    rest,
                },
            )
        }
        other => (None, other),
    }
}

/// Every partial result reachable from `p`, paired with the parser that
/// remains once that partial has been read.
///
/// Unlike [`results`], this also surfaces `ResultPart` nodes (read at
/// `mempty`, the same value [`result_prefix`] would read), not just fully
/// committed `Result`s. Walks through `Choice` (both branches) and
/// `CommittedLeftChoice` (left branch preferred, same as [`results`]).
pub fn partial_results<S, R>(p: &Parser<S, R>) -> Vec<(R, Parser<S, R>)>
where
    S: Clone,
    R: Monoid + 'static,
{
    match p {
        Parser::Failure => Vec::new(),
        Parser::Result { value, .. } => vec![(value.clone(), p.clone())],
        Parser::ResultPart { prefix, rest } => vec![(prefix(R::mempty()), (**rest).clone())],
        Parser::Choice(l, r) => {
            let mut v = partial_results(l);
            v.extend(partial_results(r));
            v
        }
        Parser::CommittedLeftChoice(l, r) => {
            let lv = partial_results(l);
            if lv.is_empty() {
                partial_results(r)
            } else {
                lv
            }
        }
        Parser::More(_) | Parser::LookAhead { .. } | Parser::LookAheadIgnore { .. } => Vec::new(),
    }
}

/// Classify `p` into one of the three observable phases (spec §4.5).
pub fn phase<S: Clone, R: Clone>(p: &Parser<S, R>) -> Phase {
    match p {
        Parser::Failure | Parser::Result { .. } => Phase::Terminal,
        _ if has_result(p) => Phase::Partial,
        _ => Phase::Live,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[test]
    fn results_pulls_through_result_part() {
        let inner: Parser<char, String> = Parser::Result {
            tail: VecDeque::new(),
            value: "b".to_string(),
        };
        let p = Parser::ResultPart {
            prefix: Rc::new(|s: String| format!("a{s}")),
            rest: Box::new(inner),
        };
        assert_eq!(results(&p), vec![("ab".to_string(), VecDeque::new())]);
    }

    #[test]
    fn committed_left_choice_prefers_left() {
        let left: Parser<char, u8> = Parser::Result {
            tail: VecDeque::new(),
            value: 1,
        };
        let right: Parser<char, u8> = Parser::Result {
            tail: VecDeque::new(),
            value: 2,
        };
        let p = Parser::CommittedLeftChoice(Box::new(left), Box::new(right));
        assert_eq!(results(&p), vec![(1, VecDeque::new())]);
    }

    #[test]
    fn committed_left_choice_falls_back_when_left_empty() {
        let left: Parser<char, u8> = Parser::Failure;
        let right: Parser<char, u8> = Parser::Result {
            tail: VecDeque::new(),
            value: 2,
        };
        let p = Parser::CommittedLeftChoice(Box::new(left), Box::new(right));
        assert_eq!(results(&p), vec![(2, VecDeque::new())]);
    }

    #[test]
    fn phase_classifies_terminal_live_partial() {
        let failure: Parser<char, u8> = Parser::Failure;
        assert_eq!(phase(&failure), Phase::Terminal);

        let more: Parser<char, u8> = Parser::More(Rc::new(|_| Parser::Failure));
        assert_eq!(phase(&more), Phase::Live);

        let partial = Parser::Choice(
            Box::new(Parser::Result {
                tail: VecDeque::new(),
                value: 1u8,
            }),
            Box::new(Parser::More(Rc::new(|_| Parser::Failure))),
        );
        assert_eq!(phase(&partial), Phase::Partial);
    }
}
