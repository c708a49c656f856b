//! The parser term (C1): a tagged variant representing a parser's current
//! state as an algebraic tree, rewritten one token at a time by [`feed`].
//!
//! [`feed`]: crate::feed::feed

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::erased::Erased;

/// Tokens read past a committed result, buffered for replay.
///
/// See spec invariant 4: "The `tail` of a `Result` records tokens fed past
/// the point where the parser committed; those tokens are replayed when this
/// `Result` is sequenced with another parser."
pub type Tail<S> = VecDeque<S>;

/// The left-pending transformation carried by [`Parser::ResultPart`].
///
/// Typically `mappend(prefix, ·)` for a monoidal `R`, but the core only
/// requires that it be a plain function; monoid-specific helpers live in
/// [`crate::combinator`].
pub(crate) type PrefixFn<R> = Rc<dyn Fn(R) -> R>;

/// The closure carried by [`Parser::More`]: "awaits exactly one more token."
pub(crate) type MoreFn<S, R> = Rc<dyn Fn(S) -> Parser<S, R>>;

/// The continuation carried by [`Parser::LookAhead`].
pub(crate) type ContFn<S, R> = Rc<dyn Fn(Parser<S, R>) -> Parser<S, R>>;

/// A parser over token type `S` producing result type `R`, represented as an
/// algebraic term that [`feed`][crate::feed::feed] rewrites one token at a
/// time.
///
/// Cloning a `Parser` is cheap: every variant that closes over state does so
/// through `Rc`, so a clone is a tree of refcount bumps, never a deep copy.
///
/// The variants correspond exactly to spec §3 ("The Parser term (C1)"); see
/// that section for the full algebra. In short:
///
/// - [`Failure`][Parser::Failure]: no success possible.
/// - [`Result`][Parser::Result]: a committed result, plus tokens read past
///   the commit point (replayed when sequenced further).
/// - [`ResultPart`][Parser::ResultPart]: a pending left-partial
///   transformation over a still-live parser; `f(mempty)` is the streamable
///   partial output.
/// - [`Choice`][Parser::Choice]: nondeterministic alternation; both
///   branches stay live until one commits.
/// - [`CommittedLeftChoice`][Parser::CommittedLeftChoice]: alternation that
///   discards the right branch as soon as the left branch has any result.
/// - [`More`][Parser::More]: awaits exactly one more token.
/// - [`LookAhead`][Parser::LookAhead]: runs a sub-parser without consuming,
///   then continues with a function of the sub-parser's finalized form.
/// - [`LookAheadIgnore`][Parser::LookAheadIgnore]: as `LookAhead`, but the
///   sub-parser's result type is unrelated to the outer one and is discarded;
///   only success/failure drives the continuation.
pub enum Parser<S, R> {
    /// No success is possible from here on.
    Failure,
    /// A committed result, and the tokens fed since it committed.
    Result {
        /// Tokens fed after this parser had already committed `value`.
        tail: Tail<S>,
        /// The committed result.
        value: R,
    },
    /// A pending left-partial transformation over a still-live parser.
    ResultPart {
        /// Applied to any result eventually produced by `rest` (and, for
        /// monoidal `R`, to `mempty` to read the partial output so far).
        prefix: PrefixFn<R>,
        /// The parser that remains to be driven.
        rest: Box<Parser<S, R>>,
    },
    /// Nondeterministic alternation: both branches remain live.
    Choice(Box<Parser<S, R>>, Box<Parser<S, R>>),
    /// Committed alternation: the right branch is discarded once the left
    /// branch has any result.
    CommittedLeftChoice(Box<Parser<S, R>>, Box<Parser<S, R>>),
    /// Awaits exactly one more token.
    More(MoreFn<S, R>),
    /// Runs `inner` without consuming, then continues with
    /// `cont(inner_finalized)`.
    LookAhead {
        /// The sub-parser being peeked at.
        inner: Box<Parser<S, R>>,
        /// Applied to `inner`'s finalized form once it is determinate.
        cont: ContFn<S, R>,
    },
    /// As `LookAhead`, but `inner`'s result type is unrelated to `R` and is
    /// discarded; only its success (or, if `negate`, its failure) gates
    /// `cont`.
    LookAheadIgnore {
        /// The type-erased probe parser.
        inner: Erased<S>,
        /// If `true`, `cont` is taken when `inner` *fails* rather than
        /// succeeds (negative lookahead, as used by `eof`).
        negate: bool,
        /// The parser to continue with once `inner`'s outcome is known.
        cont: Box<Parser<S, R>>,
    },
}

impl<S: Clone, R: Clone> Clone for Parser<S, R> {
    fn clone(&self) -> Self {
        match self {
            Parser::Failure => Parser::Failure,
            Parser::Result { tail, value } => Parser::Result {
                tail: tail.clone(),
                value: value.clone(),
            },
            Parser::ResultPart { prefix, rest } => Parser::ResultPart {
                prefix: Rc::clone(prefix),
                rest: rest.clone(),
            },
            Parser::Choice(l, r) => Parser::Choice(l.clone(), r.clone()),
            Parser::CommittedLeftChoice(l, r) => {
                Parser::CommittedLeftChoice(l.clone(), r.clone())
            }
            Parser::More(g) => Parser::More(Rc::clone(g)),
            Parser::LookAhead { inner, cont } => Parser::LookAhead {
                inner: inner.clone(),
                cont: Rc::clone(cont),
            },
            Parser::LookAheadIgnore {
                inner,
                negate,
                cont,
            } => Parser::LookAheadIgnore {
                inner: Rc::clone(inner),
                negate: *negate,
                cont: cont.clone(),
            },
        }
    }
}

impl<S, R> fmt::Debug for Parser<S, R> {
    /// A shallow, closure-blind debug view. For a full tree dump that probes
    /// `More` nodes, use [`crate::trace::show_with_default`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parser::Failure => f.write_str("Failure"),
            Parser::Result { .. } => f.write_str("Result(..)"),
            Parser::ResultPart { .. } => f.write_str("ResultPart(<fn>, ..)"),
            Parser::Choice(..) => f.write_str("Choice(.., ..)"),
            Parser::CommittedLeftChoice(..) => f.write_str("CommittedLeftChoice(.., ..)"),
            Parser::More(_) => f.write_str("More(<fn>)"),
            Parser::LookAhead { .. } => f.write_str("LookAhead(.., <fn>)"),
            Parser::LookAheadIgnore { negate, .. } => {
                write!(f, "LookAheadIgnore(.., negate={negate}, ..)")
            }
        }
    }
}

/// The three observable phases of a parser (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No results yet; the parser still awaits input.
    Live,
    /// The parser has a streaming partial output and/or committed results,
    /// but isn't fully resolved.
    Partial,
    /// `Failure`, or a fully committed `Result` with no live alternatives.
    Terminal,
}
