//! # ripple, parsing one token at a time
//!
//! `ripple` is an incremental parser combinator core built on Brzozowski-style
//! derivatives: feeding a token to a parser yields another parser representing
//! "what remains to be parsed after that token." Long outputs can be streamed
//! out as input arrives, because partial results accumulate monoidally.
//!
//! Unlike most parser-combinator libraries, a `ripple` parser is not a
//! function from a whole buffer to a result, it is a **value** (the
//! [`Parser`] type) that is rewritten one token at a time by [`feed`]. This
//! buys two things an all-at-once parser can't give you for free:
//!
//! - You can feed tokens as they arrive (over a socket, a REPL, a generator)
//!   without holding the whole input in memory.
//! - A parser mid-stream is itself a first-class value: you can inspect it,
//!   clone it, stash it, and resume it later.
//!
//! ## Example
//!
//! ```rust
//! use ripple::prelude::*;
//!
//! let p: Parser<char, String> = string(std::iter::once('a').chain(['b', 'c']));
//! let p = feed_all("abcd".chars(), p);
//! let p = feed_eof(p);
//! assert_eq!(results(&p), vec![("abc".to_string(), vec!['d'])]);
//! ```
//!
//! ## Layout
//!
//! - [`parser`]: the [`Parser`] term itself (C1 in the design notes).
//! - [`feed`] (module): the derivation engine: [`feed()`], [`feed_eof()`],
//!   and the batch feeders.
//! - [`extract`]: reading committed and partial results back out.
//! - [`normalize`]: the internal rewrite helpers that keep the term in
//!   canonical form; most users will not need these directly.
//! - [`combinator`]: the combinator algebra and the primitive/derived parser
//!   vocabulary.
//! - [`monoid`]: the `Monoid` bound shared by every streaming-concatenation
//!   combinator.
//! - [`trace`]: a diagnostic tree-dumper, `show_with_default`.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(rust_2018_idioms)]

mod erased;
pub mod monoid;
pub mod parser;

pub mod extract;
pub mod feed;
pub mod normalize;

pub mod combinator;
pub mod trace;

pub use monoid::Monoid;
pub use parser::{Parser, Phase};

/// Glob-importable surface covering the whole public API.
///
/// ```rust
/// use ripple::prelude::*;
/// ```
pub mod prelude {
    pub use crate::combinator::*;
    pub use crate::extract::{has_result, partial_results, phase, result_prefix, results};
    pub use crate::feed::{
        feed, feed_all, feed_eof, feed_list_prefix, feed_longest_prefix, feed_shortest_prefix,
    };
    pub use crate::monoid::Monoid;
    pub use crate::parser::{Parser, Phase};
    #[cfg(feature = "debug")]
    pub use crate::trace::show_with_default;
    pub use crate::trace::show_plain;
}
