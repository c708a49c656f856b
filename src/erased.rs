//! Existential handle backing [`crate::parser::Parser::LookAheadIgnore`].
//!
//! `LookAheadIgnore` runs a probe parser whose result type is unrelated to
//! the outer parser's result type; only the probe's success or failure is
//! observed. Rather than threading a second generic parameter through every
//! variant of [`Parser`][crate::parser::Parser] (which would force every
//! combinator signature to carry it, even when no lookahead is involved), the
//! probe is stored behind a small vtable: a heap-erased handle exposing only
//! `feed`, `feed_eof`, and the two success/failure queries the ignore variant
//! actually needs.

use std::rc::Rc;

use crate::extract;
use crate::feed;
use crate::parser::Parser;

/// A type-erased, reference-counted probe parser.
///
/// Cloning an `Erased<S>` is a refcount bump, same as cloning a `Parser`
/// value built from `Rc`-backed closures.
pub(crate) type Erased<S> = Rc<dyn Probe<S>>;

/// The operations [`Parser::LookAheadIgnore`][crate::parser::Parser::LookAheadIgnore]
/// needs from its probe, independent of the probe's own result type.
pub(crate) trait Probe<S> {
    fn feed(&self, token: S) -> Erased<S>;
    fn feed_eof(&self) -> Erased<S>;
    fn has_result(&self) -> bool;
    fn is_failure(&self) -> bool;
}

struct Holder<S, R> {
    inner: Parser<S, R>,
}

impl<S, R> Probe<S> for Holder<S, R>
where
    S: Clone + 'static,
    R: Clone + 'static,
{
    fn feed(&self, token: S) -> Erased<S> {
        Rc::new(Holder {
            inner: feed::feed(token, self.inner.clone()),
        })
    }

    fn feed_eof(&self) -> Erased<S> {
        Rc::new(Holder {
            inner: feed::feed_eof(self.inner.clone()),
        })
    }

    fn has_result(&self) -> bool {
        extract::has_result(&self.inner)
    }

    fn is_failure(&self) -> bool {
        matches!(self.inner, Parser::Failure)
    }
}

/// Erase a parser's result type, keeping only enough to drive it and ask
/// whether it has succeeded, failed, or is still live.
pub(crate) fn erase<S, R>(p: Parser<S, R>) -> Erased<S>
where
    S: Clone + 'static,
    R: Clone + 'static,
{
    Rc::new(Holder { inner: p })
}
