//! Execution context: cancellation and deadlines for a single call.
//!
//! A [`Context`] is handed to every verb operation. Cancelling it, or letting
//! its deadline pass, aborts the exchange and any later body read with
//! [`Error::Canceled`] or [`Error::DeadlineExceeded`].
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use punch_core::Context;
//!
//! let root = Context::background();
//! let ctx = root.with_timeout(Duration::from_secs(5));
//! assert!(ctx.deadline().is_some());
//!
//! root.cancel();
//! assert!(ctx.is_done());
//! ```

use std::future::{Future, pending};
use std::time::Duration;

use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

use crate::{Error, Result};

/// Cancellation and deadline carrier.
///
/// Cloning is cheap and clones share the same cancellation state. Derived
/// contexts ([`with_cancel`](Self::with_cancel),
/// [`with_timeout`](Self::with_timeout), [`with_deadline`](Self::with_deadline))
/// are cancelled together with their parent, never the other way around.
#[derive(Debug, Clone)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A root context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Derive a child that can be cancelled on its own.
    #[must_use]
    pub fn with_cancel(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Derive a child that expires at `deadline`, or at the parent's deadline
    /// if that comes first.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = self
            .deadline
            .map_or(deadline, |parent| parent.min(deadline));
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    /// Derive a child that expires `timeout` from now.
    ///
    /// A timeout too large to represent as an instant sets no deadline.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self.with_cancel(),
        }
    }

    /// Cancel this context and every context derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// The instant after which this context is expired, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why this context is done, or `None` while it is still live.
    #[must_use]
    pub fn err(&self) -> Option<Error> {
        if self.token.is_cancelled() {
            return Some(Error::Canceled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(Error::DeadlineExceeded),
            _ => None,
        }
    }

    /// Returns `true` once the context is cancelled or expired.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Wait until the context is cancelled or expired, yielding the reason.
    pub async fn done(&self) -> Error {
        let expired = async {
            match self.deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.token.cancelled() => Error::Canceled,
            () = expired => Error::DeadlineExceeded,
        }
    }

    /// Drive `future` to completion unless the context finishes first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Canceled`] or [`Error::DeadlineExceeded`] if the
    /// context is done before `future` completes.
    pub async fn run<F: Future>(&self, future: F) -> Result<F::Output> {
        tokio::select! {
            biased;
            reason = self.done() => Err(reason),
            output = future => Ok(output),
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::background()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_is_live() {
        let ctx = Context::background();
        assert!(!ctx.is_done());
        assert!(ctx.deadline().is_none());
        assert!(ctx.err().is_none());
    }

    #[test]
    fn cancel_propagates_to_children_only() {
        let parent = Context::background();
        let child = parent.with_cancel();

        child.cancel();
        assert_eq!(child.err(), Some(Error::Canceled));
        assert!(!parent.is_done());

        let sibling = parent.with_cancel();
        parent.cancel();
        assert_eq!(sibling.err(), Some(Error::Canceled));
    }

    #[tokio::test(start_paused = true)]
    async fn child_keeps_earlier_parent_deadline() {
        let parent = Context::background().with_timeout(Duration::from_secs(1));
        let child = parent.with_timeout(Duration::from_secs(60));
        assert_eq!(child.deadline(), parent.deadline());
    }

    #[tokio::test(start_paused = true)]
    async fn unrepresentable_timeout_sets_no_deadline() {
        let ctx = Context::background().with_timeout(Duration::MAX);
        assert!(ctx.deadline().is_none());
        assert!(!ctx.is_done());

        let parent = Context::background().with_timeout(Duration::from_secs(1));
        let child = parent.with_timeout(Duration::MAX);
        assert_eq!(child.deadline(), parent.deadline());

        parent.cancel();
        assert_eq!(child.err(), Some(Error::Canceled));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_expires() {
        let ctx = Context::background().with_timeout(Duration::from_millis(10));
        assert!(!ctx.is_done());

        let reason = ctx.done().await;
        assert_eq!(reason, Error::DeadlineExceeded);
        assert_eq!(ctx.err(), Some(Error::DeadlineExceeded));
    }

    #[tokio::test(start_paused = true)]
    async fn run_completes_before_deadline() {
        let ctx = Context::background().with_timeout(Duration::from_secs(1));
        let output = ctx.run(async { 42 }).await;
        assert_eq!(output, Ok(42));
    }

    #[tokio::test(start_paused = true)]
    async fn run_aborts_slow_future() {
        let ctx = Context::background().with_timeout(Duration::from_millis(5));
        let output = ctx
            .run(tokio::time::sleep(Duration::from_secs(10)))
            .await;
        assert_eq!(output, Err(Error::DeadlineExceeded));
    }

    #[tokio::test]
    async fn run_aborts_on_cancel() {
        let ctx = Context::background().with_cancel();
        ctx.cancel();
        let output = ctx.run(pending::<()>()).await;
        assert_eq!(output, Err(Error::Canceled));
    }
}
