//! Cancellation scopes for blocking operations.
//!
//! A [`Context`] pairs a [`CancellationToken`] with an optional deadline. Every
//! dial, read, and write accepts one and returns promptly once it is done.

use std::error::Error as StdError;
use std::fmt;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

/// Why a [`Context`] is done.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// The context's token was cancelled
    Canceled,
    /// The context's deadline passed
    DeadlineExceeded,
}

impl ContextError {
    #[must_use]
    pub const fn is_timeout(self) -> bool {
        matches!(self, Self::DeadlineExceeded)
    }
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canceled => f.write_str("context canceled"),
            Self::DeadlineExceeded => f.write_str("context deadline exceeded"),
        }
    }
}

impl StdError for ContextError {}

/// Cancellation signal and optional deadline scoping a single call.
///
/// Derived contexts never outlive their parent: cancelling the parent cancels
/// every child, and a child's deadline is never later than its parent's.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
///
/// use realtime_ws::context::Context;
///
/// let ctx = Context::background().with_timeout(Duration::from_secs(5));
/// assert!(ctx.deadline().is_some());
/// assert!(ctx.err().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl Context {
    /// A context that is never cancelled and has no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Wrap an existing token; cancelling it cancels the context.
    #[must_use]
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Derive a child context along with the token that cancels it.
    #[must_use]
    pub fn with_cancel(&self) -> (Self, CancellationToken) {
        let token = self.token.child_token();
        let ctx = Self {
            token: token.clone(),
            deadline: self.deadline,
        };
        (ctx, token)
    }

    /// Derive a child context that expires at `deadline`, or earlier if the parent does.
    #[must_use]
    pub fn with_deadline(&self, deadline: Instant) -> Self {
        let deadline = match self.deadline {
            Some(parent) => parent.min(deadline),
            None => deadline,
        };
        Self {
            token: self.token.child_token(),
            deadline: Some(deadline),
        }
    }

    /// Derive a child context that expires after `timeout`.
    #[must_use]
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Check without waiting whether the context is already done.
    #[must_use]
    pub fn err(&self) -> Option<ContextError> {
        if self.token.is_cancelled() {
            Some(ContextError::Canceled)
        } else if self.deadline.is_some_and(|at| Instant::now() >= at) {
            Some(ContextError::DeadlineExceeded)
        } else {
            None
        }
    }

    /// Wait until the context is cancelled or its deadline passes.
    ///
    /// Never resolves for a context with neither.
    pub async fn done(&self) -> ContextError {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    biased;
                    () = self.token.cancelled() => ContextError::Canceled,
                    () = sleep_until(deadline) => ContextError::DeadlineExceeded,
                }
            }
            None => {
                self.token.cancelled().await;
                ContextError::Canceled
            }
        }
    }
}
