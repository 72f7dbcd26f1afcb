//! Per-call deadline and cancellation
//!
//! Blocking calls take the caller's deadline when one is set and otherwise
//! fall back to the client timeout. A caller deadline is never overridden.

use std::future::Future;
use std::time::Duration;

use secrecy::SecretString;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Caller-controlled bounds for one operation
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancellation: CancellationToken,
}

impl CallContext {
    /// No deadline, fresh cancellation token
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish by `deadline`
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Finish within `timeout` from now
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Observe an existing token, e.g. a child of a request-scoped one
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Cancel every operation observing this context
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_canceled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Caller deadline, or `now + default_timeout` when none was set
    pub fn effective_deadline(&self, default_timeout: Duration) -> Instant {
        self.deadline.unwrap_or_else(|| Instant::now() + default_timeout)
    }
}

/// Authorization and deadline handed to the transport with each call
#[derive(Debug, Clone)]
pub struct CallMetadata {
    /// Bearer credential for the `authorization` header
    pub bearer: SecretString,
    /// Deadline to propagate on the wire; `None` for streams the caller left unbounded
    pub deadline: Option<Instant>,
}

/// Run `operation`, giving up on cancellation or when `deadline` passes
pub(crate) async fn guard<T, F>(
    cancellation: &CancellationToken,
    deadline: Option<Instant>,
    what: &str,
    operation: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let expiry = async {
        match deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        biased;
        () = cancellation.cancelled() => Err(Error::canceled()),
        result = operation => result,
        () = expiry => Err(Error::timeout(format!("{what} exceeded its deadline"))),
    }
}
