//! Bounded polling of deferred completions
//!
//! [`wait_for`] drives any single-shot poll until the completion leaves
//! `Pending`, the wait's own timeout elapses, or the caller cancels. Each
//! poll and each pause between polls is raced against cancellation and
//! both deadlines, so a slow poll cannot stretch the wait past `timeout`.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::context::CallContext;
use crate::error::{Error, ErrorKind, Result};
use crate::types::{ChatResponse, DeferredCompletion, DeferredStatus};

/// Poll until the completion resolves
///
/// Returns the response on `Completed`. A `Failed` completion becomes a
/// `ServerError` carrying the service's reason; running out of `timeout`
/// becomes a `Timeout`, so the two stay distinguishable. Poll failures are
/// returned unchanged.
pub async fn wait_for<F, Fut>(
    ctx: &CallContext,
    request_id: &str,
    interval: Duration,
    timeout: Duration,
    mut poll: F,
) -> Result<ChatResponse>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<DeferredCompletion>>,
{
    let deadline = Instant::now() + timeout;
    let expired = || {
        tracing::debug!(request_id, "gave up waiting for deferred completion");
        Error::timeout(format!("deferred completion {request_id} did not resolve within {timeout:?}"))
    };
    let mut attempt: u32 = 0;

    loop {
        if Instant::now() >= deadline {
            return Err(expired());
        }

        attempt += 1;
        let completion = tokio::select! {
            biased;
            () = ctx.cancellation().cancelled() => return Err(Error::canceled()),
            completion = poll() => completion?,
            () = tokio::time::sleep_until(deadline) => return Err(expired()),
            () = until(ctx.deadline()) => return Err(caller_deadline_elapsed()),
        };
        tracing::debug!(request_id, attempt, status = ?completion.status, "polled deferred completion");

        match completion.status {
            DeferredStatus::Completed => {
                return completion.response.ok_or_else(|| {
                    Error::new(
                        ErrorKind::ServerError,
                        format!("deferred completion {request_id} finished without a response"),
                    )
                });
            }
            DeferredStatus::Failed => {
                let reason = completion.error_message.unwrap_or_default();
                return Err(Error::new(
                    ErrorKind::ServerError,
                    format!("deferred completion failed: {reason}"),
                ));
            }
            DeferredStatus::Pending => {}
        }

        let pause = interval.min(deadline.saturating_duration_since(Instant::now()));
        tokio::select! {
            biased;
            () = ctx.cancellation().cancelled() => return Err(Error::canceled()),
            () = until(ctx.deadline()) => return Err(caller_deadline_elapsed()),
            () = tokio::time::sleep(pause) => {}
        }
    }
}

async fn until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn caller_deadline_elapsed() -> Error {
    Error::timeout("caller deadline elapsed while waiting for deferred completion")
}
