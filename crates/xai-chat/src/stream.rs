//! Pull-based assembly of streamed responses
//!
//! [`ChunkStream`] is a small state machine: `Open` until the transport
//! ends the stream or fails, then `Closed` or `Errored`. An error is sticky
//! and every later pull returns the same error. The stream is not
//! restartable and holds at most the fragment being converted.
//!
//! A pull waits on the transport, the caller's cancellation and the
//! caller's deadline if one was set. No default deadline is added, so a
//! long generation is only cut off when the caller asked for it.

use futures_util::{Stream, StreamExt};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::convert;
use crate::error::{Error, Result};
use crate::reconcile::ToolCallTracker;
use crate::transport::RawChunkStream;
use crate::types::{ChatChunk, ChatResponse, ToolCallInfo, Usage};

enum State {
    Open(RawChunkStream),
    Errored(Error),
    Closed,
}

/// Single-consumer iterator over the chunks of one streaming completion
pub struct ChunkStream {
    state: State,
    tracker: ToolCallTracker,
    cancellation: CancellationToken,
    deadline: Option<Instant>,
}

impl std::fmt::Debug for ChunkStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &self.state {
            State::Open(_) => "open",
            State::Errored(_) => "errored",
            State::Closed => "closed",
        };
        f.debug_struct("ChunkStream")
            .field("state", &state)
            .field("tool_calls", &self.tracker)
            .field("deadline", &self.deadline)
            .finish_non_exhaustive()
    }
}

impl ChunkStream {
    /// Wrap a transport stream
    ///
    /// `cancellation` aborts pending pulls. Once `deadline` passes, the
    /// stream fails with a sticky `Timeout`.
    pub fn new(inner: RawChunkStream, cancellation: CancellationToken, deadline: Option<Instant>) -> Self {
        Self {
            state: State::Open(inner),
            tracker: ToolCallTracker::new(),
            cancellation,
            deadline,
        }
    }

    /// Pull the next chunk
    ///
    /// `Ok(None)` marks the end of the stream and repeats on every later
    /// pull. After an error, every later pull returns that same error.
    pub async fn next(&mut self) -> Result<Option<ChatChunk>> {
        let inner = match &mut self.state {
            State::Open(inner) => inner,
            State::Errored(err) => return Err(err.clone()),
            State::Closed => return Ok(None),
        };

        let deadline = self.deadline;
        let expiry = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        let pulled = tokio::select! {
            biased;
            () = self.cancellation.cancelled() => Err(Error::canceled()),
            item = inner.next() => item.transpose().map_err(Error::from_status),
            () = expiry => Err(Error::timeout("stream exceeded its deadline")),
        };

        match pulled {
            Ok(Some(raw)) => Ok(Some(self.assemble(raw))),
            Ok(None) => {
                tracing::debug!("chat stream finished");
                self.state = State::Closed;
                Ok(None)
            }
            Err(err) => {
                tracing::warn!(kind = %err.kind(), error = %err, "chat stream failed");
                self.state = State::Errored(err.clone());
                Err(err)
            }
        }
    }

    /// Release the transport stream
    ///
    /// Idempotent. A stream that already failed keeps reporting its error.
    pub fn close(&mut self) {
        if matches!(self.state, State::Open(_)) {
            self.state = State::Closed;
        }
    }

    /// Error that poisoned the stream, if any
    pub const fn error(&self) -> Option<&Error> {
        match &self.state {
            State::Errored(err) => Some(err),
            State::Open(_) | State::Closed => None,
        }
    }

    pub const fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    /// Tool calls reconciled so far, in first-seen order
    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCallInfo> {
        self.tracker.calls()
    }

    /// Drain the remaining chunks into a single response
    pub async fn collect_response(mut self) -> Result<ChatResponse> {
        let mut accumulator = ResponseAccumulator::new();
        while let Some(chunk) = self.next().await? {
            accumulator.push(&chunk);
        }
        Ok(accumulator.finish())
    }

    /// Adapt to a [`Stream`] that ends after the first error
    pub fn into_stream(self) -> impl Stream<Item = Result<ChatChunk>> + Send {
        futures_util::stream::unfold(Some(self), |state| async move {
            let mut stream = state?;
            match stream.next().await {
                Ok(Some(chunk)) => Some((Ok(chunk), Some(stream))),
                Ok(None) => None,
                Err(err) => Some((Err(err), None)),
            }
        })
    }

    fn assemble(&mut self, raw: crate::wire::RawChunk) -> ChatChunk {
        let mut chunk = convert::chunk_from_raw(raw);
        chunk.tool_calls = self.tracker.observe(std::mem::take(&mut chunk.tool_calls));
        if chunk.is_terminal() {
            self.tracker.freeze();
        }

        tracing::trace!(
            id = %chunk.id,
            delta_len = chunk.delta.len(),
            tool_calls = chunk.tool_calls.len(),
            terminal = chunk.is_terminal(),
            "stream fragment"
        );

        chunk
    }
}

/// Folds chunks into the response they describe
///
/// Text is concatenated, tool calls are reconciled by id, the last usage
/// snapshot wins, and the terminal chunk supplies the finish reason and
/// citations.
#[derive(Debug, Default)]
pub struct ResponseAccumulator {
    response: ChatResponse,
    tracker: ToolCallTracker,
}

impl ResponseAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &ChatChunk) {
        let response = &mut self.response;

        if !chunk.id.is_empty() {
            response.id.clone_from(&chunk.id);
        }
        if !chunk.model.is_empty() {
            response.model.clone_from(&chunk.model);
        }
        response.content.push_str(&chunk.delta);
        response.reasoning_content.push_str(&chunk.reasoning_delta);

        if chunk.usage != Usage::default() {
            response.usage = chunk.usage;
        }
        if !chunk.citations.is_empty() {
            response.citations.clone_from(&chunk.citations);
        }

        self.tracker.observe(chunk.tool_calls.clone());
        if let Some(reason) = chunk.finish_reason {
            response.finish_reason = Some(reason);
            self.tracker.freeze();
        }
    }

    pub fn finish(self) -> ChatResponse {
        ChatResponse {
            tool_calls: self.tracker.into_calls(),
            ..self.response
        }
    }
}
