//! Raw wire values into normalized response types
//!
//! Only the first output of a multi-output payload is surfaced. Absent
//! fields become empty values rather than errors.

use jiff::Timestamp;

use crate::types::{ChatChunk, ChatResponse, DeferredCompletion, FinishReason, ToolCallInfo, Usage};
use crate::wire::{RawChunk, RawDeferredState, RawDeferredStatus, RawResponse};

/// Reason reported for a deferred completion the service let expire
pub const EXPIRED_REASON: &str = "deferred completion expired";

/// Reason reported for a deferred status this client does not know
pub const UNRECOGNIZED_REASON: &str = "unrecognized deferred status";

/// Normalize a terminal blocking response
pub fn response_from_raw(raw: RawResponse) -> ChatResponse {
    let mut response = ChatResponse {
        id: raw.id,
        citations: raw.citations,
        usage: raw.usage.map(Usage::from).unwrap_or_default(),
        model: raw.model,
        created_at: timestamp(raw.created),
        system_fingerprint: raw.system_fingerprint,
        ..ChatResponse::default()
    };

    if let Some(output) = raw.outputs.into_iter().next() {
        response.finish_reason = FinishReason::from_raw(output.finish_reason);

        if let Some(message) = output.message {
            response.content = message.content;
            response.reasoning_content = message.reasoning_content;
            response.tool_calls = message.tool_calls.iter().map(ToolCallInfo::from).collect();
        }
    }

    response
}

/// Normalize one stream fragment as-is, before tool-call reconciliation
pub fn chunk_from_raw(raw: RawChunk) -> ChatChunk {
    let mut chunk = ChatChunk {
        id: raw.id,
        citations: raw.citations,
        usage: raw.usage.map(Usage::from).unwrap_or_default(),
        model: raw.model,
        ..ChatChunk::default()
    };

    if let Some(output) = raw.outputs.into_iter().next() {
        chunk.finish_reason = FinishReason::from_raw(output.finish_reason);

        if let Some(delta) = output.delta {
            chunk.delta = delta.content;
            chunk.reasoning_delta = delta.reasoning_content;
            chunk.tool_calls = delta.tool_calls.iter().map(ToolCallInfo::from).collect();
        }
    }

    chunk
}

/// Map a service deferred state onto the client lifecycle
pub fn deferred_from_raw(request_id: &str, raw: RawDeferredStatus) -> DeferredCompletion {
    match raw.status {
        RawDeferredState::Pending => DeferredCompletion::pending(request_id),
        RawDeferredState::Done => DeferredCompletion::completed(request_id, raw.response.map(response_from_raw)),
        RawDeferredState::Expired => DeferredCompletion::failed(request_id, EXPIRED_REASON),
        RawDeferredState::Invalid | RawDeferredState::Unrecognized => {
            DeferredCompletion::failed(request_id, UNRECOGNIZED_REASON)
        }
    }
}

fn timestamp(seconds: Option<i64>) -> Option<Timestamp> {
    seconds.and_then(|secs| Timestamp::from_second(secs).ok())
}
