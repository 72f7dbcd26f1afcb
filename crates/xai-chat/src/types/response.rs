//! Blocking responses, stream chunks and token usage

use jiff::Timestamp;

use super::tool::ToolCallInfo;
use crate::wire::{RawFinishReason, RawUsage};

/// Why generation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    /// End of message or stop sequence
    Stop,
    /// Token or context limit reached
    Length,
    /// Model is waiting on tool results
    ToolCalls,
    /// Agentic time budget exhausted
    TimeLimit,
}

impl FinishReason {
    /// Stable identifier
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Length => "length",
            Self::ToolCalls => "tool_calls",
            Self::TimeLimit => "time_limit",
        }
    }

    /// Normalize a raw reason; unspecified reasons yield `None`
    pub const fn from_raw(reason: RawFinishReason) -> Option<Self> {
        match reason {
            RawFinishReason::Stop => Some(Self::Stop),
            RawFinishReason::MaxLen | RawFinishReason::MaxContext => Some(Self::Length),
            RawFinishReason::ToolCalls => Some(Self::ToolCalls),
            RawFinishReason::TimeLimit => Some(Self::TimeLimit),
            RawFinishReason::Invalid | RawFinishReason::Unrecognized => None,
        }
    }
}

/// Token accounting
///
/// Each value is a snapshot. On a stream the latest snapshot supersedes all
/// earlier ones; snapshots are never summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
    pub reasoning_tokens: u32,
    pub cached_prompt_tokens: u32,
    pub prompt_text_tokens: u32,
    pub prompt_image_tokens: u32,
}

impl From<RawUsage> for Usage {
    fn from(raw: RawUsage) -> Self {
        Self {
            prompt_tokens: raw.prompt_tokens,
            completion_tokens: raw.completion_tokens,
            total_tokens: raw.total_tokens,
            reasoning_tokens: raw.reasoning_tokens,
            cached_prompt_tokens: raw.cached_prompt_text_tokens,
            prompt_text_tokens: raw.prompt_text_tokens,
            prompt_image_tokens: raw.prompt_image_tokens,
        }
    }
}

/// Complete response to a blocking or deferred completion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatResponse {
    /// Response identifier; chain the next turn with it
    pub id: String,
    /// Generated text
    pub content: String,
    /// Reasoning trace, when the model exposes one
    pub reasoning_content: String,
    /// Tool calls in the response
    pub tool_calls: Vec<ToolCallInfo>,
    /// Why generation stopped
    pub finish_reason: Option<FinishReason>,
    /// External sources referenced
    pub citations: Vec<String>,
    /// Token accounting
    pub usage: Usage,
    /// Model that served the request
    pub model: String,
    /// Creation time
    pub created_at: Option<Timestamp>,
    /// Backend configuration fingerprint
    pub system_fingerprint: String,
}

impl ChatResponse {
    /// Whether the response carries any tool calls
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Tool calls the caller must execute
    pub fn client_tool_calls(&self) -> impl Iterator<Item = &ToolCallInfo> {
        self.tool_calls.iter().filter(|call| call.is_client_side())
    }
}

/// One pull from a response stream
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatChunk {
    /// Response identifier
    pub id: String,
    /// Incremental text
    pub delta: String,
    /// Incremental reasoning text
    pub reasoning_delta: String,
    /// Tool calls touched by this fragment, reconciled with earlier fragments
    pub tool_calls: Vec<ToolCallInfo>,
    /// Set on the terminal chunk only
    pub finish_reason: Option<FinishReason>,
    /// Populated on the terminal chunk
    pub citations: Vec<String>,
    /// Latest usage snapshot
    pub usage: Usage,
    /// Model that served the request
    pub model: String,
}

impl ChatChunk {
    /// Whether this chunk ends the response
    pub const fn is_terminal(&self) -> bool {
        self.finish_reason.is_some()
    }
}
