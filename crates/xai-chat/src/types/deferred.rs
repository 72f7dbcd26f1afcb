//! Deferred completion status as seen by a single poll

use super::response::ChatResponse;

/// Lifecycle state of a deferred completion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredStatus {
    /// Still processing
    Pending,
    /// Finished; the response is available
    Completed,
    /// Finished without a response
    Failed,
}

impl DeferredStatus {
    /// Whether the completion has left `Pending`
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Observed state of a deferred completion
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredCompletion {
    /// Identifier returned when the completion was started
    pub request_id: String,
    /// Current state
    pub status: DeferredStatus,
    /// Present once `Completed`
    pub response: Option<ChatResponse>,
    /// Service-reported reason, present once `Failed`
    pub error_message: Option<String>,
}

impl DeferredCompletion {
    /// Still processing
    pub fn pending(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            status: DeferredStatus::Pending,
            response: None,
            error_message: None,
        }
    }

    /// Finished with a response
    pub fn completed(request_id: impl Into<String>, response: Option<ChatResponse>) -> Self {
        Self {
            request_id: request_id.into(),
            status: DeferredStatus::Completed,
            response,
            error_message: None,
        }
    }

    /// Finished with a failure reason
    pub fn failed(request_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            status: DeferredStatus::Failed,
            response: None,
            error_message: Some(reason.into()),
        }
    }
}
