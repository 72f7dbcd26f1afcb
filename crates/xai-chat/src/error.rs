//! Error taxonomy and transport status translation
//!
//! Every transport failure is converted into an [`Error`] carrying a closed
//! [`ErrorKind`]. Callers branch on the kind; the message is for humans.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tonic::{Code, Status};

/// Client-wide result type
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Metadata key carrying a retry hint in whole seconds
const RETRY_AFTER_KEY: &str = "retry-after";

/// Category of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Anything not covered below
    Unknown,
    /// Credential rejected or insufficient permission
    Auth,
    /// Throughput quota exceeded
    RateLimit,
    /// Malformed input, unmet precondition, or unimplemented method
    InvalidRequest,
    /// Referenced resource does not exist
    NotFound,
    /// Remote-side failure, including data loss
    ServerError,
    /// Transient unreachability, including aborted transactions
    Unavailable,
    /// Deadline exceeded, from the transport or a bounded wait
    Timeout,
    /// Caller-initiated cancellation
    Canceled,
    /// Account quota, credits, or spending limit exhausted
    ResourceExhausted,
}

impl ErrorKind {
    /// Stable identifier for logs and metrics
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown_error",
            Self::Auth => "authentication_error",
            Self::RateLimit => "rate_limit_error",
            Self::InvalidRequest => "invalid_request_error",
            Self::NotFound => "not_found_error",
            Self::ServerError => "server_error",
            Self::Unavailable => "unavailable_error",
            Self::Timeout => "timeout_error",
            Self::Canceled => "canceled_error",
            Self::ResourceExhausted => "resource_exhausted_error",
        }
    }

    /// Whether repeating the same call may succeed
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::RateLimit | Self::Unavailable | Self::Timeout | Self::ServerError)
    }

    /// Kind for a transport status code, ignoring the message
    pub const fn from_code(code: Code) -> Self {
        match code {
            Code::Unauthenticated | Code::PermissionDenied => Self::Auth,
            Code::ResourceExhausted => Self::RateLimit,
            Code::InvalidArgument | Code::FailedPrecondition | Code::OutOfRange | Code::Unimplemented => {
                Self::InvalidRequest
            }
            Code::NotFound => Self::NotFound,
            Code::Internal | Code::DataLoss => Self::ServerError,
            Code::Unavailable | Code::Aborted => Self::Unavailable,
            Code::DeadlineExceeded => Self::Timeout,
            Code::Cancelled => Self::Canceled,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure returned by every client operation
///
/// Equality compares [`ErrorKind`] only, so `err == ErrorKind::RateLimit`
/// holds regardless of message or cause.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    retry_after: Option<Duration>,
    status_code: Option<Code>,
    #[source]
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create an error of the given kind
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retry_after: None,
            status_code: None,
            source: None,
        }
    }

    /// Deadline elapsed before the operation finished
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Caller cancelled the operation
    pub fn canceled() -> Self {
        Self::new(ErrorKind::Canceled, "operation canceled")
    }

    /// Translate a transport status
    pub fn from_status(status: Status) -> Self {
        let code = status.code();
        let kind = classify(code, status.message());

        let message = match (code, kind) {
            (Code::Unauthenticated, _) => format!("authentication failed: {}", status.message()),
            (Code::PermissionDenied, _) => format!("permission denied: {}", status.message()),
            (Code::ResourceExhausted, ErrorKind::ResourceExhausted) => {
                format!("resource exhausted: {}", status.message())
            }
            (Code::ResourceExhausted, _) => format!("rate limit exceeded: {}", status.message()),
            (Code::Unimplemented, _) => format!("method not implemented: {}", status.message()),
            _ => status.message().to_owned(),
        };

        let retry_after = if matches!(kind, ErrorKind::RateLimit | ErrorKind::ResourceExhausted) {
            retry_after_hint(&status)
        } else {
            None
        };

        Self {
            kind,
            message,
            retry_after,
            status_code: Some(code),
            source: Some(Arc::new(status)),
        }
    }

    /// Attach a retry hint
    #[must_use]
    pub const fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }

    /// Attach an underlying cause
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Prefix the message with context, keeping kind, hint and cause
    #[must_use]
    pub fn with_context(mut self, context: &str) -> Self {
        self.message = format!("{context}: {}", self.message);
        self
    }

    /// Failure category
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Human-readable description
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Suggested wait before retrying, when the service provided one
    pub const fn retry_after(&self) -> Option<Duration> {
        self.retry_after
    }

    /// Original transport code, when the error came from the transport
    pub const fn status_code(&self) -> Option<Code> {
        self.status_code
    }

    /// Whether repeating the call may succeed
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Shorthand for `kind() == kind`
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }
}

impl From<Status> for Error {
    fn from(status: Status) -> Self {
        Self::from_status(status)
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl PartialEq<ErrorKind> for Error {
    fn eq(&self, other: &ErrorKind) -> bool {
        self.kind == *other
    }
}

/// Translate an optional transport failure, passing "no error" through
pub fn translate(status: Option<Status>) -> Option<Error> {
    status.map(Error::from_status)
}

fn classify(code: Code, message: &str) -> ErrorKind {
    if code == Code::ResourceExhausted && names_account_quota(message) {
        return ErrorKind::ResourceExhausted;
    }
    ErrorKind::from_code(code)
}

fn names_account_quota(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    ["quota", "credit", "spending limit"]
        .iter()
        .any(|needle| lowered.contains(needle))
}

fn retry_after_hint(status: &Status) -> Option<Duration> {
    status
        .metadata()
        .get(RETRY_AFTER_KEY)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
