//! Error types shared across the skillgauge crates.
//!
//! Question-source errors are defined in `skillgauge-core` so the source
//! chain can classify failures (fall through or surface) without string
//! matching on provider-specific messages.

use thiserror::Error;

/// Errors that can occur when fetching or generating questions.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The model replied but produced no usable text.
    #[error("empty response from {0}")]
    EmptyResponse(String),

    /// The reply could not be parsed into questions.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Every source in the chain failed.
    #[error("all question sources failed for role '{role}'")]
    Exhausted { role: String },
}

impl SourceError {
    /// Returns `true` if this error is permanent for the failing source
    /// and a different source should be tried instead.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            SourceError::AuthenticationFailed(_) | SourceError::ModelNotFound(_)
        )
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            SourceError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// A question that cannot be scored as-is.
#[derive(Debug, Error)]
pub enum QuestionDataError {
    /// The question does not carry exactly four options.
    #[error("question '{id}' has {count} options, expected 4")]
    WrongOptionCount { id: String, count: usize },

    /// The correct-answer index points outside the option list.
    #[error("question '{id}' has correct-answer index {index} out of range")]
    AnswerOutOfRange { id: String, index: usize },
}

/// Errors raised by the attempt state machine.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// `start` was called on an attempt that already left `NotStarted`.
    #[error("attempt already started")]
    AlreadyStarted,

    /// An answer was recorded outside the `InProgress` window.
    #[error("attempt is not in progress")]
    NotInProgress,

    /// `submit` was called after the attempt already transitioned to
    /// `Submitted`; the stored result is unchanged.
    #[error("attempt already submitted")]
    AlreadySubmitted,
}
