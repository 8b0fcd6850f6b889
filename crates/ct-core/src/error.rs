//! Error types for comment-thread

use crate::types::{CommentId, PostId};
use thiserror::Error;

/// Main error type for comment-thread
#[derive(Debug, Error)]
pub enum ThreadError {
    /// Submission rejected before dispatch
    #[error("Validation error: {0}")]
    Validation(String),

    /// Viewer lacks the rights for an action
    #[error("Not allowed to {action}: {reason}")]
    Unauthorized { action: String, reason: String },

    /// Comment not found
    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    /// Comment attached to a different post than expected
    #[error("Comment {comment} belongs to post {found}, expected post {expected}")]
    PostMismatch {
        comment: CommentId,
        expected: PostId,
        found: PostId,
    },

    /// The same form is already being submitted
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// Confirm was requested with no pending action
    #[error("No action is awaiting confirmation")]
    NothingToConfirm,

    /// Non-success response from the content service
    #[error("Service responded with {status}: {message}")]
    Service { status: u16, message: String },

    /// Network failure talking to the content service
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ThreadError>,
    },
}

impl ThreadError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ThreadError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Shorthand for an authorization failure
    pub fn unauthorized(action: impl Into<String>, reason: impl Into<String>) -> Self {
        ThreadError::Unauthorized {
            action: action.into(),
            reason: reason.into(),
        }
    }

    /// Map a non-success status of the content service. 401 and 403 are
    /// authorization failures, 422 a validation failure.
    pub fn from_status(request: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => ThreadError::unauthorized(request, message),
            422 => ThreadError::Validation(message),
            _ => ThreadError::Service { status, message },
        }
    }

    /// The innermost error, skipping context wrappers
    pub fn root(&self) -> &ThreadError {
        match self {
            ThreadError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether the failure was caught before any request was issued
    pub fn is_local(&self) -> bool {
        matches!(
            self.root(),
            ThreadError::Validation(_)
                | ThreadError::Unauthorized { .. }
                | ThreadError::CommentNotFound(_)
                | ThreadError::PostMismatch { .. }
                | ThreadError::SubmissionInFlight
                | ThreadError::NothingToConfirm
        )
    }
}

/// Result type alias for comment-thread
pub type Result<T> = std::result::Result<T, ThreadError>;
