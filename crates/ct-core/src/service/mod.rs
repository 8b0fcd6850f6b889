//! Content service abstraction
//!
//! The thread manager never talks to the network itself. It drives a
//! [`CommentService`], which in production is the HTTP client from
//! `ct-http` and in tests is [`memory::MemoryCommentService`].

use crate::comment::{Comment, ModerationAction, NewComment};
use crate::error::Result;
use crate::types::{CommentId, PostId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

#[cfg(test)]
pub mod memory;

/// Operations offered by the external content service
#[async_trait]
pub trait CommentService: Send + Sync {
    /// Every comment attached to a post, flat or nested
    async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>>;

    /// Create a comment or reply
    async fn create_comment(&self, post_id: PostId, comment: &NewComment) -> Result<ServiceAck>;

    /// Delete a comment
    async fn delete_comment(&self, post_id: PostId, comment_id: CommentId) -> Result<ServiceAck>;

    /// Apply a moderation transition
    async fn moderate_comment(
        &self,
        comment_id: CommentId,
        action: ModerationAction,
    ) -> Result<ServiceAck>;

    async fn approve_comment(&self, comment_id: CommentId) -> Result<ServiceAck> {
        self.moderate_comment(comment_id, ModerationAction::Approve).await
    }

    async fn reject_comment(&self, comment_id: CommentId) -> Result<ServiceAck> {
        self.moderate_comment(comment_id, ModerationAction::Reject).await
    }
}

/// Success indicator returned by mutating operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAck {
    #[serde(default)]
    pub message: Option<String>,
}

impl ServiceAck {
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

/// One request to the content service, with its endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceRequest {
    List {
        post_id: PostId,
    },
    Create {
        post_id: PostId,
        comment: NewComment,
    },
    Delete {
        post_id: PostId,
        comment_id: CommentId,
    },
    Moderate {
        comment_id: CommentId,
        action: ModerationAction,
    },
}

impl ServiceRequest {
    /// HTTP method of the endpoint
    pub fn method(&self) -> &'static str {
        match self {
            ServiceRequest::List { .. } => "GET",
            ServiceRequest::Create { .. } => "POST",
            ServiceRequest::Delete { .. } => "DELETE",
            ServiceRequest::Moderate { .. } => "PATCH",
        }
    }

    /// Endpoint path relative to the service base URL
    pub fn path(&self) -> String {
        match self {
            ServiceRequest::List { post_id } => format!("posts/{}", post_id),
            ServiceRequest::Create { post_id, .. } => format!("posts/{}/comments", post_id),
            ServiceRequest::Delete {
                post_id,
                comment_id,
            } => format!("posts/{}/comments/{}", post_id, comment_id),
            ServiceRequest::Moderate { comment_id, action } => {
                format!("admin/comments/{}/{}", comment_id, action.verb())
            }
        }
    }

    /// Whether the request changes server state
    pub fn is_mutation(&self) -> bool {
        !matches!(self, ServiceRequest::List { .. })
    }
}

impl fmt::Display for ServiceRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} /{}", self.method(), self.path())
    }
}
