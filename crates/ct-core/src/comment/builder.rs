//! Comment builder for fluent API

use super::model::{Comment, ModerationState};
use crate::error::{Result, ThreadError};
use crate::types::{CommentId, PostId, UserId};
use chrono::{DateTime, Utc};

/// Builder for creating comments with fluent API
pub struct CommentBuilder {
    post_id: PostId,
    id: Option<CommentId>,
    body: Option<String>,
    author: Option<(UserId, String)>,
    parent_id: Option<CommentId>,
    created_at: Option<DateTime<Utc>>,
    state: ModerationState,
}

impl CommentBuilder {
    /// Create a new builder for a comment on the given post
    pub fn new(post_id: PostId) -> Self {
        Self {
            post_id,
            id: None,
            body: None,
            author: None,
            parent_id: None,
            created_at: None,
            state: ModerationState::Pending,
        }
    }

    /// Set the comment id
    pub fn id(mut self, id: u64) -> Self {
        self.id = Some(CommentId(id));
        self
    }

    /// Set the body text
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the author
    pub fn author(mut self, id: u64, name: impl Into<String>) -> Self {
        self.author = Some((UserId(id), name.into()));
        self
    }

    /// Make this a reply to another comment
    pub fn reply_to(mut self, parent_id: u64) -> Self {
        self.parent_id = Some(CommentId(parent_id));
        self
    }

    /// Set the creation time (defaults to now)
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Set the moderation state
    pub fn state(mut self, state: ModerationState) -> Self {
        self.state = state;
        self
    }

    /// Shorthand for an approved comment
    pub fn approved(self) -> Self {
        self.state(ModerationState::Approved)
    }

    /// Build the comment
    pub fn build(self) -> Result<Comment> {
        let id = self
            .id
            .ok_or_else(|| ThreadError::Validation("Comment id is required".to_string()))?;

        let body = self
            .body
            .ok_or_else(|| ThreadError::Validation("Comment body is required".to_string()))?;

        if body.trim().is_empty() {
            return Err(ThreadError::Validation(
                "Comment body cannot be empty".to_string(),
            ));
        }

        let (author_id, author_name) = self
            .author
            .ok_or_else(|| ThreadError::Validation("Comment author is required".to_string()))?;

        Ok(Comment {
            id,
            body,
            author_id,
            author_name,
            post_id: self.post_id,
            parent_id: self.parent_id,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            moderation_state: self.state,
            replies: Vec::new(),
        })
    }
}
