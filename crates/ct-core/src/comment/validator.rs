//! Comment validation

use super::model::NewComment;
use super::tree::CommentTree;
use crate::error::{Result, ThreadError};
use crate::types::CommentId;

/// Maximum comment length (default)
pub const MAX_COMMENT_LENGTH: usize = 2000;

/// Minimum comment length
pub const MIN_COMMENT_LENGTH: usize = 1;

/// Validator for comment submissions
#[derive(Debug, Clone)]
pub struct CommentValidator {
    max_length: usize,
    min_length: usize,
}

impl CommentValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self {
            max_length: MAX_COMMENT_LENGTH,
            min_length: MIN_COMMENT_LENGTH,
        }
    }

    /// Create a new validator with custom max length
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length,
            min_length: MIN_COMMENT_LENGTH,
        }
    }

    /// Validate comment body
    pub fn validate_body(&self, body: &str) -> Result<()> {
        let trimmed = body.trim();
        let len = trimmed.chars().count();

        if len < self.min_length {
            return Err(ThreadError::Validation(
                "Comment body cannot be empty".to_string(),
            ));
        }

        if len > self.max_length {
            return Err(ThreadError::Validation(format!(
                "Comment body exceeds maximum length of {} characters",
                self.max_length
            )));
        }

        Ok(())
    }

    /// Validate that a reply target exists on the thread's post
    pub fn validate_parent(&self, parent_id: CommentId, tree: &CommentTree) -> Result<()> {
        let parent = tree
            .get(parent_id)
            .ok_or(ThreadError::CommentNotFound(parent_id))?;

        if parent.post_id != tree.post_id() {
            return Err(ThreadError::PostMismatch {
                comment: parent_id,
                expected: tree.post_id(),
                found: parent.post_id,
            });
        }

        Ok(())
    }

    /// Validate a complete submission against the current tree
    pub fn validate(&self, submission: &NewComment, tree: &CommentTree) -> Result<()> {
        self.validate_body(&submission.comment)?;

        if let Some(parent_id) = submission.parent_id {
            self.validate_parent(parent_id, tree)?;
        }

        Ok(())
    }
}

impl Default for CommentValidator {
    fn default() -> Self {
        Self::new()
    }
}
