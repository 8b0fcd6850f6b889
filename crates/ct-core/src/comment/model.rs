//! Comment data models

use crate::types::{CommentId, PostId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A user-authored comment attached to a post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment identifier
    pub id: CommentId,
    /// Comment content
    #[serde(alias = "comment")]
    pub body: String,
    /// Who wrote it
    pub author_id: UserId,
    pub author_name: String,
    /// Post the comment is attached to
    pub post_id: PostId,
    /// Comment this one replies to; `None` for top-level comments
    #[serde(default)]
    pub parent_id: Option<CommentId>,
    /// When the comment was created
    pub created_at: DateTime<Utc>,
    /// Approval status
    #[serde(default, alias = "status")]
    pub moderation_state: ModerationState,
    /// Child comments in chronological order
    #[serde(default)]
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Number of comments beneath this one, at any depth
    pub fn descendant_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&Comment> = self.replies.iter().collect();
        while let Some(comment) = stack.pop() {
            count += 1;
            stack.extend(comment.replies.iter());
        }
        count
    }

    /// Find a comment in this subtree (including self)
    pub fn find(&self, id: CommentId) -> Option<&Comment> {
        let mut stack = vec![self];
        while let Some(comment) = stack.pop() {
            if comment.id == id {
                return Some(comment);
            }
            stack.extend(comment.replies.iter().rev());
        }
        None
    }

    /// Find a mutable comment in this subtree (including self)
    pub fn find_mut(&mut self, id: CommentId) -> Option<&mut Comment> {
        let mut stack = vec![self];
        while let Some(comment) = stack.pop() {
            if comment.id == id {
                return Some(comment);
            }
            stack.extend(comment.replies.iter_mut().rev());
        }
        None
    }

    /// Change the moderation state
    pub fn set_state(&mut self, state: ModerationState) {
        self.moderation_state = state;
    }

    /// Short single-line preview of the body
    pub fn preview(&self, max_chars: usize) -> String {
        let line = self.body.lines().next().unwrap_or("").trim();
        if line.chars().count() > max_chars {
            let truncated: String = line.chars().take(max_chars).collect();
            format!("{}...", truncated)
        } else {
            line.to_string()
        }
    }
}

/// Approval status of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationState {
    /// Awaiting a moderator
    Pending,
    /// Visible to everyone
    Approved,
    /// Hidden from regular viewers
    Rejected,
}

impl Default for ModerationState {
    fn default() -> Self {
        ModerationState::Pending
    }
}

impl ModerationState {
    /// Whether regular viewers may see the comment
    pub fn is_public(&self) -> bool {
        matches!(self, ModerationState::Approved)
    }
}

impl fmt::Display for ModerationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModerationState::Pending => write!(f, "Pending"),
            ModerationState::Approved => write!(f, "Approved"),
            ModerationState::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Moderation transition requested by an admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModerationAction {
    Approve,
    Reject,
}

impl ModerationAction {
    /// State the comment ends up in
    pub fn target_state(&self) -> ModerationState {
        match self {
            ModerationAction::Approve => ModerationState::Approved,
            ModerationAction::Reject => ModerationState::Rejected,
        }
    }

    /// Path segment used by the admin endpoints
    pub fn verb(&self) -> &'static str {
        match self {
            ModerationAction::Approve => "approve",
            ModerationAction::Reject => "reject",
        }
    }
}

impl fmt::Display for ModerationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Payload of a comment submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewComment {
    /// Body text; the content service calls this field `comment`
    pub comment: String,
    /// Comment being replied to; serialized as `null` for top-level comments
    pub parent_id: Option<CommentId>,
}

impl NewComment {
    pub fn top_level(body: impl Into<String>) -> Self {
        Self {
            comment: body.into(),
            parent_id: None,
        }
    }

    pub fn reply(body: impl Into<String>, parent_id: CommentId) -> Self {
        Self {
            comment: body.into(),
            parent_id: Some(parent_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_comment(id: u64, parent: Option<u64>) -> Comment {
        Comment {
            id: CommentId(id),
            body: "Test comment".to_string(),
            author_id: UserId(1),
            author_name: "alice".to_string(),
            post_id: PostId(1),
            parent_id: parent.map(CommentId),
            created_at: Utc::now(),
            moderation_state: ModerationState::Approved,
            replies: vec![],
        }
    }

    #[test]
    fn test_top_level_and_reply() {
        assert!(create_test_comment(1, None).is_top_level());
        assert!(create_test_comment(2, Some(1)).is_reply());
    }

    #[test]
    fn test_find_in_subtree() {
        let mut root = create_test_comment(1, None);
        let mut child = create_test_comment(2, Some(1));
        child.replies.push(create_test_comment(3, Some(2)));
        root.replies.push(child);

        assert_eq!(root.descendant_count(), 2);
        assert_eq!(root.find(CommentId(3)).map(|c| c.id), Some(CommentId(3)));
        assert!(root.find(CommentId(9)).is_none());

        root.find_mut(CommentId(3))
            .unwrap()
            .set_state(ModerationState::Rejected);
        assert_eq!(
            root.find(CommentId(3)).unwrap().moderation_state,
            ModerationState::Rejected
        );
    }

    #[test]
    fn test_deep_subtree_search() {
        let mut root = create_test_comment(0, None);
        for id in (1..=50_000).rev() {
            let mut reply = create_test_comment(id, Some(id - 1));
            reply.replies = std::mem::take(&mut root.replies);
            root.replies.push(reply);
        }

        assert_eq!(root.descendant_count(), 50_000);
        assert!(root.find(CommentId(50_000)).is_some());
        root.find_mut(CommentId(49_999))
            .unwrap()
            .set_state(ModerationState::Pending);

        // drop one level at a time
        let mut stack = vec![root];
        while let Some(mut comment) = stack.pop() {
            stack.append(&mut comment.replies);
        }
    }

    #[test]
    fn test_moderation_state() {
        assert!(ModerationState::Approved.is_public());
        assert!(!ModerationState::Pending.is_public());
        assert!(!ModerationState::Rejected.is_public());
        assert_eq!(ModerationState::default(), ModerationState::Pending);
    }

    #[test]
    fn test_moderation_action_target() {
        assert_eq!(ModerationAction::Approve.target_state(), ModerationState::Approved);
        assert_eq!(ModerationAction::Reject.target_state(), ModerationState::Rejected);
        assert_eq!(ModerationAction::Reject.verb(), "reject");
    }

    #[test]
    fn test_new_comment_payload() {
        let json = serde_json::to_value(NewComment::top_level("Great post!")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "comment": "Great post!", "parent_id": null })
        );

        let json = serde_json::to_value(NewComment::reply("Agreed", CommentId(42))).unwrap();
        assert_eq!(json["parent_id"], 42);
    }

    #[test]
    fn test_deserialize_service_shape() {
        let json = r#"{
            "id": 7,
            "comment": "First!",
            "author_id": 3,
            "author_name": "bob",
            "post_id": 1,
            "parent_id": null,
            "created_at": "2024-05-01T10:00:00Z",
            "status": "approved"
        }"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.body, "First!");
        assert_eq!(comment.moderation_state, ModerationState::Approved);
        assert!(comment.replies.is_empty());
    }

    #[test]
    fn test_preview_truncates() {
        let mut comment = create_test_comment(1, None);
        comment.body = "abcdefghij\nsecond line".to_string();
        assert_eq!(comment.preview(4), "abcd...");
        assert_eq!(comment.preview(20), "abcdefghij");
    }
}
