//! In-memory content service
//!
//! Plays the backend for tests: assigns ids, applies a moderation policy,
//! re-checks authorization for the acting viewer, cascades deletes, and
//! records every request it receives.

use super::{CommentService, ServiceAck, ServiceRequest};
use crate::comment::{Comment, ModerationAction, ModerationState, NewComment};
use crate::error::{Result, ThreadError};
use crate::types::{CommentId, PostId};
use crate::viewer::ViewerContext;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard};

/// Initial state given to new comments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModerationPolicy {
    /// New comments wait for a moderator
    PreModerate,
    /// New comments are visible immediately
    AutoApprove,
}

impl ModerationPolicy {
    fn initial_state(&self) -> ModerationState {
        match self {
            ModerationPolicy::PreModerate => ModerationState::Pending,
            ModerationPolicy::AutoApprove => ModerationState::Approved,
        }
    }
}

struct MemoryState {
    comments: Vec<Comment>,
    next_id: u64,
    clock: DateTime<Utc>,
    acting: ViewerContext,
    policy: ModerationPolicy,
    requests: Vec<ServiceRequest>,
    failures: VecDeque<(u16, String)>,
    list_failures: VecDeque<(u16, String)>,
    unavailable: bool,
}

/// In-memory comment service
pub struct MemoryCommentService {
    state: Mutex<MemoryState>,
}

impl MemoryCommentService {
    /// Create an empty service that auto-approves and treats callers as guests
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                comments: Vec::new(),
                next_id: 1,
                clock: Utc
                    .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
                    .single()
                    .unwrap_or_else(Utc::now),
                acting: ViewerContext::guest(),
                policy: ModerationPolicy::AutoApprove,
                requests: Vec::new(),
                failures: VecDeque::new(),
                list_failures: VecDeque::new(),
                unavailable: false,
            }),
        }
    }

    /// Set who the service believes is calling
    pub fn acting_as(self, viewer: ViewerContext) -> Self {
        self.set_acting(viewer);
        self
    }

    /// Set the moderation policy for new comments
    pub fn with_policy(self, policy: ModerationPolicy) -> Self {
        self.lock().policy = policy;
        self
    }

    /// Seed existing comments (flat, each with its `parent_id`)
    pub fn with_comments(self, comments: impl IntoIterator<Item = Comment>) -> Self {
        {
            let mut state = self.lock();
            for mut comment in comments {
                comment.replies.clear();
                state.next_id = state.next_id.max(comment.id.get() + 1);
                state.clock = state.clock.max(comment.created_at);
                state.comments.push(comment);
            }
        }
        self
    }

    pub fn set_acting(&self, viewer: ViewerContext) {
        self.lock().acting = viewer;
    }

    /// Make the next request fail with this status
    pub fn fail_next(&self, status: u16, message: impl Into<String>) {
        self.lock().failures.push_back((status, message.into()));
    }

    /// Make the next list request fail with this status. Mutations still
    /// go through, so a refresh after a successful change can be failed.
    pub fn fail_next_list(&self, status: u16, message: impl Into<String>) {
        self.lock().list_failures.push_back((status, message.into()));
    }

    /// Simulate the service being unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Every request received so far, in order
    pub fn requests(&self) -> Vec<ServiceRequest> {
        self.lock().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    /// Current stored copy of a comment
    pub fn comment(&self, id: CommentId) -> Option<Comment> {
        self.lock().comments.iter().find(|c| c.id == id).cloned()
    }

    pub fn comment_count(&self) -> usize {
        self.lock().comments.len()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the request and apply injected failures
    fn receive(&self, request: &ServiceRequest) -> Result<MutexGuard<'_, MemoryState>> {
        let mut state = self.lock();
        state.requests.push(request.clone());
        if state.unavailable {
            return Err(ThreadError::Transport("connection refused".to_string()));
        }

        let list_failure = if request.is_mutation() {
            None
        } else {
            state.list_failures.pop_front()
        };
        if let Some((status, message)) = list_failure.or_else(|| state.failures.pop_front()) {
            return Err(ThreadError::from_status(request.to_string(), status, message));
        }
        Ok(state)
    }
}

impl Default for MemoryCommentService {
    fn default() -> Self {
        Self::new()
    }
}

fn forbidden(request: &ServiceRequest) -> ThreadError {
    ThreadError::from_status(request.to_string(), 403, "This action is unauthorized.")
}

fn not_found(request: &ServiceRequest) -> ThreadError {
    ThreadError::from_status(request.to_string(), 404, "Comment not found.")
}

#[async_trait]
impl CommentService for MemoryCommentService {
    async fn list_comments(&self, post_id: PostId) -> Result<Vec<Comment>> {
        let state = self.receive(&ServiceRequest::List { post_id })?;
        Ok(state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn create_comment(&self, post_id: PostId, comment: &NewComment) -> Result<ServiceAck> {
        let request = ServiceRequest::Create {
            post_id,
            comment: comment.clone(),
        };
        let mut state = self.receive(&request)?;

        let author = state
            .acting
            .user
            .clone()
            .ok_or_else(|| ThreadError::from_status(request.to_string(), 401, "Unauthenticated."))?;

        if comment.comment.trim().is_empty() {
            return Err(ThreadError::from_status(
                request.to_string(),
                422,
                "The comment field is required.",
            ));
        }

        if let Some(parent_id) = comment.parent_id {
            let parent_ok = state
                .comments
                .iter()
                .any(|c| c.id == parent_id && c.post_id == post_id);
            if !parent_ok {
                return Err(ThreadError::from_status(
                    request.to_string(),
                    422,
                    "The selected parent id is invalid.",
                ));
            }
        }

        let id = CommentId(state.next_id);
        state.next_id += 1;
        state.clock = state.clock + Duration::minutes(1);

        let stored = Comment {
            id,
            body: comment.comment.clone(),
            author_id: author.id,
            author_name: author.name,
            post_id,
            parent_id: comment.parent_id,
            created_at: state.clock,
            moderation_state: state.policy.initial_state(),
            replies: Vec::new(),
        };
        state.comments.push(stored);

        Ok(ServiceAck::with_message("Comment added successfully."))
    }

    async fn delete_comment(&self, post_id: PostId, comment_id: CommentId) -> Result<ServiceAck> {
        let request = ServiceRequest::Delete {
            post_id,
            comment_id,
        };
        let mut state = self.receive(&request)?;

        let target = state
            .comments
            .iter()
            .find(|c| c.id == comment_id && c.post_id == post_id)
            .ok_or_else(|| not_found(&request))?;

        if !state.acting.can_delete(target) {
            return Err(forbidden(&request));
        }

        // cascade through every descendant
        let mut doomed: HashSet<CommentId> = HashSet::from([comment_id]);
        loop {
            let before = doomed.len();
            for c in &state.comments {
                if c.parent_id.map_or(false, |p| doomed.contains(&p)) {
                    doomed.insert(c.id);
                }
            }
            if doomed.len() == before {
                break;
            }
        }
        state.comments.retain(|c| !doomed.contains(&c.id));

        Ok(ServiceAck::with_message("Comment deleted."))
    }

    async fn moderate_comment(
        &self,
        comment_id: CommentId,
        action: ModerationAction,
    ) -> Result<ServiceAck> {
        let request = ServiceRequest::Moderate { comment_id, action };
        let mut state = self.receive(&request)?;

        if !state.acting.can_moderate() {
            return Err(forbidden(&request));
        }

        let comment = state
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .ok_or_else(|| not_found(&request))?;
        comment.set_state(action.target_state());

        Ok(ServiceAck::with_message(format!(
            "Comment {}.",
            action.target_state().to_string().to_lowercase()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::CommentBuilder;

    fn seeded() -> MemoryCommentService {
        let parent = CommentBuilder::new(PostId(1))
            .id(1)
            .author(10, "author")
            .body("parent")
            .approved()
            .build()
            .unwrap();
        let child = CommentBuilder::new(PostId(1))
            .id(2)
            .author(11, "other")
            .body("child")
            .reply_to(1)
            .approved()
            .build()
            .unwrap();
        let grandchild = CommentBuilder::new(PostId(1))
            .id(3)
            .author(12, "third")
            .body("grandchild")
            .reply_to(2)
            .build()
            .unwrap();
        MemoryCommentService::new().with_comments([parent, child, grandchild])
    }

    #[tokio::test]
    async fn test_create_assigns_author_and_policy() {
        let service = seeded()
            .acting_as(ViewerContext::member(20, "dana"))
            .with_policy(ModerationPolicy::PreModerate);

        service
            .create_comment(PostId(1), &NewComment::reply("me too", CommentId(1)))
            .await
            .unwrap();

        let created = service.comment(CommentId(4)).unwrap();
        assert_eq!(created.author_name, "dana");
        assert_eq!(created.parent_id, Some(CommentId(1)));
        assert_eq!(created.moderation_state, ModerationState::Pending);
    }

    #[tokio::test]
    async fn test_guest_create_is_unauthenticated() {
        let service = seeded();
        let err = service
            .create_comment(PostId(1), &NewComment::top_level("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, ThreadError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_reply_to_other_post_rejected() {
        let service = seeded().acting_as(ViewerContext::member(20, "dana"));
        let err = service
            .create_comment(PostId(2), &NewComment::reply("x", CommentId(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, ThreadError::Validation(ref m) if m == "The selected parent id is invalid."));
    }

    #[tokio::test]
    async fn test_delete_enforces_ownership_and_cascades() {
        let service = seeded().acting_as(ViewerContext::member(11, "other"));

        let err = service
            .delete_comment(PostId(1), CommentId(1))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Not allowed to DELETE /posts/1/comments/1: This action is unauthorized."
        );

        service.delete_comment(PostId(1), CommentId(2)).await.unwrap();
        assert_eq!(service.comment_count(), 1);
        assert!(service.comment(CommentId(3)).is_none());
    }

    #[tokio::test]
    async fn test_moderation_requires_admin() {
        let service = seeded().acting_as(ViewerContext::member(10, "author"));
        assert!(matches!(
            service.approve_comment(CommentId(3)).await,
            Err(ThreadError::Unauthorized { .. })
        ));

        service.set_acting(ViewerContext::admin(1, "root"));
        service.approve_comment(CommentId(3)).await.unwrap();
        service.approve_comment(CommentId(3)).await.unwrap();
        assert_eq!(
            service.comment(CommentId(3)).unwrap().moderation_state,
            ModerationState::Approved
        );
    }

    #[tokio::test]
    async fn test_injected_failures_and_request_log() {
        let service = seeded();
        service.fail_next(500, "Server Error");

        assert!(service.list_comments(PostId(1)).await.is_err());
        assert_eq!(service.list_comments(PostId(1)).await.unwrap().len(), 3);

        service.set_unavailable(true);
        assert!(matches!(
            service.list_comments(PostId(1)).await,
            Err(ThreadError::Transport(_))
        ));

        assert_eq!(service.requests().len(), 3);
    }

    #[tokio::test]
    async fn test_list_failure_spares_mutations() {
        let service = seeded().acting_as(ViewerContext::admin(1, "root"));
        service.fail_next_list(503, "Service Unavailable");

        service.reject_comment(CommentId(2)).await.unwrap();
        assert!(matches!(
            service.list_comments(PostId(1)).await,
            Err(ThreadError::Service { status: 503, .. })
        ));
        assert_eq!(service.list_comments(PostId(1)).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_missing_comment_is_not_found() {
        let service = seeded().acting_as(ViewerContext::admin(1, "root"));
        let err = service.delete_comment(PostId(1), CommentId(99)).await.unwrap_err();
        assert!(matches!(err, ThreadError::Service { status: 404, .. }));
    }
}
