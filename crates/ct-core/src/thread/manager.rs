//! Comment thread manager

use super::confirm::{ConfirmationGate, PendingAction};
use super::form::CommentForm;
use super::notice::Notification;
use crate::comment::{
    CommentTree, CommentValidator, ModerationAction, NewComment, ThreadStats, MAX_REPLY_DEPTH,
};
use crate::config::ThreadConfig;
use crate::error::{Result, ThreadError};
use crate::render::{render_thread, RenderedComment};
use crate::service::{CommentService, ServiceAck};
use crate::types::{CommentId, PostId};
use crate::viewer::ViewerContext;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Drives the comment thread of one post for one viewer.
///
/// Every mutation is a round trip to the content service followed by a full
/// reload of the comment list. Failures leave the displayed tree untouched,
/// queue an error [`Notification`] and are returned to the caller.
pub struct CommentThreadManager {
    post_id: PostId,
    viewer: ViewerContext,
    /// Content service backend
    service: Arc<dyn CommentService>,
    validator: CommentValidator,
    /// Last tree successfully loaded from the service
    tree: CommentTree,
    form: CommentForm,
    gate: ConfirmationGate,
    notices: Vec<Notification>,
}

impl CommentThreadManager {
    /// Create a manager with the given service
    pub fn new(
        post_id: PostId,
        viewer: ViewerContext,
        service: impl CommentService + 'static,
    ) -> Self {
        Self::with_service(post_id, viewer, Arc::new(service))
    }

    /// Create a manager with a shared service
    pub fn with_service(
        post_id: PostId,
        viewer: ViewerContext,
        service: Arc<dyn CommentService>,
    ) -> Self {
        Self {
            post_id,
            viewer,
            service,
            validator: CommentValidator::new(),
            tree: CommentTree::empty(post_id, MAX_REPLY_DEPTH),
            form: CommentForm::new(),
            gate: ConfirmationGate::new(),
            notices: Vec::new(),
        }
    }

    /// Apply depth and length limits. Takes effect on the next refresh.
    pub fn with_thread_config(mut self, config: &ThreadConfig) -> Self {
        self.validator = CommentValidator::with_max_length(config.max_comment_length);
        self.tree = CommentTree::empty(self.post_id, config.max_depth);
        self
    }

    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    pub fn viewer(&self) -> &ViewerContext {
        &self.viewer
    }

    /// Full tree as last loaded, regardless of visibility
    pub fn tree(&self) -> &CommentTree {
        &self.tree
    }

    /// Tree filtered for the viewer
    pub fn visible_tree(&self) -> CommentTree {
        self.tree.visible_to(&self.viewer)
    }

    /// Visible comments in render order with their affordances
    pub fn rendered(&self) -> Vec<RenderedComment> {
        render_thread(&self.tree, &self.viewer)
    }

    pub fn stats(&self) -> ThreadStats {
        self.visible_tree().stats()
    }

    pub fn form(&self) -> &CommentForm {
        &self.form
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.gate.pending()
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notices
    }

    /// Take queued notifications, oldest first
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notices)
    }

    /// Reload the comment list from the service
    pub async fn refresh(&mut self) -> Result<&CommentTree> {
        debug!("Loading comments for post {}", self.post_id);
        let loaded = self
            .service
            .list_comments(self.post_id)
            .await
            .and_then(|comments| {
                CommentTree::from_comments(self.post_id, comments, self.tree.max_depth())
            });

        match loaded {
            Ok(tree) => {
                debug!("Loaded {} comments for post {}", tree.len(), self.post_id);
                self.tree = tree;
                Ok(&self.tree)
            }
            Err(err) => self.fail("Failed to load comments", err),
        }
    }

    pub fn open_form(&mut self) {
        self.form.open();
    }

    pub fn close_form(&mut self) {
        self.form.close();
    }

    /// Start a reply to a comment in the thread
    pub fn reply_to(&mut self, parent_id: CommentId) -> Result<()> {
        let checked = self
            .viewer
            .ensure_can_comment()
            .and_then(|_| self.validator.validate_parent(parent_id, &self.tree));
        if let Err(err) = checked {
            return self.fail("Cannot reply", err);
        }
        debug!("Replying to comment {}", parent_id);
        self.form.start_reply(parent_id);
        Ok(())
    }

    pub fn cancel_reply(&mut self) {
        self.form.cancel_reply();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.form.set_body(body);
    }

    /// Validate the form and mark it in flight. The returned payload is
    /// what must be sent to the service; hand the outcome to
    /// [`finish_submit`](Self::finish_submit).
    pub fn begin_submit(&mut self) -> Result<NewComment> {
        if self.form.is_in_flight() {
            return self.fail("Failed to submit comment", ThreadError::SubmissionInFlight);
        }

        let submission = NewComment {
            comment: self.form.body().to_string(),
            parent_id: self.form.replying_to(),
        };
        let checked = self
            .viewer
            .ensure_can_comment()
            .and_then(|_| self.validator.validate(&submission, &self.tree));
        if let Err(err) = checked {
            return self.fail("Failed to submit comment", err);
        }

        self.form.begin_submit()
    }

    /// Apply the service's answer to a submission started with
    /// [`begin_submit`](Self::begin_submit)
    pub async fn finish_submit(&mut self, result: Result<ServiceAck>) -> Result<ServiceAck> {
        match result {
            Ok(ack) => {
                info!("Comment posted on post {}", self.post_id);
                self.form.submit_succeeded();
                self.succeed(&ack, "Comment posted");
                self.reload().await;
                Ok(ack)
            }
            Err(err) => {
                self.form.submit_failed();
                self.fail("Failed to submit comment", err)
            }
        }
    }

    /// Submit the form contents as a comment or reply
    pub async fn submit(&mut self) -> Result<ServiceAck> {
        let submission = self.begin_submit()?;
        let result = self.service.create_comment(self.post_id, &submission).await;
        self.finish_submit(result).await
    }

    /// Stage deletion of a comment. Nothing is sent until
    /// [`confirm_pending`](Self::confirm_pending).
    pub fn request_delete(&mut self, comment_id: CommentId) -> Result<PendingAction> {
        let checked = match self.tree.get(comment_id) {
            Some(comment) => self.viewer.ensure_can_delete(comment),
            None => Err(ThreadError::CommentNotFound(comment_id)),
        };
        if let Err(err) = checked {
            return self.fail("Failed to delete comment", err);
        }

        let action = PendingAction::Delete {
            post_id: self.post_id,
            comment_id,
        };
        if let Some(replaced) = self.gate.stage(action) {
            debug!("Replacing pending action: {}", replaced);
        }
        Ok(action)
    }

    /// Drop the staged action without sending anything
    pub fn cancel_pending(&mut self) -> Option<PendingAction> {
        self.gate.cancel()
    }

    /// Execute the staged action
    pub async fn confirm_pending(&mut self) -> Result<ServiceAck> {
        let Some(action) = self.gate.take() else {
            return self.fail("Nothing to confirm", ThreadError::NothingToConfirm);
        };

        match action {
            PendingAction::Delete {
                post_id,
                comment_id,
            } => {
                let result = self.service.delete_comment(post_id, comment_id).await;
                match result {
                    Ok(ack) => {
                        info!("Deleted comment {} on post {}", comment_id, post_id);
                        self.succeed(&ack, "Comment deleted");
                        if !self.reload().await {
                            // the subtree is gone server-side either way
                            if let Ok(removed) = self.tree.remove(comment_id) {
                                debug!("Pruned {} comments locally", removed);
                            }
                        }
                        if let Some(target) = self.form.replying_to() {
                            if !self.tree.contains(target) {
                                debug!("Reply target {} was deleted", target);
                                self.form.cancel_reply();
                            }
                        }
                        Ok(ack)
                    }
                    Err(err) => self.fail("Failed to delete comment", err),
                }
            }
        }
    }

    pub async fn approve(&mut self, comment_id: CommentId) -> Result<ServiceAck> {
        self.moderate(comment_id, ModerationAction::Approve).await
    }

    pub async fn reject(&mut self, comment_id: CommentId) -> Result<ServiceAck> {
        self.moderate(comment_id, ModerationAction::Reject).await
    }

    async fn moderate(
        &mut self,
        comment_id: CommentId,
        action: ModerationAction,
    ) -> Result<ServiceAck> {
        let what = format!("Failed to {} comment", action.verb());

        let checked = self
            .viewer
            .ensure_can_moderate(&format!("{} comment {}", action.verb(), comment_id))
            .and_then(|_| {
                if self.tree.contains(comment_id) {
                    Ok(())
                } else {
                    Err(ThreadError::CommentNotFound(comment_id))
                }
            });
        if let Err(err) = checked {
            return self.fail(&what, err);
        }

        let result = match action {
            ModerationAction::Approve => self.service.approve_comment(comment_id).await,
            ModerationAction::Reject => self.service.reject_comment(comment_id).await,
        };
        match result {
            Ok(ack) => {
                info!("Comment {} moved to {}", comment_id, action.target_state());
                self.succeed(&ack, &format!("Comment {}", action.target_state()));
                if !self.reload().await {
                    let _ = self.tree.set_state(comment_id, action.target_state());
                }
                Ok(ack)
            }
            Err(err) => self.fail(&what, err),
        }
    }

    /// Refresh after a successful mutation. The refresh reports its own
    /// failure, so only the outcome is returned.
    async fn reload(&mut self) -> bool {
        self.refresh().await.is_ok()
    }

    fn succeed(&mut self, ack: &ServiceAck, fallback: &str) {
        let message = ack.message.clone().unwrap_or_else(|| fallback.to_string());
        self.notices.push(Notification::success(message));
    }

    fn fail<T>(&mut self, what: &str, err: ThreadError) -> Result<T> {
        if err.is_local() {
            debug!("{}: {}", what, err);
        } else {
            warn!("{}: {}", what, err);
        }
        self.notices.push(Notification::from_error(what, &err));
        Err(err)
    }
}
