//! Confirmation gate for destructive actions

use crate::types::{CommentId, PostId};
use std::fmt;

/// Action waiting for the user to confirm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Delete {
        post_id: PostId,
        comment_id: CommentId,
    },
}

impl fmt::Display for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PendingAction::Delete { comment_id, .. } => {
                write!(f, "delete comment {}", comment_id)
            }
        }
    }
}

/// Holds at most one action awaiting confirmation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfirmationGate {
    pending: Option<PendingAction>,
}

impl ConfirmationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an action, replacing any earlier one
    pub fn stage(&mut self, action: PendingAction) -> Option<PendingAction> {
        self.pending.replace(action)
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Hand over the staged action for execution
    pub fn take(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }

    /// Drop the staged action
    pub fn cancel(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }
}
