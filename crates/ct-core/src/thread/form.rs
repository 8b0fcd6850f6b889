//! Comment form and reply workflow
//!
//! Form visibility and the reply target are tracked separately: replying
//! opens the form with a target, opening the form directly leaves the target
//! unset, and closing the form clears both.

use crate::comment::NewComment;
use crate::error::{Result, ThreadError};
use crate::types::CommentId;

/// Where the reply workflow currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyPhase {
    /// No reply target selected
    Idle,
    /// A reply to `parent_id` is being written
    Composing { parent_id: CommentId },
}

/// State of the comment form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentForm {
    show_form: bool,
    replying_to: Option<CommentId>,
    body: String,
    in_flight: bool,
}

impl CommentForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.show_form
    }

    pub fn replying_to(&self) -> Option<CommentId> {
        self.replying_to
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn phase(&self) -> ReplyPhase {
        match self.replying_to {
            Some(parent_id) => ReplyPhase::Composing { parent_id },
            None => ReplyPhase::Idle,
        }
    }

    /// Show the form for a top-level comment
    pub fn open(&mut self) {
        self.show_form = true;
    }

    /// Hide the form and drop the reply target
    pub fn close(&mut self) {
        self.show_form = false;
        self.replying_to = None;
    }

    /// `Idle -> Composing`
    pub fn start_reply(&mut self, parent_id: CommentId) {
        self.replying_to = Some(parent_id);
        self.show_form = true;
    }

    /// `Composing -> Idle`; the form stays open
    pub fn cancel_reply(&mut self) {
        self.replying_to = None;
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    /// Mark the form in flight and produce the request payload
    pub(crate) fn begin_submit(&mut self) -> Result<NewComment> {
        if self.in_flight {
            return Err(ThreadError::SubmissionInFlight);
        }
        self.in_flight = true;
        Ok(NewComment {
            comment: self.body.clone(),
            parent_id: self.replying_to,
        })
    }

    /// Reset after the service accepted the comment. The form stays open for
    /// further top-level comments.
    pub(crate) fn submit_succeeded(&mut self) {
        self.in_flight = false;
        self.body.clear();
        self.replying_to = None;
    }

    /// Keep the input so the user can resubmit
    pub(crate) fn submit_failed(&mut self) {
        self.in_flight = false;
    }
}
