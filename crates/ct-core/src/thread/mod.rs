//! Interaction state for a post's comment thread

pub mod confirm;
pub mod form;
pub mod manager;
pub mod notice;

pub use confirm::{ConfirmationGate, PendingAction};
pub use form::{CommentForm, ReplyPhase};
pub use manager::CommentThreadManager;
pub use notice::{NoticeLevel, Notification};
