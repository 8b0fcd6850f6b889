//! ct-http - HTTP content service client for comment-thread
//!
//! This crate implements [`ct_core::service::CommentService`] against the
//! post and comment endpoints of the content service.

mod client;
mod payload;

pub use client::HttpCommentService;
pub use payload::{error_from_status, parse_ack, parse_comments};
