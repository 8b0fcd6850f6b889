//! ct-core - Core library for comment-thread
//!
//! This crate provides the comment thread attached to a post: the comment
//! model and tree, viewer context and authorization, the reply and
//! confirmation workflow, and the manager that drives the external
//! content service.

pub mod error;
pub mod types;
pub mod config;
pub mod viewer;
pub mod comment;
pub mod service;
pub mod thread;
pub mod render;

pub use error::{Result, ThreadError};
pub use types::*;
pub use viewer::{Role, Viewer, ViewerContext};
pub use thread::CommentThreadManager;
