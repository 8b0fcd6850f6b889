//! Comment system module
//!
//! Handles the comment model, tree assembly, and submission validation.

pub mod model;
pub mod tree;
pub mod validator;
pub mod builder;

pub use model::*;
pub use tree::{CommentTree, ThreadStats, DEPTH_LIMIT, MAX_REPLY_DEPTH};
pub use validator::CommentValidator;
pub use builder::CommentBuilder;
