//! Flattened, viewer-specific view of a comment tree

use crate::comment::{Comment, CommentTree, ModerationState};
use crate::types::{CommentId, UserId};
use crate::viewer::ViewerContext;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Actions the viewer may take on one comment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Affordances {
    pub reply: bool,
    pub delete: bool,
    pub approve: bool,
    pub reject: bool,
}

impl Affordances {
    pub fn for_comment(viewer: &ViewerContext, comment: &Comment) -> Self {
        Self {
            reply: viewer.can_comment(),
            delete: viewer.can_delete(comment),
            approve: viewer.can_moderate(),
            reject: viewer.can_moderate(),
        }
    }
}

/// One line of the rendered thread
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedComment {
    /// Nesting level, 0 for top-level comments
    pub depth: usize,
    pub id: CommentId,
    pub parent_id: Option<CommentId>,
    pub author_id: UserId,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub state: ModerationState,
    /// Written by the viewer
    pub own: bool,
    pub affordances: Affordances,
}

/// Visible comments in render order: each comment followed by its replies
pub fn render_thread(tree: &CommentTree, viewer: &ViewerContext) -> Vec<RenderedComment> {
    tree.visible_to(viewer)
        .walk()
        .into_iter()
        .map(|(depth, comment)| RenderedComment {
            depth,
            id: comment.id,
            parent_id: comment.parent_id,
            author_id: comment.author_id,
            author_name: comment.author_name.clone(),
            body: comment.body.clone(),
            created_at: comment.created_at,
            state: comment.moderation_state,
            own: viewer.is_author_of(comment),
            affordances: Affordances::for_comment(viewer, comment),
        })
        .collect()
}
