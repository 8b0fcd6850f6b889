//! Comment tree assembly
//!
//! The content service may hand back comments flat (every comment carries a
//! `parent_id`) or already nested. Both shapes normalize into a
//! [`CommentTree`] whose nesting never exceeds the configured depth:
//! comments nested deeper than `max_depth` are hoisted into the reply list
//! of their ancestor at depth `max_depth - 1`, in chronological order.
//! Their `parent_id` is kept as sent.

use super::model::{Comment, ModerationState};
use crate::error::{Result, ThreadError};
use crate::types::{CommentId, PostId};
use crate::viewer::ViewerContext;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Deepest reply level rendered by default. Top-level comments sit at
/// depth 0, so replies-to-replies collapse into their top-level ancestor.
pub const MAX_REPLY_DEPTH: usize = 1;

/// Largest accepted `max_depth`; larger values are clamped
pub const DEPTH_LIMIT: usize = 32;

/// The comment tree of one post
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentTree {
    post_id: PostId,
    max_depth: usize,
    roots: Vec<Comment>,
}

impl CommentTree {
    /// Create an empty tree
    pub fn empty(post_id: PostId, max_depth: usize) -> Self {
        Self {
            post_id,
            max_depth: max_depth.clamp(1, DEPTH_LIMIT),
            roots: Vec::new(),
        }
    }

    /// Assemble a tree from a flat or nested comment payload.
    ///
    /// Fails if a comment belongs to another post or an id repeats. Replies
    /// whose parent is absent from the payload cannot be placed and are
    /// dropped.
    pub fn from_comments(post_id: PostId, comments: Vec<Comment>, max_depth: usize) -> Result<Self> {
        let max_depth = max_depth.clamp(1, DEPTH_LIMIT);

        let mut flat: Vec<Comment> = Vec::new();
        for comment in comments {
            flatten_into(comment, &mut flat);
        }

        let mut position: HashMap<CommentId, usize> = HashMap::with_capacity(flat.len());
        for (idx, comment) in flat.iter().enumerate() {
            if comment.post_id != post_id {
                return Err(ThreadError::PostMismatch {
                    comment: comment.id,
                    expected: post_id,
                    found: comment.post_id,
                });
            }
            if position.insert(comment.id, idx).is_some() {
                return Err(ThreadError::Validation(format!(
                    "Duplicate comment id {} in payload",
                    comment.id
                )));
            }
        }

        let mut children: HashMap<CommentId, Vec<usize>> = HashMap::new();
        let mut root_idx = Vec::new();
        for (idx, comment) in flat.iter().enumerate() {
            match comment.parent_id {
                None => root_idx.push(idx),
                Some(parent) if position.contains_key(&parent) => {
                    children.entry(parent).or_default().push(idx);
                }
                Some(parent) => {
                    warn!(
                        "Dropping reply {} on post {}: parent {} not in payload",
                        comment.id, post_id, parent
                    );
                }
            }
        }

        let assembler = Assembler {
            flat: &flat,
            children: &children,
            max_depth,
        };
        let roots = root_idx.into_iter().map(|idx| assembler.build(idx, 0)).collect();

        Ok(Self {
            post_id,
            max_depth,
            roots,
        })
    }

    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Top-level comments in list order
    pub fn roots(&self) -> &[Comment] {
        &self.roots
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of comments at every depth
    pub fn len(&self) -> usize {
        self.roots.iter().map(|c| 1 + c.descendant_count()).sum()
    }

    /// Find a comment anywhere in the tree
    pub fn get(&self, id: CommentId) -> Option<&Comment> {
        self.roots.iter().find_map(|c| c.find(id))
    }

    pub fn contains(&self, id: CommentId) -> bool {
        self.get(id).is_some()
    }

    /// Depth-first walk yielding `(depth, comment)` in render order
    pub fn walk(&self) -> Vec<(usize, &Comment)> {
        fn visit<'a>(list: &'a [Comment], depth: usize, out: &mut Vec<(usize, &'a Comment)>) {
            for comment in list {
                out.push((depth, comment));
                visit(&comment.replies, depth + 1, out);
            }
        }

        let mut out = Vec::with_capacity(self.len());
        visit(&self.roots, 0, &mut out);
        out
    }

    /// Set the moderation state of one comment
    pub fn set_state(&mut self, id: CommentId, state: ModerationState) -> Result<()> {
        let comment = self
            .roots
            .iter_mut()
            .find_map(|c| c.find_mut(id))
            .ok_or(ThreadError::CommentNotFound(id))?;
        comment.set_state(state);
        Ok(())
    }

    /// Remove a comment and every reply beneath it, including replies that
    /// were hoisted by depth flattening. Returns how many comments left the
    /// tree.
    pub fn remove(&mut self, id: CommentId) -> Result<usize> {
        if !self.contains(id) {
            return Err(ThreadError::CommentNotFound(id));
        }
        Ok(self.prune_where(|c| c.id == id).len())
    }

    /// The part of the tree this viewer is allowed to see. A hidden comment
    /// hides its replies as well.
    pub fn visible_to(&self, viewer: &ViewerContext) -> CommentTree {
        let mut visible = self.clone();
        if !viewer.is_admin() {
            visible.prune_where(|c| !viewer.can_see(c));
        }
        visible
    }

    /// Summary counts
    pub fn stats(&self) -> ThreadStats {
        let mut stats = ThreadStats::default();
        for (depth, comment) in self.walk() {
            stats.total += 1;
            if depth == 0 {
                stats.top_level += 1;
            } else {
                stats.replies += 1;
            }
            match comment.moderation_state {
                ModerationState::Pending => stats.pending += 1,
                ModerationState::Approved => stats.approved += 1,
                ModerationState::Rejected => stats.rejected += 1,
            }
        }
        stats
    }

    /// Remove matching comments along with everything whose parent chain
    /// runs through a removed comment
    fn prune_where(&mut self, should_drop: impl Fn(&Comment) -> bool) -> HashSet<CommentId> {
        let mut removed = HashSet::new();
        loop {
            let before = removed.len();
            prune_list(&mut self.roots, &should_drop, &mut removed);
            if removed.len() == before {
                break;
            }
        }
        removed
    }
}

/// Comment counts for a thread
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ThreadStats {
    pub total: usize,
    pub top_level: usize,
    pub replies: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
}

struct Assembler<'a> {
    flat: &'a [Comment],
    children: &'a HashMap<CommentId, Vec<usize>>,
    max_depth: usize,
}

impl Assembler<'_> {
    fn build(&self, idx: usize, depth: usize) -> Comment {
        let mut comment = self.flat[idx].clone();
        let kids = self.children.get(&comment.id).map(Vec::as_slice).unwrap_or(&[]);

        if depth + 1 < self.max_depth {
            comment.replies = kids.iter().map(|&k| self.build(k, depth + 1)).collect();
        } else {
            // Last rendered level: hoist every descendant to depth + 1
            let mut hoisted = Vec::new();
            self.collect_descendants(kids, &mut hoisted);
            hoisted.sort_by_key(|c| c.created_at);
            comment.replies = hoisted;
        }
        comment
    }

    /// Every comment beneath `kids`, depth-first. Reply chains can be
    /// arbitrarily long, so this walks with an explicit stack.
    fn collect_descendants(&self, kids: &[usize], out: &mut Vec<Comment>) {
        let mut stack: Vec<usize> = kids.iter().rev().copied().collect();
        while let Some(k) = stack.pop() {
            let comment = &self.flat[k];
            if let Some(grandkids) = self.children.get(&comment.id) {
                stack.extend(grandkids.iter().rev());
            }
            out.push(comment.clone());
        }
    }
}

/// Push a comment and its nested replies onto `out` in pre-order, each with
/// an empty reply list. Nested replies without a `parent_id` take their
/// container's.
fn flatten_into(comment: Comment, out: &mut Vec<Comment>) {
    let mut stack = vec![(comment, None)];
    while let Some((mut comment, container)) = stack.pop() {
        if comment.parent_id.is_none() {
            comment.parent_id = container;
        }
        let replies = std::mem::take(&mut comment.replies);
        let id = comment.id;
        out.push(comment);
        stack.extend(replies.into_iter().rev().map(|reply| (reply, Some(id))));
    }
}

fn prune_list(
    list: &mut Vec<Comment>,
    should_drop: &impl Fn(&Comment) -> bool,
    removed: &mut HashSet<CommentId>,
) {
    list.retain(|c| {
        let orphaned = c.parent_id.map_or(false, |p| removed.contains(&p));
        let drop = orphaned || should_drop(c);
        if drop {
            collect_ids(c, removed);
        }
        !drop
    });
    for comment in list.iter_mut() {
        prune_list(&mut comment.replies, should_drop, removed);
    }
}

fn collect_ids(comment: &Comment, ids: &mut HashSet<CommentId>) {
    ids.insert(comment.id);
    for reply in &comment.replies {
        collect_ids(reply, ids);
    }
}
