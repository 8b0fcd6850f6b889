//! Approve and reject commands

use anyhow::{Context, Result};
use clap::Args;
use ct_core::comment::ModerationAction;
use ct_core::types::CommentId;

use super::context::AppContext;
use super::print_notifications;

/// Arguments for the approve and reject commands
#[derive(Debug, Args)]
pub struct ModerateArgs {
    /// Post ID
    pub post: u64,

    /// Comment ID
    pub comment: u64,
}

/// Execute a moderation command
pub async fn execute(ctx: &AppContext, args: ModerateArgs, action: ModerationAction) -> Result<()> {
    let mut manager = ctx.manager(args.post)?;
    let comment_id = CommentId(args.comment);

    // fail before touching the network
    manager
        .viewer()
        .ensure_can_moderate(&format!("{} comment {}", action.verb(), comment_id))?;

    manager
        .refresh()
        .await
        .with_context(|| format!("Failed to load comments for post {}", args.post))?;

    let result = match action {
        ModerationAction::Approve => manager.approve(comment_id).await,
        ModerationAction::Reject => manager.reject(comment_id).await,
    };
    result.with_context(|| format!("Failed to {} comment {}", action.verb(), comment_id))?;

    print_notifications(&mut manager);
    Ok(())
}
