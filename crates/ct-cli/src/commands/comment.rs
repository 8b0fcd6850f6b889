//! Comment command
//!
//! Post a top-level comment or a reply.

use anyhow::{Context, Result};
use clap::Args;
use ct_core::types::CommentId;

use super::context::AppContext;
use super::print_notifications;

/// Arguments for the comment command
#[derive(Debug, Args)]
pub struct CommentArgs {
    /// Post ID
    pub post: u64,

    /// Comment text
    pub body: String,

    /// Reply to this comment
    #[arg(long, short)]
    pub reply_to: Option<u64>,
}

/// Execute the comment command
pub async fn execute(ctx: &AppContext, args: CommentArgs) -> Result<()> {
    let mut manager = ctx.manager(args.post)?;

    match args.reply_to {
        Some(parent) => {
            // the reply target is checked against the loaded thread
            manager
                .refresh()
                .await
                .with_context(|| format!("Failed to load comments for post {}", args.post))?;
            manager.reply_to(CommentId(parent))?;
        }
        None => manager.open_form(),
    }

    manager.set_body(args.body);
    manager.submit().await.context("Comment was not posted")?;

    print_notifications(&mut manager);
    Ok(())
}
