//! Delete command
//!
//! Delete a comment together with its replies.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use ct_core::comment::Comment;
use ct_core::types::CommentId;

use super::context::AppContext;
use super::print_notifications;

/// Arguments for the delete command
#[derive(Debug, Args)]
pub struct DeleteArgs {
    /// Post ID
    pub post: u64,

    /// Comment ID
    pub comment: u64,

    /// Skip confirmation
    #[arg(long, short)]
    pub yes: bool,
}

/// Execute the delete command
pub async fn execute(ctx: &AppContext, args: DeleteArgs) -> Result<()> {
    let mut manager = ctx.manager(args.post)?;
    manager
        .refresh()
        .await
        .with_context(|| format!("Failed to load comments for post {}", args.post))?;

    let comment_id = CommentId(args.comment);
    manager.request_delete(comment_id)?;

    if !args.yes {
        use dialoguer::Confirm;

        let prompt = confirm_prompt(comment_id, manager.tree().get(comment_id));
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()?;

        if !confirmed {
            manager.cancel_pending();
            println!("{}", "Delete cancelled.".dimmed());
            return Ok(());
        }
    }

    manager
        .confirm_pending()
        .await
        .with_context(|| format!("Comment {} was not deleted", comment_id))?;

    print_notifications(&mut manager);
    Ok(())
}

const PREVIEW_CHARS: usize = 40;

fn confirm_prompt(comment_id: CommentId, comment: Option<&Comment>) -> String {
    let Some(comment) = comment else {
        return format!("Delete comment #{}?", comment_id);
    };

    let head = format!(
        "Delete comment #{} by {} (\"{}\")",
        comment.id,
        comment.author_name,
        comment.preview(PREVIEW_CHARS)
    );
    match comment.descendant_count() {
        0 => format!("{}?", head),
        1 => format!("{} and its reply?", head),
        n => format!("{} and its {} replies?", head, n),
    }
}
