//! List command
//!
//! Show the comment thread of a post.

use anyhow::{Context, Result};
use clap::Args;
use colored::{ColoredString, Colorize};
use ct_core::comment::{ModerationState, ThreadStats};
use ct_core::render::RenderedComment;
use serde::Serialize;

use super::context::AppContext;

/// Arguments for the list command
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Post ID
    pub post: u64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show comment counts
    #[arg(long)]
    pub stats: bool,
}

#[derive(Serialize)]
struct ListOutput<'a> {
    post_id: u64,
    comments: &'a [RenderedComment],
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<ThreadStats>,
}

/// Execute the list command
pub async fn execute(ctx: &AppContext, args: ListArgs) -> Result<()> {
    let mut manager = ctx.manager(args.post)?;
    manager
        .refresh()
        .await
        .with_context(|| format!("Failed to load comments for post {}", args.post))?;

    let rendered = manager.rendered();
    let stats = manager.stats();

    if args.json {
        let output = ListOutput {
            post_id: args.post,
            comments: &rendered,
            stats: args.stats.then_some(stats),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("Comments on post {}", args.post).bold().underline()
    );
    println!();

    if rendered.is_empty() {
        println!("No comments yet.");
    }

    for line in &rendered {
        print_comment(line);
    }

    if args.stats {
        print_stats(&stats);
    }

    Ok(())
}

fn print_comment(line: &RenderedComment) {
    let indent = "    ".repeat(line.depth + 1);

    let mut header = format!(
        "{}{} {} {}",
        indent,
        format!("#{}", line.id).green(),
        line.author_name.cyan(),
        age(line).dimmed()
    );
    if let Some(tag) = state_tag(line.state) {
        header.push_str(&format!(" {}", tag));
    }
    if line.own {
        header.push_str(&format!(" {}", "(you)".dimmed()));
    }
    println!("{}", header);

    for text in line.body.lines() {
        println!("{}  {}", indent, text);
    }

    let actions = actions(line);
    if !actions.is_empty() {
        println!("{}  {}", indent, format!("[{}]", actions.join(" | ")).dimmed());
    }
    println!();
}

fn state_tag(state: ModerationState) -> Option<ColoredString> {
    match state {
        ModerationState::Approved => None,
        ModerationState::Pending => Some("[pending]".yellow()),
        ModerationState::Rejected => Some("[rejected]".red()),
    }
}

fn actions(line: &RenderedComment) -> Vec<&'static str> {
    let a = &line.affordances;
    [
        (a.reply, "reply"),
        (a.delete, "delete"),
        (a.approve, "approve"),
        (a.reject, "reject"),
    ]
    .into_iter()
    .filter_map(|(allowed, name)| allowed.then_some(name))
    .collect()
}

fn age(line: &RenderedComment) -> String {
    let minutes = chrono::Utc::now()
        .signed_duration_since(line.created_at)
        .num_minutes();
    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 60 * 24 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / (60 * 24))
    }
}

fn print_stats(stats: &ThreadStats) {
    println!(
        "  {} {} comments ({} top-level, {} replies)",
        "ℹ".blue(),
        stats.total,
        stats.top_level,
        stats.replies
    );
    if stats.pending + stats.rejected > 0 {
        println!(
            "    {} pending, {} approved, {} rejected",
            stats.pending.to_string().yellow(),
            stats.approved.to_string().green(),
            stats.rejected.to_string().red()
        );
    }
}
