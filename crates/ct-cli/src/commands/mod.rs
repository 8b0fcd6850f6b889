//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod comment;
pub mod config;
pub mod context;
pub mod delete;
pub mod list;
pub mod moderate;

use clap::{Args, Parser, Subcommand};
use ct_core::comment::ModerationAction;
use ct_core::thread::{CommentThreadManager, NoticeLevel};
use ct_core::Role;

use context::AppContext;

/// comment-thread - nested comments with moderation
#[derive(Debug, Parser)]
#[command(name = "comment-thread")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Commands,
}

/// Per-invocation overrides of the configuration
#[derive(Debug, Clone, Default, Args)]
pub struct Overrides {
    /// Content service base URL
    #[arg(long, global = true, env = "COMMENT_THREAD_URL")]
    pub base_url: Option<String>,

    /// Act as this user id
    #[arg(long, global = true)]
    pub as_user: Option<u64>,

    /// Display name of the acting user
    #[arg(long, global = true, requires = "as_user")]
    pub name: Option<String>,

    /// Role of the acting user (admin, member)
    #[arg(long, global = true, requires = "as_user")]
    pub role: Option<Role>,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show the comment thread of a post
    List(list::ListArgs),

    /// Post a comment or a reply
    Comment(comment::CommentArgs),

    /// Delete a comment and its replies
    Delete(delete::DeleteArgs),

    /// Approve a comment (admin)
    Approve(moderate::ModerateArgs),

    /// Reject a comment (admin)
    Reject(moderate::ModerateArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let ctx = AppContext::load(cli.config, &cli.overrides)?;

    // Dispatch to command handler
    match cli.command {
        Commands::List(args) => list::execute(&ctx, args).await,
        Commands::Comment(args) => comment::execute(&ctx, args).await,
        Commands::Delete(args) => delete::execute(&ctx, args).await,
        Commands::Approve(args) => moderate::execute(&ctx, args, ModerationAction::Approve).await,
        Commands::Reject(args) => moderate::execute(&ctx, args, ModerationAction::Reject).await,
        Commands::Config(cmd) => config::execute(&ctx, cmd),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Print queued notifications as ✓/✗ lines
pub(crate) fn print_notifications(manager: &mut CommentThreadManager) {
    use colored::Colorize;

    for notice in manager.drain_notifications() {
        match notice.level {
            NoticeLevel::Success => println!("{} {}", "✓".green(), notice.message),
            NoticeLevel::Error => eprintln!("{} {}", "✗".red(), notice.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_text() {
        let cmd = Cli::command();
        assert!(cmd.get_about().is_some());
    }

    #[test]
    fn test_parse_viewer_overrides() {
        let cli = Cli::try_parse_from([
            "comment-thread",
            "--as-user",
            "7",
            "--role",
            "A",
            "approve",
            "12",
            "43",
        ])
        .unwrap();
        assert_eq!(cli.overrides.as_user, Some(7));
        assert_eq!(cli.overrides.role, Some(Role::Admin));
        assert!(matches!(cli.command, Commands::Approve(_)));
    }

    #[test]
    fn test_role_requires_user() {
        assert!(Cli::try_parse_from(["comment-thread", "--role", "admin", "list", "1"]).is_err());
    }
}
