//! Config command
//!
//! Manage comment-thread configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use ct_core::config::Config;

use super::context::AppContext;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file path
    Path,
}

/// Execute the config command
pub fn execute(ctx: &AppContext, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(ctx, json),
        ConfigCommand::Init { force } => init_config(ctx, force),
        ConfigCommand::Path => {
            println!("{}", ctx.config_path.display());
            Ok(())
        }
    }
}

/// Effective config with the token masked
fn redacted(config: &Config) -> Config {
    let mut shown = config.clone();
    if shown.service.token.is_some() {
        shown.service.token = Some("********".to_string());
    }
    shown
}

fn show_config(ctx: &AppContext, as_json: bool) -> Result<()> {
    let shown = redacted(&ctx.config);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&shown)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    if ctx.config_path.exists() {
        println!("{}", ctx.config_path.display().to_string().dimmed());
    } else {
        println!(
            "{}",
            format!("{} (not found, using defaults)", ctx.config_path.display()).dimmed()
        );
    }
    println!();
    println!("{}", shown.to_toml_string()?);

    if let Err(e) = ctx.config.validate() {
        eprintln!("{} {}", "⚠".yellow(), e);
    }

    Ok(())
}

fn init_config(ctx: &AppContext, force: bool) -> Result<()> {
    let path = &ctx.config_path;

    if path.exists() && !force {
        eprintln!(
            "{} Configuration already exists at {}. Use '{}' to overwrite.",
            "⚠".yellow(),
            path.display(),
            "comment-thread config init --force".cyan()
        );
        return Ok(());
    }

    Config::default()
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{} Wrote default configuration to {}", "✓".green(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_masked() {
        let mut config = Config::default();
        config.service.token = Some("secret".to_string());

        let shown = redacted(&config);
        assert_eq!(shown.service.token.as_deref(), Some("********"));
        assert!(!shown.to_toml_string().unwrap().contains("secret"));
    }

    #[test]
    fn test_no_token_stays_absent() {
        assert!(redacted(&Config::default()).service.token.is_none());
    }
}
