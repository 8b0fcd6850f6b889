//! Configuration and viewer resolved for one invocation

use anyhow::{Context, Result};
use ct_core::config::Config;
use ct_core::types::PostId;
use ct_core::{CommentThreadManager, ViewerContext};
use ct_http::HttpCommentService;
use std::path::PathBuf;
use tracing::debug;

use super::Overrides;

/// Effective settings after file, environment and flags are merged
pub struct AppContext {
    pub config_path: PathBuf,
    pub config: Config,
}

impl AppContext {
    /// Load the config file (or defaults) and apply overrides
    pub fn load(path: Option<PathBuf>, overrides: &Overrides) -> Result<Self> {
        let config_path = path.unwrap_or_else(Config::default_path);
        let mut config = Config::load_or_default(&config_path)
            .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?
            .with_env();

        if let Some(base_url) = &overrides.base_url {
            config.service.base_url = base_url.clone();
        }
        if let Some(id) = overrides.as_user {
            config.viewer.id = Some(id);
            if overrides.name.is_some() {
                config.viewer.name = overrides.name.clone();
            }
            if overrides.role.is_some() {
                config.viewer.role = overrides.role;
            }
        }

        Ok(Self {
            config_path,
            config,
        })
    }

    pub fn viewer(&self) -> ViewerContext {
        self.config.viewer.to_context()
    }

    /// Manager for a post, backed by the HTTP service
    pub fn manager(&self, post: u64) -> Result<CommentThreadManager> {
        self.config.validate().context("Invalid configuration")?;

        let service = HttpCommentService::from_config(&self.config.service)
            .context("Failed to set up the content service client")?;
        let viewer = self.viewer();
        debug!("Acting as {} against {}", viewer, service.base_url());

        Ok(CommentThreadManager::new(PostId(post), viewer, service)
            .with_thread_config(&self.config.thread))
    }
}
