//! Configuration management for comment-thread

use crate::comment::validator::MAX_COMMENT_LENGTH;
use crate::comment::{DEPTH_LIMIT, MAX_REPLY_DEPTH};
use crate::error::{Result, ThreadError};
use crate::viewer::{Role, ViewerContext};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable that overrides `service.token`
pub const TOKEN_ENV: &str = "COMMENT_THREAD_TOKEN";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content service settings
    pub service: ServiceConfig,
    /// Thread behaviour
    pub thread: ThreadConfig,
    /// Default viewer for the command line
    pub viewer: ViewerConfig,
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ThreadError::Toml(e.to_string()))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ThreadError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load from a file if it exists, else defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!("No configuration at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Serialize to pretty TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ThreadError::Toml(e.to_string()))
    }

    /// Write configuration to a file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Apply environment overrides
    pub fn with_env(mut self) -> Self {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.service.token = Some(token);
            }
        }
        self
    }

    /// Check values that would make the client unusable
    pub fn validate(&self) -> Result<()> {
        if self.service.base_url.trim().is_empty() {
            return Err(ThreadError::Config("service.base_url is empty".to_string()));
        }
        if self.service.timeout_secs == 0 {
            return Err(ThreadError::Config("service.timeout_secs must be positive".to_string()));
        }
        if self.thread.max_comment_length == 0 {
            return Err(ThreadError::Config(
                "thread.max_comment_length must be positive".to_string(),
            ));
        }
        if self.thread.max_depth == 0 || self.thread.max_depth > DEPTH_LIMIT {
            return Err(ThreadError::Config(format!(
                "thread.max_depth must be between 1 and {}",
                DEPTH_LIMIT
            )));
        }
        Ok(())
    }

    /// Default config file location
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "comment-thread", "comment-thread")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".comment-thread")
                    .join("config.toml")
            })
    }
}

/// Content service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL the endpoint paths are joined onto
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Bearer token sent with every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/".to_string(),
            timeout_secs: 30,
            token: None,
        }
    }
}

/// Thread behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadConfig {
    /// Deepest rendered reply level
    pub max_depth: usize,
    /// Maximum comment body length in characters
    pub max_comment_length: usize,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_REPLY_DEPTH,
            max_comment_length: MAX_COMMENT_LENGTH,
        }
    }
}

/// Default viewer identity for the command line
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub id: Option<u64>,
    pub name: Option<String>,
    pub role: Option<Role>,
}

impl ViewerConfig {
    /// Build the viewer context; without an id the viewer is a guest
    pub fn to_context(&self) -> ViewerContext {
        match self.id {
            Some(id) => ViewerContext::with_role(
                id,
                self.name.clone().unwrap_or_else(|| format!("user{}", id)),
                self.role.unwrap_or(Role::Member),
            ),
            None => ViewerContext::guest(),
        }
    }
}
