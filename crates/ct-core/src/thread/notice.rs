//! Transient user-visible notifications

use crate::error::ThreadError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A message to show briefly and then discard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    /// Every failure is reported the same way: a short line naming what
    /// failed and why
    pub fn from_error(what: &str, err: &ThreadError) -> Self {
        Self::error(format!("{}: {}", what, err))
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
