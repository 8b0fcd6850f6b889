//! Viewer context and authorization rules
//!
//! The viewer is whoever is currently looking at the thread. Identity and
//! role come from the session collaborator and are passed in explicitly.

use crate::comment::Comment;
use crate::error::{Result, ThreadError};
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of viewer roles. Deserializes through [`FromStr`], so config
/// files accept the same spellings as the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// May moderate and delete any comment
    Admin,
    /// Signed-in reader
    Member,
    /// Anonymous reader
    Guest,
}

impl Default for Role {
    fn default() -> Self {
        Role::Guest
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Member => write!(f, "member"),
            Role::Guest => write!(f, "guest"),
        }
    }
}

impl FromStr for Role {
    type Err = ThreadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            // single-letter admin code used by the session payload
            "A" => Ok(Role::Admin),
            other => match other.to_ascii_lowercase().as_str() {
                "admin" => Ok(Role::Admin),
                "member" | "user" => Ok(Role::Member),
                "guest" | "" => Ok(Role::Guest),
                _ => Err(ThreadError::Validation(format!("Unknown role: {}", s))),
            },
        }
    }
}

impl TryFrom<String> for Role {
    type Error = ThreadError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}

/// Identity of a signed-in viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub id: UserId,
    pub name: String,
}

/// Identity and role of the person interacting with the thread
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewerContext {
    pub user: Option<Viewer>,
    pub role: Role,
}

impl ViewerContext {
    /// Anonymous viewer
    pub fn guest() -> Self {
        Self {
            user: None,
            role: Role::Guest,
        }
    }

    /// Signed-in viewer without elevated rights
    pub fn member(id: u64, name: impl Into<String>) -> Self {
        Self::with_role(id, name, Role::Member)
    }

    /// Signed-in administrator
    pub fn admin(id: u64, name: impl Into<String>) -> Self {
        Self::with_role(id, name, Role::Admin)
    }

    /// Signed-in viewer with an explicit role.
    ///
    /// A guest role with an identity is promoted to member, since guests
    /// carry no identity.
    pub fn with_role(id: u64, name: impl Into<String>, role: Role) -> Self {
        let role = if role == Role::Guest { Role::Member } else { role };
        Self {
            user: Some(Viewer {
                id: UserId(id),
                name: name.into(),
            }),
            role,
        }
    }

    /// Viewer's user id, if signed in
    pub fn user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|u| u.id)
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_guest(&self) -> bool {
        self.user.is_none()
    }

    /// Whether the viewer wrote this comment
    pub fn is_author_of(&self, comment: &Comment) -> bool {
        self.user_id() == Some(comment.author_id)
    }

    /// Signed-in viewers may comment and reply
    pub fn can_comment(&self) -> bool {
        !self.is_guest()
    }

    /// Author or admin
    pub fn can_delete(&self, comment: &Comment) -> bool {
        self.is_admin() || self.is_author_of(comment)
    }

    /// Approve and reject are admin-only, regardless of author
    pub fn can_moderate(&self) -> bool {
        self.is_admin()
    }

    /// Admins see everything; others see approved comments and their own
    pub fn can_see(&self, comment: &Comment) -> bool {
        self.is_admin() || comment.moderation_state.is_public() || self.is_author_of(comment)
    }

    pub fn ensure_can_comment(&self) -> Result<()> {
        if self.can_comment() {
            Ok(())
        } else {
            Err(ThreadError::unauthorized("comment", "sign in to comment"))
        }
    }

    pub fn ensure_can_delete(&self, comment: &Comment) -> Result<()> {
        if self.can_delete(comment) {
            Ok(())
        } else {
            Err(ThreadError::unauthorized(
                format!("delete comment {}", comment.id),
                "only the author or an admin may delete it",
            ))
        }
    }

    pub fn ensure_can_moderate(&self, action: &str) -> Result<()> {
        if self.can_moderate() {
            Ok(())
        } else {
            Err(ThreadError::unauthorized(action, "admin role required"))
        }
    }
}

impl fmt::Display for ViewerContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.user {
            Some(user) => write!(f, "{} (#{}, {})", user.name, user.id, self.role),
            None => write!(f, "guest"),
        }
    }
}
