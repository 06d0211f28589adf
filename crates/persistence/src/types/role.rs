//! Membership roles.
//!
//! The role set is closed. [`Role::Owner`] is never assigned through
//! membership management; it belongs to whoever created the group (or the
//! organization) and is synthesized into membership listings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A role held by a member of a group or organization.
///
/// Variants are declared in order of decreasing privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// Implicit creator of the resource.
    Owner,
    /// Full management rights, including memberships and backups.
    Admin,
    /// May create and modify profiles and things.
    Editor,
    /// Read-only access.
    Viewer,
}

/// Error returned when a string does not name a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl Role {
    /// All roles, most privileged first.
    pub const ALL: [Role; 4] = [Role::Owner, Role::Admin, Role::Editor, Role::Viewer];

    /// Returns the wire name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        }
    }

    /// Returns `true` if the role may be granted through membership endpoints.
    pub fn is_assignable(&self) -> bool {
        !matches!(self, Role::Owner)
    }

    /// Returns `true` if the role carries administrative rights.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Owner | Role::Admin)
    }

    /// Returns `true` if the role may modify resources.
    pub fn can_edit(&self) -> bool {
        !matches!(self, Role::Viewer)
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
