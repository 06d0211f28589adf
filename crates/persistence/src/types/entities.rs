//! Entity records.
//!
//! These structs double as the wire shape for backup documents, so every
//! field a client may omit on restore carries a serde default.

// Field names mirror the wire documents
#![allow(missing_docs)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::role::Role;

/// Free-form key/value metadata attached to entities.
pub type Metadata = Map<String, Value>;

/// Top-level tenant boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// A user's role within an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgMember {
    pub org_id: String,
    pub member_id: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
}

/// A tenant-scoped container of profiles and things.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub org_id: String,
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// A reusable device configuration template owned by a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub id: String,
    pub name: String,
    /// Empty while a restore document is being staged.
    #[serde(default)]
    pub group_id: String,
    #[serde(default)]
    pub config: Metadata,
    #[serde(default)]
    pub metadata: Metadata,
}

/// A managed device instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thing {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_key: Option<String>,
    #[serde(default)]
    pub profile_id: String,
    /// Derived from the profile; ignored on input.
    #[serde(default)]
    pub group_id: String,
    #[serde(default)]
    pub metadata: Metadata,
}

/// A (user, group, role) relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMembership {
    #[serde(default)]
    pub group_id: String,
    pub member_id: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
}

impl GroupMembership {
    /// Builds the synthesized owner entry for a group.
    pub fn owner(group: &Group, email: impl Into<String>) -> Self {
        Self {
            group_id: group.id.clone(),
            member_id: group.owner_id.clone(),
            email: email.into(),
            role: Role::Owner,
        }
    }
}
