//! Membership management requests.
//!
//! Roles arrive as strings and are parsed here so an unknown role and the
//! owner role are reported as validation errors, not body parse failures.

use hub_persistence::types::{GroupMembership, Role};
use serde::Deserialize;

use super::{Validate, ValidationError, validate_id, validate_token};

/// One membership entry of a create or update payload.
#[derive(Debug, Clone, Deserialize)]
pub struct MembershipEntry {
    /// Member user identifier.
    #[serde(default)]
    pub member_id: String,
    /// Member email.
    #[serde(default)]
    pub email: String,
    /// Requested role.
    #[serde(default)]
    pub role: String,
}

impl MembershipEntry {
    fn role(&self) -> Result<Role, ValidationError> {
        let role: Role = self
            .role
            .parse()
            .map_err(|_| ValidationError::InvalidRole(self.role.clone()))?;
        if !role.is_assignable() {
            return Err(ValidationError::OwnerRole);
        }
        Ok(role)
    }
}

/// `{"group_memberships": [...]}`
#[derive(Debug, Deserialize)]
pub struct MembershipsBody {
    /// Entries to create or update.
    #[serde(default)]
    pub group_memberships: Vec<MembershipEntry>,
}

/// `{"member_ids": [...]}`
#[derive(Debug, Deserialize)]
pub struct MemberIdsBody {
    /// Members to remove.
    #[serde(default)]
    pub member_ids: Vec<String>,
}

/// Membership create or update.
#[derive(Debug, Clone)]
pub struct MembershipsRequest {
    /// Bearer token.
    pub token: String,
    /// Target group.
    pub group_id: String,
    /// Entries.
    pub memberships: Vec<MembershipEntry>,
}

impl Validate for MembershipsRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_token(&self.token)?;
        validate_id(&self.group_id)?;
        if self.memberships.is_empty() {
            return Err(ValidationError::EmptyList);
        }
        for entry in &self.memberships {
            if entry.member_id.is_empty() {
                return Err(ValidationError::MissingMemberId);
            }
            entry.role()?;
        }
        Ok(())
    }
}

impl MembershipsRequest {
    /// Builds membership records for the group.
    pub fn into_memberships(self) -> Result<Vec<GroupMembership>, ValidationError> {
        let group_id = self.group_id;
        self.memberships
            .into_iter()
            .map(|entry| {
                Ok(GroupMembership {
                    group_id: group_id.clone(),
                    role: entry.role()?,
                    member_id: entry.member_id,
                    email: entry.email,
                })
            })
            .collect()
    }
}

/// Membership removal.
#[derive(Debug, Clone)]
pub struct RemoveMembershipsRequest {
    /// Bearer token.
    pub token: String,
    /// Target group.
    pub group_id: String,
    /// Members to remove.
    pub member_ids: Vec<String>,
}

impl Validate for RemoveMembershipsRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_token(&self.token)?;
        validate_id(&self.group_id)?;
        if self.member_ids.is_empty() {
            return Err(ValidationError::EmptyList);
        }
        if self.member_ids.iter().any(String::is_empty) {
            return Err(ValidationError::MissingMemberId);
        }
        Ok(())
    }
}
