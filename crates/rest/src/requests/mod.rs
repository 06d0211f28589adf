//! Typed request descriptors.
//!
//! Every operation parses its inputs into a descriptor and calls
//! [`Validate::validate`] before touching the identity provider or storage.
//! Validation is pure: it inspects the descriptor only, so an invalid request
//! never reaches a collaborator.
//!
//! - [`list`] - listing and search parameters
//! - [`entities`] - group, profile, and thing create/update/remove
//! - [`memberships`] - membership management
//! - [`backup`] - backup and restore

pub mod backup;
pub mod entities;
pub mod list;
pub mod memberships;

pub use backup::{BackupRequest, Collection, RestoreRequest};
pub use entities::{
    CreateGroupsRequest, CreateProfilesRequest, CreateThingsRequest, EntityRequest,
    IdentifyRequest, RemoveRequest, ReparentThingRequest, UpdateGroupRequest,
    UpdateKeyRequest, UpdateProfileRequest, UpdateThingRequest,
};
pub use list::{ListKind, ListParams, ListRequest};
pub use memberships::{MembershipEntry, MembershipsRequest, RemoveMembershipsRequest};

use thiserror::Error;
use uuid::Uuid;

/// Longest accepted name, in characters.
pub const MAX_NAME_SIZE: usize = 1024;

/// Reasons a request descriptor is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// No credential was supplied.
    #[error("missing or invalid credentials provided")]
    MissingCredential,

    /// A required identifier is empty.
    #[error("missing entity id")]
    MissingId,

    /// An identifier is not a UUID.
    #[error("invalid id format: {0}")]
    InvalidIdFormat(String),

    /// A bulk payload holds nothing.
    #[error("empty list provided")]
    EmptyList,

    /// A name is required but empty.
    #[error("missing name")]
    EmptyName,

    /// A name is longer than [`MAX_NAME_SIZE`].
    #[error("name exceeds {MAX_NAME_SIZE} characters")]
    NameSize,

    /// A page limit is above its ceiling.
    #[error("limit must not exceed {0}")]
    LimitSize(u64),

    /// An unknown sort key.
    #[error("invalid order: {0}")]
    InvalidOrder(String),

    /// An unknown sort direction.
    #[error("invalid direction: {0}")]
    InvalidDirection(String),

    /// A role outside the closed role set.
    #[error("invalid role: {0}")]
    InvalidRole(String),

    /// The owner role was submitted for assignment.
    #[error("owner role cannot be assigned")]
    OwnerRole,

    /// A required key is empty.
    #[error("missing key")]
    MissingKey,

    /// A membership entry has no member.
    #[error("missing member id")]
    MissingMemberId,
}

/// A request descriptor with a side-effect free check.
pub trait Validate {
    /// Checks the descriptor, returning the first problem found.
    fn validate(&self) -> Result<(), ValidationError>;
}

pub(crate) fn validate_token(token: &str) -> Result<(), ValidationError> {
    if token.is_empty() {
        return Err(ValidationError::MissingCredential);
    }
    Ok(())
}

/// A required identifier: present and a UUID.
pub(crate) fn validate_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        return Err(ValidationError::MissingId);
    }
    validate_optional_id(id)
}

/// A client-supplied identifier: empty, or a UUID.
pub(crate) fn validate_optional_id(id: &str) -> Result<(), ValidationError> {
    if !id.is_empty() && Uuid::parse_str(id).is_err() {
        return Err(ValidationError::InvalidIdFormat(id.to_string()));
    }
    Ok(())
}

pub(crate) fn validate_name(name: &str, required: bool) -> Result<(), ValidationError> {
    if required && name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_SIZE {
        return Err(ValidationError::NameSize);
    }
    Ok(())
}

pub(crate) fn validate_ids(ids: &[String]) -> Result<(), ValidationError> {
    if ids.is_empty() {
        return Err(ValidationError::EmptyList);
    }
    ids.iter().try_for_each(|id| validate_id(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_bounds() {
        assert!(validate_name(&"a".repeat(MAX_NAME_SIZE), true).is_ok());
        assert_eq!(
            validate_name(&"a".repeat(MAX_NAME_SIZE + 1), true),
            Err(ValidationError::NameSize)
        );
        assert_eq!(validate_name("  ", true), Err(ValidationError::EmptyName));
        assert!(validate_name("", false).is_ok());
    }

    #[test]
    fn test_name_bound_counts_characters() {
        let name = "é".repeat(MAX_NAME_SIZE);
        assert!(validate_name(&name, true).is_ok());
    }

    #[test]
    fn test_id_format() {
        assert!(validate_id(&Uuid::new_v4().to_string()).is_ok());
        assert_eq!(validate_id(""), Err(ValidationError::MissingId));
        assert!(matches!(
            validate_id("not-a-uuid"),
            Err(ValidationError::InvalidIdFormat(_))
        ));
        assert!(validate_optional_id("").is_ok());
    }

    #[test]
    fn test_id_lists() {
        assert_eq!(validate_ids(&[]), Err(ValidationError::EmptyList));
        assert!(validate_ids(&[Uuid::new_v4().to_string()]).is_ok());
    }
}
