//! Backup and restore requests.

use hub_persistence::types::Backup;

use super::{
    Validate, ValidationError, validate_id, validate_name, validate_optional_id, validate_token,
};

/// A top-level collection of a backup document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    /// `groups`
    Groups,
    /// `profiles`
    Profiles,
    /// `things`
    Things,
    /// `group_memberships`
    Memberships,
}

impl Collection {
    /// Every collection, in restore order.
    pub const ALL: [Collection; 4] = [
        Collection::Groups,
        Collection::Profiles,
        Collection::Things,
        Collection::Memberships,
    ];

    /// Returns a short label, used in file names and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Groups => "groups",
            Collection::Profiles => "profiles",
            Collection::Things => "things",
            Collection::Memberships => "memberships",
        }
    }

    fn len_in(&self, backup: &Backup) -> usize {
        match self {
            Collection::Groups => backup.groups.as_ref().map_or(0, Vec::len),
            Collection::Profiles => backup.profiles.as_ref().map_or(0, Vec::len),
            Collection::Things => backup.things.as_ref().map_or(0, Vec::len),
            Collection::Memberships => backup.group_memberships.as_ref().map_or(0, Vec::len),
        }
    }
}

/// Export of a scope.
#[derive(Debug, Clone)]
pub struct BackupRequest {
    /// Bearer token.
    pub token: String,
    /// Scoping group or organization; `None` for the whole platform.
    pub scope_id: Option<String>,
}

impl Validate for BackupRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_token(&self.token)?;
        match &self.scope_id {
            Some(id) => validate_id(id),
            None => Ok(()),
        }
    }
}

/// Import of a backup document into a scope.
#[derive(Debug, Clone)]
pub struct RestoreRequest {
    /// Bearer token.
    pub token: String,
    /// Scoping group or organization; `None` for the whole platform.
    pub scope_id: Option<String>,
    /// The collection a scoped restore accepts; `None` accepts all.
    pub collection: Option<Collection>,
    /// Decoded document.
    pub backup: Backup,
}

impl RestoreRequest {
    fn accepts(&self, collection: Collection) -> bool {
        self.collection.is_none_or(|c| c == collection)
    }

    fn check_entities(&self) -> Result<(), ValidationError> {
        let backup = &self.backup;
        if self.accepts(Collection::Groups) {
            for group in backup.groups.iter().flatten() {
                validate_optional_id(&group.id)?;
                validate_id(&group.org_id)?;
                validate_name(&group.name, true)?;
            }
        }
        if self.accepts(Collection::Profiles) {
            for profile in backup.profiles.iter().flatten() {
                validate_optional_id(&profile.id)?;
                validate_optional_id(&profile.group_id)?;
                validate_name(&profile.name, true)?;
            }
        }
        if self.accepts(Collection::Things) {
            for thing in backup.things.iter().flatten() {
                validate_optional_id(&thing.id)?;
                validate_id(&thing.profile_id)?;
                validate_name(&thing.name, true)?;
            }
        }
        if self.accepts(Collection::Memberships) {
            for membership in backup.group_memberships.iter().flatten() {
                if membership.member_id.is_empty() {
                    return Err(ValidationError::MissingMemberId);
                }
                validate_optional_id(&membership.group_id)?;
                if !membership.role.is_assignable() {
                    return Err(ValidationError::OwnerRole);
                }
            }
        }
        Ok(())
    }
}

impl Validate for RestoreRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_token(&self.token)?;
        if let Some(id) = &self.scope_id {
            validate_id(id)?;
        }

        let total: usize = Collection::ALL
            .iter()
            .filter(|c| self.accepts(**c))
            .map(|c| c.len_in(&self.backup))
            .sum();
        if total == 0 {
            return Err(ValidationError::EmptyList);
        }

        self.check_entities()
    }
}
