//! Storage traits.
//!
//! One trait per entity kind, plus [`RestoreStorage`] for batch imports.
//! Backends enforce referential integrity and unique keys; they do not
//! authorize. Callers resolve identities and check privileges first.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{
    Group, GroupMembership, ListScope, Organization, Page, PageMetadata, Profile, RestoreBatch,
    Role, Thing,
};

/// Read access to organizations and their members.
#[async_trait]
pub trait OrgStorage: Send + Sync {
    /// Reads an organization by ID.
    async fn retrieve_org(&self, org_id: &str) -> StorageResult<Option<Organization>>;

    /// Returns the role of a user within an organization.
    ///
    /// The organization's owner is reported as [`Role::Owner`].
    async fn retrieve_org_role(&self, org_id: &str, member_id: &str)
    -> StorageResult<Option<Role>>;

    /// Returns the IDs of every organization the user owns or belongs to.
    async fn retrieve_member_orgs(&self, member_id: &str) -> StorageResult<Vec<String>>;
}

/// Group persistence.
#[async_trait]
pub trait GroupStorage: Send + Sync {
    /// Creates groups. Either all are stored or none.
    ///
    /// # Errors
    ///
    /// * `StorageError::Entity(AlreadyExists)` - If an ID is taken
    /// * `StorageError::Reference` - If an organization does not exist
    async fn save_groups(&self, groups: Vec<Group>) -> StorageResult<Vec<Group>>;

    /// Reads a group by ID.
    async fn retrieve_group(&self, id: &str) -> StorageResult<Option<Group>>;

    /// Replaces the mutable fields of a group. The organization is kept.
    async fn update_group(&self, group: Group) -> StorageResult<Group>;

    /// Removes groups together with their profiles, things, and memberships.
    async fn remove_groups(&self, ids: &[String]) -> StorageResult<()>;

    /// Lists groups within a scope.
    async fn list_groups(&self, scope: &ListScope, pm: &PageMetadata)
    -> StorageResult<Page<Group>>;

    /// Returns every group within a scope, in creation order.
    async fn retrieve_all_groups(&self, scope: &ListScope) -> StorageResult<Vec<Group>>;
}

/// Profile persistence.
#[async_trait]
pub trait ProfileStorage: Send + Sync {
    /// Creates profiles. Either all are stored or none.
    async fn save_profiles(&self, profiles: Vec<Profile>) -> StorageResult<Vec<Profile>>;

    /// Reads a profile by ID.
    async fn retrieve_profile(&self, id: &str) -> StorageResult<Option<Profile>>;

    /// Replaces name, config, and metadata of a profile.
    async fn update_profile(&self, profile: Profile) -> StorageResult<Profile>;

    /// Removes profiles together with their things.
    async fn remove_profiles(&self, ids: &[String]) -> StorageResult<()>;

    /// Lists profiles within a scope.
    async fn list_profiles(
        &self,
        scope: &ListScope,
        pm: &PageMetadata,
    ) -> StorageResult<Page<Profile>>;

    /// Returns every profile within a scope, in creation order.
    async fn retrieve_all_profiles(&self, scope: &ListScope) -> StorageResult<Vec<Profile>>;
}

/// Thing persistence.
#[async_trait]
pub trait ThingStorage: Send + Sync {
    /// Creates things. Either all are stored or none.
    ///
    /// The group of each thing is taken from its profile.
    ///
    /// # Errors
    ///
    /// * `StorageError::Entity(AlreadyExists)` - If an ID or key is taken
    /// * `StorageError::Reference` - If a profile does not exist
    async fn save_things(&self, things: Vec<Thing>) -> StorageResult<Vec<Thing>>;

    /// Reads a thing by ID.
    async fn retrieve_thing(&self, id: &str) -> StorageResult<Option<Thing>>;

    /// Reads a thing by its primary key.
    async fn retrieve_thing_by_key(&self, key: &str) -> StorageResult<Option<Thing>>;

    /// Replaces a thing. Profile changes move the thing to the profile's group.
    async fn update_thing(&self, thing: Thing) -> StorageResult<Thing>;

    /// Removes things.
    async fn remove_things(&self, ids: &[String]) -> StorageResult<()>;

    /// Lists things within a scope.
    async fn list_things(&self, scope: &ListScope, pm: &PageMetadata)
    -> StorageResult<Page<Thing>>;

    /// Returns every thing within a scope, in creation order.
    async fn retrieve_all_things(&self, scope: &ListScope) -> StorageResult<Vec<Thing>>;
}

/// Group membership persistence.
///
/// Only assignable roles are stored; the owner is implied by the group.
#[async_trait]
pub trait MembershipStorage: Send + Sync {
    /// Creates memberships. Either all are stored or none.
    async fn save_memberships(&self, memberships: Vec<GroupMembership>) -> StorageResult<()>;

    /// Changes the role of existing memberships.
    async fn update_memberships(&self, memberships: Vec<GroupMembership>) -> StorageResult<()>;

    /// Removes memberships of a group.
    async fn remove_memberships(&self, group_id: &str, member_ids: &[String])
    -> StorageResult<()>;

    /// Returns the stored role of a member, if any.
    async fn retrieve_membership_role(
        &self,
        group_id: &str,
        member_id: &str,
    ) -> StorageResult<Option<Role>>;

    /// Returns every stored membership within a scope, in creation order.
    async fn retrieve_all_memberships(
        &self,
        scope: &ListScope,
    ) -> StorageResult<Vec<GroupMembership>>;
}

/// Batch import of a snapshot.
#[async_trait]
pub trait RestoreStorage: Send + Sync {
    /// Applies a batch in dependency order.
    ///
    /// References resolve against storage and against entities earlier in
    /// the same batch. The batch is applied completely or not at all.
    async fn restore(&self, batch: RestoreBatch) -> StorageResult<()>;
}

/// Everything the API layer needs from a backend.
pub trait Storage:
    OrgStorage + GroupStorage + ProfileStorage + ThingStorage + MembershipStorage + RestoreStorage
{
    /// Returns a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;
}
