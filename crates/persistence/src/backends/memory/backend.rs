//! In-memory backend state.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::RwLock;
use uuid::Uuid;

use crate::error::{ReferenceError, StorageError, StorageResult, ValidationError};
use crate::types::{Group, GroupMembership, ListScope, OrgMember, Organization, Profile, Thing};

/// In-memory implementation of every storage trait.
///
/// Entities are kept in creation order. Multi-entity writes run against a
/// staged copy of the state that replaces the live state only when every
/// entity was accepted, so a failed batch leaves nothing behind.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    pub(super) inner: Arc<RwLock<State>>,
}

impl Debug for InMemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read();
        f.debug_struct("InMemoryBackend")
            .field("orgs", &state.orgs.len())
            .field("groups", &state.groups.len())
            .field("profiles", &state.profiles.len())
            .field("things", &state.things.len())
            .field("memberships", &state.memberships.len())
            .finish_non_exhaustive()
    }
}

impl InMemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an organization.
    ///
    /// Organizations are provisioned outside this API; the backend only
    /// needs them to resolve group ownership.
    pub fn insert_org(&self, org: Organization) -> StorageResult<()> {
        let mut state = self.inner.write();
        if state.org(&org.id).is_some() {
            return Err(StorageError::already_exists("organization", org.id));
        }
        tracing::debug!(org_id = %org.id, owner_id = %org.owner_id, "Registered organization");
        state.orgs.push(org);
        Ok(())
    }

    /// Adds a member to an organization, replacing any previous role.
    pub fn add_org_member(&self, member: OrgMember) -> StorageResult<()> {
        let mut state = self.inner.write();
        if state.org(&member.org_id).is_none() {
            return Err(StorageError::not_found("organization", member.org_id));
        }
        state
            .org_members
            .retain(|m| !(m.org_id == member.org_id && m.member_id == member.member_id));
        state.org_members.push(member);
        Ok(())
    }

    /// Runs a write against a staged copy and commits it on success.
    pub(super) fn stage<T>(
        &self,
        op: impl FnOnce(&mut State) -> StorageResult<T>,
    ) -> StorageResult<T> {
        let mut live = self.inner.write();
        let mut staged = live.clone();
        let out = op(&mut staged)?;
        *live = staged;
        Ok(out)
    }
}

#[derive(Debug, Clone, Default)]
pub(super) struct State {
    pub orgs: Vec<Organization>,
    pub org_members: Vec<OrgMember>,
    pub groups: Vec<Group>,
    pub profiles: Vec<Profile>,
    pub things: Vec<Thing>,
    pub memberships: Vec<GroupMembership>,
}

fn fill_id(id: &mut String) {
    if id.is_empty() {
        *id = Uuid::new_v4().to_string();
    }
}

impl State {
    pub fn org(&self, id: &str) -> Option<&Organization> {
        self.orgs.iter().find(|o| o.id == id)
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    pub fn thing(&self, id: &str) -> Option<&Thing> {
        self.things.iter().find(|t| t.id == id)
    }

    pub fn membership(&self, group_id: &str, member_id: &str) -> Option<&GroupMembership> {
        self.memberships
            .iter()
            .find(|m| m.group_id == group_id && m.member_id == member_id)
    }

    fn group_matches(&self, group_id: &str, scope: &ListScope) -> bool {
        match scope {
            ListScope::All => true,
            ListScope::Group(id) => group_id == id,
            ListScope::Org(org_id) => self.group(group_id).is_some_and(|g| &g.org_id == org_id),
            ListScope::Orgs(org_ids) => self
                .group(group_id)
                .is_some_and(|g| org_ids.contains(&g.org_id)),
            ListScope::Profile(_) => false,
        }
    }

    pub fn group_in_scope(&self, group: &Group, scope: &ListScope) -> bool {
        match scope {
            ListScope::Profile(id) => self.profile(id).is_some_and(|p| p.group_id == group.id),
            _ => self.group_matches(&group.id, scope),
        }
    }

    pub fn profile_in_scope(&self, profile: &Profile, scope: &ListScope) -> bool {
        match scope {
            ListScope::Profile(id) => &profile.id == id,
            _ => self.group_matches(&profile.group_id, scope),
        }
    }

    pub fn thing_in_scope(&self, thing: &Thing, scope: &ListScope) -> bool {
        match scope {
            ListScope::Profile(id) => &thing.profile_id == id,
            _ => self.group_matches(&thing.group_id, scope),
        }
    }

    pub fn membership_in_scope(&self, membership: &GroupMembership, scope: &ListScope) -> bool {
        self.group_matches(&membership.group_id, scope)
    }

    pub fn insert_group(&mut self, mut group: Group) -> StorageResult<Group> {
        fill_id(&mut group.id);
        if self.group(&group.id).is_some() {
            return Err(StorageError::already_exists("group", group.id));
        }
        if self.org(&group.org_id).is_none() {
            return Err(ReferenceError {
                entity: "group",
                id: group.id,
                parent: "organization",
                parent_id: group.org_id,
            }
            .into());
        }
        self.groups.push(group.clone());
        Ok(group)
    }

    pub fn insert_profile(&mut self, mut profile: Profile) -> StorageResult<Profile> {
        fill_id(&mut profile.id);
        if self.profile(&profile.id).is_some() {
            return Err(StorageError::already_exists("profile", profile.id));
        }
        if self.group(&profile.group_id).is_none() {
            return Err(ReferenceError {
                entity: "profile",
                id: profile.id,
                parent: "group",
                parent_id: profile.group_id,
            }
            .into());
        }
        self.profiles.push(profile.clone());
        Ok(profile)
    }

    pub fn insert_thing(&mut self, mut thing: Thing) -> StorageResult<Thing> {
        fill_id(&mut thing.id);
        fill_id(&mut thing.key);
        if self.thing(&thing.id).is_some() {
            return Err(StorageError::already_exists("thing", thing.id));
        }
        self.check_key_free(&thing.key, &thing.id)?;
        let Some(profile) = self.profile(&thing.profile_id) else {
            return Err(ReferenceError {
                entity: "thing",
                id: thing.id,
                parent: "profile",
                parent_id: thing.profile_id,
            }
            .into());
        };
        thing.group_id = profile.group_id.clone();
        self.things.push(thing.clone());
        Ok(thing)
    }

    pub fn check_key_free(&self, key: &str, owner_id: &str) -> StorageResult<()> {
        if self.things.iter().any(|t| t.key == key && t.id != owner_id) {
            return Err(StorageError::already_exists("thing key", key));
        }
        Ok(())
    }

    pub fn insert_membership(&mut self, membership: GroupMembership) -> StorageResult<()> {
        check_storable(&membership)?;
        let Some(group) = self.group(&membership.group_id) else {
            return Err(ReferenceError {
                entity: "membership",
                id: membership.member_id,
                parent: "group",
                parent_id: membership.group_id,
            }
            .into());
        };
        if group.owner_id == membership.member_id
            || self
                .membership(&membership.group_id, &membership.member_id)
                .is_some()
        {
            return Err(StorageError::already_exists(
                "membership",
                format!("{}/{}", membership.group_id, membership.member_id),
            ));
        }
        self.memberships.push(membership);
        Ok(())
    }
}

pub(super) fn check_storable(membership: &GroupMembership) -> StorageResult<()> {
    if membership.role.is_assignable() {
        Ok(())
    } else {
        Err(ValidationError::ForbiddenRole {
            member_id: membership.member_id.clone(),
            role: membership.role.to_string(),
        }
        .into())
    }
}
