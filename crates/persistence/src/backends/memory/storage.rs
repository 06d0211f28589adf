//! Storage trait implementations for the in-memory backend.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;

use crate::core::{
    GroupStorage, MembershipStorage, OrgStorage, ProfileStorage, RestoreStorage, Storage,
    ThingStorage,
};
use crate::error::{ReferenceError, StorageError, StorageResult};
use crate::types::{
    Group, GroupMembership, ListScope, Organization, Page, PageMetadata, Profile, RestoreBatch,
    Role, Thing, paginate,
};

use super::backend::{InMemoryBackend, check_storable};

fn ensure_all_exist<'a>(
    entity: &'static str,
    ids: &'a [String],
    exists: impl Fn(&str) -> bool,
) -> StorageResult<HashSet<&'a str>> {
    let mut set = HashSet::with_capacity(ids.len());
    for id in ids {
        if !exists(id) {
            return Err(StorageError::not_found(entity, id.clone()));
        }
        set.insert(id.as_str());
    }
    Ok(set)
}

#[async_trait]
impl OrgStorage for InMemoryBackend {
    async fn retrieve_org(&self, org_id: &str) -> StorageResult<Option<Organization>> {
        Ok(self.inner.read().org(org_id).cloned())
    }

    async fn retrieve_org_role(
        &self,
        org_id: &str,
        member_id: &str,
    ) -> StorageResult<Option<Role>> {
        let state = self.inner.read();
        let Some(org) = state.org(org_id) else {
            return Ok(None);
        };
        if org.owner_id == member_id {
            return Ok(Some(Role::Owner));
        }
        Ok(state
            .org_members
            .iter()
            .find(|m| m.org_id == org_id && m.member_id == member_id)
            .map(|m| m.role))
    }

    async fn retrieve_member_orgs(&self, member_id: &str) -> StorageResult<Vec<String>> {
        let state = self.inner.read();
        Ok(state
            .orgs
            .iter()
            .filter(|o| {
                o.owner_id == member_id
                    || state
                        .org_members
                        .iter()
                        .any(|m| m.org_id == o.id && m.member_id == member_id)
            })
            .map(|o| o.id.clone())
            .collect())
    }
}

#[async_trait]
impl GroupStorage for InMemoryBackend {
    async fn save_groups(&self, groups: Vec<Group>) -> StorageResult<Vec<Group>> {
        let count = groups.len();
        let saved = self.stage(|state| {
            groups
                .into_iter()
                .map(|g| state.insert_group(g))
                .collect::<StorageResult<Vec<_>>>()
        })?;
        tracing::debug!(count, "Saved groups");
        Ok(saved)
    }

    async fn retrieve_group(&self, id: &str) -> StorageResult<Option<Group>> {
        Ok(self.inner.read().group(id).cloned())
    }

    async fn update_group(&self, group: Group) -> StorageResult<Group> {
        self.stage(|state| {
            let stored = state
                .groups
                .iter_mut()
                .find(|g| g.id == group.id)
                .ok_or_else(|| StorageError::not_found("group", group.id.clone()))?;
            stored.name = group.name;
            stored.description = group.description;
            stored.metadata = group.metadata;
            stored.updated_at = Utc::now();
            Ok(stored.clone())
        })
    }

    async fn remove_groups(&self, ids: &[String]) -> StorageResult<()> {
        self.stage(|state| {
            let removed = ensure_all_exist("group", ids, |id| state.group(id).is_some())?;
            state.groups.retain(|g| !removed.contains(g.id.as_str()));
            state
                .profiles
                .retain(|p| !removed.contains(p.group_id.as_str()));
            state.things.retain(|t| !removed.contains(t.group_id.as_str()));
            state
                .memberships
                .retain(|m| !removed.contains(m.group_id.as_str()));
            Ok(())
        })?;
        tracing::debug!(count = ids.len(), "Removed groups");
        Ok(())
    }

    async fn list_groups(
        &self,
        scope: &ListScope,
        pm: &PageMetadata,
    ) -> StorageResult<Page<Group>> {
        Ok(paginate(self.retrieve_all_groups(scope).await?, pm))
    }

    async fn retrieve_all_groups(&self, scope: &ListScope) -> StorageResult<Vec<Group>> {
        let state = self.inner.read();
        Ok(state
            .groups
            .iter()
            .filter(|g| state.group_in_scope(g, scope))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProfileStorage for InMemoryBackend {
    async fn save_profiles(&self, profiles: Vec<Profile>) -> StorageResult<Vec<Profile>> {
        let count = profiles.len();
        let saved = self.stage(|state| {
            profiles
                .into_iter()
                .map(|p| state.insert_profile(p))
                .collect::<StorageResult<Vec<_>>>()
        })?;
        tracing::debug!(count, "Saved profiles");
        Ok(saved)
    }

    async fn retrieve_profile(&self, id: &str) -> StorageResult<Option<Profile>> {
        Ok(self.inner.read().profile(id).cloned())
    }

    async fn update_profile(&self, profile: Profile) -> StorageResult<Profile> {
        self.stage(|state| {
            let stored = state
                .profiles
                .iter_mut()
                .find(|p| p.id == profile.id)
                .ok_or_else(|| StorageError::not_found("profile", profile.id.clone()))?;
            stored.name = profile.name;
            stored.config = profile.config;
            stored.metadata = profile.metadata;
            Ok(stored.clone())
        })
    }

    async fn remove_profiles(&self, ids: &[String]) -> StorageResult<()> {
        self.stage(|state| {
            let removed = ensure_all_exist("profile", ids, |id| state.profile(id).is_some())?;
            state.profiles.retain(|p| !removed.contains(p.id.as_str()));
            state
                .things
                .retain(|t| !removed.contains(t.profile_id.as_str()));
            Ok(())
        })?;
        tracing::debug!(count = ids.len(), "Removed profiles");
        Ok(())
    }

    async fn list_profiles(
        &self,
        scope: &ListScope,
        pm: &PageMetadata,
    ) -> StorageResult<Page<Profile>> {
        Ok(paginate(self.retrieve_all_profiles(scope).await?, pm))
    }

    async fn retrieve_all_profiles(&self, scope: &ListScope) -> StorageResult<Vec<Profile>> {
        let state = self.inner.read();
        Ok(state
            .profiles
            .iter()
            .filter(|p| state.profile_in_scope(p, scope))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ThingStorage for InMemoryBackend {
    async fn save_things(&self, things: Vec<Thing>) -> StorageResult<Vec<Thing>> {
        let count = things.len();
        let saved = self.stage(|state| {
            things
                .into_iter()
                .map(|t| state.insert_thing(t))
                .collect::<StorageResult<Vec<_>>>()
        })?;
        tracing::debug!(count, "Saved things");
        Ok(saved)
    }

    async fn retrieve_thing(&self, id: &str) -> StorageResult<Option<Thing>> {
        Ok(self.inner.read().thing(id).cloned())
    }

    async fn retrieve_thing_by_key(&self, key: &str) -> StorageResult<Option<Thing>> {
        Ok(self
            .inner
            .read()
            .things
            .iter()
            .find(|t| t.key == key)
            .cloned())
    }

    async fn update_thing(&self, thing: Thing) -> StorageResult<Thing> {
        self.stage(|state| {
            if state.thing(&thing.id).is_none() {
                return Err(StorageError::not_found("thing", thing.id));
            }
            let group_id = state
                .profile(&thing.profile_id)
                .map(|p| p.group_id.clone())
                .ok_or_else(|| ReferenceError {
                    entity: "thing",
                    id: thing.id.clone(),
                    parent: "profile",
                    parent_id: thing.profile_id.clone(),
                })?;
            if !thing.key.is_empty() {
                state.check_key_free(&thing.key, &thing.id)?;
            }

            let stored = state
                .things
                .iter_mut()
                .find(|t| t.id == thing.id)
                .ok_or_else(|| StorageError::not_found("thing", thing.id.clone()))?;
            stored.name = thing.name;
            stored.external_key = thing.external_key;
            stored.metadata = thing.metadata;
            stored.profile_id = thing.profile_id;
            stored.group_id = group_id;
            if !thing.key.is_empty() {
                stored.key = thing.key;
            }
            Ok(stored.clone())
        })
    }

    async fn remove_things(&self, ids: &[String]) -> StorageResult<()> {
        self.stage(|state| {
            let removed = ensure_all_exist("thing", ids, |id| state.thing(id).is_some())?;
            state.things.retain(|t| !removed.contains(t.id.as_str()));
            Ok(())
        })?;
        tracing::debug!(count = ids.len(), "Removed things");
        Ok(())
    }

    async fn list_things(
        &self,
        scope: &ListScope,
        pm: &PageMetadata,
    ) -> StorageResult<Page<Thing>> {
        Ok(paginate(self.retrieve_all_things(scope).await?, pm))
    }

    async fn retrieve_all_things(&self, scope: &ListScope) -> StorageResult<Vec<Thing>> {
        let state = self.inner.read();
        Ok(state
            .things
            .iter()
            .filter(|t| state.thing_in_scope(t, scope))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl MembershipStorage for InMemoryBackend {
    async fn save_memberships(&self, memberships: Vec<GroupMembership>) -> StorageResult<()> {
        let count = memberships.len();
        self.stage(|state| {
            memberships
                .into_iter()
                .try_for_each(|m| state.insert_membership(m))
        })?;
        tracing::debug!(count, "Saved memberships");
        Ok(())
    }

    async fn update_memberships(&self, memberships: Vec<GroupMembership>) -> StorageResult<()> {
        self.stage(|state| {
            for update in memberships {
                check_storable(&update)?;
                let stored = state
                    .memberships
                    .iter_mut()
                    .find(|m| m.group_id == update.group_id && m.member_id == update.member_id)
                    .ok_or_else(|| {
                        StorageError::not_found(
                            "membership",
                            format!("{}/{}", update.group_id, update.member_id),
                        )
                    })?;
                stored.role = update.role;
                if !update.email.is_empty() {
                    stored.email = update.email;
                }
            }
            Ok(())
        })
    }

    async fn remove_memberships(
        &self,
        group_id: &str,
        member_ids: &[String],
    ) -> StorageResult<()> {
        self.stage(|state| {
            let removed = ensure_all_exist("membership", member_ids, |id| {
                state.membership(group_id, id).is_some()
            })?;
            state
                .memberships
                .retain(|m| !(m.group_id == group_id && removed.contains(m.member_id.as_str())));
            Ok(())
        })
    }

    async fn retrieve_membership_role(
        &self,
        group_id: &str,
        member_id: &str,
    ) -> StorageResult<Option<Role>> {
        Ok(self
            .inner
            .read()
            .membership(group_id, member_id)
            .map(|m| m.role))
    }

    async fn retrieve_all_memberships(
        &self,
        scope: &ListScope,
    ) -> StorageResult<Vec<GroupMembership>> {
        let state = self.inner.read();
        Ok(state
            .memberships
            .iter()
            .filter(|m| state.membership_in_scope(m, scope))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RestoreStorage for InMemoryBackend {
    async fn restore(&self, batch: RestoreBatch) -> StorageResult<()> {
        let total = batch.len();
        self.stage(|state| {
            for group in batch.groups {
                state.insert_group(group)?;
            }
            for profile in batch.profiles {
                state.insert_profile(profile)?;
            }
            for thing in batch.things {
                state.insert_thing(thing)?;
            }
            for membership in batch.memberships {
                state.insert_membership(membership)?;
            }
            Ok(())
        })?;
        tracing::info!(total, "Restored batch");
        Ok(())
    }
}

impl Storage for InMemoryBackend {
    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
