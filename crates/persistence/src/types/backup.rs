//! Backup and restore documents.
//!
//! A [`Backup`] is the exported document and, unchanged, the restore
//! payload. Collections a scope does not cover are absent rather than empty,
//! so a scoped export re-posts only what it contains.

// Field names mirror the wire documents
#![allow(missing_docs)]

use serde::{Deserialize, Serialize};

use super::entities::{Group, GroupMembership, Profile, Thing};

/// A snapshot of (part of) the entity graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<Group>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles: Option<Vec<Profile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub things: Option<Vec<Thing>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_memberships: Option<Vec<GroupMembership>>,
}

impl Backup {
    /// A document holding only things.
    pub fn things(things: Vec<Thing>) -> Self {
        Self {
            things: Some(things),
            ..Default::default()
        }
    }

    /// A document holding only profiles.
    pub fn profiles(profiles: Vec<Profile>) -> Self {
        Self {
            profiles: Some(profiles),
            ..Default::default()
        }
    }

    /// A document holding only group memberships.
    pub fn memberships(memberships: Vec<GroupMembership>) -> Self {
        Self {
            group_memberships: Some(memberships),
            ..Default::default()
        }
    }

    /// Consumes the document into a batch, treating absent collections as empty.
    pub fn into_batch(self) -> RestoreBatch {
        RestoreBatch {
            groups: self.groups.unwrap_or_default(),
            profiles: self.profiles.unwrap_or_default(),
            things: self.things.unwrap_or_default(),
            memberships: self.group_memberships.unwrap_or_default(),
        }
    }
}

/// Entities to recreate, applied in declaration order:
/// groups, profiles, things, memberships.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestoreBatch {
    pub groups: Vec<Group>,
    pub profiles: Vec<Profile>,
    pub things: Vec<Thing>,
    pub memberships: Vec<GroupMembership>,
}

impl RestoreBatch {
    /// Total number of entities in the batch.
    pub fn len(&self) -> usize {
        self.groups.len() + self.profiles.len() + self.things.len() + self.memberships.len()
    }

    /// Returns `true` if the batch holds no entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
