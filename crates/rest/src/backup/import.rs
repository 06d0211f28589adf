//! Snapshot import.
//!
//! A restore runs in three steps: [`decode_backup`] turns the body into a
//! [`Backup`] according to the declared format, [`prepare`] narrows it to the
//! accepted collection and binds it to the target scope, and [`check_scope`]
//! rejects references that leave the scope. The resulting batch is handed to
//! storage, which applies it in dependency order.

use axum::body::Bytes;
use axum::http::HeaderMap;
use hub_persistence::core::Storage;
use hub_persistence::types::{Backup, Group, RestoreBatch};

use crate::error::{RestError, RestResult};
use crate::middleware::content_type::{BodyFormat, require_format};
use crate::requests::Collection;

/// The boundary a restore writes into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreScope {
    /// The whole platform.
    Platform,
    /// One organization.
    Org(String),
    /// One group.
    Group(String),
}

impl RestoreScope {
    fn contains(&self, group: &Group) -> bool {
        match self {
            RestoreScope::Platform => true,
            RestoreScope::Org(org_id) => &group.org_id == org_id,
            RestoreScope::Group(group_id) => &group.id == group_id,
        }
    }
}

/// Decodes a restore body declared as `expected`.
///
/// # Errors
///
/// * `RestError::UnsupportedMediaType` - If the body is declared otherwise
/// * `RestError::BadRequest` - If the body is not a backup document
pub fn decode_backup(headers: &HeaderMap, body: &Bytes, expected: BodyFormat) -> RestResult<Backup> {
    require_format(headers, expected)?;
    serde_json::from_slice(body)
        .map_err(|e| RestError::bad_request(format!("Invalid backup document: {}", e)))
}

fn adopt(field: &mut String, group_id: &str, entity: &str) -> RestResult<()> {
    if field.is_empty() {
        *field = group_id.to_string();
        return Ok(());
    }
    if field != group_id {
        return Err(RestError::bad_request(format!(
            "{} belongs to group {}, not {}",
            entity, field, group_id
        )));
    }
    Ok(())
}

fn require_group(group_id: &str, entity: &str) -> RestResult<()> {
    if group_id.is_empty() {
        return Err(RestError::bad_request(format!("{} has no group", entity)));
    }
    Ok(())
}

/// Stages a document for restore.
///
/// Keeps only `collection` (all collections when `None`), binds profiles and
/// memberships of a group-scoped restore to that group, and makes the caller
/// the owner of restored groups that name none. Thing groups are always
/// derived from their profiles.
pub fn prepare(
    backup: Backup,
    collection: Option<Collection>,
    scope: &RestoreScope,
    caller_id: &str,
) -> RestResult<RestoreBatch> {
    let mut batch = match collection {
        None => backup.into_batch(),
        Some(Collection::Groups) => RestoreBatch {
            groups: backup.groups.unwrap_or_default(),
            ..Default::default()
        },
        Some(Collection::Profiles) => RestoreBatch {
            profiles: backup.profiles.unwrap_or_default(),
            ..Default::default()
        },
        Some(Collection::Things) => RestoreBatch {
            things: backup.things.unwrap_or_default(),
            ..Default::default()
        },
        Some(Collection::Memberships) => RestoreBatch {
            memberships: backup.group_memberships.unwrap_or_default(),
            ..Default::default()
        },
    };

    for group in &mut batch.groups {
        if group.owner_id.is_empty() {
            group.owner_id = caller_id.to_string();
        }
    }

    match scope {
        RestoreScope::Group(group_id) => {
            for profile in &mut batch.profiles {
                adopt(&mut profile.group_id, group_id, "profile")?;
            }
            for membership in &mut batch.memberships {
                adopt(&mut membership.group_id, group_id, "membership")?;
            }
        }
        RestoreScope::Org(_) | RestoreScope::Platform => {
            for profile in &batch.profiles {
                require_group(&profile.group_id, "profile")?;
            }
            for membership in &batch.memberships {
                require_group(&membership.group_id, "membership")?;
            }
        }
    }

    for thing in &mut batch.things {
        thing.group_id.clear();
    }

    Ok(batch)
}

async fn stored_group_in_scope<S: Storage>(
    storage: &S,
    group_id: &str,
    scope: &RestoreScope,
) -> RestResult<()> {
    // A missing group is reported by the restore itself
    let Some(group) = storage.retrieve_group(group_id).await? else {
        return Ok(());
    };
    if !scope.contains(&group) {
        return Err(RestError::bad_request(format!(
            "group {} is outside the restore scope",
            group_id
        )));
    }
    Ok(())
}

/// Rejects batch entities whose stored parents lie outside `scope`.
///
/// Parents created earlier in the same batch were already bound to the scope
/// by [`prepare`].
pub async fn check_scope<S: Storage>(
    storage: &S,
    batch: &RestoreBatch,
    scope: &RestoreScope,
) -> RestResult<()> {
    if *scope == RestoreScope::Platform {
        return Ok(());
    }

    let in_batch = |group_id: &str| batch.groups.iter().any(|g| g.id == group_id);
    for group_id in batch
        .profiles
        .iter()
        .map(|p| p.group_id.as_str())
        .chain(batch.memberships.iter().map(|m| m.group_id.as_str()))
    {
        if !in_batch(group_id) {
            stored_group_in_scope(storage, group_id, scope).await?;
        }
    }

    for thing in &batch.things {
        if batch.profiles.iter().any(|p| p.id == thing.profile_id) {
            continue;
        }
        if let Some(profile) = storage.retrieve_profile(&thing.profile_id).await? {
            stored_group_in_scope(storage, &profile.group_id, scope).await?;
        }
    }
    Ok(())
}
