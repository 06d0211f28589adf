//! Snapshot export.

use hub_persistence::core::Storage;
use hub_persistence::types::{Backup, ListScope};
use tracing::debug;

use crate::error::RestResult;
use crate::requests::Collection;

/// Reads every entity of `collections` within `scope`.
///
/// Collections not requested stay absent from the document. Only stored
/// memberships are exported; group owners travel with their groups.
pub async fn build_backup<S: Storage>(
    storage: &S,
    scope: &ListScope,
    collections: &[Collection],
) -> RestResult<Backup> {
    let mut backup = Backup::default();
    for collection in collections {
        match collection {
            Collection::Groups => {
                backup.groups = Some(storage.retrieve_all_groups(scope).await?);
            }
            Collection::Profiles => {
                backup.profiles = Some(storage.retrieve_all_profiles(scope).await?);
            }
            Collection::Things => {
                backup.things = Some(storage.retrieve_all_things(scope).await?);
            }
            Collection::Memberships => {
                backup.group_memberships = Some(storage.retrieve_all_memberships(scope).await?);
            }
        }
    }

    debug!(
        scope = scope.kind(),
        groups = backup.groups.as_ref().map_or(0, Vec::len),
        profiles = backup.profiles.as_ref().map_or(0, Vec::len),
        things = backup.things.as_ref().map_or(0, Vec::len),
        memberships = backup.group_memberships.as_ref().map_or(0, Vec::len),
        "Built backup"
    );
    Ok(backup)
}
