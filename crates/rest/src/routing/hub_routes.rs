//! Hub route configuration.
//!
//! Every path parameter is named `{id}`; static segments such as
//! `/things/search` take priority over `/things/{id}`.

use axum::{
    Router,
    routing::{get, patch, post},
};
use hub_persistence::core::Storage;

use crate::handlers::{backup, groups, health_handler, memberships, profiles, things};
use crate::state::AppState;

/// Creates all hub API routes.
///
/// # Routes
///
/// ## System-level
/// - `GET /health` - Health check
/// - `GET /metadata` - Thing identification by key
/// - `GET /backup`, `POST /restore` - Platform backup and restore
///
/// ## Groups
/// - `GET /groups`, `POST /groups/search` - Listing
/// - `GET|PUT|DELETE /groups/{id}` - Read, update, remove
/// - `POST /orgs/{id}/groups` - Bulk create
/// - `GET /orgs/{id}/groups`, `POST /orgs/{id}/groups/search` - Listing by organization
///
/// ## Profiles
/// - `GET /profiles`, `POST /profiles/search`, `PATCH /profiles` - Listing, bulk remove
/// - `GET|PUT|DELETE /profiles/{id}` - Read, update, remove
/// - `POST /groups/{id}/profiles` - Bulk create
/// - `GET /{groups,orgs}/{id}/profiles[/search]` - Scoped listing
/// - `GET /{groups,orgs}/{id}/profiles/backup`, `POST .../restore` - Scoped backup
///
/// ## Things
/// - `GET /things`, `POST /things/search`, `PATCH /things` - Listing, bulk remove
/// - `GET|PUT|DELETE /things/{id}` - Read, update, remove
/// - `PATCH /things/{id}/key`, `PATCH /things/{id}/profile` - Key rotation, re-parenting
/// - `POST /profiles/{id}/things` - Bulk create
/// - `GET /{groups,profiles,orgs}/{id}/things[/search]` - Scoped listing
/// - `GET /{groups,orgs}/{id}/things/backup`, `POST .../restore` - Scoped backup
///
/// ## Memberships
/// - `POST|PUT|PATCH|GET /groups/{id}/memberships` - Create, update, remove, list
/// - `GET /groups/{id}/memberships/backup`, `POST .../restore` - Scoped backup
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: Storage + 'static,
{
    Router::new()
        // System-level routes
        .route("/health", get(health_handler::<S>))
        .route("/metadata", get(things::thing_metadata_handler::<S>))
        .route("/backup", get(backup::backup_handler::<S>))
        .route("/restore", post(backup::restore_handler::<S>))
        // Groups
        .route("/groups", get(groups::list_groups_handler::<S>))
        .route("/groups/search", post(groups::search_groups_handler::<S>))
        .route(
            "/groups/{id}",
            get(groups::view_group_handler::<S>)
                .put(groups::update_group_handler::<S>)
                .delete(groups::remove_group_handler::<S>),
        )
        .route(
            "/orgs/{id}/groups",
            get(groups::list_org_groups_handler::<S>).post(groups::create_groups_handler::<S>),
        )
        .route(
            "/orgs/{id}/groups/search",
            post(groups::search_org_groups_handler::<S>),
        )
        // Profiles
        .route(
            "/profiles",
            get(profiles::list_profiles_handler::<S>).patch(profiles::remove_profiles_handler::<S>),
        )
        .route("/profiles/search", post(profiles::search_profiles_handler::<S>))
        .route(
            "/profiles/{id}",
            get(profiles::view_profile_handler::<S>)
                .put(profiles::update_profile_handler::<S>)
                .delete(profiles::remove_profile_handler::<S>),
        )
        .route(
            "/groups/{id}/profiles",
            get(profiles::list_group_profiles_handler::<S>)
                .post(profiles::create_profiles_handler::<S>),
        )
        .route(
            "/groups/{id}/profiles/search",
            post(profiles::search_group_profiles_handler::<S>),
        )
        .route(
            "/orgs/{id}/profiles",
            get(profiles::list_org_profiles_handler::<S>),
        )
        .route(
            "/orgs/{id}/profiles/search",
            post(profiles::search_org_profiles_handler::<S>),
        )
        .route(
            "/groups/{id}/profiles/backup",
            get(backup::group_profiles_backup_handler::<S>),
        )
        .route(
            "/groups/{id}/profiles/restore",
            post(backup::group_profiles_restore_handler::<S>),
        )
        .route(
            "/orgs/{id}/profiles/backup",
            get(backup::org_profiles_backup_handler::<S>),
        )
        .route(
            "/orgs/{id}/profiles/restore",
            post(backup::org_profiles_restore_handler::<S>),
        )
        // Things
        .route(
            "/things",
            get(things::list_things_handler::<S>).patch(things::remove_things_handler::<S>),
        )
        .route("/things/search", post(things::search_things_handler::<S>))
        .route(
            "/things/{id}",
            get(things::view_thing_handler::<S>)
                .put(things::update_thing_handler::<S>)
                .delete(things::remove_thing_handler::<S>),
        )
        .route("/things/{id}/key", patch(things::update_key_handler::<S>))
        .route(
            "/things/{id}/profile",
            patch(things::reparent_thing_handler::<S>),
        )
        .route(
            "/profiles/{id}/things",
            get(things::list_profile_things_handler::<S>)
                .post(things::create_things_handler::<S>),
        )
        .route(
            "/profiles/{id}/things/search",
            post(things::search_profile_things_handler::<S>),
        )
        .route(
            "/groups/{id}/things",
            get(things::list_group_things_handler::<S>),
        )
        .route(
            "/groups/{id}/things/search",
            post(things::search_group_things_handler::<S>),
        )
        .route("/orgs/{id}/things", get(things::list_org_things_handler::<S>))
        .route(
            "/orgs/{id}/things/search",
            post(things::search_org_things_handler::<S>),
        )
        .route(
            "/groups/{id}/things/backup",
            get(backup::group_things_backup_handler::<S>),
        )
        .route(
            "/groups/{id}/things/restore",
            post(backup::group_things_restore_handler::<S>),
        )
        .route(
            "/orgs/{id}/things/backup",
            get(backup::org_things_backup_handler::<S>),
        )
        .route(
            "/orgs/{id}/things/restore",
            post(backup::org_things_restore_handler::<S>),
        )
        // Memberships
        .route(
            "/groups/{id}/memberships",
            get(memberships::list_memberships_handler::<S>)
                .post(memberships::create_memberships_handler::<S>)
                .put(memberships::update_memberships_handler::<S>)
                .patch(memberships::remove_memberships_handler::<S>),
        )
        .route(
            "/groups/{id}/memberships/backup",
            get(backup::group_memberships_backup_handler::<S>),
        )
        .route(
            "/groups/{id}/memberships/restore",
            post(backup::group_memberships_restore_handler::<S>),
        )
        // State
        .with_state(state)
}
