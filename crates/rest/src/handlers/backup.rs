//! Backup and restore handlers.
//!
//! Scoped exports are file downloads and scoped restores take the same file
//! back as `application/octet-stream`. The platform-wide pair speaks plain
//! JSON and is reserved for platform administrators.
//!
//! # Routes
//!
//! | Method | Path | Access |
//! |--------|------|--------|
//! | `GET` | `/{groups,orgs}/{id}/{things,profiles}/backup` | admin on the scope |
//! | `POST` | `/{groups,orgs}/{id}/{things,profiles}/restore` | admin on the scope |
//! | `GET` | `/groups/{id}/memberships/backup` | admin on the group |
//! | `POST` | `/groups/{id}/memberships/restore` | admin on the group |
//! | `GET` | `/backup` | platform admin |
//! | `POST` | `/restore` | platform admin |

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use hub_persistence::core::Storage;
use hub_persistence::identity::Identity;
use hub_persistence::types::ListScope;
use tracing::{info, warn};

use crate::authz::{Access, authorize_group, authorize_org, identify};
use crate::backup::{RestoreScope, build_backup, check_scope, decode_backup, prepare};
use crate::error::{RestError, RestResult};
use crate::extractors::BearerToken;
use crate::middleware::BodyFormat;
use crate::requests::{BackupRequest, Collection, RestoreRequest, Validate};
use crate::responses::file_response;
use crate::state::AppState;

/// The resource a scoped backup or restore applies to.
#[derive(Debug, Clone, Copy)]
enum Scope {
    Group,
    Org,
}

async fn authorize_scope<S: Storage>(
    state: &AppState<S>,
    identity: &Identity,
    scope: Scope,
    id: &str,
) -> RestResult<()> {
    match scope {
        Scope::Group => authorize_group(state, identity, id, Access::Admin).await.map(|_| ()),
        Scope::Org => authorize_org(state, identity, id, Access::Admin).await.map(|_| ()),
    }
}

fn require_platform_admin(identity: &Identity) -> RestResult<()> {
    if identity.is_platform_admin() {
        return Ok(());
    }
    warn!(user_id = %identity.id, "Platform backup denied");
    Err(RestError::forbidden(
        "platform backup requires administrator privileges",
    ))
}

async fn scoped_backup<S: Storage>(
    state: &AppState<S>,
    token: String,
    scope: Scope,
    id: String,
    collection: Collection,
) -> RestResult<Response> {
    let request = BackupRequest {
        token,
        scope_id: Some(id.clone()),
    };
    request.validate()?;

    let identity = identify(state, &request.token).await?;
    authorize_scope(state, &identity, scope, &id).await?;

    let list_scope = match scope {
        Scope::Group => ListScope::Group(id),
        Scope::Org => ListScope::Org(id),
    };
    let backup = build_backup(state.storage(), &list_scope, &[collection]).await?;
    file_response(collection.as_str(), &backup)
}

async fn scoped_restore<S: Storage>(
    state: &AppState<S>,
    token: String,
    scope: Scope,
    id: String,
    collection: Collection,
    headers: &HeaderMap,
    body: &Bytes,
) -> RestResult<Response> {
    let backup = decode_backup(headers, body, BodyFormat::OctetStream)?;
    let request = RestoreRequest {
        token,
        scope_id: Some(id.clone()),
        collection: Some(collection),
        backup,
    };
    request.validate()?;

    let identity = identify(state, &request.token).await?;
    authorize_scope(state, &identity, scope, &id).await?;

    let restore_scope = match scope {
        Scope::Group => RestoreScope::Group(id.clone()),
        Scope::Org => RestoreScope::Org(id.clone()),
    };
    let batch = prepare(request.backup, Some(collection), &restore_scope, &identity.id)?;
    check_scope(state.storage(), &batch, &restore_scope).await?;

    let count = batch.len();
    state.storage().restore(batch).await?;
    info!(
        scope_id = %id,
        collection = collection.as_str(),
        count,
        "Restored backup"
    );

    Ok(StatusCode::CREATED.into_response())
}

/// Exports the whole platform as JSON.
///
/// `GET /backup`
pub async fn backup_handler<S: Storage>(
    State(state): State<AppState<S>>,
    BearerToken(token): BearerToken,
) -> RestResult<Response> {
    let request = BackupRequest {
        token,
        scope_id: None,
    };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    require_platform_admin(&identity)?;

    let backup = build_backup(state.storage(), &ListScope::All, &Collection::ALL).await?;
    info!(user_id = %identity.id, "Exported platform backup");
    Ok((StatusCode::OK, Json(backup)).into_response())
}

/// Restores a platform backup.
///
/// `POST /restore` with a JSON backup document.
pub async fn restore_handler<S: Storage>(
    State(state): State<AppState<S>>,
    BearerToken(token): BearerToken,
    headers: HeaderMap,
    body: Bytes,
) -> RestResult<Response> {
    let backup = decode_backup(&headers, &body, BodyFormat::Json)?;
    let request = RestoreRequest {
        token,
        scope_id: None,
        collection: None,
        backup,
    };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    require_platform_admin(&identity)?;

    let batch = prepare(request.backup, None, &RestoreScope::Platform, &identity.id)?;
    let count = batch.len();
    state.storage().restore(batch).await?;
    info!(user_id = %identity.id, count, "Restored platform backup");

    Ok(StatusCode::CREATED.into_response())
}

// ============================================================================
// Scoped routes
// ============================================================================

/// `GET /groups/{id}/things/backup`
pub async fn group_things_backup_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
) -> RestResult<Response> {
    scoped_backup(&state, token, Scope::Group, id, Collection::Things).await
}

/// `POST /groups/{id}/things/restore`
pub async fn group_things_restore_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    headers: HeaderMap,
    body: Bytes,
) -> RestResult<Response> {
    scoped_restore(&state, token, Scope::Group, id, Collection::Things, &headers, &body).await
}

/// `GET /orgs/{id}/things/backup`
pub async fn org_things_backup_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
) -> RestResult<Response> {
    scoped_backup(&state, token, Scope::Org, id, Collection::Things).await
}

/// `POST /orgs/{id}/things/restore`
pub async fn org_things_restore_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    headers: HeaderMap,
    body: Bytes,
) -> RestResult<Response> {
    scoped_restore(&state, token, Scope::Org, id, Collection::Things, &headers, &body).await
}

/// `GET /groups/{id}/profiles/backup`
pub async fn group_profiles_backup_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
) -> RestResult<Response> {
    scoped_backup(&state, token, Scope::Group, id, Collection::Profiles).await
}

/// `POST /groups/{id}/profiles/restore`
pub async fn group_profiles_restore_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    headers: HeaderMap,
    body: Bytes,
) -> RestResult<Response> {
    scoped_restore(&state, token, Scope::Group, id, Collection::Profiles, &headers, &body).await
}

/// `GET /orgs/{id}/profiles/backup`
pub async fn org_profiles_backup_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
) -> RestResult<Response> {
    scoped_backup(&state, token, Scope::Org, id, Collection::Profiles).await
}

/// `POST /orgs/{id}/profiles/restore`
pub async fn org_profiles_restore_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    headers: HeaderMap,
    body: Bytes,
) -> RestResult<Response> {
    scoped_restore(&state, token, Scope::Org, id, Collection::Profiles, &headers, &body).await
}

/// `GET /groups/{id}/memberships/backup`
pub async fn group_memberships_backup_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
) -> RestResult<Response> {
    scoped_backup(&state, token, Scope::Group, id, Collection::Memberships).await
}

/// `POST /groups/{id}/memberships/restore`
pub async fn group_memberships_restore_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    headers: HeaderMap,
    body: Bytes,
) -> RestResult<Response> {
    scoped_restore(&state, token, Scope::Group, id, Collection::Memberships, &headers, &body).await
}
