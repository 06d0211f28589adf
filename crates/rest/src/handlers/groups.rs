//! Group handlers.
//!
//! # Routes
//!
//! | Method | Path | Access |
//! |--------|------|--------|
//! | `POST` | `/orgs/{id}/groups` | admin on the organization |
//! | `GET` | `/groups/{id}` | view |
//! | `PUT` | `/groups/{id}` | admin |
//! | `DELETE` | `/groups/{id}` | admin |
//! | `GET`/`POST` | `/groups`, `/groups/search` | scoped by membership |
//! | `GET`/`POST` | `/orgs/{id}/groups[/search]` | view on the organization |

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hub_persistence::core::Storage;
use hub_persistence::types::Group;
use serde_json::json;
use tracing::{debug, info};

use super::listing::{Listing, list_entities};
use crate::authz::{Access, ScopeTarget, authorize_group, authorize_org, identify};
use crate::error::RestResult;
use crate::extractors::{BearerToken, JsonBody, ListQuery, SearchBody};
use crate::requests::entities::{GroupInput, GroupsBody};
use crate::requests::{CreateGroupsRequest, EntityRequest, UpdateGroupRequest, Validate};
use crate::state::AppState;

/// Creates groups in an organization.
///
/// `POST /orgs/{id}/groups` with `{"groups": [...]}`. The caller becomes the
/// owner of every created group.
pub async fn create_groups_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(org_id): Path<String>,
    BearerToken(token): BearerToken,
    JsonBody(body): JsonBody<GroupsBody>,
) -> RestResult<Response> {
    let request = CreateGroupsRequest {
        token,
        org_id,
        groups: body.groups,
    };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    authorize_org(&state, &identity, &request.org_id, Access::Admin).await?;

    let org_id = request.org_id.clone();
    let groups = state
        .storage()
        .save_groups(request.into_groups(&identity.id))
        .await?;
    info!(org_id = %org_id, count = groups.len(), "Created groups");

    Ok((StatusCode::CREATED, Json(json!({ "groups": groups }))).into_response())
}

/// Reads one group.
pub async fn view_group_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
) -> RestResult<Response> {
    let request = EntityRequest { token, id };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    let group = authorize_group(&state, &identity, &request.id, Access::View).await?;
    Ok((StatusCode::OK, Json(group)).into_response())
}

/// Replaces the name, description, and metadata of a group.
///
/// The organization and owner never change.
pub async fn update_group_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    JsonBody(group): JsonBody<GroupInput>,
) -> RestResult<Response> {
    let request = UpdateGroupRequest { token, id, group };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    let stored = authorize_group(&state, &identity, &request.id, Access::Admin).await?;

    let input = request.group;
    let updated = state
        .storage()
        .update_group(Group {
            name: input.name,
            description: input.description,
            metadata: input.metadata,
            ..stored
        })
        .await?;
    debug!(group_id = %updated.id, "Updated group");

    Ok((StatusCode::OK, Json(updated)).into_response())
}

/// Removes a group with its profiles, things, and memberships.
pub async fn remove_group_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
) -> RestResult<Response> {
    let request = EntityRequest { token, id };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    authorize_group(&state, &identity, &request.id, Access::Admin).await?;

    state.storage().remove_groups(&[request.id.clone()]).await?;
    info!(group_id = %request.id, "Removed group");
    Ok(StatusCode::NO_CONTENT.into_response())
}

// ============================================================================
// Listings
// ============================================================================

/// `GET /groups`
pub async fn list_groups_handler<S: Storage>(
    State(state): State<AppState<S>>,
    BearerToken(token): BearerToken,
    ListQuery(params): ListQuery,
) -> RestResult<Response> {
    list_entities(&state, token, ScopeTarget::Global, params, Listing::Groups).await
}

/// `POST /groups/search`
pub async fn search_groups_handler<S: Storage>(
    State(state): State<AppState<S>>,
    BearerToken(token): BearerToken,
    SearchBody(params): SearchBody,
) -> RestResult<Response> {
    list_entities(&state, token, ScopeTarget::Global, params, Listing::Groups).await
}

/// `GET /orgs/{id}/groups`
pub async fn list_org_groups_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    ListQuery(params): ListQuery,
) -> RestResult<Response> {
    list_entities(&state, token, ScopeTarget::Org(&id), params, Listing::Groups).await
}

/// `POST /orgs/{id}/groups/search`
pub async fn search_org_groups_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    SearchBody(params): SearchBody,
) -> RestResult<Response> {
    list_entities(&state, token, ScopeTarget::Org(&id), params, Listing::Groups).await
}
