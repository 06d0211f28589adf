//! Profile handlers.
//!
//! # Routes
//!
//! | Method | Path | Access |
//! |--------|------|--------|
//! | `POST` | `/groups/{id}/profiles` | edit on the group |
//! | `GET` | `/profiles/{id}` | view |
//! | `PUT` | `/profiles/{id}` | edit |
//! | `DELETE` | `/profiles/{id}` | edit |
//! | `PATCH` | `/profiles` | edit on every profile |
//! | `GET`/`POST` | `/profiles`, `/profiles/search` | scoped by membership |
//! | `GET`/`POST` | `/{groups,orgs}/{id}/profiles[/search]` | view on the scope |

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hub_persistence::core::Storage;
use hub_persistence::types::Profile;
use serde_json::json;
use tracing::{debug, info};

use super::listing::{Listing, list_entities};
use crate::authz::{Access, ScopeTarget, authorize_group, authorize_profile, identify};
use crate::error::RestResult;
use crate::extractors::{BearerToken, JsonBody, ListQuery, SearchBody};
use crate::requests::entities::{ProfileIdsBody, ProfileInput, ProfilesBody};
use crate::requests::{
    CreateProfilesRequest, EntityRequest, RemoveRequest, UpdateProfileRequest, Validate,
};
use crate::state::AppState;

/// Creates profiles in a group.
///
/// `POST /groups/{id}/profiles` with `{"profiles": [...]}`.
pub async fn create_profiles_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(group_id): Path<String>,
    BearerToken(token): BearerToken,
    JsonBody(body): JsonBody<ProfilesBody>,
) -> RestResult<Response> {
    let request = CreateProfilesRequest {
        token,
        group_id,
        profiles: body.profiles,
    };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    authorize_group(&state, &identity, &request.group_id, Access::Edit).await?;

    let group_id = request.group_id.clone();
    let profiles = state
        .storage()
        .save_profiles(request.into_profiles())
        .await?;
    info!(group_id = %group_id, count = profiles.len(), "Created profiles");

    Ok((StatusCode::CREATED, Json(json!({ "profiles": profiles }))).into_response())
}

/// Reads one profile.
pub async fn view_profile_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
) -> RestResult<Response> {
    let request = EntityRequest { token, id };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    let (profile, _) = authorize_profile(&state, &identity, &request.id, Access::View).await?;
    Ok((StatusCode::OK, Json(profile)).into_response())
}

/// Replaces the name, config, and metadata of a profile.
pub async fn update_profile_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    JsonBody(profile): JsonBody<ProfileInput>,
) -> RestResult<Response> {
    let request = UpdateProfileRequest { token, id, profile };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    let (stored, _) = authorize_profile(&state, &identity, &request.id, Access::Edit).await?;

    let input = request.profile;
    let updated = state
        .storage()
        .update_profile(Profile {
            name: input.name,
            config: input.config,
            metadata: input.metadata,
            ..stored
        })
        .await?;
    debug!(profile_id = %updated.id, "Updated profile");

    Ok((StatusCode::OK, Json(updated)).into_response())
}

/// Removes one profile and its things.
pub async fn remove_profile_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
) -> RestResult<Response> {
    let request = EntityRequest { token, id };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    authorize_profile(&state, &identity, &request.id, Access::Edit).await?;

    state.storage().remove_profiles(&[request.id]).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Removes profiles in bulk.
///
/// `PATCH /profiles` with `{"profile_ids": [...]}`.
pub async fn remove_profiles_handler<S: Storage>(
    State(state): State<AppState<S>>,
    BearerToken(token): BearerToken,
    JsonBody(body): JsonBody<ProfileIdsBody>,
) -> RestResult<Response> {
    let request = RemoveRequest {
        token,
        ids: body.profile_ids,
    };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    for id in &request.ids {
        authorize_profile(&state, &identity, id, Access::Edit).await?;
    }

    state.storage().remove_profiles(&request.ids).await?;
    info!(count = request.ids.len(), "Removed profiles");
    Ok(StatusCode::NO_CONTENT.into_response())
}

// ============================================================================
// Listings
// ============================================================================

/// `GET /profiles`
pub async fn list_profiles_handler<S: Storage>(
    State(state): State<AppState<S>>,
    BearerToken(token): BearerToken,
    ListQuery(params): ListQuery,
) -> RestResult<Response> {
    list_entities(&state, token, ScopeTarget::Global, params, Listing::Profiles).await
}

/// `POST /profiles/search`
pub async fn search_profiles_handler<S: Storage>(
    State(state): State<AppState<S>>,
    BearerToken(token): BearerToken,
    SearchBody(params): SearchBody,
) -> RestResult<Response> {
    list_entities(&state, token, ScopeTarget::Global, params, Listing::Profiles).await
}

/// `GET /groups/{id}/profiles`
pub async fn list_group_profiles_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    ListQuery(params): ListQuery,
) -> RestResult<Response> {
    list_entities(&state, token, ScopeTarget::Group(&id), params, Listing::Profiles).await
}

/// `POST /groups/{id}/profiles/search`
pub async fn search_group_profiles_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    SearchBody(params): SearchBody,
) -> RestResult<Response> {
    list_entities(&state, token, ScopeTarget::Group(&id), params, Listing::Profiles).await
}

/// `GET /orgs/{id}/profiles`
pub async fn list_org_profiles_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    ListQuery(params): ListQuery,
) -> RestResult<Response> {
    list_entities(&state, token, ScopeTarget::Org(&id), params, Listing::Profiles).await
}

/// `POST /orgs/{id}/profiles/search`
pub async fn search_org_profiles_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    SearchBody(params): SearchBody,
) -> RestResult<Response> {
    list_entities(&state, token, ScopeTarget::Org(&id), params, Listing::Profiles).await
}
