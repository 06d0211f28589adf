//! Thing handlers.
//!
//! # Routes
//!
//! | Method | Path | Access |
//! |--------|------|--------|
//! | `POST` | `/profiles/{id}/things` | edit on the profile's group |
//! | `GET` | `/things/{id}` | view |
//! | `PUT` | `/things/{id}` | edit |
//! | `DELETE` | `/things/{id}` | edit |
//! | `PATCH` | `/things` | edit on every thing |
//! | `PATCH` | `/things/{id}/key` | edit |
//! | `PATCH` | `/things/{id}/profile` | edit on both groups |
//! | `GET` | `/metadata` | thing key |
//! | `GET`/`POST` | `/things`, `/things/search` | scoped by membership |
//! | `GET`/`POST` | `/{groups,profiles,orgs}/{id}/things[/search]` | view on the scope |

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hub_persistence::core::Storage;
use hub_persistence::types::Thing;
use serde_json::json;
use tracing::{debug, info};

use super::listing::{Listing, list_entities};
use crate::authz::{Access, ScopeTarget, authorize_profile, authorize_thing, identify};
use crate::error::{RestError, RestResult};
use crate::extractors::{BearerToken, JsonBody, ListQuery, SearchBody, ThingKey};
use crate::requests::entities::{KeyBody, ProfileRefBody, ThingIdsBody, ThingInput, ThingsBody};
use crate::requests::{
    CreateThingsRequest, EntityRequest, IdentifyRequest, RemoveRequest, ReparentThingRequest,
    UpdateKeyRequest, UpdateThingRequest, Validate,
};
use crate::state::AppState;

/// Creates things under a profile.
///
/// `POST /profiles/{id}/things` with `{"things": [...]}`. Missing ids and
/// keys are generated. Responds `201 Created` with the stored things.
pub async fn create_things_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(profile_id): Path<String>,
    BearerToken(token): BearerToken,
    JsonBody(body): JsonBody<ThingsBody>,
) -> RestResult<Response> {
    let request = CreateThingsRequest {
        token,
        profile_id,
        things: body.things,
    };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    authorize_profile(&state, &identity, &request.profile_id, Access::Edit).await?;

    let profile_id = request.profile_id.clone();
    let things = state.storage().save_things(request.into_things()).await?;
    info!(profile_id = %profile_id, count = things.len(), "Created things");

    Ok((StatusCode::CREATED, Json(json!({ "things": things }))).into_response())
}

/// Reads one thing.
pub async fn view_thing_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
) -> RestResult<Response> {
    let request = EntityRequest { token, id };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    let (thing, _) = authorize_thing(&state, &identity, &request.id, Access::View).await?;
    Ok((StatusCode::OK, Json(thing)).into_response())
}

/// Updates the name, external key, and metadata of a thing.
///
/// A non-empty `key` also replaces the primary key. An empty
/// `external_key` clears it.
pub async fn update_thing_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    JsonBody(thing): JsonBody<ThingInput>,
) -> RestResult<Response> {
    let request = UpdateThingRequest { token, id, thing };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    let (stored, _) = authorize_thing(&state, &identity, &request.id, Access::Edit).await?;

    let input = request.thing;
    let updated = state
        .storage()
        .update_thing(Thing {
            name: input.name,
            key: input.key,
            external_key: input.external_key.filter(|k| !k.is_empty()),
            metadata: input.metadata,
            ..stored
        })
        .await?;
    debug!(thing_id = %updated.id, "Updated thing");

    Ok((StatusCode::OK, Json(updated)).into_response())
}

/// Replaces the primary key of a thing.
///
/// `PATCH /things/{id}/key` with `{"key": "..."}`. A key held by another
/// thing is a conflict.
pub async fn update_key_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    JsonBody(body): JsonBody<KeyBody>,
) -> RestResult<Response> {
    let request = UpdateKeyRequest {
        token,
        id,
        key: body.key,
    };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    let (stored, _) = authorize_thing(&state, &identity, &request.id, Access::Edit).await?;

    let updated = state
        .storage()
        .update_thing(Thing {
            key: request.key,
            ..stored
        })
        .await?;
    info!(thing_id = %updated.id, "Rotated thing key");

    Ok((StatusCode::OK, Json(updated)).into_response())
}

/// Moves a thing to another profile.
///
/// `PATCH /things/{id}/profile` with `{"profile_id": "..."}`. The target may
/// belong to another group of the same organization; the thing's group
/// follows the profile.
pub async fn reparent_thing_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    JsonBody(body): JsonBody<ProfileRefBody>,
) -> RestResult<Response> {
    let request = ReparentThingRequest {
        token,
        id,
        profile_id: body.profile_id,
    };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    let (stored, source) = authorize_thing(&state, &identity, &request.id, Access::Edit).await?;
    let (_, target) =
        authorize_profile(&state, &identity, &request.profile_id, Access::Edit).await?;

    if source.org_id != target.org_id {
        return Err(RestError::bad_request(format!(
            "profile {} belongs to another organization",
            request.profile_id
        )));
    }

    let updated = state
        .storage()
        .update_thing(Thing {
            profile_id: request.profile_id,
            ..stored
        })
        .await?;
    info!(
        thing_id = %updated.id,
        from_group = %source.id,
        to_group = %updated.group_id,
        "Moved thing"
    );

    Ok((StatusCode::OK, Json(updated)).into_response())
}

/// Removes one thing.
pub async fn remove_thing_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
) -> RestResult<Response> {
    let request = EntityRequest { token, id };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    authorize_thing(&state, &identity, &request.id, Access::Edit).await?;

    state.storage().remove_things(&[request.id]).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Removes things in bulk.
///
/// `PATCH /things` with `{"thing_ids": [...]}`. Nothing is removed unless
/// the caller may edit every listed thing.
pub async fn remove_things_handler<S: Storage>(
    State(state): State<AppState<S>>,
    BearerToken(token): BearerToken,
    JsonBody(body): JsonBody<ThingIdsBody>,
) -> RestResult<Response> {
    let request = RemoveRequest {
        token,
        ids: body.thing_ids,
    };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    for id in &request.ids {
        authorize_thing(&state, &identity, id, Access::Edit).await?;
    }

    state.storage().remove_things(&request.ids).await?;
    info!(count = request.ids.len(), "Removed things");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Identifies a device by its key.
///
/// `GET /metadata` with `Authorization: Thing <key>`. Responds with the
/// thing's id and metadata; an unknown key is a 401.
pub async fn thing_metadata_handler<S: Storage>(
    State(state): State<AppState<S>>,
    ThingKey(key): ThingKey,
) -> RestResult<Response> {
    let request = IdentifyRequest { key };
    request.validate()?;

    let thing = state
        .storage()
        .retrieve_thing_by_key(&request.key)
        .await?
        .ok_or_else(|| RestError::Unauthorized {
            message: "unknown thing key".to_string(),
        })?;

    Ok((
        StatusCode::OK,
        Json(json!({ "id": thing.id, "metadata": thing.metadata })),
    )
        .into_response())
}

// ============================================================================
// Listings
// ============================================================================

/// `GET /things`
pub async fn list_things_handler<S: Storage>(
    State(state): State<AppState<S>>,
    BearerToken(token): BearerToken,
    ListQuery(params): ListQuery,
) -> RestResult<Response> {
    list_entities(&state, token, ScopeTarget::Global, params, Listing::Things).await
}

/// `POST /things/search`
pub async fn search_things_handler<S: Storage>(
    State(state): State<AppState<S>>,
    BearerToken(token): BearerToken,
    SearchBody(params): SearchBody,
) -> RestResult<Response> {
    list_entities(&state, token, ScopeTarget::Global, params, Listing::Things).await
}

/// `GET /groups/{id}/things`
pub async fn list_group_things_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    ListQuery(params): ListQuery,
) -> RestResult<Response> {
    list_entities(&state, token, ScopeTarget::Group(&id), params, Listing::Things).await
}

/// `POST /groups/{id}/things/search`
pub async fn search_group_things_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    SearchBody(params): SearchBody,
) -> RestResult<Response> {
    list_entities(&state, token, ScopeTarget::Group(&id), params, Listing::Things).await
}

/// `GET /profiles/{id}/things`
pub async fn list_profile_things_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    ListQuery(params): ListQuery,
) -> RestResult<Response> {
    list_entities(&state, token, ScopeTarget::Profile(&id), params, Listing::Things).await
}

/// `POST /profiles/{id}/things/search`
pub async fn search_profile_things_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    SearchBody(params): SearchBody,
) -> RestResult<Response> {
    list_entities(&state, token, ScopeTarget::Profile(&id), params, Listing::Things).await
}

/// `GET /orgs/{id}/things`
pub async fn list_org_things_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    ListQuery(params): ListQuery,
) -> RestResult<Response> {
    list_entities(&state, token, ScopeTarget::Org(&id), params, Listing::Things).await
}

/// `POST /orgs/{id}/things/search`
pub async fn search_org_things_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    BearerToken(token): BearerToken,
    SearchBody(params): SearchBody,
) -> RestResult<Response> {
    list_entities(&state, token, ScopeTarget::Org(&id), params, Listing::Things).await
}
