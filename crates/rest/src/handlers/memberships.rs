//! Group membership handlers.
//!
//! Stored memberships never carry the owner role. Listings merge the group's
//! owner back in through [`with_owner`], so clients see one membership set.
//!
//! # Routes
//!
//! | Method | Path | Access |
//! |--------|------|--------|
//! | `POST` | `/groups/{id}/memberships` | admin |
//! | `PUT` | `/groups/{id}/memberships` | admin |
//! | `PATCH` | `/groups/{id}/memberships` | admin |
//! | `GET` | `/groups/{id}/memberships` | view |

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hub_persistence::core::Storage;
use hub_persistence::types::{Group, GroupMembership, ListScope, paginate};
use tracing::{debug, info};

use crate::authz::{Access, authorize_group, identify};
use crate::error::RestResult;
use crate::extractors::{BearerToken, JsonBody, ListQuery};
use crate::requests::memberships::{MemberIdsBody, MembershipsBody};
use crate::requests::{
    ListKind, ListRequest, MembershipsRequest, RemoveMembershipsRequest, Validate,
};
use crate::responses::page_response;
use crate::state::AppState;

/// Merges a group's owner into its stored memberships.
///
/// The owner entry comes first; stored rows follow in creation order.
pub fn with_owner(
    group: &Group,
    owner_email: impl Into<String>,
    stored: Vec<GroupMembership>,
) -> Vec<GroupMembership> {
    let mut merged = Vec::with_capacity(stored.len() + 1);
    merged.push(GroupMembership::owner(group, owner_email));
    merged.extend(stored.into_iter().filter(|m| m.member_id != group.owner_id));
    merged
}

/// Fills missing member emails from the identity provider.
async fn fill_emails<S: Storage>(
    state: &AppState<S>,
    memberships: &mut [GroupMembership],
) -> RestResult<()> {
    for membership in memberships.iter_mut().filter(|m| m.email.is_empty()) {
        if let Some(email) = state.auth().email_of(&membership.member_id).await? {
            membership.email = email;
        }
    }
    Ok(())
}

/// Grants roles in a group.
///
/// `POST /groups/{id}/memberships` with `{"group_memberships": [...]}`.
/// The owner role is never accepted.
pub async fn create_memberships_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(group_id): Path<String>,
    BearerToken(token): BearerToken,
    JsonBody(body): JsonBody<MembershipsBody>,
) -> RestResult<Response> {
    let request = MembershipsRequest {
        token,
        group_id,
        memberships: body.group_memberships,
    };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    authorize_group(&state, &identity, &request.group_id, Access::Admin).await?;

    let group_id = request.group_id.clone();
    let mut memberships = request.into_memberships()?;
    fill_emails(&state, &mut memberships).await?;

    let count = memberships.len();
    state.storage().save_memberships(memberships).await?;
    info!(group_id = %group_id, count, "Created memberships");

    Ok(StatusCode::CREATED.into_response())
}

/// Changes roles in a group.
///
/// `PUT /groups/{id}/memberships` with `{"group_memberships": [...]}`.
pub async fn update_memberships_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(group_id): Path<String>,
    BearerToken(token): BearerToken,
    JsonBody(body): JsonBody<MembershipsBody>,
) -> RestResult<Response> {
    let request = MembershipsRequest {
        token,
        group_id,
        memberships: body.group_memberships,
    };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    authorize_group(&state, &identity, &request.group_id, Access::Admin).await?;

    let group_id = request.group_id.clone();
    let memberships = request.into_memberships()?;
    let count = memberships.len();
    state.storage().update_memberships(memberships).await?;
    info!(group_id = %group_id, count, "Updated memberships");

    Ok(StatusCode::OK.into_response())
}

/// Revokes memberships.
///
/// `PATCH /groups/{id}/memberships` with `{"member_ids": [...]}`.
pub async fn remove_memberships_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(group_id): Path<String>,
    BearerToken(token): BearerToken,
    JsonBody(body): JsonBody<MemberIdsBody>,
) -> RestResult<Response> {
    let request = RemoveMembershipsRequest {
        token,
        group_id,
        member_ids: body.member_ids,
    };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    authorize_group(&state, &identity, &request.group_id, Access::Admin).await?;

    state
        .storage()
        .remove_memberships(&request.group_id, &request.member_ids)
        .await?;
    info!(
        group_id = %request.group_id,
        count = request.member_ids.len(),
        "Removed memberships"
    );

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Lists a group's memberships, owner included.
///
/// `GET /groups/{id}/memberships?email&offset&limit&order&dir`
pub async fn list_memberships_handler<S: Storage>(
    State(state): State<AppState<S>>,
    Path(group_id): Path<String>,
    BearerToken(token): BearerToken,
    ListQuery(params): ListQuery,
) -> RestResult<Response> {
    let request = ListRequest {
        token,
        scope_id: Some(group_id),
        params,
        kind: ListKind::Memberships,
        default_limit: state.default_limit(),
        max_limit: state.max_membership_limit(),
    };
    request.validate()?;

    let identity = identify(&state, &request.token).await?;
    let group_id = request.scope_id.as_deref().unwrap_or_default();
    let group = authorize_group(&state, &identity, group_id, Access::View).await?;

    let stored = state
        .storage()
        .retrieve_all_memberships(&ListScope::Group(group.id.clone()))
        .await?;
    let owner_email = state
        .auth()
        .email_of(&group.owner_id)
        .await?
        .unwrap_or_default();

    let pm = request.page_metadata();
    let page = paginate(with_owner(&group, owner_email, stored), &pm);
    debug!(group_id = %group.id, total = page.total, "Listed memberships");

    page_response(page, "group_memberships")
}
