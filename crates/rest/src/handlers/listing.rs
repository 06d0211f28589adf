//! Shared listing flow for groups, profiles, and things.
//!
//! GET listings and POST searches differ only in where [`ListParams`] come
//! from; both end up here.

use axum::response::Response;
use hub_persistence::core::Storage;
use tracing::debug;

use crate::authz::{ScopeTarget, identify, resolve_scope};
use crate::error::RestResult;
use crate::requests::{ListKind, ListParams, ListRequest, Validate};
use crate::responses::page_response;
use crate::state::AppState;

/// The entity kind a listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Listing {
    Groups,
    Profiles,
    Things,
}

impl Listing {
    fn field(&self) -> &'static str {
        match self {
            Listing::Groups => "groups",
            Listing::Profiles => "profiles",
            Listing::Things => "things",
        }
    }
}

pub(crate) async fn list_entities<S: Storage>(
    state: &AppState<S>,
    token: String,
    target: ScopeTarget<'_>,
    params: ListParams,
    listing: Listing,
) -> RestResult<Response> {
    let request = ListRequest {
        token,
        scope_id: target.id().map(str::to_string),
        params,
        kind: ListKind::Entities,
        default_limit: state.default_limit(),
        max_limit: state.max_limit(),
    };
    request.validate()?;

    let identity = identify(state, &request.token).await?;
    let scope = resolve_scope(state, &identity, target).await?;
    let pm = request.page_metadata();

    debug!(
        entity = listing.field(),
        scope = scope.kind(),
        offset = pm.offset,
        limit = pm.limit,
        "Processing listing"
    );

    let storage = state.storage();
    let field = listing.field();
    match listing {
        Listing::Groups => page_response(storage.list_groups(&scope, &pm).await?, field),
        Listing::Profiles => page_response(storage.list_profiles(&scope, &pm).await?, field),
        Listing::Things => page_response(storage.list_things(&scope, &pm).await?, field),
    }
}
