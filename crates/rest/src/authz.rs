//! Authorization scoping.
//!
//! Every scoped operation first loads the scoping resource and only then
//! checks the caller's access, so a missing resource is always a 404 and an
//! existing resource the caller may not touch is always a 403.
//!
//! # Access levels
//!
//! | Source | Group | Organization |
//! |--------|-------|--------------|
//! | Platform admin | admin | admin |
//! | Group owner | admin | - |
//! | Org owner or org `admin` | admin | admin |
//! | Org `editor` or `viewer` | view | view |
//! | Group `admin` membership | admin | - |
//! | Group `editor` membership | edit | - |
//! | Group `viewer` membership | view | - |

use hub_persistence::core::Storage;
use hub_persistence::identity::Identity;
use hub_persistence::types::{Group, ListScope, Organization, Profile, Role, Thing};
use tracing::warn;

use crate::error::{RestError, RestResult};
use crate::state::AppState;

/// Privilege needed by an operation, from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Access {
    /// Read the resource and what it contains.
    View,
    /// Create, modify, and remove contents.
    Edit,
    /// Manage memberships, backups, and the resource itself.
    Admin,
}

fn role_access(role: Role) -> Access {
    match role {
        Role::Owner | Role::Admin => Access::Admin,
        Role::Editor => Access::Edit,
        Role::Viewer => Access::View,
    }
}

/// Computes a caller's access to a group.
///
/// `org_role` is the caller's role in the group's organization and
/// `member_role` the caller's stored group membership.
pub fn group_access(
    identity: &Identity,
    group: &Group,
    org_role: Option<Role>,
    member_role: Option<Role>,
) -> Option<Access> {
    if identity.is_platform_admin() || group.owner_id == identity.id {
        return Some(Access::Admin);
    }
    let from_org = org_role.map(|r| {
        if r.is_admin() {
            Access::Admin
        } else {
            Access::View
        }
    });
    from_org.max(member_role.map(role_access))
}

/// Computes a caller's access to an organization.
pub fn org_access(identity: &Identity, org: &Organization, role: Option<Role>) -> Option<Access> {
    if identity.is_platform_admin() || org.owner_id == identity.id {
        return Some(Access::Admin);
    }
    role.map(|r| {
        if r.is_admin() {
            Access::Admin
        } else {
            Access::View
        }
    })
}

fn require(
    identity: &Identity,
    granted: Option<Access>,
    needed: Access,
    entity: &str,
    id: &str,
) -> RestResult<()> {
    if granted.is_some_and(|a| a >= needed) {
        return Ok(());
    }
    warn!(user_id = %identity.id, entity, id, ?needed, ?granted, "Access denied");
    Err(RestError::forbidden(format!(
        "insufficient privileges on {} {}",
        entity, id
    )))
}

/// Resolves the caller of a request.
///
/// # Errors
///
/// * `RestError::Unauthorized` - If the token does not resolve
pub async fn identify<S: Storage>(state: &AppState<S>, token: &str) -> RestResult<Identity> {
    Ok(state.auth().identify(token).await?)
}

/// Loads a group and checks the caller holds `needed` on it.
pub async fn authorize_group<S: Storage>(
    state: &AppState<S>,
    identity: &Identity,
    group_id: &str,
    needed: Access,
) -> RestResult<Group> {
    let storage = state.storage();
    let group = storage
        .retrieve_group(group_id)
        .await?
        .ok_or_else(|| RestError::not_found("group", group_id))?;

    let org_role = storage.retrieve_org_role(&group.org_id, &identity.id).await?;
    let member_role = storage
        .retrieve_membership_role(&group.id, &identity.id)
        .await?;
    let granted = group_access(identity, &group, org_role, member_role);

    require(identity, granted, needed, "group", group_id)?;
    Ok(group)
}

/// Loads an organization and checks the caller holds `needed` on it.
pub async fn authorize_org<S: Storage>(
    state: &AppState<S>,
    identity: &Identity,
    org_id: &str,
    needed: Access,
) -> RestResult<Organization> {
    let storage = state.storage();
    let org = storage
        .retrieve_org(org_id)
        .await?
        .ok_or_else(|| RestError::not_found("organization", org_id))?;

    let role = storage.retrieve_org_role(org_id, &identity.id).await?;
    require(identity, org_access(identity, &org, role), needed, "organization", org_id)?;
    Ok(org)
}

/// Loads a profile and checks the caller holds `needed` on its group.
pub async fn authorize_profile<S: Storage>(
    state: &AppState<S>,
    identity: &Identity,
    profile_id: &str,
    needed: Access,
) -> RestResult<(Profile, Group)> {
    let profile = state
        .storage()
        .retrieve_profile(profile_id)
        .await?
        .ok_or_else(|| RestError::not_found("profile", profile_id))?;
    let group = authorize_group(state, identity, &profile.group_id, needed).await?;
    Ok((profile, group))
}

/// Loads a thing and checks the caller holds `needed` on its group.
pub async fn authorize_thing<S: Storage>(
    state: &AppState<S>,
    identity: &Identity,
    thing_id: &str,
    needed: Access,
) -> RestResult<(Thing, Group)> {
    let thing = state
        .storage()
        .retrieve_thing(thing_id)
        .await?
        .ok_or_else(|| RestError::not_found("thing", thing_id))?;
    let group = authorize_group(state, identity, &thing.group_id, needed).await?;
    Ok((thing, group))
}

/// The resource a listing is scoped by.
#[derive(Debug, Clone, Copy)]
pub enum ScopeTarget<'a> {
    /// Everything the caller can see.
    Global,
    /// One organization.
    Org(&'a str),
    /// One group.
    Group(&'a str),
    /// One profile.
    Profile(&'a str),
}

impl ScopeTarget<'_> {
    /// Identifier of the scoping resource, if any.
    pub fn id(&self) -> Option<&str> {
        match self {
            ScopeTarget::Global => None,
            ScopeTarget::Org(id) | ScopeTarget::Group(id) | ScopeTarget::Profile(id) => Some(*id),
        }
    }
}

/// Turns a listing target into a storage scope, checking view access.
///
/// Platform admins see every tenant globally; other callers see the
/// organizations they own or belong to.
pub async fn resolve_scope<S: Storage>(
    state: &AppState<S>,
    identity: &Identity,
    target: ScopeTarget<'_>,
) -> RestResult<ListScope> {
    match target {
        ScopeTarget::Global if identity.is_platform_admin() => Ok(ListScope::All),
        ScopeTarget::Global => {
            let orgs = state.storage().retrieve_member_orgs(&identity.id).await?;
            Ok(ListScope::Orgs(orgs))
        }
        ScopeTarget::Org(id) => {
            authorize_org(state, identity, id, Access::View).await?;
            Ok(ListScope::Org(id.to_string()))
        }
        ScopeTarget::Group(id) => {
            authorize_group(state, identity, id, Access::View).await?;
            Ok(ListScope::Group(id.to_string()))
        }
        ScopeTarget::Profile(id) => {
            authorize_profile(state, identity, id, Access::View).await?;
            Ok(ListScope::Profile(id.to_string()))
        }
    }
}
