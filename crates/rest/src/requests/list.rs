//! Listing and search parameters.
//!
//! GET listings read [`ListParams`] from the query string and POST searches
//! read the same struct from the body, so both forms share one validation
//! and one translation into [`PageMetadata`].

use hub_persistence::types::{Direction, OrderBy, PageMetadata};
use serde::{Deserialize, Serialize};

use super::{Validate, ValidationError, validate_id, validate_token, MAX_NAME_SIZE};

/// Raw filter, sort, and page fields of a listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListParams {
    /// Number of matching items to skip.
    pub offset: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
    /// Name substring filter.
    pub name: Option<String>,
    /// Email filter (memberships only).
    pub email: Option<String>,
    /// Sort key.
    pub order: Option<String>,
    /// Sort direction.
    pub dir: Option<String>,
}

/// What a listing returns; decides the accepted sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Groups, profiles, or things: sortable by name or id.
    Entities,
    /// Group memberships: sortable by email or id.
    Memberships,
}

impl ListKind {
    fn order_by(&self, order: &str) -> Option<OrderBy> {
        match (self, order) {
            (_, "") => Some(OrderBy::Created),
            (_, "id") => Some(OrderBy::Id),
            (ListKind::Entities, "name") => Some(OrderBy::Name),
            (ListKind::Memberships, "email") => Some(OrderBy::Email),
            _ => None,
        }
    }
}

fn direction(dir: &str) -> Option<Direction> {
    match dir {
        "" | "asc" => Some(Direction::Asc),
        "desc" => Some(Direction::Desc),
        _ => None,
    }
}

/// A listing request against one scope.
#[derive(Debug, Clone)]
pub struct ListRequest {
    /// Bearer token.
    pub token: String,
    /// Identifier of the scoping resource, if the listing is scoped.
    pub scope_id: Option<String>,
    /// Listing parameters.
    pub params: ListParams,
    /// Kind of listing.
    pub kind: ListKind,
    /// Limit applied when none is given.
    pub default_limit: u64,
    /// Largest accepted limit.
    pub max_limit: u64,
}

impl Validate for ListRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_token(&self.token)?;
        if let Some(id) = &self.scope_id {
            validate_id(id)?;
        }

        let limit = self.params.limit.unwrap_or(self.default_limit);
        if limit > self.max_limit {
            return Err(ValidationError::LimitSize(self.max_limit));
        }

        if self
            .params
            .name
            .as_deref()
            .is_some_and(|n| n.chars().count() > MAX_NAME_SIZE)
        {
            return Err(ValidationError::NameSize);
        }

        let order = self.params.order.as_deref().unwrap_or_default();
        if self.kind.order_by(order).is_none() {
            return Err(ValidationError::InvalidOrder(order.to_string()));
        }

        let dir = self.params.dir.as_deref().unwrap_or_default();
        if direction(dir).is_none() {
            return Err(ValidationError::InvalidDirection(dir.to_string()));
        }

        Ok(())
    }
}

impl ListRequest {
    /// Translates validated parameters into the canonical page model.
    ///
    /// Unknown sort keys fall back to creation order; call
    /// [`validate`](Validate::validate) first to reject them instead.
    pub fn page_metadata(&self) -> PageMetadata {
        let params = &self.params;
        let order = self
            .kind
            .order_by(params.order.as_deref().unwrap_or_default())
            .unwrap_or_default();
        let dir = direction(params.dir.as_deref().unwrap_or_default()).unwrap_or_default();

        let mut pm = PageMetadata::new(
            params.offset.unwrap_or(0),
            params.limit.unwrap_or(self.default_limit),
        )
        .with_order(order, dir);
        match self.kind {
            ListKind::Entities => {
                if let Some(name) = params.name.as_deref().filter(|n| !n.is_empty()) {
                    pm = pm.with_name(name);
                }
            }
            // Memberships carry no name
            ListKind::Memberships => {
                if let Some(email) = params.email.as_deref().filter(|e| !e.is_empty()) {
                    pm = pm.with_email(email);
                }
            }
        }
        pm
    }
}
