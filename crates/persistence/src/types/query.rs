//! Canonical filter, sort, and page model shared by every listing.
//!
//! Backends receive a validated [`PageMetadata`] and return a [`Page`].
//! [`paginate`] is the reference implementation of the listing contract:
//! filter, order deterministically, count, then slice `[offset, offset+limit)`.
//! Items are expected in creation order on input; that order is the fallback
//! when no sort key is requested.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::entities::{Group, GroupMembership, Profile, Thing};

/// Sort key of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBy {
    /// Creation order.
    #[default]
    Created,
    /// Entity name.
    Name,
    /// Entity identifier.
    Id,
    /// Member email (memberships only).
    Email,
}

/// Sort direction of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// Filter and page parameters of a listing request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageMetadata {
    /// Number of matching items to skip.
    pub offset: u64,
    /// Maximum number of items to return.
    pub limit: u64,
    /// Case-insensitive substring filter on the name.
    pub name: Option<String>,
    /// Exact filter on the member email.
    pub email: Option<String>,
    /// Sort key.
    pub order: OrderBy,
    /// Sort direction.
    pub direction: Direction,
}

impl PageMetadata {
    /// Creates an unfiltered page.
    pub fn new(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit,
            ..Default::default()
        }
    }

    /// Sets the name filter.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the email filter.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the sort key and direction.
    pub fn with_order(mut self, order: OrderBy, direction: Direction) -> Self {
        self.order = order;
        self.direction = direction;
        self
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Cardinality of the full matching set.
    pub total: u64,
    /// Offset actually applied.
    pub offset: u64,
    /// Limit actually applied.
    pub limit: u64,
    /// The page's items.
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Maps every item of the page.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            total: self.total,
            offset: self.offset,
            limit: self.limit,
            items: self.items.into_iter().map(f).collect(),
        }
    }
}

/// An entity that can be filtered and sorted by [`paginate`].
pub trait Listable {
    /// Unique identifier, used as the final tie-breaker.
    fn id(&self) -> &str;

    /// Value used for the name filter and name sort.
    fn name(&self) -> &str {
        ""
    }

    /// Value used for the email filter and email sort.
    fn email(&self) -> &str {
        ""
    }
}

impl Listable for Group {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Listable for Profile {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Listable for Thing {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Listable for GroupMembership {
    fn id(&self) -> &str {
        &self.member_id
    }

    fn email(&self) -> &str {
        &self.email
    }
}

fn matches<T: Listable>(item: &T, pm: &PageMetadata) -> bool {
    if let Some(name) = pm.name.as_deref().filter(|n| !n.is_empty()) {
        if !item.name().to_lowercase().contains(&name.to_lowercase()) {
            return false;
        }
    }
    if let Some(email) = pm.email.as_deref().filter(|e| !e.is_empty()) {
        if item.email() != email {
            return false;
        }
    }
    true
}

fn compare<T: Listable>(a: &T, b: &T, order: OrderBy) -> Ordering {
    match order {
        OrderBy::Created => Ordering::Equal,
        OrderBy::Id => a.id().cmp(b.id()),
        OrderBy::Name => a.name().cmp(b.name()).then_with(|| a.id().cmp(b.id())),
        OrderBy::Email => a.email().cmp(b.email()).then_with(|| a.id().cmp(b.id())),
    }
}

/// Filters, orders, and slices items given in creation order.
///
/// # Examples
///
/// ```
/// use hub_persistence::types::{paginate, PageMetadata, Profile};
///
/// let profiles: Vec<Profile> = (1..=3)
///     .map(|i| Profile {
///         id: format!("p{i}"),
///         name: format!("profile_{i}"),
///         group_id: "g1".to_string(),
///         config: Default::default(),
///         metadata: Default::default(),
///     })
///     .collect();
///
/// let page = paginate(profiles, &PageMetadata::new(1, 1));
/// assert_eq!(page.total, 3);
/// assert_eq!(page.items[0].id, "p2");
/// ```
pub fn paginate<T, I>(items: I, pm: &PageMetadata) -> Page<T>
where
    T: Listable,
    I: IntoIterator<Item = T>,
{
    let mut matching: Vec<T> = items.into_iter().filter(|i| matches(i, pm)).collect();

    // sort_by is stable, so creation order survives as the tie-breaker
    matching.sort_by(|a, b| compare(a, b, pm.order));
    if pm.direction == Direction::Desc {
        matching.reverse();
    }

    let total = matching.len() as u64;
    let items = matching
        .into_iter()
        .skip(usize::try_from(pm.offset).unwrap_or(usize::MAX))
        .take(usize::try_from(pm.limit).unwrap_or(usize::MAX))
        .collect();

    Page {
        total,
        offset: pm.offset,
        limit: pm.limit,
        items,
    }
}
