//! Listing scopes.

/// The boundary a listing, backup, or restore applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    /// Every entity on the platform.
    All,
    /// Entities in any of the given organizations.
    Orgs(Vec<String>),
    /// Entities in one organization.
    Org(String),
    /// Entities in one group.
    Group(String),
    /// Things of one profile.
    Profile(String),
}

impl ListScope {
    /// Returns a short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ListScope::All => "all",
            ListScope::Orgs(_) => "orgs",
            ListScope::Org(_) => "org",
            ListScope::Group(_) => "group",
            ListScope::Profile(_) => "profile",
        }
    }
}
