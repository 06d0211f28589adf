//! Core types for the persistence layer.
//!
//! - [`Group`], [`Profile`], [`Thing`], [`GroupMembership`], [`Organization`] - entity records
//! - [`Role`] - the closed membership role set
//! - [`PageMetadata`], [`Page`], [`paginate`] - the listing model
//! - [`ListScope`] - listing and backup boundaries
//! - [`Backup`], [`RestoreBatch`] - export and import documents

mod backup;
mod entities;
mod query;
mod role;
mod scope;

pub use backup::{Backup, RestoreBatch};
pub use entities::{Group, GroupMembership, Metadata, OrgMember, Organization, Profile, Thing};
pub use query::{Direction, Listable, OrderBy, Page, PageMetadata, paginate};
pub use role::{Role, UnknownRole};
pub use scope::ListScope;
