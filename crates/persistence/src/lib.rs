//! Device Hub Persistence Layer
//!
//! This crate holds the domain model of the device hub and the storage
//! collaborator the HTTP layer talks to: organizations own groups, groups own
//! profiles, profiles own things, and group memberships grant users a role
//! within a group.
//!
//! # Architecture
//!
//! - [`types`] - Entities, roles, the listing model, scopes, and backup documents
//! - [`error`] - Error types for all operations
//! - [`core`] - Storage traits, one per entity kind
//! - [`identity`] - Credential resolution seam
//! - [`backends`] - Backend implementations (in-memory)
//!
//! # Quick Start
//!
//! ```
//! use hub_persistence::backends::memory::InMemoryBackend;
//! use hub_persistence::core::{GroupStorage, ThingStorage};
//! use hub_persistence::types::{Group, ListScope, Organization, PageMetadata};
//!
//! # tokio_test::block_on(async {
//! let backend = InMemoryBackend::new();
//! backend.insert_org(Organization {
//!     id: "org-1".to_string(),
//!     name: "acme".to_string(),
//!     owner_id: "user-1".to_string(),
//!     created_at: chrono::Utc::now(),
//! })?;
//!
//! let groups = backend
//!     .save_groups(vec![Group {
//!         id: String::new(),
//!         name: "plant".to_string(),
//!         org_id: "org-1".to_string(),
//!         owner_id: "user-1".to_string(),
//!         description: String::new(),
//!         metadata: Default::default(),
//!         created_at: chrono::Utc::now(),
//!         updated_at: chrono::Utc::now(),
//!     }])
//!     .await?;
//! assert!(!groups[0].id.is_empty());
//!
//! let page = backend
//!     .list_things(&ListScope::Group(groups[0].id.clone()), &PageMetadata::new(0, 10))
//!     .await?;
//! assert_eq!(page.total, 0);
//! # Ok::<(), hub_persistence::StorageError>(())
//! # }).unwrap();
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod identity;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{AuthError, StorageError, StorageResult};
pub use identity::{AuthProvider, Identity, PlatformRole};
pub use types::{ListScope, Page, PageMetadata, Role};

// Re-export core traits
pub use core::{
    GroupStorage, MembershipStorage, OrgStorage, ProfileStorage, RestoreStorage, Storage,
    ThingStorage,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
