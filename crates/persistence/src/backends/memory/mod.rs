//! In-memory backend implementation.
//!
//! Keeps every entity in process memory behind a `parking_lot` lock. Used by
//! the integration tests and by the development server; nothing survives a
//! restart.
//!
//! # Example
//!
//! ```
//! use hub_persistence::backends::memory::InMemoryBackend;
//! use hub_persistence::types::Organization;
//!
//! let backend = InMemoryBackend::new();
//! backend
//!     .insert_org(Organization {
//!         id: "org-1".to_string(),
//!         name: "acme".to_string(),
//!         owner_id: "user-1".to_string(),
//!         created_at: chrono::Utc::now(),
//!     })
//!     .unwrap();
//! ```

mod auth;
mod backend;
mod storage;

pub use auth::InMemoryAuth;
pub use backend::InMemoryBackend;
