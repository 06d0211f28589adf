//! Storage traits and abstractions.
//!
//! The traits split the collaborator by entity kind so a backend can be
//! assembled (or mocked) piece by piece:
//!
//! ```text
//! Storage
//!     ├── OrgStorage         (read-only)
//!     ├── GroupStorage
//!     ├── ProfileStorage
//!     ├── ThingStorage
//!     ├── MembershipStorage
//!     └── RestoreStorage     (ordered batch import)
//! ```

pub mod storage;

pub use storage::{
    GroupStorage, MembershipStorage, OrgStorage, ProfileStorage, RestoreStorage, Storage,
    ThingStorage,
};
