//! Backup and restore builders.
//!
//! - [`export`] - assembles a scope-bounded [`Backup`](hub_persistence::types::Backup)
//! - [`import`] - decodes a document and stages it as a
//!   [`RestoreBatch`](hub_persistence::types::RestoreBatch)
//!
//! An exported document re-posts unchanged as a restore payload. The only
//! difference between platform and scoped restores is the declared body
//! format, resolved by [`import::decode_backup`].

pub mod export;
pub mod import;

pub use export::build_backup;
pub use import::{RestoreScope, check_scope, decode_backup, prepare};
