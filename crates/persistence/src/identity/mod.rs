//! Caller identity.
//!
//! Credentials are issued elsewhere; this module only defines how the API
//! layer turns a presented token into an [`Identity`]. Every operation that
//! touches tenant data runs with an identity resolved through an
//! [`AuthProvider`].

mod provider;

pub use provider::{AuthProvider, Identity, PlatformRole};
