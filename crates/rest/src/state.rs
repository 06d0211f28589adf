//! Application state for the hub API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the storage collaborator, the identity provider, and the
//! server configuration.

use std::sync::Arc;

use hub_persistence::core::Storage;
use hub_persistence::identity::AuthProvider;

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`Storage`])
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use hub_rest::{AppState, ServerConfig};
/// use hub_persistence::backends::memory::{InMemoryAuth, InMemoryBackend};
///
/// let state = AppState::new(
///     Arc::new(InMemoryBackend::new()),
///     Arc::new(InMemoryAuth::new()),
///     ServerConfig::default(),
/// );
/// assert_eq!(state.max_limit(), 200);
/// ```
pub struct AppState<S> {
    /// The storage backend.
    storage: Arc<S>,

    /// Credential resolution.
    auth: Arc<dyn AuthProvider>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            auth: Arc::clone(&self.auth),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: Storage> AppState<S> {
    /// Creates a new AppState.
    pub fn new(storage: Arc<S>, auth: Arc<dyn AuthProvider>, config: ServerConfig) -> Self {
        Self {
            storage,
            auth,
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the identity provider.
    pub fn auth(&self) -> &dyn AuthProvider {
        self.auth.as_ref()
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the page size used when `limit` is omitted.
    pub fn default_limit(&self) -> u64 {
        self.config.default_limit
    }

    /// Returns the page ceiling for things, profiles, and groups.
    pub fn max_limit(&self) -> u64 {
        self.config.max_limit
    }

    /// Returns the page ceiling for memberships.
    pub fn max_membership_limit(&self) -> u64 {
        self.config.max_membership_limit
    }
}
