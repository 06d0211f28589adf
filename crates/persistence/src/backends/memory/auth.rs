//! Token table identity provider.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::AuthError;
use crate::identity::{AuthProvider, Identity};

/// An [`AuthProvider`] backed by a static token table.
///
/// Tokens are registered up front; there is no issuance or expiry.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuth {
    tokens: Arc<RwLock<HashMap<String, Identity>>>,
}

impl InMemoryAuth {
    /// Creates an empty token table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps a token to an identity, replacing any previous mapping.
    pub fn register(&self, token: impl Into<String>, identity: Identity) {
        self.tokens.write().insert(token.into(), identity);
    }

    /// Builder-style variant of [`register`](Self::register).
    pub fn with_token(self, token: impl Into<String>, identity: Identity) -> Self {
        self.register(token, identity);
        self
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuth {
    async fn identify(&self, token: &str) -> Result<Identity, AuthError> {
        self.tokens
            .read()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidCredential)
    }

    async fn email_of(&self, user_id: &str) -> Result<Option<String>, AuthError> {
        Ok(self
            .tokens
            .read()
            .values()
            .find(|identity| identity.id == user_id)
            .map(|identity| identity.email.clone()))
    }
}
