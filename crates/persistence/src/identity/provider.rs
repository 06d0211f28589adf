//! Identity resolution seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Platform-wide privilege of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformRole {
    /// Platform administrator; sees and manages every tenant.
    Admin,
    /// Ordinary user; scoped by organization and group membership.
    #[default]
    User,
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// User identifier.
    pub id: String,
    /// User email.
    pub email: String,
    /// Platform privilege.
    #[serde(default)]
    pub role: PlatformRole,
}

impl Identity {
    /// Creates an ordinary user identity.
    pub fn user(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role: PlatformRole::User,
        }
    }

    /// Creates a platform administrator identity.
    pub fn admin(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role: PlatformRole::Admin,
        }
    }

    /// Returns `true` for platform administrators.
    pub fn is_platform_admin(&self) -> bool {
        self.role == PlatformRole::Admin
    }
}

/// Resolves credentials to identities.
///
/// # Example
///
/// ```ignore
/// let identity = auth.identify(token).await?;
/// if identity.is_platform_admin() {
///     // unscoped access
/// }
/// ```
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolves a bearer token.
    ///
    /// # Errors
    ///
    /// * `AuthError::InvalidCredential` - If the token is unknown or expired
    async fn identify(&self, token: &str) -> Result<Identity, AuthError>;

    /// Looks up the email of a user, if known.
    async fn email_of(&self, user_id: &str) -> Result<Option<String>, AuthError>;
}
