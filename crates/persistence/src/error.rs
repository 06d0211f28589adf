//! Error types for the persistence layer.
//!
//! Errors are grouped by what went wrong: the entity itself (missing or
//! duplicated), a dangling parent reference, a payload the backend could not
//! accept, or a failure inside the backend. Identity resolution has its own
//! [`AuthError`] since it is served by a separate collaborator.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Entity state errors
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Dangling references between entities
    #[error(transparent)]
    Reference(#[from] ReferenceError),

    /// Payloads the backend refused
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors related to the state of a single entity.
#[derive(Error, Debug)]
pub enum EntityError {
    /// The requested entity was not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// An entity with the same unique key already exists.
    #[error("{entity} already exists: {key}")]
    AlreadyExists { entity: &'static str, key: String },
}

/// A dependent entity names a parent that does not exist.
#[derive(Error, Debug)]
#[error("{entity} {id} references missing {parent} {parent_id}")]
pub struct ReferenceError {
    pub entity: &'static str,
    pub id: String,
    pub parent: &'static str,
    pub parent_id: String,
}

/// Errors raised when stored or submitted data cannot be interpreted.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Stored metadata could not be decoded.
    ///
    /// Raised by backends that store metadata as encoded text; the in-memory
    /// backend keeps decoded values and never returns it.
    #[error("malformed metadata on {entity} {id}: {message}")]
    MalformedMetadata {
        entity: &'static str,
        id: String,
        message: String,
    },

    /// A role that may not be stored was submitted.
    #[error("role {role} cannot be stored for member {member_id}")]
    ForbiddenRole { member_id: String, role: String },
}

/// Errors originating from the backend itself.
#[derive(Error, Debug)]
pub enum BackendError {
    /// Identifier generation failed. The in-memory backend never returns it.
    #[error("failed to generate identifier: {message}")]
    IdGeneration { message: String },

    /// The backend is unavailable. The in-memory backend never returns it.
    #[error("backend unavailable: {backend_name}: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Internal error.
    #[error("internal error: {message}")]
    Internal { message: String },
}

/// Errors returned by an [`AuthProvider`](crate::identity::AuthProvider).
#[derive(Error, Debug)]
pub enum AuthError {
    /// The credential does not resolve to an identity.
    #[error("invalid credential")]
    InvalidCredential,

    /// The identity provider could not be reached.
    #[error("identity provider unavailable: {message}")]
    Unavailable { message: String },
}

impl StorageError {
    /// Shorthand for a not-found entity error.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        EntityError::NotFound {
            entity,
            id: id.into(),
        }
        .into()
    }

    /// Shorthand for a duplicate-key entity error.
    pub fn already_exists(entity: &'static str, key: impl Into<String>) -> Self {
        EntityError::AlreadyExists {
            entity,
            key: key.into(),
        }
        .into()
    }

    /// Returns `true` if this error reports a missing entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Entity(EntityError::NotFound { .. }))
    }
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
