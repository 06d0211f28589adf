//! Error types for the hub API.
//!
//! Every error leaves the server as a status code plus a JSON body
//! `{"code": "<machine code>", "error": "<message>"}`.
//!
//! # Error Mapping
//!
//! | Source | HTTP Status | Code |
//! |--------|-------------|------|
//! | Missing or invalid credential | 401 | `unauthorized` |
//! | Insufficient privilege | 403 | `forbidden` |
//! | `EntityError::NotFound`, `ReferenceError` | 404 | `not_found` |
//! | Request validation, malformed body | 400 | `bad_request` |
//! | `EntityError::AlreadyExists` | 409 | `conflict` |
//! | Wrong `Content-Type` | 415 | `unsupported_media_type` |
//! | `ValidationError::MalformedMetadata` | 422 | `unprocessable_entity` |
//! | `BackendError` | 500 | `internal_error` |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use hub_persistence::error::{
    AuthError, BackendError, EntityError, StorageError, ValidationError as StorageValidationError,
};
use std::fmt;

use crate::requests::ValidationError;

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Missing or unresolvable credential (HTTP 401).
    Unauthorized {
        /// Error message.
        message: String,
    },

    /// Authenticated but not permitted (HTTP 403).
    Forbidden {
        /// Error message.
        message: String,
    },

    /// Entity not found (HTTP 404).
    NotFound {
        /// The entity kind (e.g., "thing").
        entity: String,
        /// The entity ID.
        id: String,
    },

    /// Bad request - validation error (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Duplicate unique key (HTTP 409).
    Conflict {
        /// Error message.
        message: String,
    },

    /// Unsupported media type (HTTP 415).
    UnsupportedMediaType {
        /// The unsupported content type.
        content_type: String,
    },

    /// Stored data could not be interpreted (HTTP 422).
    UnprocessableEntity {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

impl RestError {
    /// Shorthand for a 403 with the given message.
    pub fn forbidden(message: impl Into<String>) -> Self {
        RestError::Forbidden {
            message: message.into(),
        }
    }

    /// Shorthand for a 404 on the given entity.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        RestError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Shorthand for a 400 with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        RestError::BadRequest {
            message: message.into(),
        }
    }

    /// Returns the HTTP status of this error.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            RestError::Forbidden { .. } => StatusCode::FORBIDDEN,
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::Conflict { .. } => StatusCode::CONFLICT,
            RestError::UnsupportedMediaType { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            RestError::UnprocessableEntity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable code of this error.
    pub fn code(&self) -> &'static str {
        match self {
            RestError::Unauthorized { .. } => "unauthorized",
            RestError::Forbidden { .. } => "forbidden",
            RestError::NotFound { .. } => "not_found",
            RestError::BadRequest { .. } => "bad_request",
            RestError::Conflict { .. } => "conflict",
            RestError::UnsupportedMediaType { .. } => "unsupported_media_type",
            RestError::UnprocessableEntity { .. } => "unprocessable_entity",
            RestError::InternalError { .. } => "internal_error",
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::Unauthorized { message } => write!(f, "Unauthorized: {}", message),
            RestError::Forbidden { message } => write!(f, "Forbidden: {}", message),
            RestError::NotFound { entity, id } => write!(f, "{} not found: {}", entity, id),
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::Conflict { message } => write!(f, "Conflict: {}", message),
            RestError::UnsupportedMediaType { content_type } => {
                write!(f, "Unsupported media type: {}", content_type)
            }
            RestError::UnprocessableEntity { message } => {
                write!(f, "Unprocessable entity: {}", message)
            }
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let body = serde_json::json!({
            "code": self.code(),
            "error": self.to_string(),
        });
        (status, Json(body)).into_response()
    }
}

// Implement conversions from storage errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Entity(e) => e.into(),
            StorageError::Reference(e) => RestError::NotFound {
                entity: e.parent.to_string(),
                id: e.parent_id,
            },
            StorageError::Validation(e) => e.into(),
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<EntityError> for RestError {
    fn from(err: EntityError) -> Self {
        match err {
            EntityError::NotFound { entity, id } => RestError::NotFound {
                entity: entity.to_string(),
                id,
            },
            e @ EntityError::AlreadyExists { .. } => RestError::Conflict {
                message: e.to_string(),
            },
        }
    }
}

impl From<StorageValidationError> for RestError {
    fn from(err: StorageValidationError) -> Self {
        match err {
            e @ StorageValidationError::MalformedMetadata { .. } => {
                RestError::UnprocessableEntity {
                    message: e.to_string(),
                }
            }
            e @ StorageValidationError::ForbiddenRole { .. } => RestError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        RestError::InternalError {
            message: err.to_string(),
        }
    }
}

impl From<AuthError> for RestError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredential => RestError::Unauthorized {
                message: err.to_string(),
            },
            AuthError::Unavailable { .. } => RestError::InternalError {
                message: err.to_string(),
            },
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingCredential => RestError::Unauthorized {
                message: err.to_string(),
            },
            other => RestError::BadRequest {
                message: other.to_string(),
            },
        }
    }
}

/// Result type alias for REST operations.
pub type RestResult<T> = Result<T, RestError>;
