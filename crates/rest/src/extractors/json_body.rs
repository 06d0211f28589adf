//! Typed JSON body extractor.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::error::RestError;

/// A JSON request body.
///
/// Behaves like [`axum::Json`] but rejects with [`RestError`]: a missing JSON
/// content type is a 415, anything else that fails to parse is a 400.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = crate::middleware::content_type::content_type(req.headers())
            .unwrap_or("none")
            .to_string();

        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(JsonRejection::MissingJsonContentType(_)) => {
                Err(RestError::UnsupportedMediaType { content_type })
            }
            Err(rejection) => Err(RestError::bad_request(rejection.body_text())),
        }
    }
}
