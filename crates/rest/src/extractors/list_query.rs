//! Listing parameter extractors.
//!
//! [`ListQuery`] and [`SearchBody`] produce the same [`ListParams`], so a
//! GET listing and its POST search counterpart share validation and
//! pagination.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};

use crate::error::RestError;
use crate::middleware::content_type::{BodyFormat, require_format};
use crate::requests::ListParams;

/// Listing parameters from `?offset&limit&name&email&order&dir`.
#[derive(Debug, Clone, Default)]
pub struct ListQuery(pub ListParams);

impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<ListParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| RestError::bad_request(e.body_text()))?;
        Ok(ListQuery(params))
    }
}

/// Listing parameters from a JSON search body.
///
/// A missing or blank body is an unfiltered first page. A non-blank body must
/// be declared as JSON.
#[derive(Debug, Clone, Default)]
pub struct SearchBody(pub ListParams);

impl<S> FromRequest<S> for SearchBody
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let headers = req.headers().clone();
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| RestError::bad_request(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(SearchBody(ListParams::default()));
        }

        require_format(&headers, BodyFormat::Json)?;
        let params = serde_json::from_slice(&bytes)
            .map_err(|e| RestError::bad_request(format!("Invalid JSON: {}", e)))?;
        Ok(SearchBody(params))
    }
}
