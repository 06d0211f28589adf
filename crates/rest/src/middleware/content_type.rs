//! Request body format detection.
//!
//! Bodies are JSON in every case; what differs is the declared media type.
//! Structured endpoints take `application/json`, file-style restore endpoints
//! take `application/octet-stream`.

use axum::http::{HeaderMap, header};
use mime::Mime;

use crate::error::{RestError, RestResult};

/// Declared format of a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// `application/json` (any `+json` suffix is accepted)
    Json,
    /// `application/octet-stream`
    OctetStream,
}

impl BodyFormat {
    /// Returns the MIME type string for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            BodyFormat::Json => mime::APPLICATION_JSON.essence_str(),
            BodyFormat::OctetStream => mime::APPLICATION_OCTET_STREAM.essence_str(),
        }
    }

    /// Parses a Content-Type value, ignoring parameters such as `charset`.
    pub fn parse(content_type: &str) -> Option<Self> {
        let mime: Mime = content_type.trim().parse().ok()?;
        match (mime.type_(), mime.subtype(), mime.suffix()) {
            (mime::APPLICATION, mime::JSON, _) | (mime::APPLICATION, _, Some(mime::JSON)) => {
                Some(BodyFormat::Json)
            }
            (mime::APPLICATION, mime::OCTET_STREAM, _) => Some(BodyFormat::OctetStream),
            _ => None,
        }
    }
}

/// Returns the raw Content-Type header, if present and readable.
pub fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
}

/// Requires the request to declare `expected`.
///
/// # Errors
///
/// * `RestError::UnsupportedMediaType` - If the header is missing or names another format
pub fn require_format(headers: &HeaderMap, expected: BodyFormat) -> RestResult<()> {
    let declared = content_type(headers);
    match declared.and_then(BodyFormat::parse) {
        Some(format) if format == expected => Ok(()),
        _ => Err(RestError::UnsupportedMediaType {
            content_type: declared.unwrap_or("none").to_string(),
        }),
    }
}
