//! Credential extractors.
//!
//! Both extractors are infallible: a missing header yields an empty
//! credential, which request validation reports as
//! [`ValidationError::MissingCredential`](crate::requests::ValidationError).

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};

/// Scheme prefix of user tokens.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Scheme prefix of device keys.
pub const THING_PREFIX: &str = "Thing ";

/// Reads the `Authorization` header, stripping `prefix` when present.
fn credential(headers: &HeaderMap, prefix: &str) -> String {
    let Some(value) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return String::new();
    };
    let value = value.trim();
    value.strip_prefix(prefix).unwrap_or(value).trim().to_string()
}

/// A user bearer token, possibly empty.
///
/// # Example
///
/// ```rust,ignore
/// use hub_rest::extractors::BearerToken;
///
/// async fn handler(BearerToken(token): BearerToken) {
///     println!("token present: {}", !token.is_empty());
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(BearerToken(credential(&parts.headers, BEARER_PREFIX)))
    }
}

/// A device key, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThingKey(pub String);

impl<S> FromRequestParts<S> for ThingKey
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ThingKey(credential(&parts.headers, THING_PREFIX)))
    }
}
