//! Axum extractors for hub requests.
//!
//! - [`BearerToken`] - user credential from the `Authorization` header
//! - [`ThingKey`] - device credential from the `Authorization` header
//! - [`ListQuery`] - listing parameters from the query string
//! - [`SearchBody`] - listing parameters from a JSON body
//! - [`JsonBody`] - typed JSON bodies with hub error mapping

mod credentials;
mod json_body;
mod list_query;

pub use credentials::{BearerToken, ThingKey};
pub use json_body::JsonBody;
pub use list_query::{ListQuery, SearchBody};
