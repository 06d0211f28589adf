//! HTTP middleware for the hub API.
//!
//! - [`content_type`] - Request body format detection

pub mod content_type;

pub use content_type::BodyFormat;
