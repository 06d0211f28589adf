//! Route configuration for the hub API.
//!
//! This module contains the routing configuration that maps HTTP paths
//! to handlers.

pub mod hub_routes;

pub use hub_routes::create_routes;
