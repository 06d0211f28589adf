//! HTTP request handlers.
//!
//! One statically typed handler per operation. Every handler follows the
//! same flow: build a request descriptor, [`validate`](crate::requests::Validate)
//! it, resolve the caller, authorize against the scoping resource, call
//! storage, and answer with an explicit status and body.
//!
//! - [`groups`] - group CRUD and listings
//! - [`profiles`] - profile CRUD and listings
//! - [`things`] - thing CRUD, key rotation, re-parenting, listings
//! - [`memberships`] - membership management and listing
//! - [`backup`] - scoped and platform backup and restore
//! - [`health`] - health check endpoint

pub mod backup;
pub mod groups;
pub mod health;
mod listing;
pub mod memberships;
pub mod profiles;
pub mod things;

pub use health::health_handler;
