//! # hub-rest - HTTP API for the device hub
//!
//! This crate exposes the resource hierarchy of the hub (organizations,
//! groups, profiles, and things) together with role-scoped group memberships
//! over a JSON HTTP API. It covers listing and search with a shared
//! pagination model, bulk create, update and remove, membership management,
//! and scope-bounded backup and restore.
//!
//! ## Features
//!
//! - **Uniform listings**: every listing accepts `offset`, `limit`, `name`,
//!   `order` and `dir` as query parameters (GET) or as a JSON body (POST
//!   `/search`) and answers with `{"total", "offset", "limit", <items>}`
//! - **Scoped access**: listings and mutations are scoped by organization,
//!   group, or profile; a missing scope is a 404, an inaccessible one a 403
//! - **Memberships**: the closed role set `owner > admin > editor > viewer`;
//!   the owner role is implicit and never assigned
//! - **Backup/Restore**: exported documents re-post unchanged as restore
//!   payloads, applied all-or-nothing in dependency order
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hub_rest::{create_app_with_config, ServerConfig};
//! use hub_persistence::backends::memory::{InMemoryAuth, InMemoryBackend};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = InMemoryBackend::new();
//!     let auth = Arc::new(InMemoryAuth::new());
//!
//!     let app = create_app_with_config(backend, auth, ServerConfig::default());
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every error is answered with a status code and a machine-readable body
//! `{"code": ..., "error": ...}`; see [`error`] for the full mapping.
//!
//! ## Configuration
//!
//! The server is configured via command-line flags or environment variables:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HUB_PORT` | 8080 | Server port |
//! | `HUB_HOST` | 127.0.0.1 | Host to bind |
//! | `HUB_LOG_LEVEL` | info | Log level (error, warn, info, debug, trace) |
//! | `HUB_MAX_BODY_SIZE` | 10485760 | Max request body size (bytes) |
//! | `HUB_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `HUB_ENABLE_CORS` | true | Enable CORS |
//! | `HUB_CORS_ORIGINS` | * | Allowed CORS origins |
//! | `HUB_DEFAULT_LIMIT` | 10 | Page size when `limit` is omitted |
//! | `HUB_MAX_LIMIT` | 200 | Page ceiling for groups, profiles, things |
//! | `HUB_MAX_MEMBERSHIP_LIMIT` | 100 | Page ceiling for memberships |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and their wire mapping
//! - [`config`] - Server configuration
//! - [`state`] - Application state (storage, identity provider, configuration)
//! - [`requests`] - Typed request descriptors and their validation
//! - [`authz`] - Access levels and scope resolution
//! - [`backup`] - Backup export and restore staging
//! - [`handlers`] - HTTP request handlers, one per operation
//! - [`middleware`] - Request body format detection
//! - [`extractors`] - Axum extractors for credentials and listing parameters
//! - [`responses`] - Response shapes
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod authz;
pub mod backup;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod requests;
pub mod responses;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::{Router, extract::DefaultBodyLimit};
use hub_persistence::core::Storage;
use hub_persistence::identity::AuthProvider;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
///
/// # Arguments
///
/// * `storage` - The storage backend to use
/// * `auth` - Resolves bearer tokens to identities
pub fn create_app<S>(storage: S, auth: Arc<dyn AuthProvider>) -> Router
where
    S: Storage + 'static,
{
    create_app_with_config(storage, auth, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// # Arguments
///
/// * `storage` - The storage backend to use
/// * `auth` - Resolves bearer tokens to identities
/// * `config` - Server configuration
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use hub_rest::{create_app_with_config, ServerConfig};
/// use hub_persistence::backends::memory::{InMemoryAuth, InMemoryBackend};
///
/// let config = ServerConfig {
///     max_limit: 50,
///     ..ServerConfig::for_testing()
/// };
/// let app = create_app_with_config(InMemoryBackend::new(), Arc::new(InMemoryAuth::new()), config);
/// ```
pub fn create_app_with_config<S>(
    storage: S,
    auth: Arc<dyn AuthProvider>,
    config: ServerConfig,
) -> Router
where
    S: Storage + 'static,
{
    info!(
        "Creating hub API server with backend: {}",
        storage.backend_name()
    );

    let state = AppState::new(Arc::new(storage), auth, config.clone());

    let router = routing::create_routes(state).layer(DefaultBodyLimit::max(config.max_body_size));

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    let router = router.layer(service_builder);

    // Set before tracing, copied onto every response
    if config.enable_request_id {
        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    } else {
        router
    }
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber for logging.
///
/// This should be called once at application startup. `RUST_LOG`, when set,
/// takes precedence over `level`.
///
/// # Arguments
///
/// * `level` - The log level (error, warn, info, debug, trace)
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "hub_rest={level},hub_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
