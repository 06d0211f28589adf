//! Server configuration for the hub API.
//!
//! This module provides configuration types for the REST server, supporting
//! both programmatic configuration and environment variable overrides.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HUB_PORT` | 8080 | Server port |
//! | `HUB_HOST` | 127.0.0.1 | Host to bind |
//! | `HUB_LOG_LEVEL` | info | Log level |
//! | `HUB_MAX_BODY_SIZE` | 10485760 | Max request body (bytes) |
//! | `HUB_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `HUB_ENABLE_CORS` | true | Enable CORS |
//! | `HUB_CORS_ORIGINS` | * | Allowed origins |
//! | `HUB_CORS_METHODS` | GET,POST,PUT,PATCH,DELETE,OPTIONS | Allowed methods |
//! | `HUB_CORS_HEADERS` | Content-Type,Authorization,Accept | Allowed headers |
//! | `HUB_ENABLE_REQUEST_ID` | true | Attach an `x-request-id` to every request |
//! | `HUB_DEFAULT_LIMIT` | 10 | Page size when `limit` is omitted |
//! | `HUB_MAX_LIMIT` | 200 | Page ceiling for things, profiles, and groups |
//! | `HUB_MAX_MEMBERSHIP_LIMIT` | 100 | Page ceiling for memberships |
//! | `HUB_ADMIN_TOKEN` | - | Bearer token of the bootstrap platform admin |
//! | `HUB_ADMIN_EMAIL` | admin@example.com | Email of the bootstrap platform admin |
//!
//! # Example
//!
//! ```rust
//! use hub_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     host: "0.0.0.0".to_string(),
//!     max_limit: 500,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use clap::Parser;

/// Server configuration for the hub API.
///
/// This struct can be constructed from environment variables using [`ServerConfig::from_env`],
/// from command line arguments using [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "hub-server")]
#[command(about = "Device hub API server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "HUB_PORT", default_value = "8080")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "HUB_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "HUB_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum request body size in bytes.
    #[arg(long, env = "HUB_MAX_BODY_SIZE", default_value = "10485760")]
    pub max_body_size: usize,

    /// Request timeout in seconds.
    #[arg(long, env = "HUB_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "HUB_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "HUB_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "HUB_CORS_METHODS",
        default_value = "GET,POST,PUT,PATCH,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(
        long,
        env = "HUB_CORS_HEADERS",
        default_value = "Content-Type,Authorization,Accept"
    )]
    pub cors_headers: String,

    /// Enable request ID tracking.
    #[arg(long, env = "HUB_ENABLE_REQUEST_ID", default_value = "true")]
    pub enable_request_id: bool,

    /// Page size used when a listing omits `limit`.
    #[arg(long, env = "HUB_DEFAULT_LIMIT", default_value = "10")]
    pub default_limit: u64,

    /// Largest `limit` accepted for things, profiles, and groups.
    #[arg(long, env = "HUB_MAX_LIMIT", default_value = "200")]
    pub max_limit: u64,

    /// Largest `limit` accepted for membership listings.
    #[arg(long, env = "HUB_MAX_MEMBERSHIP_LIMIT", default_value = "100")]
    pub max_membership_limit: u64,

    /// Bearer token granting platform-admin rights to the bootstrap user.
    #[arg(long, env = "HUB_ADMIN_TOKEN")]
    pub admin_token: Option<String>,

    /// Email of the bootstrap platform admin.
    #[arg(long, env = "HUB_ADMIN_EMAIL", default_value = "admin@example.com")]
    pub admin_email: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            log_level: "info".to_string(),
            max_body_size: 10 * 1024 * 1024, // 10MB
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,PATCH,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Authorization,Accept".to_string(),
            enable_request_id: true,
            default_limit: 10,
            max_limit: 200,
            max_membership_limit: 100,
            admin_token: None,
            admin_email: "admin@example.com".to_string(),
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// This is a convenience method that parses environment variables without
    /// requiring command line arguments.
    pub fn from_env() -> Self {
        Self::try_parse().unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            errors.push("Max body size cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.default_limit == 0 {
            errors.push("Default limit cannot be 0".to_string());
        }

        if self.default_limit > self.max_limit {
            errors.push("Default limit cannot exceed max limit".to_string());
        }

        if self.default_limit > self.max_membership_limit {
            errors.push("Default limit cannot exceed max membership limit".to_string());
        }

        if self.admin_token.as_deref().is_some_and(str::is_empty) {
            errors.push("Admin token cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0 and disables features that might interfere
    /// with tests.
    pub fn for_testing() -> Self {
        Self {
            port: 0, // Let OS assign port
            log_level: "debug".to_string(),
            request_timeout: 5, // Shorter timeout for tests
            enable_cors: false,
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            enable_request_id: false,
            ..Default::default()
        }
    }
}
