//! Device hub server
//!
//! Serves the hub API over an in-memory store. Identities come from a static
//! token table seeded with the bootstrap platform administrator.

use std::sync::Arc;

use clap::Parser;
use hub_persistence::backends::memory::{InMemoryAuth, InMemoryBackend};
use hub_persistence::identity::Identity;
use hub_rest::{ServerConfig, create_app_with_config, init_logging};
use tracing::{info, warn};

/// User id of the bootstrap platform administrator.
const ADMIN_USER_ID: &str = "platform-admin";

/// Builds the token table from the server configuration.
fn create_auth(config: &ServerConfig) -> InMemoryAuth {
    let auth = InMemoryAuth::new();
    match config.admin_token.as_deref() {
        Some(token) => {
            auth.register(token, Identity::admin(ADMIN_USER_ID, &config.admin_email));
            info!(email = %config.admin_email, "Registered platform administrator");
        }
        None => warn!("No admin token configured; every request will be unauthorized"),
    }
    auth
}

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    info!(
        port = config.port,
        host = %config.host,
        max_limit = config.max_limit,
        max_membership_limit = config.max_membership_limit,
        "Starting device hub server"
    );

    let auth = create_auth(&config);
    let app = create_app_with_config(InMemoryBackend::new(), Arc::new(auth), config.clone());
    serve(app, &config).await
}
