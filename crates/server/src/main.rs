//! Storeroom server - Retail management HTTP service.
//!
//! Serves the customers/products/orders API over in-memory reference
//! storage. The storage seams (table, blob, queue, file share) are traits;
//! a deployment against real cloud storage swaps in its own
//! implementations without touching the service or routes.

#![cfg_attr(not(test), forbid(unsafe_code))]

mod config;
mod error;
mod models;
mod routes;
mod services;
mod state;

use config::ServerConfig;
use state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing with EnvFilter; default to info for our crate
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storeroom_server=info,tower_http=debug".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = ServerConfig::from_env().expect("Failed to load configuration");
    let addr = config.socket_addr();

    let state = AppState::new(config);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!(%addr, "storeroom server listening");

    axum::serve(listener, app)
        .await
        .expect("Server terminated unexpectedly");
}
