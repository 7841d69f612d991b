//! HTTP server for hosp-locate
//!
//! Serves the JSON API a map front-end uses to sign in, report its position
//! and search for nearby hospitals.

pub mod routes;
pub mod state;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::session::SessionStore;
use routes::create_router;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Start the HTTP server on the configured address
///
/// The session is loaded from (and persisted to) `store` when one is given.
/// Never returns unless the server shuts down.
pub async fn run(config: Config, store: Option<SessionStore>) -> Result<()> {
    let addr = config.server_addr();
    run_on(&addr, config, store).await
}

/// Start the HTTP server with a specific address
pub async fn run_on(addr: &str, config: Config, store: Option<SessionStore>) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| Error::Server(format!("Invalid server address: {}", e)))?;

    let state = Arc::new(AppState::new(config, store)?);
    spawn_identity_logger(&state);
    let app = create_router(state);

    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Server(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Server(format!("Server error: {}", e)))?;

    Ok(())
}

/// Log every sign-in and sign-out for the life of the server
fn spawn_identity_logger(state: &Arc<AppState>) {
    let mut rx = state.identity_watch().subscribe();

    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            match rx.borrow_and_update().as_ref() {
                Some(identity) => info!(uid = %identity.uid, name = %identity.name, "Signed in"),
                None => info!("Signed out"),
            }
        }
    });
}
