//! HTTP server for pinpoint
//!
//! Hosts the AI route (`POST /api/georesponse`) that the remote assistant
//! backend talks to, plus a status endpoint.

pub mod routes;
pub mod state;

use crate::assistant::openai::OpenAiAssistant;
use crate::assistant::GeoAssistant;
use crate::config::Config;
use crate::error::{Error, Result};
use routes::create_router;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Start the HTTP server on the configured address
///
/// Never returns unless the server shuts down.
pub async fn run(config: Config) -> Result<()> {
    let addr = config.server_addr();
    run_on(&addr, config).await
}

/// Start the HTTP server with a specific address
///
/// The route always talks to OpenAI directly; `assistant.endpoint` is a
/// client setting and is ignored here.
pub async fn run_on(addr: &str, config: Config) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| Error::Server(format!("Invalid server address: {}", e)))?;

    let assistant = OpenAiAssistant::from_config(&config.assistant);
    if !assistant.is_configured() {
        warn!("No OpenAI API key configured; /api/georesponse will report NOT_CONFIGURED");
    }

    let state = Arc::new(AppState::new(config, assistant));
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
