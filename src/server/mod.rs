// src/server/mod.rs

//! Local web console transport.
//!
//! ```text
//! GET  /health
//! POST /api/test-connection   JSON      {ipAddress, sdbPath?, tizenPath?}
//! POST /api/deploy            multipart ipAddress, file, sdbPath?, tizenPath?
//! POST /api/generate-wgt      JSON      {projectPath, tizenPath?}
//! POST /api/run               JSON      {projectPath, tizenPath?, sdbPath?, ipAddress}
//! POST /api/debug             JSON      {projectPath, tizenPath?}
//! ```

pub mod routes;

use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::errors::Result;
use crate::orchestrator::Orchestrator;

/// Build the router. Used by [`serve`] and by tests.
pub fn build_router(orchestrator: Orchestrator, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/test-connection", post(routes::test_connection))
        .route("/api/deploy", post(routes::deploy))
        .route("/api/generate-wgt", post(routes::generate_package))
        .route("/api/run", post(routes::full_run))
        .route("/api/debug", post(routes::debug))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(orchestrator)
}

/// Serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, router: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
