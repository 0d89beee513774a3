//! # rp-server
//!
//! The HTTP surface of reelpress: `/health`, the authenticated
//! `/download` endpoint, OpenAPI docs, and error-to-status mapping.
//! [`serve`] binds the listener and runs until SIGINT/SIGTERM.

pub mod error;
pub mod middleware;
pub mod router;
pub mod routes;

use std::net::SocketAddr;

use rp_av::ToolRegistry;
use rp_core::config::{AuthConfig, ServerConfig, ToolsConfig};

/// Bind the server and run until a shutdown signal arrives.
pub async fn serve(config: ServerConfig) -> rp_core::Result<()> {
    // Startup diagnostics: tool availability and auth posture. Both are
    // re-evaluated per request; this is informational only.
    let tools = ToolRegistry::discover(&ToolsConfig::from_env());
    for info in tools.check_all() {
        if info.available {
            tracing::info!(
                "Tool found: {} ({})",
                info.name,
                info.version.as_deref().unwrap_or("unknown version")
            );
        } else {
            tracing::warn!("Tool not found: {}", info.name);
        }
    }

    let auth = AuthConfig::from_env();
    if auth.is_open() {
        tracing::warn!("No AUTH_TOKENS configured - API is unprotected!");
    } else {
        tracing::info!("Loaded {} auth token(s)", auth.tokens.len());
    }

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| rp_core::Error::Internal(format!("invalid server address: {e}")))?;

    let app = router::build_router();

    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("Shutdown signal received");
}
