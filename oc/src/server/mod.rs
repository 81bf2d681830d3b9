//! JSON-over-HTTP surface for the copilot

mod error;
mod routes;

pub use error::ApiError;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use eyre::{Context, Result};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::agent::CopilotAgent;
use crate::config::Config;

/// Shared handler state
///
/// `agent` is `None` when no API key was available at startup; chat requests
/// then fail with [`ApiError::MissingApiKey`].
#[derive(Clone)]
pub struct AppState {
    pub agent: Option<Arc<CopilotAgent>>,
    pub api_key_env: String,
}

impl AppState {
    pub fn new(agent: Option<Arc<CopilotAgent>>, api_key_env: impl Into<String>) -> Self {
        Self {
            agent,
            api_key_env: api_key_env.into(),
        }
    }

    /// Build the agent when the configured key is present
    ///
    /// A missing key is only a warning; bad seller data is an error.
    pub fn from_config(config: &Config) -> Result<Self> {
        debug!("AppState::from_config: called");
        let agent = match config.llm.get_api_key() {
            Ok(_) => {
                info!(provider = %config.llm.provider, model = %config.llm.model, "API key loaded");
                Some(Arc::new(CopilotAgent::from_config(config)?))
            }
            Err(_) => {
                warn!(env = %config.llm.api_key_env, "API key not set; POST /api/chat will fail");
                None
            }
        };
        Ok(Self::new(agent, config.llm.api_key_env.clone()))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/chat", post(routes::chat))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until Ctrl-C
pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::from_config(config)?;
    let addr = config.server.bind_addr();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    info!(%addr, "Seller ops copilot listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
