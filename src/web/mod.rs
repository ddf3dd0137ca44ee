//! HTTP server for the synthesiser form.
//!
//! Routes:
//! - `GET /` renders the four panels
//! - `POST /generate/:category` runs a category synthesis, then 303 to `/`
//! - `POST /final` runs the final synthesis, then 303 to `/`
//! - `GET /api/session` returns the caller's session as JSON
//! - `GET /health` and `GET /metrics` for operations

pub mod handlers;
pub mod view;

use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::llm::{ChatClient, CompletionClient, LlmProvider};
use crate::metrics;
use crate::prompts::Prompts;
use crate::session::SessionStore;
use crate::synth::Synthesiser;

pub use handlers::{SessionSnapshot, SESSION_COOKIE};
pub use view::{BrowseQuery, View, FINAL_PLACEHOLDER};

/// Shared state of the server.
pub struct AppState {
    /// Live sessions.
    pub sessions: SessionStore,
    /// Category and final synthesis controller.
    pub synth: Synthesiser,
    /// Compiled page templates.
    pub view: View,
}

impl AppState {
    /// Build the state around an arbitrary LLM provider.
    pub fn new(provider: Arc<dyn LlmProvider>, config: &AppConfig) -> Result<Self> {
        let client = CompletionClient::new(provider, config.model.clone());
        Ok(Self {
            sessions: SessionStore::new(Prompts::default(), config.session_ttl),
            synth: Synthesiser::new(client, config.system_role.clone()),
            view: View::new()?,
        })
    }

    /// Build the state with the HTTP chat client described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let chat = ChatClient::new(
            config.api_base.clone(),
            Some(api_key),
            config.model.clone(),
            config.request_timeout,
        )?;
        Self::new(Arc::new(chat), config)
    }
}

/// Create the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/generate/:category", post(handlers::generate))
        .route("/final", post(handlers::generate_final))
        .route("/api/session", get(handlers::session_snapshot))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(metrics::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: AppConfig) -> Result<()> {
    if let Err(e) = metrics::init_metrics() {
        tracing::warn!(error = %e, "Metrics disabled");
    }

    let state = Arc::new(AppState::from_config(&config)?);
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        addr = %addr,
        model = %config.model,
        api_base = %config.api_base,
        "Brand synthesiser listening"
    );

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
