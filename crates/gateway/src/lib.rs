//! HTTP API gateway for ChatRelay.
//!
//! Exposes the streaming chat endpoint and a health check.
//!
//! Built on Axum for high performance async HTTP.

pub mod chat;

use axum::{Router, response::Json, routing::get, routing::post};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use chatrelay_core::provider::Provider;
use chatrelay_core::tool::ToolRegistry;

/// Shared application state for the gateway.
///
/// Everything here is read-only after startup; each request builds its own
/// orchestrator and conversation on top of it.
pub struct GatewayState {
    pub provider: Arc<dyn Provider>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub tools: Arc<ToolRegistry>,
}

pub type SharedGatewayState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// The reference frontend is a separate browser app, so CORS defaults to
/// fully permissive and can be disabled via config.
pub fn build_router(state: SharedGatewayState, permissive_cors: bool) -> Router {
    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat/sse", post(chat::chat_sse_handler))
        .with_state(state);

    if permissive_cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
pub async fn start(config: chatrelay_config::AppConfig) -> chatrelay_core::Result<()> {
    let provider = chatrelay_providers::from_config(&config)?;
    let tools = Arc::new(chatrelay_tools::default_registry());

    let state = Arc::new(GatewayState {
        provider,
        model: config.default_model.clone(),
        temperature: config.default_temperature,
        max_tokens: Some(config.default_max_tokens),
        tools,
    });

    let app = build_router(state, config.gateway.permissive_cors);

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    info!(addr = %addr, model = %config.default_model, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
