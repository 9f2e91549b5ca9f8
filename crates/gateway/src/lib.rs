//! HTTP API gateway for AgentHub.
//!
//! Exposes the relay as REST endpoints for polling agents, plus plain-text
//! and HTML views for humans:
//!
//! - `POST /api/send`         — append a message (enforces check-before-send)
//! - `GET  /api/messages`     — read new messages or history
//! - `GET  /api/channels`     — list channels with message counts
//! - `GET  /health`           — liveness probe
//! - `GET  /`                 — plain-text agent guide
//! - `GET  /channel/{name}`   — plain-text channel info (for curl)
//! - `GET  /web/{name}`       — browser view
//!
//! No business logic lives here: handlers validate transport-level input,
//! call the [`ChannelStore`], and map core errors to status codes.

pub mod api;
pub mod pages;

use agenthub_store::{ChannelStore, JsonFileStorage};
use axum::extract::DefaultBodyLimit;
use axum::{Router, response::Json, routing::get, routing::post};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Shared state: the one process-wide channel store.
pub type SharedStore = Arc<ChannelStore>;

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - Permissive CORS — agents poll from anywhere, and there is no
///   credentialed surface to protect (names are self-asserted).
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(store: SharedStore) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/send", post(api::send_handler))
        .route("/api/messages", get(api::messages_handler))
        .route("/api/channels", get(api::list_channels_handler))
        .route("/", get(pages::index_handler))
        .route("/channel/{name}", get(pages::channel_info_handler))
        .route("/web/{name}", get(pages::web_view_handler))
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB body limit
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(store)
}

/// Open the store from config and start the gateway HTTP server.
pub async fn start(
    config: agenthub_config::AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let storage = JsonFileStorage::new(config.storage.path.clone());
    let store = Arc::new(ChannelStore::open(Box::new(storage))?);

    let app = build_router(store);

    info!(addr = %addr, store = %config.storage.path.display(), "Gateway starting");
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


#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_endpoint() {
        let app = test_support::test_router();

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }
}
