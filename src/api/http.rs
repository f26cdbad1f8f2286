//! HTTP server setup with Axum

use std::path::Path;
use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::websocket::ws_handler;
use crate::relay::{HubStats, RelayHub};

/// Create the Axum router with all endpoints
///
/// When `public_dir` is given, unmatched paths are served from it.
pub fn create_router(hub: Arc<RelayHub>, public_dir: Option<&Path>) -> Router {
    // CORS configuration - allow all origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health_check))
        .route("/api/stats", get(stats));

    let router = match public_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(hub)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Connection count and current typing users
async fn stats(State(hub): State<Arc<RelayHub>>) -> Json<HubStats> {
    Json(hub.stats())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(Arc::new(RelayHub::default()), None);

        let response = app.oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_reports_typing_users() {
        let hub = Arc::new(RelayHub::default());
        hub.presence().mark_typing("alice");
        let app = create_router(hub, None);

        let response = app.oneshot(get_request("/api/stats")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["connections"], 0);
        assert_eq!(json["typing_users"], serde_json::json!(["alice"]));
    }

    #[tokio::test]
    async fn test_ws_requires_upgrade() {
        let app = create_router(Arc::new(RelayHub::default()), None);

        let response = app.oneshot(get_request("/ws")).await.unwrap();

        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_serves_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>chat</h1>").unwrap();
        let app = create_router(Arc::new(RelayHub::default()), Some(dir.path()));

        let response = app.oneshot(get_request("/index.html")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<h1>chat</h1>");
    }

    #[tokio::test]
    async fn test_unknown_path_without_public_dir() {
        let app = create_router(Arc::new(RelayHub::default()), None);

        let response = app.oneshot(get_request("/missing")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
