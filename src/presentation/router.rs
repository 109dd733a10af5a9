// Router configuration
use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use super::app_state::AppState;
use super::handlers::{health_check, proxy_request};

/// Build the gateway router: liveness plus the catch-all proxy route.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/*path", get(proxy_request))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
