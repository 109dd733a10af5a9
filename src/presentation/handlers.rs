// HTTP request handlers
use std::sync::Arc;

use axum::extract::{Path, RawQuery, State};
use axum::response::IntoResponse;

use crate::infrastructure::proxy::{build_target, map_outcome};
use crate::presentation::app_state::AppState;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Forward an arbitrary-depth API path to the backend, path and query
/// untouched.
pub async fn proxy_request(
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    // RawQuery strips the `?`; the builder expects it back.
    let raw_query = query.map(|q| format!("?{q}")).unwrap_or_default();

    let target = build_target(&state.config.upstream.base_url, &segments, &raw_query);
    let outcome = state.forwarder.forward(&target).await;

    map_outcome(outcome)
}
