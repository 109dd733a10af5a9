// Gateway proxy - target building, upstream forwarding, response mapping
use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

/// Fully built upstream URL for one proxied request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTarget(String);

impl ProxyTarget {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Join `segments` onto `upstream_base` and append the raw query untouched.
///
/// The upstream requires a trailing slash on every path, so one always sits
/// between the last segment and the query. Segments pass through
/// byte-for-byte: nothing is re-encoded, normalized, or checked against an
/// allow-list. `raw_query` carries its own leading `?` when non-empty.
/// Callers pass at least one segment.
pub fn build_target(upstream_base: &str, segments: &[&str], raw_query: &str) -> ProxyTarget {
    let base = upstream_base.trim_end_matches('/');
    ProxyTarget(format!("{}/{}/{}", base, segments.join("/"), raw_query))
}

/// Classified result of one upstream call.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamOutcome {
    Success(Value),
    HttpFailure {
        status: StatusCode,
        status_text: String,
    },
    ConnectionFailure,
    /// 2xx response whose body failed JSON decoding.
    MalformedPayload,
}

/// Issues uncached GETs against the upstream.
///
/// One outbound call per `forward`; no retries, no coalescing of identical
/// targets, no reuse of prior responses.
#[derive(Debug, Clone)]
pub struct RequestForwarder {
    client: reqwest::Client,
}

impl RequestForwarder {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub async fn forward(&self, target: &ProxyTarget) -> UpstreamOutcome {
        tracing::debug!("forwarding request to {}", target.as_str());

        let response = match self
            .client
            .get(target.as_str())
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::error!("connection to backend failed: {err}");
                return UpstreamOutcome::ConnectionFailure;
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::error!("backend returned error: {status}");
            return UpstreamOutcome::HttpFailure {
                status,
                status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            };
        }

        match response.json::<Value>().await {
            Ok(payload) => UpstreamOutcome::Success(payload),
            Err(err) => {
                tracing::error!("backend returned an undecodable payload: {err}");
                UpstreamOutcome::MalformedPayload
            }
        }
    }
}

/// Stable client-facing response shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Collapse an upstream outcome into the client-facing response.
///
/// Every arm produces well-formed JSON; upstream faults never escape raw.
pub fn map_outcome(outcome: UpstreamOutcome) -> ProxyResponse {
    match outcome {
        UpstreamOutcome::Success(payload) => ProxyResponse {
            status: StatusCode::OK,
            body: payload,
        },
        UpstreamOutcome::HttpFailure {
            status,
            status_text,
        } => ProxyResponse {
            status,
            body: json!({ "error": format!("Backend error: {status_text}") }),
        },
        UpstreamOutcome::ConnectionFailure => ProxyResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: json!({ "error": "Failed to connect to backend" }),
        },
        UpstreamOutcome::MalformedPayload => ProxyResponse {
            status: StatusCode::BAD_GATEWAY,
            body: json!({ "error": "Invalid response from backend" }),
        },
    }
}

impl IntoResponse for ProxyResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_target_positions_request() {
        let target = build_target(
            "http://backend:8000/api",
            &["v1", "astronomy", "positions"],
            "?days=365&steps=50",
        );
        assert_eq!(
            target.as_str(),
            "http://backend:8000/api/v1/astronomy/positions/?days=365&steps=50"
        );
    }

    #[test]
    fn test_build_target_without_query_keeps_trailing_slash() {
        let target = build_target("http://backend:8000/api", &["v1", "astronomy", "space-weather"], "");
        assert_eq!(
            target.as_str(),
            "http://backend:8000/api/v1/astronomy/space-weather/"
        );
    }

    #[test]
    fn test_build_target_preserves_segment_order_and_bytes() {
        let target = build_target("http://h", &["b", "a", "a", "c%20d", ".."], "");
        assert_eq!(target.as_str(), "http://h/b/a/a/c%20d/../");
    }

    #[test]
    fn test_build_target_trims_base_slash() {
        let target = build_target("http://backend:8000/api/", &["v1"], "");
        assert_eq!(target.as_str(), "http://backend:8000/api/v1/");
    }

    #[test]
    fn test_map_success_passes_payload_through() {
        let payload = json!({ "timestamps": [], "bodies": {} });
        let mapped = map_outcome(UpstreamOutcome::Success(payload.clone()));
        assert_eq!(mapped.status, StatusCode::OK);
        assert_eq!(mapped.body, payload);
    }

    #[test]
    fn test_map_http_failure_mirrors_status() {
        let mapped = map_outcome(UpstreamOutcome::HttpFailure {
            status: StatusCode::NOT_FOUND,
            status_text: "Not Found".to_string(),
        });
        assert_eq!(mapped.status, StatusCode::NOT_FOUND);
        assert_eq!(mapped.body, json!({ "error": "Backend error: Not Found" }));
    }

    #[test]
    fn test_map_connection_failure() {
        let mapped = map_outcome(UpstreamOutcome::ConnectionFailure);
        assert_eq!(mapped.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(mapped.body, json!({ "error": "Failed to connect to backend" }));
    }

    #[test]
    fn test_map_malformed_payload() {
        let mapped = map_outcome(UpstreamOutcome::MalformedPayload);
        assert_eq!(mapped.status, StatusCode::BAD_GATEWAY);
        assert_eq!(mapped.body, json!({ "error": "Invalid response from backend" }));
    }
}
