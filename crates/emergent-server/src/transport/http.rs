//! The Streamable HTTP transport (§4.I, MCP 2025-03-26): one `/mcp`
//! endpoint plus a plain `/health`, multi-tenant via a per-request bearer
//! token, with MCP session tracking over `POST`'s `initialize` response.
//!
//! Grounded on `abp-daemon`'s `build_app(state) -> Router` +
//! `axum::serve` + graceful-shutdown shape; the teacher itself never
//! serves HTTP, so `axum`/`tower-http` are an enrichment from the pack
//! (`EffortlessMetrics-agent-backplane`, `web3infra-foundation-git-internal`
//! also reach for `axum` in this corpus).

use crate::dispatcher::{parse_request, Dispatcher};
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use emergent_client::RequestContext;
use emergent_config::TransportConfig;
use emergent_protocol::{methods, ErrorCode, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

/// 10 MiB request body cap (§4.I).
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
const SESSION_HEADER: &str = "mcp-session-id";

struct Session {
    #[allow(dead_code)]
    created_at: DateTime<Utc>,
}

struct HttpState {
    dispatcher: Dispatcher,
    sessions: RwLock<HashMap<String, Session>>,
    cancellation: tokio_util::sync::CancellationToken,
}

/// Builds the router and serves it until `cancellation` fires, then waits
/// up to 30s for in-flight requests to drain (§5: "the HTTP server enters
/// graceful shutdown with a 30s deadline").
pub async fn run(
    dispatcher: Dispatcher,
    config: &TransportConfig,
    cancellation: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    let state = Arc::new(HttpState {
        dispatcher,
        sessions: RwLock::new(HashMap::new()),
        cancellation: cancellation.clone(),
    });

    let router = build_router(state, config);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "HTTP transport listening");

    let shutdown_signal = {
        let cancellation = cancellation.clone();
        async move {
            cancellation.cancelled().await;
            info!("HTTP transport received shutdown signal, draining in-flight requests");
        }
    };

    let serve = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal);

    match tokio::time::timeout(Duration::from_secs(30), serve).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => {
            warn!("HTTP graceful shutdown exceeded its 30s deadline");
            Ok(())
        }
    }
}

fn build_router(state: Arc<HttpState>, config: &TransportConfig) -> Router {
    let cors = build_cors(&config.cors_origins);
    let request_timeout = Duration::from_secs(config.request_timeout_minutes.max(1) * 60);

    Router::new()
        .route("/mcp", post(handle_post).get(handle_get).delete(handle_delete))
        .route("/health", get(handle_health))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers([header::HeaderName::from_static(SESSION_HEADER)]);

    if origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer.allow_origin(parsed)
    }
}

async fn handle_health() -> Response {
    Json(serde_json::json!({"status": "ok"})).into_response()
}

/// `GET /mcp` is reserved for server-initiated SSE streaming; this server
/// never pushes unsolicited messages, so it always refuses (§4.I).
async fn handle_get() -> Response {
    let mut response = StatusCode::METHOD_NOT_ALLOWED.into_response();
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static("POST, DELETE, OPTIONS"));
    response
}

async fn handle_delete(State(state): State<Arc<HttpState>>, headers: HeaderMap) -> Response {
    if extract_bearer(&headers).is_none() {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let Some(session_id) = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
    else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    let mut sessions = state.sessions.write().await;
    if sessions.remove(&session_id).is_none() {
        return StatusCode::NOT_FOUND.into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn handle_post(
    State(state): State<Arc<HttpState>>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Response {
    let Some(token) = extract_bearer(&headers) else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    if let Some(session_id) = headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok()) {
        let sessions = state.sessions.read().await;
        if !sessions.contains_key(session_id) {
            return StatusCode::NOT_FOUND.into_response();
        }
    }

    let Ok(text) = std::str::from_utf8(&body) else {
        return parse_error_response();
    };
    let trimmed = text.trim_start();
    let ctx = RequestContext::new(token, &state.cancellation);

    if trimmed.starts_with('[') {
        handle_batch(&state, trimmed, &ctx).await
    } else {
        handle_single(&state, trimmed, &ctx).await
    }
}

async fn handle_single(state: &HttpState, raw: &str, ctx: &RequestContext) -> Response {
    let request = match parse_request(raw) {
        Ok(r) => r,
        Err(response) => return (StatusCode::BAD_REQUEST, Json(response)).into_response(),
    };
    let is_initialize = request.method == methods::INITIALIZE;

    let response = state.dispatcher.dispatch(request, ctx).await;
    if response.is_silent() {
        return StatusCode::ACCEPTED.into_response();
    }

    let mut headers = HeaderMap::new();
    if is_initialize && response.error.is_none() {
        let session_id = issue_session(state).await;
        if let Ok(value) = HeaderValue::from_str(&session_id) {
            headers.insert(header::HeaderName::from_static(SESSION_HEADER), value);
        }
    }

    (StatusCode::OK, headers, Json(response)).into_response()
}

async fn handle_batch(state: &HttpState, raw: &str, ctx: &RequestContext) -> Response {
    let values: Vec<Value> = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(_) => return parse_error_response(),
    };
    if values.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(JsonRpcResponse::error(
                None,
                JsonRpcError::new(ErrorCode::InvalidRequest, "batch must not be empty"),
            )),
        )
            .into_response();
    }

    let mut responses = Vec::with_capacity(values.len());
    for value in values {
        let request: Result<JsonRpcRequest, JsonRpcResponse> = serde_json::from_value(value)
            .map_err(|e| JsonRpcResponse::error(None, JsonRpcError::new(ErrorCode::InvalidRequest, e.to_string())));
        let response = match request {
            Ok(r) => state.dispatcher.dispatch(r, ctx).await,
            Err(e) => e,
        };
        if !response.is_silent() {
            responses.push(response);
        }
    }

    if responses.is_empty() {
        StatusCode::ACCEPTED.into_response()
    } else {
        (StatusCode::OK, Json(responses)).into_response()
    }
}

fn parse_error_response() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(JsonRpcResponse::error(
            None,
            JsonRpcError::new(ErrorCode::ParseError, "request body is not valid UTF-8 JSON"),
        )),
    )
        .into_response()
}

async fn issue_session(state: &HttpState) -> String {
    let session_id = new_session_id();
    state.sessions.write().await.insert(
        session_id.clone(),
        Session {
            created_at: Utc::now(),
        },
    );
    session_id
}

/// A 128-bit random, hex-encoded session id (§4.I).
fn new_session_id() -> String {
    let bytes: [u8; 16] = rand::random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = raw.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(extract_bearer(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn rejects_missing_or_empty_bearer() {
        assert!(extract_bearer(&HeaderMap::new()).is_none());

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(extract_bearer(&headers).is_none());
    }

    #[test]
    fn session_ids_are_32_hex_chars() {
        let id = new_session_id();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
