use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::codec;
use crate::server::Server;
use crate::session::Session;

const SESSION_HEADER: &str = "mcp-session-id";

/// Shared state for the HTTP handler.
///
/// The table lock is only held for lookup and insert; each session has its
/// own mutex, held while that session's request is dispatched.
pub(crate) struct HttpState {
    server: Arc<Server>,
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
}

impl HttpState {
    fn new(server: Arc<Server>) -> Self {
        HttpState {
            server,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    async fn lookup(&self, headers: &HeaderMap) -> Option<(String, Arc<Mutex<Session>>)> {
        let id = session_id(headers)?;
        let session = self.sessions.read().await.get(&id).map(Arc::clone)?;
        Some((id, session))
    }
}

/// Create an Axum router for the MCP server.
pub fn http_router(server: Arc<Server>) -> Router {
    router(Arc::new(HttpState::new(server)))
}

fn router(state: Arc<HttpState>) -> Router {
    Router::new()
        .route("/mcp", post(handle_mcp).delete(handle_delete))
        .route("/healthz", get(handle_healthz))
        .with_state(state)
}

async fn handle_healthz() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

fn session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn handle_mcp(State(state): State<Arc<HttpState>>, headers: HeaderMap, body: Bytes) -> Response {
    let req = match codec::decode(&body) {
        Ok(req) => req,
        Err(e) => {
            tracing::warn!(error = %e, "undecodable http body");
            return json_response(codec::encode(&e.to_response()), None);
        }
    };

    if req.is_shutdown() {
        if let Some(id) = session_id(&headers) {
            state.sessions.write().await.remove(&id);
            tracing::info!(session_id = %id, method = %req.method, "session closed by client");
        }
        return StatusCode::ACCEPTED.into_response();
    }

    // A known session is reused, initialize included. Anything else runs on a
    // fresh session that is only kept if it completes an initialize.
    let is_initialize = req.method == "initialize";
    let (known_id, session) = match state.lookup(&headers).await {
        Some((id, session)) => (Some(id), session),
        None => (None, Arc::new(Mutex::new(Session::new()))),
    };

    let resp = {
        let mut guard = session.lock().await;
        state.server.handle(&mut guard, req).await
    };

    // Notification: return 202 with no body.
    let Some(resp) = resp else {
        return (StatusCode::ACCEPTED, Body::empty()).into_response();
    };

    let sid = match known_id {
        Some(id) => Some(id),
        None if is_initialize && !resp.is_error() => {
            let id = Uuid::new_v4().to_string();
            state.sessions.write().await.insert(id.clone(), session);
            tracing::debug!(session_id = %id, "session created");
            Some(id)
        }
        None => None,
    };

    json_response(codec::encode(&resp), sid)
}

async fn handle_delete(State(state): State<Arc<HttpState>>, headers: HeaderMap) -> StatusCode {
    let Some(id) = session_id(&headers) else {
        return StatusCode::BAD_REQUEST;
    };
    match state.sessions.write().await.remove(&id) {
        Some(_) => {
            tracing::debug!(session_id = %id, "session deleted");
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

fn json_response(body: Vec<u8>, session_id: Option<String>) -> Response {
    let mut response = (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response();

    // Attach session ID header.
    if let Some(value) = session_id.and_then(|sid| HeaderValue::from_str(&sid).ok()) {
        response.headers_mut().insert(SESSION_HEADER, value);
    }

    response
}
