use axum::{
    body::Bytes,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use serde_json::{Value, json};

use super::{AppState, CreateSessionBody, MessageBody, USER_ID_HEADER};
use crate::chat::UserContext;
use crate::error::AskHrError;

type JsonReply = (StatusCode, Json<Value>);

/// GET /health
pub(super) async fn handle_health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// POST /session. An empty body is accepted.
pub(super) async fn handle_create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        CreateSessionBody::default()
    } else {
        match serde_json::from_slice::<CreateSessionBody>(&body) {
            Ok(request) => request,
            Err(e) => return bad_request(&format!("Invalid JSON: {e}")),
        }
    };

    let user = user_from_headers(&headers);
    match state
        .orchestrator
        .create_session(&user, request.initial_message.as_deref())
        .await
    {
        Ok(session) => (
            StatusCode::OK,
            Json(json!({
                "session_id": session.id,
                "created_at": session.created_at,
            })),
        ),
        Err(e) => error_reply(&e),
    }
}

/// GET /session/{id}
pub(super) async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> impl IntoResponse {
    match state.orchestrator.get_session(&session_id).await {
        Ok(session) => match serde_json::to_value(&session) {
            Ok(body) => (StatusCode::OK, Json(body)),
            Err(e) => error_reply(&AskHrError::Other(e.into())),
        },
        Err(e) => error_reply(&e),
    }
}

/// POST /message
pub(super) async fn handle_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<MessageBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(message) = match body {
        Ok(b) => b,
        Err(e) => {
            return bad_request(&format!(
                "Invalid JSON: {}. Expected: {{\"session_id\": \"...\", \"content\": \"...\"}}",
                e.body_text()
            ));
        }
    };

    let user = user_from_headers(&headers);
    match state
        .orchestrator
        .handle_message(&message.session_id, &message.content, &user)
        .await
    {
        Ok(response) => match serde_json::to_value(&response) {
            Ok(body) => (StatusCode::OK, Json(body)),
            Err(e) => error_reply(&AskHrError::Other(e.into())),
        },
        Err(e) => error_reply(&e),
    }
}

fn user_from_headers(headers: &HeaderMap) -> UserContext {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map_or_else(UserContext::anonymous, UserContext::new)
}

fn bad_request(detail: &str) -> JsonReply {
    (StatusCode::BAD_REQUEST, Json(json!({"detail": detail})))
}

fn error_reply(err: &AskHrError) -> JsonReply {
    if err.is_session_not_found() {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Session not found"})),
        );
    }
    tracing::error!(error = %err, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"detail": err.to_string()})),
    )
}
