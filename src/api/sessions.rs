//! Session lifecycle and conversation endpoints

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    routing::{delete, get, post},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::Serialize;

use super::{ApiError, ApiState};
use crate::Error;
use crate::audio::AudioFormat;
use crate::session::Message;

/// Build session router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/", post(create))
        .route("/{id}", delete(destroy))
        .route("/{id}/history", get(history))
        .route("/{id}/converse", post(converse))
        .with_state(state)
}

/// Session creation response
#[derive(Serialize)]
pub struct SessionCreated {
    pub id: String,
}

/// Create a new session
async fn create(State(state): State<Arc<ApiState>>) -> (StatusCode, Json<SessionCreated>) {
    let id = state.sessions.create().await;
    (StatusCode::CREATED, Json(SessionCreated { id }))
}

/// Destroy a session, discarding its conversation history
async fn destroy(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::SessionNotFound(id).into())
    }
}

/// Conversation history response
#[derive(Serialize)]
pub struct HistoryResponse {
    pub messages: Vec<Message>,
}

/// Get a session's ordered message history
async fn history(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let messages = state
        .sessions
        .history(&id)
        .await
        .ok_or(Error::SessionNotFound(id))?;
    Ok(Json(HistoryResponse { messages }))
}

/// One full voice turn: transcript, reply, and synthesized speech
#[derive(Serialize)]
pub struct ConverseResponse {
    pub transcript: String,
    pub reply: String,
    /// Base64-encoded reply audio for playback
    pub audio: String,
}

/// Run the full voice pipeline against an uploaded audio file
///
/// The upload format is taken from the `Content-Type` header
/// (`audio/wav`, `audio/mpeg`, or `audio/mp4`).
async fn converse(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ConverseResponse>, ApiError> {
    let mime = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::Decode("missing Content-Type header".to_string()))?;
    let format = AudioFormat::from_mime(mime)?;

    if body.is_empty() {
        return Err(Error::Decode("empty audio upload".to_string()).into());
    }

    let session = state
        .sessions
        .get(&id)
        .await
        .ok_or_else(|| Error::SessionNotFound(id.clone()))?;

    // Per-session lock serializes concurrent turns against one conversation
    let mut guard = session.lock().await;
    let turn = state.pipeline.run_turn(&mut guard, &body, format).await?;
    drop(guard);

    Ok(Json(ConverseResponse {
        transcript: turn.transcript,
        reply: turn.reply,
        audio: BASE64.encode(turn.speech),
    }))
}
