//! Stateless voice endpoints for speech-to-text and text-to-speech

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiState};
use crate::Error;
use crate::audio::AudioFormat;
use crate::pipeline::VoicePipeline;

/// Build voice router
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/transcribe", post(transcribe))
        .route("/synthesize", post(synthesize))
        .with_state(state)
}

/// Transcription response
#[derive(Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}

/// Normalize and transcribe uploaded audio without session state
async fn transcribe(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let mime = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::Decode("missing Content-Type header".to_string()))?;
    let format = AudioFormat::from_mime(mime)?;

    if body.is_empty() {
        return Err(Error::Decode("empty audio upload".to_string()).into());
    }

    let wav = VoicePipeline::normalize(&body, format)?;
    let text = state.pipeline.transcribe(&wav).await?;

    Ok(Json(TranscribeResponse { text }))
}

/// Synthesis request
#[derive(Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
}

/// Synthesize text to speech, returning raw audio bytes
async fn synthesize(
    State(state): State<Arc<ApiState>>,
    Json(request): Json<SynthesizeRequest>,
) -> Result<Response, ApiError> {
    if request.text.trim().is_empty() {
        return Err(Error::Synthesis("empty text".to_string()).into());
    }

    let audio = state.pipeline.synthesize(&request.text).await?;

    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "audio/wav")], audio).into_response())
}
