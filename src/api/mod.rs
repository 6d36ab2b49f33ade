//! HTTP API server for the Parley gateway

pub mod health;
pub mod sessions;
pub mod voice;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::pipeline::VoicePipeline;
use crate::session::SessionStore;
use crate::{Error, Result};

/// Shared state for API handlers
pub struct ApiState {
    /// The voice interaction pipeline
    pub pipeline: VoicePipeline,
    /// In-memory session registry
    pub sessions: SessionStore,
}

impl ApiState {
    /// Create API state from a pipeline
    #[must_use]
    pub fn new(pipeline: VoicePipeline) -> Self {
        Self {
            pipeline,
            sessions: SessionStore::new(),
        }
    }
}

/// API server
pub struct ApiServer {
    state: Arc<ApiState>,
    port: u16,
    static_dir: Option<PathBuf>,
}

impl ApiServer {
    /// Create a new API server
    #[must_use]
    pub fn new(state: Arc<ApiState>, port: u16, static_dir: Option<PathBuf>) -> Self {
        Self {
            state,
            port,
            static_dir,
        }
    }

    /// Build the router with all routes
    fn router(&self) -> Router {
        let mut router = Router::new()
            .nest("/api/sessions", sessions::router(self.state.clone()))
            .nest("/api/voice", voice::router(self.state.clone()))
            .merge(health::router());

        // Serve the web UI if configured
        if let Some(static_dir) = &self.static_dir {
            let index_file = static_dir.join("index.html");
            let serve_dir = ServeDir::new(static_dir).not_found_service(ServeFile::new(&index_file));

            router = router.fallback_service(serve_dir);
            tracing::info!(path = %static_dir.display(), "serving static files");
        }

        // CORS layer for cross-origin requests from frontend
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        router.layer(cors).layer(TraceLayer::new_for_http())
    }

    /// Run the API server
    ///
    /// # Errors
    ///
    /// Returns error if the server fails to bind or run
    pub async fn run(self) -> Result<()> {
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Config(format!("failed to bind API server: {e}")))?;

        tracing::info!(port = self.port, "API server listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|e| Error::Config(format!("API server error: {e}")))?;

        Ok(())
    }
}

/// API error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Wraps pipeline errors for HTTP responses, tagged with the failing stage
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Decode(_) | Error::Audio(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Error::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let code = format!("{}_failed", self.0.stage());
        tracing::warn!(code = %code, error = %self.0, "request failed");

        (
            status,
            Json(ErrorResponse {
                error: ErrorBody {
                    code,
                    message: self.0.to_string(),
                },
            }),
        )
            .into_response()
    }
}
