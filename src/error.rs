//! Error types for the Parley gateway

use thiserror::Error;

/// Result type alias for Parley operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the Parley gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing credential, bad config file)
    #[error("configuration error: {0}")]
    Config(String),

    /// Audio decode error (corrupt or unsupported upload)
    #[error("decode error: {0}")]
    Decode(String),

    /// Audio processing error (resampling, WAV encoding)
    #[error("audio error: {0}")]
    Audio(String),

    /// Speech-to-text error
    #[error("transcription error: {0}")]
    Transcription(String),

    /// Chat completion error
    #[error("chat completion error: {0}")]
    ChatCompletion(String),

    /// Text-to-speech error
    #[error("synthesis error: {0}")]
    Synthesis(String),

    /// Session not found
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// The pipeline stage this error belongs to, for user-facing reporting
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Decode(_) | Self::Audio(_) => "decode",
            Self::Transcription(_) => "transcription",
            Self::ChatCompletion(_) => "chat",
            Self::Synthesis(_) => "synthesis",
            Self::SessionNotFound(_) => "session",
            Self::Io(_) | Self::Http(_) | Self::Serialization(_) | Self::Toml(_) => "internal",
        }
    }
}
