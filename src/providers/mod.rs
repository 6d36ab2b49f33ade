//! Hosted AI provider clients
//!
//! Each pipeline stage talks to the provider through a trait seam so the
//! pipeline can be exercised with mocks. The concrete clients target Groq's
//! OpenAI-compatible API.

mod chat;
mod stt;
mod tts;

pub use chat::ChatClient;
pub use stt::SpeechToText;
pub use tts::TextToSpeech;

use async_trait::async_trait;

use crate::Result;
use crate::session::Message;

/// Default OpenAI-compatible API base URL
pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1";

/// Transcribes WAV audio to text
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe 16kHz mono WAV bytes to plain text
    ///
    /// An empty string is a valid (if unhelpful) result.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Transcription`] if the service call fails
    async fn transcribe(&self, wav: &[u8]) -> Result<String>;
}

/// Generates the next conversational turn
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Given the full ordered history, return one assistant reply
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ChatCompletion`] if the history has no user
    /// message or the service call fails
    async fn complete(&self, messages: &[Message]) -> Result<String>;
}

/// Synthesizes speech from text
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Synthesize reply text to audio bytes
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Synthesis`] if the service call fails
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}
