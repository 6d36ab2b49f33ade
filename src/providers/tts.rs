//! Text-to-speech (TTS) client

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use super::Synthesizer;
use crate::{Error, Result};

/// Synthesizes speech via the hosted speech endpoint
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: SecretString,
    api_url: String,
    model: String,
    voice: String,
}

impl TextToSpeech {
    /// Create a new TTS client
    ///
    /// # Errors
    ///
    /// Returns error if the API key is missing
    pub fn new(
        api_key: SecretString,
        api_url: String,
        model: String,
        voice: String,
    ) -> Result<Self> {
        if api_key.expose_secret().is_empty() {
            return Err(Error::Config("API key required for TTS".to_string()));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            api_url,
            model,
            voice,
        })
    }
}

#[async_trait]
impl Synthesizer for TextToSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        #[derive(serde::Serialize)]
        struct SpeechRequest<'a> {
            model: &'a str,
            voice: &'a str,
            input: &'a str,
        }

        tracing::debug!(input_chars = text.len(), "starting synthesis");

        let request = SpeechRequest {
            model: &self.model,
            voice: &self.voice,
            input: text,
        };

        let response = self
            .client
            .post(format!("{}/audio/speech", self.api_url))
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "synthesis request failed");
                Error::Synthesis(e.to_string())
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "TTS API error");
            return Err(Error::Synthesis(format!("TTS API error {status}: {body}")));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| Error::Synthesis(e.to_string()))?;

        tracing::info!(audio_bytes = audio.len(), "synthesis complete");
        Ok(audio.to_vec())
    }
}
