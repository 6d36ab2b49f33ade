//! The voice interaction pipeline
//!
//! One user turn runs the strict linear sequence:
//! ingest → transcribe → append(user) → chat → append(assistant) → synthesize.
//! Each stage is awaited to completion before the next starts; any failure
//! aborts the remaining stages and surfaces an error naming the failed stage
//! (see [`crate::Error::stage`]).

use std::sync::Arc;

use crate::audio::{self, AudioFormat};
use crate::providers::{ChatCompleter, Synthesizer, Transcriber};
use crate::session::{Message, Session};
use crate::{Error, Result};

/// Outcome of one successful voice turn
#[derive(Debug)]
pub struct Turn {
    /// What the user said
    pub transcript: String,
    /// The assistant's reply text
    pub reply: String,
    /// Synthesized reply audio bytes
    pub speech: Vec<u8>,
}

impl Turn {
    /// Persist the synthesized speech to a scoped temporary file for playback
    ///
    /// The file is removed when the returned handle drops.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written
    pub fn speech_temp_file(&self) -> Result<tempfile::NamedTempFile> {
        audio::write_temp_audio(&self.speech, ".wav")
    }
}

/// Runs voice turns against the configured provider clients
pub struct VoicePipeline {
    stt: Arc<dyn Transcriber>,
    chat: Arc<dyn ChatCompleter>,
    tts: Arc<dyn Synthesizer>,
}

impl VoicePipeline {
    /// Create a pipeline from provider clients
    #[must_use]
    pub fn new(
        stt: Arc<dyn Transcriber>,
        chat: Arc<dyn ChatCompleter>,
        tts: Arc<dyn Synthesizer>,
    ) -> Self {
        Self { stt, chat, tts }
    }

    /// Normalize uploaded audio and return canonical WAV bytes
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for corrupt or unsupported uploads
    pub fn normalize(upload: &[u8], format: AudioFormat) -> Result<Vec<u8>> {
        let buffer = audio::ingest(upload, format)?;
        debug_assert!(buffer.is_normalized());
        audio::samples_to_wav(&buffer.samples, buffer.sample_rate)
    }

    /// Transcribe normalized WAV bytes without touching session state
    ///
    /// # Errors
    ///
    /// Returns error if transcription fails
    pub async fn transcribe(&self, wav: &[u8]) -> Result<String> {
        self.stt.transcribe(wav).await
    }

    /// Synthesize arbitrary text without touching session state
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        self.tts.synthesize(text).await
    }

    /// Run one full voice turn against a session
    ///
    /// # Errors
    ///
    /// Returns the failing stage's error; the session is only modified once
    /// the transcript is accepted, and the assistant message is appended
    /// before synthesis so history stays consistent with the chat call.
    pub async fn run_turn(
        &self,
        session: &mut Session,
        upload: &[u8],
        format: AudioFormat,
    ) -> Result<Turn> {
        let wav = Self::normalize(upload, format)?;
        let transcript = self.stt.transcribe(&wav).await?;

        if transcript.trim().is_empty() {
            return Err(Error::Transcription(
                "no speech detected in audio".to_string(),
            ));
        }

        tracing::info!(session = %session.id(), transcript = %transcript, "user turn");
        session.append(Message::user(transcript.clone()));

        let reply = self.chat.complete(session.snapshot()).await?;
        if reply.trim().is_empty() {
            return Err(Error::ChatCompletion(
                "model returned an empty reply".to_string(),
            ));
        }

        session.append(Message::assistant(reply.clone()));
        tracing::info!(session = %session.id(), reply_chars = reply.len(), "assistant turn");

        let speech = self.tts.synthesize(&reply).await?;

        Ok(Turn {
            transcript,
            reply,
            speech,
        })
    }
}
