//! Parley Gateway - Voice assistant pipeline for hosted AI services
//!
//! This library provides the core functionality for the Parley gateway:
//! - Audio ingestion and normalization (WAV/MP3/M4A → 16kHz mono WAV)
//! - Hosted speech-to-text, chat completion, and text-to-speech clients
//! - Explicit per-session conversation state
//! - An HTTP API with a bundled web UI for upload-and-reply interactions
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  Web UI / HTTP API                   │
//! │   upload  │  transcript  │  reply  │  playback      │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                 Voice Pipeline                       │
//! │  ingest → transcribe → chat → synthesize             │
//! │            (session log appended per turn)           │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │         Hosted provider (OpenAI-compatible)          │
//! │   Whisper STT  │  Chat completions  │  TTS          │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod audio;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod providers;
pub mod session;

pub use config::Config;
pub use error::{Error, Result};
pub use pipeline::{Turn, VoicePipeline};
pub use providers::{ChatClient, ChatCompleter, SpeechToText, Synthesizer, TextToSpeech, Transcriber};
pub use session::{Message, Role, Session, SessionStore};
