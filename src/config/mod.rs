//! Configuration management for the Parley gateway
//!
//! Resolution order for every setting: environment variable, then the
//! optional TOML config file, then the built-in default. The provider
//! credential is the one setting with no default — startup fails without it.

pub mod file;

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use crate::providers::DEFAULT_API_URL;
use crate::{Error, Result};

/// Default STT model (hosted Whisper)
pub const DEFAULT_STT_MODEL: &str = "whisper-large-v3-turbo";

/// Default chat model
pub const DEFAULT_CHAT_MODEL: &str = "llama-3.1-8b-instant";

/// Default TTS model
pub const DEFAULT_TTS_MODEL: &str = "groq-tts";

/// Default TTS voice
pub const DEFAULT_TTS_VOICE: &str = "alloy";

/// Environment variable holding the provider credential
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Parley gateway configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider API key, injected at startup and never logged
    pub api_key: SecretString,

    /// OpenAI-compatible API base URL
    pub api_url: String,

    /// Voice pipeline configuration
    pub voice: VoiceConfig,

    /// API server port
    pub port: u16,

    /// Path to static files directory (web UI)
    pub static_dir: Option<PathBuf>,
}

/// Voice pipeline model selection
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// STT model identifier
    pub stt_model: String,

    /// Chat model identifier
    pub chat_model: String,

    /// TTS model identifier
    pub tts_model: String,

    /// TTS voice identifier
    pub tts_voice: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            stt_model: DEFAULT_STT_MODEL.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            tts_voice: DEFAULT_TTS_VOICE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment, config file, and defaults
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no API key is available from any source
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let fc = file::load_config_file(config_path);

        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .or(fc.provider.api_key)
            .ok_or_else(|| {
                Error::Config(format!(
                    "no API key: set {API_KEY_ENV} or provider.api_key in the config file"
                ))
            })?;

        let api_url = std::env::var("PARLEY_API_URL")
            .ok()
            .or(fc.provider.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let voice = VoiceConfig {
            stt_model: std::env::var("PARLEY_STT_MODEL")
                .ok()
                .or(fc.voice.stt_model)
                .unwrap_or_else(|| DEFAULT_STT_MODEL.to_string()),
            chat_model: std::env::var("PARLEY_CHAT_MODEL")
                .ok()
                .or(fc.voice.chat_model)
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            tts_model: std::env::var("PARLEY_TTS_MODEL")
                .ok()
                .or(fc.voice.tts_model)
                .unwrap_or_else(|| DEFAULT_TTS_MODEL.to_string()),
            tts_voice: std::env::var("PARLEY_TTS_VOICE")
                .ok()
                .or(fc.voice.tts_voice)
                .unwrap_or_else(|| DEFAULT_TTS_VOICE.to_string()),
        };

        let port = fc.server.port.unwrap_or(8787);

        let static_dir = std::env::var("PARLEY_STATIC_DIR")
            .ok()
            .or(fc.server.static_dir)
            .map(PathBuf::from);

        Ok(Self {
            api_key: SecretString::from(api_key),
            api_url,
            voice,
            port,
            static_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voice_defaults_are_groq_models() {
        let voice = VoiceConfig::default();
        assert_eq!(voice.stt_model, "whisper-large-v3-turbo");
        assert_eq!(voice.chat_model, "llama-3.1-8b-instant");
        assert_eq!(voice.tts_model, "groq-tts");
        assert_eq!(voice.tts_voice, "alloy");
    }
}
