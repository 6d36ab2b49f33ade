//! TOML configuration file loading
//!
//! Supports `~/.config/parley/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay on top of defaults,
//! and environment variables take precedence over the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ParleyConfigFile {
    /// Provider API configuration
    #[serde(default)]
    pub provider: ProviderFileConfig,

    /// Voice pipeline configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// Server/runtime configuration
    #[serde(default)]
    pub server: ServerFileConfig,
}

/// Provider API configuration
#[derive(Debug, Default, Deserialize)]
pub struct ProviderFileConfig {
    /// API key for the hosted provider (env `GROQ_API_KEY` takes precedence)
    pub api_key: Option<String>,

    /// OpenAI-compatible API base URL
    pub api_url: Option<String>,
}

/// Voice pipeline configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// STT model (e.g. "whisper-large-v3-turbo")
    pub stt_model: Option<String>,

    /// Chat model (e.g. "llama-3.1-8b-instant")
    pub chat_model: Option<String>,

    /// TTS model (e.g. "groq-tts")
    pub tts_model: Option<String>,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: Option<String>,
}

/// Server/runtime configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// API server port
    pub port: Option<u16>,

    /// Path to static files directory (web UI)
    pub static_dir: Option<String>,
}

/// Load the TOML config file, preferring an explicit path over the default
///
/// Returns `ParleyConfigFile::default()` if the file doesn't exist or can't
/// be parsed.
pub fn load_config_file(explicit: Option<&Path>) -> ParleyConfigFile {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match config_file_path() {
            Some(p) => p,
            None => return ParleyConfigFile::default(),
        },
    };

    if !path.exists() {
        return ParleyConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                ParleyConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            ParleyConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/parley/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("parley").join("config.toml"))
}
