use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use parley_gateway::api::{ApiServer, ApiState};
use parley_gateway::providers::{ChatClient, SpeechToText, TextToSpeech};
use parley_gateway::{Config, VoicePipeline};

/// Parley - Voice assistant gateway for hosted AI services
#[derive(Parser)]
#[command(name = "parley", version, about)]
struct Cli {
    /// Port to listen on (overrides config file)
    #[arg(long, env = "PARLEY_PORT")]
    port: Option<u16>,

    /// Path to a TOML config file (defaults to ~/.config/parley/config.toml)
    #[arg(short, long, env = "PARLEY_CONFIG")]
    config: Option<PathBuf>,

    /// Directory of static web UI files to serve (overrides config file)
    #[arg(long, env = "PARLEY_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,parley_gateway=info",
        1 => "info,parley_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    let port = cli.port.unwrap_or(config.port);
    let static_dir = cli.static_dir.or_else(|| config.static_dir.clone());

    tracing::info!(
        port,
        api_url = %config.api_url,
        stt_model = %config.voice.stt_model,
        chat_model = %config.voice.chat_model,
        tts_model = %config.voice.tts_model,
        "starting parley gateway"
    );

    let stt = SpeechToText::new(
        config.api_key.clone(),
        config.api_url.clone(),
        config.voice.stt_model.clone(),
    )?;
    let chat = ChatClient::new(
        config.api_key.clone(),
        config.api_url.clone(),
        config.voice.chat_model.clone(),
    )?;
    let tts = TextToSpeech::new(
        config.api_key.clone(),
        config.api_url.clone(),
        config.voice.tts_model.clone(),
        config.voice.tts_voice.clone(),
    )?;

    let pipeline = VoicePipeline::new(Arc::new(stt), Arc::new(chat), Arc::new(tts));
    let state = Arc::new(ApiState::new(pipeline));

    ApiServer::new(state, port, static_dir).run().await?;

    Ok(())
}
