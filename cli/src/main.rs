//! CLI entrypoint for cadenza
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use cadenza_application::{ExchangeRunner, InboundMessage, ToolDispatcher};
use cadenza_infrastructure::{
    AnthropicGateway, AuddRecognizer, ConfigLoader, ConsoleTransport, FfmpegMerger,
    GoogleSpeechSynthesizer, InMemoryEventStore, InMemoryUserDirectory, JsonlExchangeLogger,
};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cadenza", version, about = "Tool-calling assistant with audio capabilities")]
struct Cli {
    /// Message to send; with --audio this becomes the attachment caption
    message: Option<String>,

    /// Path to an audio file to attach to the message
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Interactive chat mode
    #[arg(long)]
    chat: bool,

    /// Explicit config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip all config files and use built-in defaults
    #[arg(long)]
    no_config: bool,

    /// Directory for audio replies
    #[arg(long, default_value = "replies")]
    output_dir: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress the startup banner
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow::anyhow!("Could not load configuration: {}", e))?
    };

    let api_key =
        std::env::var("ANTHROPIC_API_KEY").context("ANTHROPIC_API_KEY is not set")?;
    // Audio backends degrade at call time when their keys are missing.
    let audd_token = std::env::var("AUDD_API_TOKEN").unwrap_or_default();
    let tts_key = std::env::var("GOOGLE_TTS_API_KEY").unwrap_or_default();
    if audd_token.is_empty() {
        warn!("AUDD_API_TOKEN is not set; song recognition will fail");
    }
    if tts_key.is_empty() {
        warn!("GOOGLE_TTS_API_KEY is not set; speech synthesis will fail");
    }

    info!("Starting cadenza");

    // === Dependency Injection ===
    let client = reqwest::Client::new();
    let transport = Arc::new(ConsoleTransport::new(&cli.output_dir));

    let dispatcher = Arc::new(ToolDispatcher::new(
        Arc::new(InMemoryUserDirectory::new()),
        Arc::new(InMemoryEventStore::new()),
        Arc::new(AuddRecognizer::with_endpoint(
            client.clone(),
            audd_token,
            config.audio.audd_endpoint.clone(),
        )),
        Arc::new(GoogleSpeechSynthesizer::with_endpoint(
            client.clone(),
            tts_key,
            config.audio.tts_endpoint.clone(),
        )),
        Arc::new(FfmpegMerger::new(config.audio.ffmpeg_path.clone())),
        transport.clone(),
        config.to_exchange_config(),
    ));

    let gateway = Arc::new(AnthropicGateway::new(
        client,
        api_key,
        config.assistant.base_url.clone(),
        config.assistant.model.clone(),
        config.assistant.max_tokens,
    ));

    let cancellation = CancellationToken::new();
    {
        let cancellation = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancellation.cancel();
            }
        });
    }

    let mut runner = ExchangeRunner::new(gateway, dispatcher, transport)
        .with_config(config.to_exchange_config())
        .with_cancellation(cancellation.clone());

    if let Some(path) = &config.logging.exchange_log {
        match JsonlExchangeLogger::new(path) {
            Some(logger) => runner = runner.with_logger(Arc::new(logger)),
            None => warn!("Exchange log disabled"),
        }
    }

    if cli.chat {
        return run_chat(&runner, &cancellation, cli.quiet).await;
    }

    // Single message mode
    let message = match (&cli.audio, &cli.message) {
        (Some(path), caption) => InboundMessage::audio(
            "1",
            path.to_string_lossy().into_owned(),
            caption.clone(),
        ),
        (None, Some(text)) => InboundMessage::text("1", text.clone()),
        (None, None) => bail!("A message is required. Use --chat for interactive mode."),
    };

    // The transport has already delivered the reply (or a failure notice)
    runner.handle_message(message).await?;
    Ok(())
}

/// Interactive loop: one exchange per input line.
async fn run_chat<G: cadenza_application::ModelGateway>(
    runner: &ExchangeRunner<G>,
    cancellation: &CancellationToken,
    quiet: bool,
) -> Result<()> {
    if !quiet {
        println!("cadenza chat - type 'exit' to quit, '/audio <path> [caption]' to attach a file");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut next_id: u64 = 1;

    while let Some(line) = lines.next_line().await? {
        if cancellation.is_cancelled() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        let id = next_id.to_string();
        next_id += 1;

        let message = match line.strip_prefix("/audio ") {
            Some(rest) => {
                let (path, caption) = match rest.split_once(' ') {
                    Some((path, caption)) => (path, Some(caption.to_string())),
                    None => (rest, None),
                };
                InboundMessage::audio(id, path, caption)
            }
            None => InboundMessage::text(id, line),
        };

        // Failures were already reported to the user via the transport
        if let Err(e) = runner.handle_message(message).await {
            warn!(error = %e, "Exchange ended with an error");
        }
    }

    Ok(())
}
