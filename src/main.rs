use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracemark::bot::{self, Dispatcher, LongPoll};
use tracemark::config::Config;
use tracemark::constants::{POLL_ERROR_BACKOFF_MS, SHUTDOWN_DRAIN_SECS};
use tracemark::registry::MemoryRegistry;
use tracemark::transport::TelegramClient;

/// Tracemark - publish photos to a channel and deliver watermarked copies on request
#[derive(Parser, Debug)]
#[command(name = "tracemark")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (TELEGRAM_TOKEN, GROUP_CHAT_ID and ADMIN_ID are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate configuration and exit
    #[arg(long)]
    check: bool,
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let config = match &args.config {
        Some(path) => Config::from_file(path),
        None => Config::from_env(),
    }
    .map_err(anyhow::Error::msg)
    .context("Failed to load configuration")?;

    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("Invalid configuration")?;

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    if args.check {
        println!("Configuration OK");
        return Ok(());
    }

    tracemark::logging::init_subscriber(&config.logging)
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Failed to initialize logging subsystem")?;

    let config_source = args
        .config
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<env>".to_string());
    tracing::info!(
        config_file = %config_source,
        channel = %config.channel,
        admins = config.admins.len(),
        block_divisor = config.publish.block_divisor,
        "Configuration loaded successfully"
    );

    let client = Arc::new(
        TelegramClient::new(
            &config.telegram.api_url,
            &config.telegram.token,
            config.telegram.request_timeout(),
            config.fetch.max_file_size_bytes(),
        )
        .context("Failed to create Telegram client")?,
    );

    let registry = Arc::new(MemoryRegistry::new());
    let dispatcher = Arc::new(
        Dispatcher::from_config(&config, client.clone(), registry)
            .context("Failed to build dispatcher")?,
    );

    let source = LongPoll::new(client, config.telegram.poll_timeout_secs);
    bot::run(
        &source,
        dispatcher,
        Duration::from_millis(POLL_ERROR_BACKOFF_MS),
        Duration::from_secs(SHUTDOWN_DRAIN_SECS),
        bot::shutdown_signal(),
    )
    .await;

    Ok(())
}
