mod actions;
mod callbacks;
mod commands;
mod handlers;
mod inline;
mod render;
mod state;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nightleech_core::{
    load_config, validate_config, ImdbClient, JackettSearcher, QBittorrentClient,
    SanitizedConfig, Searcher, TorrentClient,
};

use commands::Command;
use state::BotState;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("NIGHTLEECH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    validate_config(&config).context("Configuration validation failed")?;

    let telegram = config
        .telegram
        .clone()
        .context("the bot needs a [telegram] section")?;
    let jackett = config
        .jackett
        .clone()
        .context("the bot needs a [jackett] section")?;

    // Secrets are redacted before hashing.
    let config_json = serde_json::to_string(&SanitizedConfig::from(&config)).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        version = VERSION,
        config_hash = &config_hash[..16],
        indexers = jackett.indexers.len(),
        allowed_users = telegram.allowed_users.len(),
        "Configuration loaded"
    );

    let searcher: Arc<dyn Searcher> =
        Arc::new(JackettSearcher::new(jackett).context("Failed to create Jackett searcher")?);

    info!("Using qBittorrent at {}", config.qbittorrent.url);
    let client: Arc<dyn TorrentClient> = Arc::new(
        QBittorrentClient::new(config.qbittorrent.clone())
            .context("Failed to create qBittorrent client")?,
    );

    let imdb = if config.imdb.enabled {
        Some(ImdbClient::new(config.imdb.clone()).context("Failed to create IMDb client")?)
    } else {
        info!("Inline title suggestions disabled");
        None
    };

    let state = Arc::new(BotState::new(config, searcher, client, imdb));
    let bot = Bot::new(telegram.bot_token);

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        warn!(error = %e, "Failed to register command list");
    }

    info!("Bot started");
    Dispatcher::builder(bot, handlers::schema())
        .dependencies(dptree::deps![state])
        .default_handler(|_| async {})
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    info!("Bot stopped");
    Ok(())
}
