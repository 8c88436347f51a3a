//! # Castpulse — Periodic Chat Announcer
//!
//! Posts a configured message into a Twitch channel on a fixed or random
//! interval, gated on live status, follow status, and a local ban check.
//!
//! Usage:
//!   castpulse                              # Run with ~/.castpulse/config.toml
//!   castpulse --config ./castpulse.toml    # Custom config path
//!   castpulse --channel somechannel        # Override target channel

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use castpulse_api::{HelixClient, StatusChecker};
use castpulse_cache::TtlCache;
use castpulse_core::config::CastpulseConfig;
use castpulse_scheduler::AnnounceScheduler;
use castpulse_state::AppState;

#[derive(Parser)]
#[command(
    name = "castpulse",
    version,
    about = "📣 Castpulse — Periodic Chat Announcer"
)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "~/.castpulse/config.toml")]
    config: String,

    /// Override the target channel from the config
    #[arg(long)]
    channel: Option<String>,

    /// Start sending immediately, regardless of the saved active flag
    #[arg(long)]
    active: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn expand_path(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "castpulse=debug"
    } else {
        "castpulse=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    // Load configuration
    let config_path = expand_path(&cli.config);
    let mut config = if config_path.exists() {
        CastpulseConfig::load_from(&config_path)
            .with_context(|| format!("loading {}", config_path.display()))?
    } else {
        tracing::warn!("Config not found at {}, using defaults", config_path.display());
        CastpulseConfig::default()
    };

    if let Some(channel) = cli.channel {
        config.bot.channel = channel.trim().to_lowercase();
    }
    if cli.active {
        config.bot.active = true;
    }

    if config.twitch.token.is_empty() || config.twitch.client_id.is_empty() {
        bail!(
            "Missing Twitch credentials: set [twitch] token and client_id in {}",
            config_path.display()
        );
    }
    if config.bot.channel.is_empty() {
        bail!("No target channel: set [bot] channel or pass --channel");
    }

    // API client and caches
    let helix = HelixClient::new(&config.twitch.client_id, config.twitch.bearer_token())
        .context("building Helix client")?;
    let api_cache = Arc::new(TtlCache::new(Duration::from_secs(config.cache.ttl_secs)));
    let ban_cache = Arc::new(TtlCache::new(Duration::from_secs(config.cache.ban_ttl_secs)));
    let checker = Arc::new(StatusChecker::new(Arc::new(helix), api_cache));

    // Shared state and chat session
    let state = AppState::new(config.bot.clone(), ban_cache);
    let session = castpulse_chat::IrcSession::connect(&config.twitch.login, &config.twitch.token)
        .await
        .context("connecting to Twitch IRC")?;

    let display_name = checker
        .self_display_name()
        .await
        .unwrap_or_else(|| config.twitch.login.clone());

    println!("📣 Castpulse v{}", env!("CARGO_PKG_VERSION"));
    println!("   🤖 Identity:  {display_name}");
    println!("   📺 Channel:   {}", config.bot.channel);
    println!("   ⏱️  Interval:  {}", interval_summary(&config.bot));
    println!("   🟢 Active:    {}", config.bot.active);
    println!();

    let scheduler = AnnounceScheduler::new(
        state.clone(),
        session,
        checker,
        Duration::from_secs(config.cache.sweep_secs),
    );
    scheduler.start().await;

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    tracing::info!("Shutdown signal received");
    scheduler.shutdown().await;

    Ok(())
}

fn interval_summary(bot: &castpulse_core::config::BotConfig) -> String {
    if bot.random_interval {
        format!(
            "random {}-{} min",
            bot.random_min_minutes, bot.random_max_minutes
        )
    } else {
        format!("every {} min", bot.interval_minutes)
    }
}
