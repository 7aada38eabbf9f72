//! Main entry point for Warden Bot.

use std::env;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use warden_bot::WardenBot;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "warden.toml".to_string());
    let config = warden_config::load_config(Path::new(&config_path))?;

    // Initialize tracing; RUST_LOG overrides the configured level.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("starting Warden Bot");

    let bot = WardenBot::new(config);
    if let Err(e) = bot.run().await {
        error!("bot stopped: {e:#}");
        return Err(e);
    }
    Ok(())
}
