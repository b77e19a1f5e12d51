use dotenvy::dotenv;
use reminder_buddy::{
    bot::{self, BotData},
    config,
    core::report,
    errors::{Error, Result},
    storage::Backend,
    tracker::Tracker,
};
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Overrides the configuration file location
const CONFIG_PATH_ENV: &str = "REMINDER_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let config_path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config.toml".to_string());
    let app_config = config::load_app_configuration(&config_path)
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    info!("Successfully processed application configuration.");

    // 4. Pick the storage backend once; it lives in the tracker from here on
    let backend = Backend::from_config(&app_config)
        .await
        .inspect(|backend| info!("Using the {} storage backend.", backend.name()))
        .inspect_err(|e| error!("Failed to open storage backend: {}", e))?;
    let tracker = Tracker::new(backend).await;

    let today = chrono::Local::now().date_naive();
    for line in report::reminder_lines(
        tracker.transactions(),
        today,
        &app_config.display.currency_symbol,
    ) {
        info!("Reminder: {}", line);
    }

    // 5. Run the bot
    // DISCORD_BOT_TOKEN is loaded here, directly before use, not stored in AppConfig
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, BotData::new(tracker, app_config.display))
        .await
        .map_err(Error::from)?;

    Ok(())
}
