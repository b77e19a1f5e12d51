//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for `ReminderBuddy`: slash commands for
//! recording, settling and deleting debts, reminder listings, and autocomplete.

/// Discord command implementations (transactions, reminders, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{config::DisplayConfig, errors::Error, tracker::Tracker};
use poise::serenity_prelude as serenity;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

/// Discord caps a message at 2000 characters; leave room for a trailer.
const MESSAGE_BUDGET: usize = 1900;

/// Shared data available to all bot commands.
///
/// The tracker sits behind an async mutex, so a second command waits until the
/// first one's read-modify-reload cycle has finished.
pub struct BotData {
    /// The transaction controller
    pub tracker: Mutex<Tracker>,
    /// Presentation settings
    pub display: DisplayConfig,
}

impl BotData {
    /// Creates a new `BotData` around an already-loaded tracker.
    #[must_use]
    pub fn new(tracker: Tracker, display: DisplayConfig) -> Self {
        Self {
            tracker: Mutex::new(tracker),
            display,
        }
    }

    /// Currency symbol used in every rendered amount.
    #[must_use]
    pub fn currency(&self) -> &str {
        &self.display.currency_symbol
    }
}

/// Joins `lines` into one message that fits Discord's size limit.
///
/// Returns `empty` when there is nothing to show, and notes how many lines were cut.
#[must_use]
pub fn join_for_discord(lines: &[String], separator: &str, empty: &str) -> String {
    if lines.is_empty() {
        return empty.to_string();
    }

    let mut message = String::new();
    let mut shown = 0;
    for line in lines {
        let extra = if shown == 0 { 0 } else { separator.len() };
        if message.len() + extra + line.len() > MESSAGE_BUDGET {
            break;
        }
        if shown > 0 {
            message.push_str(separator);
        }
        message.push_str(line);
        shown += 1;
    }

    let hidden = lines.len() - shown;
    if hidden > 0 {
        message.push_str(&format!("\n…and {hidden} more"));
    }
    message
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ An error occurred: {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Registers the slash commands and runs the Discord client until it stops.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<(), serenity::Error> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::owe(),
                commands::owed(),
                commands::settle(),
                commands::delete(),
                commands::reminders(),
                commands::open(),
                commands::history(),
                commands::ping(),
                commands::help(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    info!("Setting up Serenity client for Poise framework...");
    let mut client =
        serenity::ClientBuilder::new(token, serenity::GatewayIntents::non_privileged())
            .framework(framework)
            .await
            .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))
}
