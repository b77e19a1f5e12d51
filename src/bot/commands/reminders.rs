//! Reminder and listing commands - `reminders`, `open` and `history`.
//!
//! Read-only views over the tracker's current list.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, join_for_discord},
        core::report,
        errors::{Error, Result},
    };

    /// Shows overdue, due-today and upcoming (next 3 days) debts.
    #[poise::command(slash_command, prefix_command)]
    pub async fn reminders(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let today = chrono::Local::now().date_naive();
        let lines = {
            let tracker = ctx.data().tracker.lock().await;
            report::reminder_lines(tracker.transactions(), today, ctx.data().currency())
        };

        ctx.say(join_for_discord(&lines, "\n", report::NO_REMINDERS))
            .await?;
        Ok(())
    }

    /// Lists every open transaction, newest first.
    #[poise::command(slash_command, prefix_command)]
    pub async fn open(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let symbol = ctx.data().currency();
        let lines: Vec<String> = {
            let tracker = ctx.data().tracker.lock().await;
            tracker
                .open_transactions()
                .into_iter()
                .map(|transaction| report::transaction_entry(transaction, symbol))
                .collect()
        };

        ctx.say(join_for_discord(&lines, "\n\n", report::NO_OPEN_TRANSACTIONS))
            .await?;
        Ok(())
    }

    /// Lists all transactions: open ones first, then settled ones.
    #[poise::command(slash_command, prefix_command)]
    pub async fn history(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let symbol = ctx.data().currency();
        let lines: Vec<String> = {
            let tracker = ctx.data().tracker.lock().await;
            tracker
                .history()
                .into_iter()
                .map(|transaction| report::transaction_entry(transaction, symbol))
                .collect()
        };

        ctx.say(join_for_discord(&lines, "\n\n", report::NO_HISTORY))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
