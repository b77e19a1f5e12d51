//! Transaction Discord commands - `owe`, `owed`, `settle` and `delete`.
//!
//! These commands are the entry form and row actions of the tracker: they parse the
//! user's input, hand it to the [`Tracker`](crate::tracker::Tracker) and report back.
//! Storage failures are answered with a ❌ notice and leave the list unchanged.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            report,
            transaction::{DebtDirection, NewTransaction},
        },
        errors::{Error, Result},
    };
    use chrono::NaiveDate;

    fn parse_due_date(raw: &str) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
    }

    async fn record(
        ctx: poise::Context<'_, BotData, Error>,
        direction: DebtDirection,
        person: String,
        amount: f64,
        due_date: String,
        notes: Option<String>,
    ) -> Result<()> {
        let Some(due_date) = parse_due_date(&due_date) else {
            ctx.say(format!(
                "❌ Invalid due date '{due_date}': use the YYYY-MM-DD format"
            ))
            .await?;
            return Ok(());
        };

        let input = NewTransaction {
            person,
            amount,
            direction,
            due_date,
            notes,
        };
        let today = chrono::Local::now().date_naive();

        let result = {
            let mut tracker = ctx.data().tracker.lock().await;
            tracker.create(&input, today).await
        };

        let reply = match result {
            Ok(transaction) => format!(
                "✅ Saved: {} (due {}) | Id: `{}`",
                report::transaction_title(&transaction, ctx.data().currency()),
                transaction.due_date,
                transaction.id
            ),
            Err(e) => format!("❌ Could not save the transaction: {e}"),
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Records money you owe someone.
    #[poise::command(slash_command, prefix_command)]
    pub async fn owe(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Who you owe"] person: String,
        #[description = "Amount owed"] amount: f64,
        #[description = "Due date (YYYY-MM-DD)"] due_date: String,
        #[description = "Optional notes"] notes: Option<String>,
    ) -> Result<()> {
        record(ctx, DebtDirection::Owe, person, amount, due_date, notes).await
    }

    /// Records money someone owes you.
    #[poise::command(slash_command, prefix_command)]
    pub async fn owed(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Who owes you"] person: String,
        #[description = "Amount owed to you"] amount: f64,
        #[description = "Due date (YYYY-MM-DD)"] due_date: String,
        #[description = "Optional notes"] notes: Option<String>,
    ) -> Result<()> {
        record(ctx, DebtDirection::Owed, person, amount, due_date, notes).await
    }

    /// Marks an open transaction as settled.
    #[poise::command(slash_command, prefix_command)]
    pub async fn settle(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Transaction id"]
        #[autocomplete = "autocomplete::autocomplete_open_transaction"]
        id: String,
    ) -> Result<()> {
        let id = id.trim();
        let result = {
            let mut tracker = ctx.data().tracker.lock().await;
            tracker.settle(id).await
        };

        let reply = match result {
            Ok(true) => format!("✅ Transaction `{id}` marked settled."),
            Ok(false) => format!("❌ No open transaction with id `{id}`."),
            Err(e) => format!("❌ Could not settle the transaction: {e}"),
        };
        ctx.say(reply).await?;
        Ok(())
    }

    /// Deletes a transaction permanently.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Transaction id"]
        #[autocomplete = "autocomplete::autocomplete_any_transaction"]
        id: String,
    ) -> Result<()> {
        let id = id.trim();
        let result = {
            let mut tracker = ctx.data().tracker.lock().await;
            tracker.remove(id).await
        };

        let reply = match result {
            Ok(true) => format!("🗑️ Transaction `{id}` deleted."),
            Ok(false) => format!("Nothing to delete: no transaction with id `{id}`."),
            Err(e) => format!("❌ Could not delete the transaction: {e}"),
        };
        ctx.say(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
