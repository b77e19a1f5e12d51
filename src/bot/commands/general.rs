//! General Discord commands - ping, help, and other utility commands.
//! These commands don't touch the transaction list.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let backend = ctx.data().tracker.lock().await.backend().name();
        let help_text = format!(
            "**ReminderBuddy Help**\n\
            Track money you owe and money owed to you, with reminders as due dates approach.\n\n\
            **Recording**\n\
            • `/owe <person> <amount> <due_date> [notes]` - You owe someone.\n\
            • `/owed <person> <amount> <due_date> [notes]` - Someone owes you.\n\n\
            **Viewing**\n\
            • `/reminders` - Overdue, due today, and due in the next 3 days.\n\
            • `/open` - All open transactions.\n\
            • `/history` - Everything, open first then settled.\n\n\
            **Actions**\n\
            • `/settle <id>` - Mark a transaction settled.\n\
            • `/delete <id>` - Delete a transaction.\n\n\
            **Utility**\n\
            • `/ping` - Checks if the bot is responsive.\n\
            • `/help` - Shows this help message.\n\n\
            Dates use the YYYY-MM-DD format. Storage: {backend}."
        );

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
