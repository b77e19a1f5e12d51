//! Autocomplete handlers for Discord slash command parameters.
//!
//! Transaction ids are UUIDs nobody wants to type, so `/settle` and `/delete`
//! suggest transactions matching what the user has typed so far, by id prefix or by
//! counterparty name. Each suggestion is labelled with the person, amount and due
//! date, and submits the id.

use crate::{
    bot::BotData,
    core::{report, transaction::Transaction},
    errors::Error,
};
use poise::serenity_prelude as serenity;

/// Discord shows at most 25 suggestions.
const MAX_SUGGESTIONS: usize = 25;
/// Discord caps a choice label at 100 characters.
const MAX_LABEL_CHARS: usize = 100;

/// Transactions whose id starts with, or whose person contains, `partial`.
#[must_use]
pub fn matching_transactions<'a, I>(transactions: I, partial: &str) -> Vec<&'a Transaction>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let partial_lower = partial.trim().to_lowercase();

    transactions
        .into_iter()
        .filter(|transaction| {
            transaction.id.starts_with(&partial_lower)
                || transaction.person.to_lowercase().contains(&partial_lower)
        })
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Human label for a suggestion, e.g. `Alex: ₹500.00 due 2024-01-10 (3f2a9c1e)`.
#[must_use]
pub fn suggestion_label(transaction: &Transaction, symbol: &str) -> String {
    let short_id: String = transaction.id.chars().take(8).collect();
    let label = format!(
        "{}: {} due {} ({short_id})",
        transaction.person,
        report::format_currency(transaction.amount, symbol),
        transaction.due_date.format("%Y-%m-%d"),
    );
    label.chars().take(MAX_LABEL_CHARS).collect()
}

fn suggestions<'a, I>(
    transactions: I,
    partial: &str,
    symbol: &str,
) -> Vec<serenity::AutocompleteChoice>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    matching_transactions(transactions, partial)
        .into_iter()
        .map(|transaction| {
            serenity::AutocompleteChoice::new(
                suggestion_label(transaction, symbol),
                transaction.id.clone(),
            )
        })
        .collect()
}

/// Suggests open transactions (for `/settle`).
pub async fn autocomplete_open_transaction(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    let tracker = ctx.data().tracker.lock().await;
    suggestions(tracker.open_transactions(), partial, ctx.data().currency())
}

/// Suggests any transaction (for `/delete`).
pub async fn autocomplete_any_transaction(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<serenity::AutocompleteChoice> {
    let tracker = ctx.data().tracker.lock().await;
    suggestions(tracker.history(), partial, ctx.data().currency())
}
