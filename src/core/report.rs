//! Text presentation of transactions and reminders.
//!
//! Everything here is framework-agnostic string building; the bot layer decides how
//! the lines are delivered.

use crate::core::{
    notification::{self, Urgency},
    transaction::{DebtDirection, Transaction},
};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Shown when no transaction needs attention.
pub const NO_REMINDERS: &str = "No urgent reminders right now.";
/// Shown when every transaction is settled (or there are none).
pub const NO_OPEN_TRANSACTIONS: &str = "No open transactions.";
/// Shown when nothing has ever been recorded.
pub const NO_HISTORY: &str = "No history yet.";

/// Formats an amount in en-IN style: symbol, lakh/crore digit grouping, two decimals.
///
/// `format_currency(100000.0, "₹")` gives `"₹1,00,000.00"`.
#[must_use]
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}{symbol}{}.{fraction}", group_indian(whole))
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = left;
    }
    groups.push(rest);
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

const fn action_words(direction: DebtDirection) -> (&'static str, &'static str) {
    match direction {
        DebtDirection::Owe => ("Pay", "to"),
        DebtDirection::Owed => ("Collect", "from"),
    }
}

/// Human text for a reminder, e.g. `Due today: Pay ₹500.00 to Alex.`
#[must_use]
pub fn notification_text(transaction: &Transaction, urgency: Urgency, symbol: &str) -> String {
    let (action, preposition) = action_words(transaction.direction);
    let amount = format_currency(transaction.amount, symbol);
    let person = &transaction.person;

    match urgency {
        Urgency::Overdue { days_late } => format!(
            "Overdue: {action} {amount} {preposition} {person}. ({days_late} day(s) late)"
        ),
        Urgency::Today => format!("Due today: {action} {amount} {preposition} {person}."),
        Urgency::Soon { days_left } => format!(
            "Upcoming in {days_left} day(s): {action} {amount} {preposition} {person}."
        ),
    }
}

/// Headline for a transaction row, e.g. `Need to collect ₹200.00 from Sam`.
#[must_use]
pub fn transaction_title(transaction: &Transaction, symbol: &str) -> String {
    let (direction, preposition) = match transaction.direction {
        DebtDirection::Owe => ("Need to pay", "to"),
        DebtDirection::Owed => ("Need to collect", "from"),
    };
    format!(
        "{direction} {} {preposition} {}",
        format_currency(transaction.amount, symbol),
        transaction.person
    )
}

/// Detail line for a transaction row: due date, status, then notes and close date if present.
#[must_use]
pub fn transaction_meta(transaction: &Transaction) -> String {
    let mut details = vec![
        format!("Due: {}", transaction.due_date.format("%Y-%m-%d")),
        format!("Status: {}", transaction.status),
    ];

    if !transaction.notes.is_empty() {
        details.push(format!("Notes: {}", transaction.notes));
    }

    if let Some(closed_at) = transaction.closed_at {
        details.push(format!("Closed: {}", closed_at.format("%Y-%m-%d")));
    }

    details.join(" | ")
}

/// Open transactions first, then closed ones, each in store order.
#[must_use]
pub fn history_order(transactions: &[Transaction]) -> Vec<&Transaction> {
    let (open, closed): (Vec<&Transaction>, Vec<&Transaction>) =
        transactions.iter().partition(|transaction| transaction.is_open());
    open.into_iter().chain(closed).collect()
}

/// Renders the urgent-reminder list as one line per reminder, most urgent first.
#[must_use]
pub fn reminder_lines(transactions: &[Transaction], today: NaiveDate, symbol: &str) -> Vec<String> {
    let by_id: HashMap<&str, &Transaction> = transactions
        .iter()
        .map(|transaction| (transaction.id.as_str(), transaction))
        .collect();

    notification::notifications(transactions, today)
        .into_iter()
        .filter_map(|reminder| {
            by_id.get(reminder.transaction_id.as_str()).map(|transaction| {
                format!(
                    "**{}** `{}`",
                    notification_text(transaction, reminder.urgency, symbol),
                    reminder.urgency.label()
                )
            })
        })
        .collect()
}

/// Renders one transaction as a two-line list entry with its id.
#[must_use]
pub fn transaction_entry(transaction: &Transaction, symbol: &str) -> String {
    format!(
        "**{}**\n{} | Id: `{}`",
        transaction_title(transaction, symbol),
        transaction_meta(transaction),
        transaction.id
    )
}
