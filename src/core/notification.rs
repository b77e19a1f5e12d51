//! Notification classifier - maps an open transaction's due date onto an urgency band.
//!
//! Day counts use calendar-date arithmetic on [`NaiveDate`], so daylight-saving
//! transitions can never shift a due date by one day.

use crate::core::transaction::Transaction;
use chrono::NaiveDate;

/// Largest number of days ahead that still counts as "due soon".
pub const SOON_WINDOW_DAYS: i64 = 3;

/// How urgent a reminder is. Variants are declared in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    /// Past its due date by `days_late` days
    Overdue {
        /// Whole days since the due date (at least 1)
        days_late: i64,
    },
    /// Due today
    Today,
    /// Due within [`SOON_WINDOW_DAYS`]
    Soon {
        /// Whole days until the due date (1..=3)
        days_left: i64,
    },
}

impl Urgency {
    /// Sort weight: overdue before today before soon.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Overdue { .. } => 0,
            Self::Today => 1,
            Self::Soon { .. } => 2,
        }
    }

    /// Short badge label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Overdue { .. } => "overdue",
            Self::Today => "today",
            Self::Soon { .. } => "soon",
        }
    }
}

/// A reminder for one transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Id of the transaction this reminder is about
    pub transaction_id: String,
    /// Urgency band
    pub urgency: Urgency,
}

/// Whole calendar days from `today` until `due` (negative once past due).
#[must_use]
pub fn days_until(due: NaiveDate, today: NaiveDate) -> i64 {
    due.signed_duration_since(today).num_days()
}

/// Classifies a transaction relative to `today`.
///
/// Closed transactions and anything due more than [`SOON_WINDOW_DAYS`] ahead
/// produce no notification.
#[must_use]
pub fn classify(transaction: &Transaction, today: NaiveDate) -> Option<Urgency> {
    if !transaction.is_open() {
        return None;
    }

    match days_until(transaction.due_date, today) {
        days if days < 0 => Some(Urgency::Overdue {
            days_late: days.abs(),
        }),
        0 => Some(Urgency::Today),
        days if days <= SOON_WINDOW_DAYS => Some(Urgency::Soon { days_left: days }),
        _ => None,
    }
}

/// Builds the urgent-reminder list, ordered overdue, today, soon.
///
/// Within a band the input order is kept.
#[must_use]
pub fn notifications(transactions: &[Transaction], today: NaiveDate) -> Vec<Notification> {
    let mut reminders: Vec<Notification> = transactions
        .iter()
        .filter_map(|transaction| {
            classify(transaction, today).map(|urgency| Notification {
                transaction_id: transaction.id.clone(),
                urgency,
            })
        })
        .collect();

    reminders.sort_by_key(|reminder| reminder.urgency.rank());
    reminders
}
