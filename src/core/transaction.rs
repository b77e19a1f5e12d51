//! Transaction domain model - the single entity tracked by `ReminderBuddy`.
//!
//! A transaction records money owed to or by the user. It is created `open` from
//! form input, may be settled exactly once (which stamps `closed_at`), and can be
//! hard-deleted from either state. The serde representation doubles as the local
//! snapshot format, so field names follow the camelCase layout of the stored JSON.

use crate::errors::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

/// Direction of a debt relative to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DebtDirection {
    /// The user owes the counterparty
    #[serde(rename = "i-owe", alias = "owe")]
    Owe,
    /// The counterparty owes the user
    #[serde(rename = "owed-to-me", alias = "owed")]
    Owed,
}

impl DebtDirection {
    /// Stored text value for this direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owe => "i-owe",
            Self::Owed => "owed-to-me",
        }
    }
}

impl fmt::Display for DebtDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DebtDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "i-owe" | "owe" => Ok(Self::Owe),
            "owed-to-me" | "owed" => Ok(Self::Owed),
            other => Err(Error::InvalidInput {
                message: format!("unknown transaction type '{other}'"),
            }),
        }
    }
}

/// Lifecycle flag of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Not yet settled
    Open,
    /// Settled; `closed_at` is set
    Closed,
}

impl TransactionStatus {
    /// Stored text value for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            other => Err(Error::InvalidInput {
                message: format!("unknown transaction status '{other}'"),
            }),
        }
    }
}

/// A recorded debt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Client-generated unique identifier (UUID v4 text)
    pub id: String,
    /// Counterparty name
    pub person: String,
    /// Non-negative, currency-agnostic magnitude
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    /// Who owes whom
    #[serde(rename = "type")]
    pub direction: DebtDirection,
    /// Calendar due date, interpreted in local time
    pub due_date: NaiveDate,
    /// Free text, empty when absent
    #[serde(default, deserialize_with = "deserialize_notes")]
    pub notes: String,
    /// Lifecycle flag
    pub status: TransactionStatus,
    /// Creation time, immutable
    pub created_at: DateTime<Utc>,
    /// Settlement time, present iff `status` is closed
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

/// Raw form input for a new transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// Counterparty name (trimmed on validation)
    pub person: String,
    /// Amount entered by the user
    pub amount: f64,
    /// Debt direction
    pub direction: DebtDirection,
    /// Due date picked by the user
    pub due_date: NaiveDate,
    /// Optional free text (trimmed on validation)
    pub notes: Option<String>,
}

impl Transaction {
    /// Builds a fresh `open` transaction from validated form input.
    ///
    /// `today` is the local calendar date; due dates before it are rejected the same
    /// way the entry form refuses them.
    pub fn open(input: &NewTransaction, today: NaiveDate, now: DateTime<Utc>) -> Result<Self> {
        let person = input.person.trim();
        if person.is_empty() {
            return Err(Error::InvalidInput {
                message: "person cannot be empty".to_string(),
            });
        }

        validate_amount(input.amount)?;

        if input.due_date < today {
            return Err(Error::InvalidInput {
                message: format!("due date {} is before today ({today})", input.due_date),
            });
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            person: person.to_string(),
            amount: input.amount,
            direction: input.direction,
            due_date: input.due_date,
            notes: input
                .notes
                .as_deref()
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            status: TransactionStatus::Open,
            created_at: now,
            closed_at: None,
        })
    }

    /// Returns true while the transaction has not been settled.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == TransactionStatus::Open
    }

    /// Closes an open transaction, stamping `closed_at`.
    ///
    /// Returns `false` (and changes nothing) if the transaction was already closed.
    /// The stamp never precedes `created_at`, even if the clock moved backwards.
    pub fn settle(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_open() {
            return false;
        }
        self.status = TransactionStatus::Closed;
        self.closed_at = Some(now.max(self.created_at));
        true
    }

    /// Checks a stored record: the amount, the status/`closed_at` pairing and
    /// timestamp ordering.
    pub fn check_invariants(&self) -> Result<()> {
        validate_amount(self.amount)?;
        match (self.status, self.closed_at) {
            (TransactionStatus::Open, None) => Ok(()),
            (TransactionStatus::Closed, Some(closed_at)) if closed_at >= self.created_at => Ok(()),
            (TransactionStatus::Closed, Some(_)) => Err(Error::InvalidInput {
                message: format!("transaction {} was closed before it was created", self.id),
            }),
            (status, _) => Err(Error::InvalidInput {
                message: format!(
                    "transaction {} has status '{status}' with inconsistent closed_at",
                    self.id
                ),
            }),
        }
    }
}

/// Rejects NaN, infinities and negative amounts.
pub fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

/// Parses an amount that may arrive as a numeric string.
pub fn parse_amount(raw: &str) -> Result<f64> {
    let amount: f64 = raw.trim().parse().map_err(|_| Error::InvalidInput {
        message: format!("'{raw}' is not a number"),
    })?;
    validate_amount(amount)?;
    Ok(amount)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Accepts both `500` and `"500"` for an amount field.
pub(crate) fn deserialize_amount<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(amount) => Ok(amount),
        NumberOrText::Text(raw) => parse_amount(&raw).map_err(serde::de::Error::custom),
    }
}

fn deserialize_notes<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
