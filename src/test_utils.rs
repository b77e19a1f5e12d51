//! Shared test utilities for `ReminderBuddy`.
//!
//! Fixtures for transactions, throwaway directories for the local store, and an
//! in-memory `SQLite` remote store with its table created.
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use crate::{
    config::storage::StorageConfig,
    core::transaction::{
        DebtDirection, NewTransaction, Transaction, TransactionStatus,
    },
    errors::Result,
    storage::{Backend, local::LocalStore, remote::RemoteStore},
};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::path::{Path, PathBuf};

/// Shorthand for a calendar date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Fixed creation time used by the transaction fixtures.
pub fn fixture_created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap()
}

/// Form input for an "I owe" transaction without notes.
pub fn new_input(person: &str, amount: f64, due_date: NaiveDate) -> NewTransaction {
    NewTransaction {
        person: person.to_string(),
        amount,
        direction: DebtDirection::Owe,
        due_date,
        notes: None,
    }
}

/// An open "I owe" transaction with a fresh id.
pub fn open_transaction(person: &str, amount: f64, due_date: NaiveDate) -> Transaction {
    Transaction {
        id: uuid::Uuid::new_v4().to_string(),
        person: person.to_string(),
        amount,
        direction: DebtDirection::Owe,
        due_date,
        notes: String::new(),
        status: TransactionStatus::Open,
        created_at: fixture_created_at(),
        closed_at: None,
    }
}

/// A settled "I owe" transaction, closed one day after creation.
pub fn closed_transaction(person: &str, amount: f64, due_date: NaiveDate) -> Transaction {
    let mut transaction = open_transaction(person, amount, due_date);
    transaction.settle(fixture_created_at() + chrono::Duration::days(1));
    transaction
}

/// A directory under the system temp dir, removed on drop.
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    /// Creates a new, empty, uniquely named directory.
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("reminder-buddy-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&path).expect("create temp dir");
        Self { path }
    }

    /// Path of the directory.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// A local backend storing its snapshot inside `dir`.
pub fn local_backend(dir: &TempDir) -> Backend {
    Backend::Local(LocalStore::new(&StorageConfig {
        dir: dir.path().to_path_buf(),
        ..StorageConfig::default()
    }))
}

/// Creates an in-memory `SQLite` remote store with the table initialized.
pub async fn setup_remote_store() -> Result<RemoteStore> {
    RemoteStore::connect("sqlite::memory:").await
}
