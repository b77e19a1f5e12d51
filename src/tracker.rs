//! The tracker owns the in-memory transaction list and routes every mutation through
//! the selected [`Backend`].
//!
//! After a successful mutation the list is replaced wholesale with what the backend
//! returned; after a failed one it is left exactly as it was.

use crate::core::{
    notification::{self, Notification},
    report,
    transaction::{NewTransaction, Transaction},
};
use crate::errors::Result;
use crate::storage::Backend;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, instrument, warn};

/// Single controller for the debt list.
#[derive(Debug)]
pub struct Tracker {
    backend: Backend,
    transactions: Vec<Transaction>,
}

impl Tracker {
    /// Wraps `backend` and loads the current list from it.
    pub async fn new(backend: Backend) -> Self {
        let transactions = backend.load().await;
        info!(
            "Loaded {} transactions from the {} backend",
            transactions.len(),
            backend.name()
        );
        Self {
            backend,
            transactions,
        }
    }

    /// The backend chosen at startup.
    #[must_use]
    pub const fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Every transaction in store order (newest first).
    #[must_use]
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Looks up a transaction by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|transaction| transaction.id == id)
    }

    /// Transactions that are still open.
    #[must_use]
    pub fn open_transactions(&self) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|transaction| transaction.is_open())
            .collect()
    }

    /// Full history: open transactions first, then settled ones.
    #[must_use]
    pub fn history(&self) -> Vec<&Transaction> {
        report::history_order(&self.transactions)
    }

    /// Urgent reminders as of `today`, most urgent first.
    #[must_use]
    pub fn notifications(&self, today: NaiveDate) -> Vec<Notification> {
        notification::notifications(&self.transactions, today)
    }

    /// Validates `input`, records it as a new open transaction and returns it.
    #[instrument(skip(self, input))]
    pub async fn create(&mut self, input: &NewTransaction, today: NaiveDate) -> Result<Transaction> {
        let transaction = Transaction::open(input, today, Utc::now())?;
        let next = self
            .backend
            .create(&self.transactions, transaction.clone())
            .await?;
        self.transactions = next;
        info!(id = %transaction.id, "Recorded transaction with {}", transaction.person);
        Ok(transaction)
    }

    /// Settles the open transaction with `id` at the current time.
    ///
    /// Returns `false` if no open transaction has that id.
    pub async fn settle(&mut self, id: &str) -> Result<bool> {
        self.settle_at(id, Utc::now()).await
    }

    /// Settles the open transaction with `id`, stamping `now`.
    #[instrument(skip(self))]
    pub async fn settle_at(&mut self, id: &str, now: DateTime<Utc>) -> Result<bool> {
        if !self.find(id).is_some_and(Transaction::is_open) {
            warn!("No open transaction to settle");
            return Ok(false);
        }

        let next = self.backend.settle(&self.transactions, id, now).await?;
        self.transactions = next;
        info!("Settled transaction");
        Ok(true)
    }

    /// Deletes the transaction with `id`. Returns whether it was present.
    ///
    /// An unknown id is still passed to the backend, so a row that exists remotely
    /// but not yet locally is removed too.
    #[instrument(skip(self))]
    pub async fn remove(&mut self, id: &str) -> Result<bool> {
        let existed = self.find(id).is_some();
        let next = self.backend.remove(&self.transactions, id).await?;
        self.transactions = next;
        info!(existed, "Removed transaction");
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::notification::Urgency;
    use crate::core::transaction::TransactionStatus;
    use crate::errors::Error;
    use crate::storage::{local::FileKvStore, remote::RemoteStore};
    use crate::test_utils::{
        TempDir, date, local_backend, new_input, open_transaction, setup_remote_store,
    };
    use chrono::Duration;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    #[tokio::test]
    async fn test_local_create_settle_remove_flow() -> Result<()> {
        let dir = TempDir::new();
        let mut tracker = Tracker::new(local_backend(&dir)).await;
        let today = date(2024, 1, 8);

        let alex = tracker
            .create(&new_input("Alex", 500.0, date(2024, 1, 10)), today)
            .await?;
        let bo = tracker
            .create(&new_input("Bo", 20.0, date(2024, 1, 8)), today)
            .await?;

        // Newest first
        assert_eq!(tracker.transactions()[0].id, bo.id);
        assert_eq!(tracker.transactions()[1].id, alex.id);

        let reminders = tracker.notifications(today);
        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].urgency, Urgency::Today);
        assert_eq!(reminders[1].urgency, Urgency::Soon { days_left: 2 });

        assert!(tracker.settle(&alex.id).await?);
        let settled = tracker.find(&alex.id).unwrap();
        assert_eq!(settled.status, TransactionStatus::Closed);
        assert!(settled.closed_at.unwrap() >= settled.created_at);

        // Gone from reminders, still in history
        assert_eq!(tracker.notifications(today).len(), 1);
        assert_eq!(tracker.history().len(), 2);
        assert_eq!(tracker.history()[1].id, alex.id);
        assert_eq!(tracker.open_transactions().len(), 1);

        assert!(tracker.remove(&bo.id).await?);
        assert!(!tracker.remove(&bo.id).await?);
        assert_eq!(tracker.transactions().len(), 1);

        // A fresh tracker over the same directory sees the persisted snapshot
        let reopened = Tracker::new(local_backend(&dir)).await;
        assert_eq!(reopened.transactions(), tracker.transactions());
        Ok(())
    }

    #[tokio::test]
    async fn test_settle_unknown_or_closed_is_noop() -> Result<()> {
        let dir = TempDir::new();
        let mut tracker = Tracker::new(local_backend(&dir)).await;
        let today = date(2024, 1, 8);
        let created = tracker
            .create(&new_input("Alex", 5.0, date(2024, 1, 9)), today)
            .await?;

        assert!(!tracker.settle("missing").await?);

        let stamp = created.created_at + Duration::minutes(1);
        assert!(tracker.settle_at(&created.id, stamp).await?);
        assert!(!tracker.settle_at(&created.id, stamp + Duration::days(1)).await?);
        assert_eq!(tracker.find(&created.id).unwrap().closed_at, Some(stamp));
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_input_leaves_state_untouched() {
        let dir = TempDir::new();
        let mut tracker = Tracker::new(local_backend(&dir)).await;

        let result = tracker
            .create(&new_input("Alex", -5.0, date(2024, 1, 9)), date(2024, 1, 8))
            .await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));
        assert!(tracker.transactions().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_local_snapshot_loads_empty() {
        let dir = TempDir::new();
        FileKvStore::new(dir.path())
            .set("reminder-me-transactions", "<<garbage>>")
            .unwrap();

        let tracker = Tracker::new(local_backend(&dir)).await;
        assert!(tracker.transactions().is_empty());
    }

    #[tokio::test]
    async fn test_remote_flow_resynchronises_after_each_write() -> Result<()> {
        let store = setup_remote_store().await?;
        let mut tracker = Tracker::new(Backend::Remote(store.clone())).await;
        let today = chrono::Local::now().date_naive();

        let created = tracker
            .create(&new_input("Alex", 500.0, today + Duration::days(2)), today)
            .await?;
        assert_eq!(tracker.transactions().len(), 1);

        // A row written by someone else shows up on the next write's reload
        let mut foreign = open_transaction("Other", 1.0, today + Duration::days(20));
        foreign.created_at = created.created_at + Duration::seconds(1);
        store.create(&foreign).await?;

        assert!(tracker.settle(&created.id).await?);
        assert_eq!(tracker.transactions().len(), 2);
        assert_eq!(tracker.transactions()[0].id, foreign.id);
        assert_eq!(
            tracker.find(&created.id).unwrap().status,
            TransactionStatus::Closed
        );

        assert!(tracker.remove(&created.id).await?);
        assert_eq!(tracker.transactions(), std::slice::from_ref(&foreign));
        Ok(())
    }

    #[tokio::test]
    async fn test_remote_write_failure_keeps_last_known_good() {
        let existing = open_transaction("Alex", 500.0, date(2024, 1, 10));
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            // initial load
            .append_query_results([vec![crate::storage::remote::transaction_to_row(
                &existing,
            )]])
            .append_exec_errors([
                DbErr::Custom("insert rejected".to_string()),
                DbErr::Custom("update rejected".to_string()),
                DbErr::Custom("delete rejected".to_string()),
            ])
            .into_connection();

        let mut tracker = Tracker::new(Backend::Remote(RemoteStore::new(db))).await;
        assert_eq!(tracker.transactions(), std::slice::from_ref(&existing));

        let today = date(2024, 1, 8);
        assert!(
            tracker
                .create(&new_input("Bo", 1.0, date(2024, 1, 9)), today)
                .await
                .is_err()
        );
        assert!(tracker.settle(&existing.id).await.is_err());
        assert!(tracker.remove(&existing.id).await.is_err());

        assert_eq!(tracker.transactions(), std::slice::from_ref(&existing));
    }

    #[tokio::test]
    async fn test_remote_reload_failure_after_write_keeps_state() {
        let existing = open_transaction("Alex", 500.0, date(2024, 1, 10));
        let db = MockDatabase::new(DatabaseBackend::Sqlite)
            .append_query_results([vec![crate::storage::remote::transaction_to_row(
                &existing,
            )]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_errors([DbErr::Custom("timeout".to_string())])
            .into_connection();

        let mut tracker = Tracker::new(Backend::Remote(RemoteStore::new(db))).await;
        assert!(tracker.remove(&existing.id).await.is_err());
        assert_eq!(tracker.transactions(), std::slice::from_ref(&existing));
    }
}
