//! Local backend - the whole transaction list mirrored to a key-value store.
//!
//! The store keeps one file per key inside a directory. The transaction list is
//! written as a single JSON array snapshot after every mutation; readers treat it as
//! last-writer-wins. Newest transactions sit at the front of the list.

use crate::config::storage::StorageConfig;
use crate::core::transaction::Transaction;
use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use std::{fs, io, path::PathBuf};
use tracing::{debug, warn};

/// Directory-backed key-value store holding string values.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }

    /// Reads the value under `key`, `None` if it was never written.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the value under `key`.
    ///
    /// The value goes to a temporary file first and is renamed into place, so a
    /// reader never sees a half-written snapshot.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// Local-only persistence for the transaction list.
#[derive(Debug, Clone)]
pub struct LocalStore {
    kv: FileKvStore,
    key: String,
}

impl LocalStore {
    /// Creates a local store from the `[storage]` settings.
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            kv: FileKvStore::new(&config.dir),
            key: config.key.clone(),
        }
    }

    /// Reads and parses the snapshot.
    ///
    /// A missing key, unreadable file, invalid JSON or a document that is not an
    /// array all load as an empty list. Individual records that fail to decode, or
    /// that break [`Transaction::check_invariants`], are skipped.
    #[must_use]
    pub fn load(&self) -> Vec<Transaction> {
        let raw = match self.kv.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Could not read local snapshot '{}': {}", self.key, e);
                return Vec::new();
            }
        };

        let records = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Array(records)) => records,
            Ok(_) => {
                warn!("Local snapshot '{}' is not an array, ignoring it", self.key);
                return Vec::new();
            }
            Err(e) => {
                warn!("Local snapshot '{}' is not valid JSON: {}", self.key, e);
                return Vec::new();
            }
        };

        records
            .into_iter()
            .filter_map(|record| {
                serde_json::from_value::<Transaction>(record)
                    .map_err(Error::from)
                    .and_then(|transaction| transaction.check_invariants().map(|()| transaction))
                    .inspect_err(|e| warn!("Skipping malformed local record: {}", e))
                    .ok()
            })
            .collect()
    }

    /// Writes `transactions` as the new snapshot.
    pub fn persist(&self, transactions: &[Transaction]) -> Result<()> {
        let snapshot = serde_json::to_string(transactions)?;
        self.kv.set(&self.key, &snapshot)?;
        debug!(
            "Persisted {} transactions to local snapshot",
            transactions.len()
        );
        Ok(())
    }

    /// Prepends `transaction` and persists.
    pub fn create(
        &self,
        current: &[Transaction],
        transaction: Transaction,
    ) -> Result<Vec<Transaction>> {
        let mut next = Vec::with_capacity(current.len() + 1);
        next.push(transaction);
        next.extend_from_slice(current);
        self.persist(&next)?;
        Ok(next)
    }

    /// Closes the open transaction with `id` and persists.
    pub fn settle(
        &self,
        current: &[Transaction],
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Transaction>> {
        let next: Vec<Transaction> = current
            .iter()
            .cloned()
            .map(|mut transaction| {
                if transaction.id == id {
                    transaction.settle(now);
                }
                transaction
            })
            .collect();
        self.persist(&next)?;
        Ok(next)
    }

    /// Drops the transaction with `id` and persists. An absent id changes nothing.
    pub fn remove(&self, current: &[Transaction], id: &str) -> Result<Vec<Transaction>> {
        let next: Vec<Transaction> = current
            .iter()
            .filter(|transaction| transaction.id != id)
            .cloned()
            .collect();
        self.persist(&next)?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::transaction::TransactionStatus;
    use crate::test_utils::{TempDir, date, open_transaction};

    fn store(dir: &TempDir) -> LocalStore {
        LocalStore::new(&StorageConfig {
            dir: dir.path().to_path_buf(),
            key: "reminder-me-transactions".to_string(),
        })
    }

    #[test]
    fn test_load_missing_key_is_empty() {
        let dir = TempDir::new();
        assert!(store(&dir).load().is_empty());
    }

    #[test]
    fn test_load_malformed_snapshot_is_empty() {
        let dir = TempDir::new();
        let kv = FileKvStore::new(dir.path());

        kv.set("reminder-me-transactions", "{not json").unwrap();
        assert!(store(&dir).load().is_empty());

        kv.set("reminder-me-transactions", r#"{"id": "x"}"#).unwrap();
        assert!(store(&dir).load().is_empty());
    }

    #[test]
    fn test_load_skips_malformed_records() {
        let dir = TempDir::new();
        let kv = FileKvStore::new(dir.path());
        let good = open_transaction("Alex", 5.0, date(2024, 1, 10));
        let raw = format!(
            "[{}, {{\"id\": \"broken\"}}]",
            serde_json::to_string(&good).unwrap()
        );
        kv.set("reminder-me-transactions", &raw).unwrap();

        assert_eq!(store(&dir).load(), vec![good]);
    }

    #[test]
    fn test_load_skips_records_breaking_invariants() {
        let dir = TempDir::new();
        let kv = FileKvStore::new(dir.path());
        let good = open_transaction("Alex", 5.0, date(2024, 1, 10));

        let mut closed_without_stamp = serde_json::to_value(&good).unwrap();
        closed_without_stamp["id"] = "no-stamp".into();
        closed_without_stamp["status"] = "closed".into();
        closed_without_stamp["closedAt"] = serde_json::Value::Null;

        let mut negative = serde_json::to_value(&good).unwrap();
        negative["id"] = "negative".into();
        negative["amount"] = (-20.0).into();

        let mut closed_too_early = serde_json::to_value(&good).unwrap();
        closed_too_early["id"] = "too-early".into();
        closed_too_early["status"] = "closed".into();
        closed_too_early["closedAt"] = "2023-12-31T00:00:00Z".into();

        let raw = serde_json::Value::Array(vec![
            serde_json::to_value(&good).unwrap(),
            closed_without_stamp,
            negative,
            closed_too_early,
        ]);
        kv.set("reminder-me-transactions", &raw.to_string()).unwrap();

        assert_eq!(store(&dir).load(), vec![good]);
    }

    #[test]
    fn test_create_prepends_and_persists() {
        let dir = TempDir::new();
        let local = store(&dir);
        let first = open_transaction("First", 1.0, date(2024, 1, 10));
        let second = open_transaction("Second", 2.0, date(2024, 1, 11));

        let list = local.create(&[], first.clone()).unwrap();
        let list = local.create(&list, second.clone()).unwrap();

        assert_eq!(list, vec![second.clone(), first.clone()]);
        assert_eq!(local.load(), vec![second, first]);
    }

    #[test]
    fn test_settle_only_matching_id() {
        let dir = TempDir::new();
        let local = store(&dir);
        let keep = open_transaction("Keep", 1.0, date(2024, 1, 10));
        let close = open_transaction("Close", 2.0, date(2024, 1, 11));
        let list = vec![close.clone(), keep.clone()];

        let now = close.created_at + chrono::Duration::hours(1);
        let next = local.settle(&list, &close.id, now).unwrap();

        assert_eq!(next[0].status, TransactionStatus::Closed);
        assert_eq!(next[0].closed_at, Some(now));
        assert_eq!(next[1], keep);
        assert_eq!(local.load(), next);
    }

    #[test]
    fn test_remove_twice_is_noop() {
        let dir = TempDir::new();
        let local = store(&dir);
        let a = open_transaction("A", 1.0, date(2024, 1, 10));
        let b = open_transaction("B", 1.0, date(2024, 1, 10));
        let list = vec![a.clone(), b.clone()];

        let once = local.remove(&list, &a.id).unwrap();
        let twice = local.remove(&once, &a.id).unwrap();

        assert_eq!(once, vec![b.clone()]);
        assert_eq!(twice, once);
        assert_eq!(local.load(), vec![b]);
    }

    #[test]
    fn test_kv_key_cannot_escape_directory() {
        let dir = TempDir::new();
        let kv = FileKvStore::new(dir.path());
        kv.set("../escape", "[]").unwrap();
        assert!(dir.path().join(".._escape.json").exists());
        assert_eq!(kv.get("../escape").unwrap().as_deref(), Some("[]"));
    }
}
