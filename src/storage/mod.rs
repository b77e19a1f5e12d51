//! Persistence adapter - one interface over the local snapshot store and the remote table.
//!
//! The backend is chosen once at startup from configuration and never re-evaluated.
//! Mutations return the new authoritative transaction list; callers swap it in only
//! when the call succeeds, so a failed write never leaves partial state behind.

/// Local key-value snapshot backend
pub mod local;
/// Remote relational table backend
pub mod remote;

use crate::config::AppConfig;
use crate::core::transaction::Transaction;
use crate::errors::Result;
use chrono::{DateTime, Utc};
use local::LocalStore;
use remote::RemoteStore;
use tracing::info;

/// Which store the tracker persists to.
#[derive(Debug, Clone)]
pub enum Backend {
    /// Snapshot mirrored to the on-device key-value store
    Local(LocalStore),
    /// Rows in the remote `transactions` table
    Remote(RemoteStore),
}

/// True when the configuration points at a usable remote table.
#[must_use]
pub fn remote_configured(config: &AppConfig) -> bool {
    config.remote.usable_url().is_some()
}

impl Backend {
    /// Selects and opens the backend described by `config`.
    ///
    /// # Errors
    /// Fails only when a remote backend is configured but cannot be reached or
    /// its table cannot be created.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        if let Some(url) = config.remote.usable_url() {
            info!("Remote configuration present, using the remote table backend");
            return Ok(Self::Remote(RemoteStore::connect(url).await?));
        }

        info!(
            "Using the local snapshot backend in {}",
            config.storage.dir.display()
        );
        Ok(Self::Local(LocalStore::new(&config.storage)))
    }

    /// Short name for logs and status output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::Remote(_) => "remote",
        }
    }

    /// Loads every transaction, newest first. Never fails: errors are logged and
    /// an empty list is returned.
    pub async fn load(&self) -> Vec<Transaction> {
        match self {
            Self::Local(store) => store.load(),
            Self::Remote(store) => store.load().await,
        }
    }

    /// Persists a new transaction.
    pub async fn create(
        &self,
        current: &[Transaction],
        transaction: Transaction,
    ) -> Result<Vec<Transaction>> {
        match self {
            Self::Local(store) => store.create(current, transaction),
            Self::Remote(store) => store.create(&transaction).await,
        }
    }

    /// Closes the open transaction with `id`.
    pub async fn settle(
        &self,
        current: &[Transaction],
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Transaction>> {
        match self {
            Self::Local(store) => store.settle(current, id, now),
            Self::Remote(store) => {
                // Stamp the same way the domain model does so closed_at >= created_at holds
                let closed_at = current
                    .iter()
                    .find(|transaction| transaction.id == id)
                    .map_or(now, |transaction| now.max(transaction.created_at));
                store.settle(id, closed_at).await
            }
        }
    }

    /// Deletes the transaction with `id`. An absent id is not an error.
    pub async fn remove(&self, current: &[Transaction], id: &str) -> Result<Vec<Transaction>> {
        match self {
            Self::Local(store) => store.remove(current, id),
            Self::Remote(store) => store.remove(id).await,
        }
    }
}
