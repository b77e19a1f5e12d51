//! Remote backend - transactions live in a relational table reached through `SeaORM`.
//!
//! Every write (insert, update-by-id, delete-by-id) is followed by a full reload
//! ordered by `created_at` descending. Local state is never patched optimistically,
//! so server-side defaults or triggers are always reflected.

use crate::config::database;
use crate::core::transaction::{DebtDirection, Transaction, TransactionStatus};
use crate::entities::{Transaction as TransactionEntity, transaction, transaction::StoredAmount};
use crate::errors::Result;
use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};
use std::sync::Arc;
use tracing::{debug, error, instrument, warn};

/// Maps a domain transaction onto a table row. Empty notes become NULL.
#[must_use]
pub fn transaction_to_row(transaction: &Transaction) -> transaction::Model {
    transaction::Model {
        id: transaction.id.clone(),
        person: transaction.person.clone(),
        amount: StoredAmount(transaction.amount),
        kind: transaction.direction.as_str().to_string(),
        due_date: transaction.due_date,
        notes: Some(transaction.notes.clone()).filter(|notes| !notes.is_empty()),
        status: transaction.status.as_str().to_string(),
        created_at: transaction.created_at,
        closed_at: transaction.closed_at,
    }
}

/// Maps a table row back onto the domain model. NULL notes become an empty string.
///
/// # Errors
/// Fails if `type` or `status` hold text outside their enums, or if the row breaks
/// [`Transaction::check_invariants`].
pub fn transaction_from_row(row: transaction::Model) -> Result<Transaction> {
    let transaction = Transaction {
        direction: row.kind.parse::<DebtDirection>()?,
        status: row.status.parse::<TransactionStatus>()?,
        id: row.id,
        person: row.person,
        amount: row.amount.0,
        due_date: row.due_date,
        notes: row.notes.unwrap_or_default(),
        created_at: row.created_at,
        closed_at: row.closed_at,
    };
    transaction.check_invariants()?;
    Ok(transaction)
}

fn to_active_model(transaction: &Transaction) -> transaction::ActiveModel {
    let row = transaction_to_row(transaction);
    transaction::ActiveModel {
        id: Set(row.id),
        person: Set(row.person),
        amount: Set(row.amount),
        kind: Set(row.kind),
        due_date: Set(row.due_date),
        notes: Set(row.notes),
        status: Set(row.status),
        created_at: Set(row.created_at),
        closed_at: Set(row.closed_at),
    }
}

/// Remote-table persistence for the transaction list.
///
/// Clones share one connection.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    db: Arc<DatabaseConnection>,
}

impl RemoteStore {
    /// Wraps an existing connection.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Arc::new(db) }
    }

    /// Connects to `url` and makes sure the table exists.
    pub async fn connect(url: &str) -> Result<Self> {
        let db = database::create_connection(url).await?;
        database::create_tables(&db).await?;
        Ok(Self::new(db))
    }

    /// Selects every row, newest first. Rows that fail to map onto a valid
    /// transaction are skipped.
    ///
    /// # Errors
    /// Propagates the query error.
    pub async fn fetch_all(&self) -> Result<Vec<Transaction>> {
        let rows = TransactionEntity::find()
            .order_by_desc(transaction::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id.clone();
                transaction_from_row(row)
                    .inspect_err(|e| warn!("Skipping malformed remote row {}: {}", id, e))
                    .ok()
            })
            .collect())
    }

    /// Like [`Self::fetch_all`], but a failed query is logged and yields an empty list.
    pub async fn load(&self) -> Vec<Transaction> {
        match self.fetch_all().await {
            Ok(transactions) => transactions,
            Err(e) => {
                error!("Failed to load transactions from remote table: {}", e);
                Vec::new()
            }
        }
    }

    /// Inserts one row, then reloads.
    #[instrument(skip(self, transaction), fields(id = %transaction.id))]
    pub async fn create(&self, transaction: &Transaction) -> Result<Vec<Transaction>> {
        TransactionEntity::insert(to_active_model(transaction))
            .exec_without_returning(self.db.as_ref())
            .await
            .inspect_err(|e| error!("Failed to insert transaction: {}", e))?;
        debug!("Inserted transaction row");

        self.fetch_all().await
    }

    /// Stamps `status`/`closed_at` on the open row with `id`, then reloads.
    ///
    /// The update is filtered on `status = 'open'` so a row is closed at most once.
    #[instrument(skip(self))]
    pub async fn settle(&self, id: &str, closed_at: DateTime<Utc>) -> Result<Vec<Transaction>> {
        let result = TransactionEntity::update_many()
            .col_expr(
                transaction::Column::Status,
                Expr::value(TransactionStatus::Closed.as_str()),
            )
            .col_expr(transaction::Column::ClosedAt, Expr::value(closed_at))
            .filter(transaction::Column::Id.eq(id))
            .filter(transaction::Column::Status.eq(TransactionStatus::Open.as_str()))
            .exec(self.db.as_ref())
            .await
            .inspect_err(|e| error!("Failed to settle transaction: {}", e))?;
        debug!("Settle touched {} row(s)", result.rows_affected);

        self.fetch_all().await
    }

    /// Deletes the row with `id`, then reloads. Deleting an absent id affects no rows.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: &str) -> Result<Vec<Transaction>> {
        let result = TransactionEntity::delete_many()
            .filter(transaction::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .inspect_err(|e| error!("Failed to delete transaction: {}", e))?;
        debug!("Delete touched {} row(s)", result.rows_affected);

        self.fetch_all().await
    }
}
