//! Transaction entity - one row per recorded debt in the remote `transactions` table.
//!
//! Columns map 1:1 onto the domain model with snake_case names (`due_date`,
//! `created_at`, `closed_at`). The `type` and `status` enums are stored as text;
//! decoding them back into domain enums happens in the remote row mapping.
use rust_decimal::{Decimal, prelude::ToPrimitive};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColIdx, QueryResult, TryGetError, TryGetable,
    sea_query::{ArrayType, Nullable, ValueType, ValueTypeErr},
};
use serde::{Deserialize, Deserializer, Serialize};

/// Transaction database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Client-generated UUID, the table key
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Counterparty name
    pub person: String,
    /// Debt magnitude
    #[sea_orm(column_type = "Double")]
    pub amount: StoredAmount,
    /// Direction: `"i-owe"` or `"owed-to-me"`
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    /// Calendar due date
    pub due_date: Date,
    /// Free text, NULL when empty
    pub notes: Option<String>,
    /// Lifecycle flag: `"open"` or `"closed"`
    pub status: String,
    /// When the transaction was created
    pub created_at: DateTimeUtc,
    /// When the transaction was settled
    pub closed_at: Option<DateTimeUtc>,
}

/// The table has no relations
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// The `amount` column.
///
/// Written as a double. On read it accepts whatever numeric shape the table
/// actually has: REAL, INTEGER, NUMERIC, or text holding a number.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StoredAmount(pub f64);

impl<'de> Deserialize<'de> for StoredAmount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        crate::core::transaction::deserialize_amount(deserializer).map(Self)
    }
}

impl From<StoredAmount> for Value {
    fn from(amount: StoredAmount) -> Self {
        Self::Double(Some(amount.0))
    }
}

impl Nullable for StoredAmount {
    fn null() -> Value {
        Value::Double(None)
    }
}

impl ValueType for StoredAmount {
    fn try_from(v: Value) -> std::result::Result<Self, ValueTypeErr> {
        <f64 as ValueType>::try_from(v).map(Self)
    }

    fn type_name() -> String {
        "StoredAmount".to_string()
    }

    fn array_type() -> ArrayType {
        ArrayType::Double
    }

    fn column_type() -> ColumnType {
        ColumnType::Double
    }
}

fn not_numeric(raw: &str) -> TryGetError {
    TryGetError::DbErr(DbErr::Type(format!("amount '{raw}' is not numeric")))
}

impl TryGetable for StoredAmount {
    #[allow(clippy::cast_precision_loss)]
    fn try_get_by<I: ColIdx>(res: &QueryResult, idx: I) -> std::result::Result<Self, TryGetError> {
        if let Ok(amount) = f64::try_get_by(res, idx) {
            return Ok(Self(amount));
        }
        if let Ok(amount) = i64::try_get_by(res, idx) {
            return Ok(Self(amount as f64));
        }
        if let Ok(amount) = Decimal::try_get_by(res, idx) {
            return amount
                .to_f64()
                .map(Self)
                .ok_or_else(|| not_numeric(&amount.to_string()));
        }

        let raw = String::try_get_by(res, idx)?;
        raw.trim()
            .parse::<f64>()
            .map(Self)
            .map_err(|_| not_numeric(&raw))
    }
}
