//! Entity module - Contains the SeaORM entity definition for the remote table.
//! The entity mirrors the transaction data model column for column, in snake_case.

pub mod transaction;

pub use transaction::Entity as Transaction;
