//! Core business logic - framework-agnostic transaction model, reminder classification
//! and text reporting.

/// Notification classifier and reminder ordering
pub mod notification;
/// Text presentation for reminders and transaction lists
pub mod report;
/// The transaction domain model and its lifecycle
pub mod transaction;
