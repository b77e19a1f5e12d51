//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// General utility commands
pub mod general;

/// Reminder and listing commands
pub mod reminders;

/// Transaction commands
pub mod transaction;

// Export commands
pub use general::*;
pub use reminders::*;
pub use transaction::*;
