/// Remote database settings, backend predicate and table creation
pub mod database;

/// Application settings loaded from config.toml and the environment
pub mod settings;

/// Local snapshot store settings
pub mod storage;

pub use settings::{AppConfig, DisplayConfig, load_app_configuration};
