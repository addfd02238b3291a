//! Centra Panel Core Library
//!
//! Shared functionality for Centra Panel components:
//! - Persisted JSON configuration files (database, bot, VDS)
//! - `SQLite` pool helpers and the shared `DatabaseError`
//! - Tracing/logging initialization
//! - Common error types

pub mod config;
pub mod db;
pub mod error;
pub mod tracing_init;

pub use config::{BotConfig, ConsoleConfig, DatabaseConfig, VdsConfig};
pub use error::{Error, Result};
