//! SQLite storage for the Centra console backend.
//!
//! Provides persistence for operator accounts, the bot audit log, and
//! (optionally) VDS metric samples.

mod db;
mod models;
mod queries;


pub use centra_core::db::DatabaseError;
pub use db::ConsoleDatabase;
pub use models::*;
pub use queries::ProfileFields;
