//! Centra console backend library
//!
//! - SQLite storage for operators, the bot audit log and VDS samples
//! - argon2id password hashing
//! - Telemetry sources for the dashboard
//! - Request channel and NDJSON stdio bridge for the UI process

pub mod auth;
pub mod ipc;
pub mod storage;
pub mod telemetry;
