//! SQLite database for the Centra console backend.

centra_core::define_database!(ConsoleDatabase, "Console database migrations complete");
