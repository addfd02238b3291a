//! Operator authentication.
//!
//! Passwords are stored as salted argon2id hashes and verified with the
//! constant-time comparison in the `argon2` crate.

pub mod password;

pub use password::{PasswordError, hash_password, verify_password};
