//! # roster-auth
//!
//! Password storage for Roster. Passwords are either hashed with Argon2id
//! or kept as received, depending on configuration.

pub mod password;

pub use password::{PasswordError, PasswordService};
pub use roster_core::config::PasswordStorage;
