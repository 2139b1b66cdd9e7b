//! Password hashing and comparison

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use roster_core::config::PasswordStorage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(String),
}

/// Stores and compares passwords according to the configured policy
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordService {
    storage: PasswordStorage,
}

impl PasswordService {
    pub fn new(storage: PasswordStorage) -> Self {
        Self { storage }
    }

    /// Produce the value to persist for `plaintext`
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        match self.storage {
            PasswordStorage::Plaintext => Ok(plaintext.to_string()),
            PasswordStorage::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                Argon2::default()
                    .hash_password(plaintext.as_bytes(), &salt)
                    .map(|hash| hash.to_string())
                    .map_err(|e| PasswordError::Hash(e.to_string()))
            }
        }
    }

    /// Whether `plaintext` is the password behind `stored`
    ///
    /// A stored value that is not a PHC string is compared as plaintext, so
    /// rows written before switching to Argon2 still match.
    pub fn matches(&self, plaintext: &str, stored: &str) -> bool {
        match PasswordHash::new(stored) {
            Ok(parsed) if self.storage == PasswordStorage::Argon2 => Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            _ => constant_time_compare(plaintext, stored),
        }
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
