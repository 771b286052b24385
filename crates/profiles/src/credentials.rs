//! Credential service: email canonicalization and password hashing.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use thiserror::Error;

/// Prefix marking a stored password that can never match.
pub const UNUSABLE_PASSWORD_PREFIX: char = '!';

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Swappable credential policy used by the profile manager.
pub trait CredentialService: Send + Sync {
    /// Canonical email form used for storage and lookups.
    fn normalize_email(&self, raw: &str) -> String {
        crate::email::normalize_email(raw)
    }

    /// Derive a storable hash from a plaintext password.
    fn hash_password(&self, raw: &str) -> Result<String, CredentialError>;

    /// Check a plaintext password against a stored hash.
    fn verify_password(&self, raw: &str, stored: &str) -> bool;

    /// A stored value no password will ever verify against.
    fn unusable_password(&self) -> String {
        let salt = SaltString::generate(&mut OsRng);
        format!("{UNUSABLE_PASSWORD_PREFIX}{}", salt.as_str())
    }
}

/// Argon2id (default parameters) with a random salt per password.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Credentials;

impl Argon2Credentials {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialService for Argon2Credentials {
    fn hash_password(&self, raw: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(raw.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hash(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify_password(&self, raw: &str, stored: &str) -> bool {
        if stored.starts_with(UNUSABLE_PASSWORD_PREFIX) {
            return false;
        }
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };
        Argon2::default()
            .verify_password(raw.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_not_plaintext_and_verifies() {
        let creds = Argon2Credentials::new();
        let hash = creds.hash_password("s3cret").unwrap();

        assert_ne!(hash, "s3cret");
        assert!(hash.starts_with("$argon2"));
        assert!(creds.verify_password("s3cret", &hash));
        assert!(!creds.verify_password("wrong", &hash));
    }

    #[test]
    fn same_password_hashes_differently() {
        let creds = Argon2Credentials::new();
        assert_ne!(creds.hash_password("x").unwrap(), creds.hash_password("x").unwrap());
    }

    #[test]
    fn unusable_password_never_verifies() {
        let creds = Argon2Credentials::new();
        let stored = creds.unusable_password();

        assert!(stored.starts_with(UNUSABLE_PASSWORD_PREFIX));
        assert!(!creds.verify_password("", &stored));
        assert!(!creds.verify_password("anything", "not-a-hash"));
    }
}
