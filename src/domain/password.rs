//! Password value object.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::config::MIN_PASSWORD_LENGTH;
use crate::errors::{AppError, AppResult};

/// Well-formed argon2 hash that never matches; verified against when the
/// account does not exist so unknown identifiers cost the same time.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$1Qc4Zc2hVh0oJ0yQmF6G3yQ2vQx0c1l7z6m1oFq0Ykc";

/// Argon2 password hash.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain text password.
    ///
    /// # Errors
    /// Returns a validation error if the password is shorter than the minimum.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        if plain_text.chars().count() < MIN_PASSWORD_LENGTH as usize {
            return Err(AppError::validation(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
            ));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?
            .to_string();
        Ok(Self { hash })
    }

    /// Wrap a hash loaded from storage.
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password. Malformed hashes never match.
    pub fn verify(&self, plain_text: &str) -> bool {
        PasswordHash::new(&self.hash)
            .map(|parsed| {
                Argon2::default()
                    .verify_password(plain_text.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// Verify against a stored hash, or against a dummy hash when there is
    /// no account, so both paths do the same work.
    pub fn verify_stored(stored_hash: Option<&str>, plain_text: &str) -> bool {
        match stored_hash {
            Some(hash) => Self::from_hash(hash.to_string()).verify(plain_text),
            None => {
                let _ = Self::from_hash(DUMMY_HASH.to_string()).verify(plain_text);
                false
            }
        }
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_and_verify() {
        let password = Password::new("A123456a").unwrap();
        assert!(password.verify("A123456a"));
        assert!(!password.verify("A123456b"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let first = Password::new("SamePassword123").unwrap();
        let second = Password::new("SamePassword123").unwrap();
        assert_ne!(first.as_str(), second.as_str());
        assert!(Password::from_hash(first.into_string()).verify("SamePassword123"));
    }

    #[test]
    fn test_password_too_short() {
        assert!(matches!(
            Password::new("short"),
            Err(AppError::Validation(ref fields)) if fields.contains_key("password")
        ));
    }

    #[test]
    fn test_verify_stored_without_account_fails() {
        assert!(!Password::verify_stored(None, "anything-at-all"));
    }

    #[test]
    fn test_malformed_hash_never_matches() {
        assert!(!Password::from_hash("not-a-hash".into()).verify("not-a-hash"));
    }
}
