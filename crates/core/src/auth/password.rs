//! Argon2id password hashing for staff accounts.

use std::sync::OnceLock;

use argon2::{
    Argon2, PasswordHash,
    password_hash::{self, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Password hashing failures. A wrong password is not an error.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Argon2 could not produce a hash.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// The stored hash could not be checked.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// The stored value is not a PHC string.
    #[error("invalid password hash format")]
    InvalidHash,
}

/// Hashes `password` into a PHC string with a fresh random salt.
///
/// ```
/// use zakat_core::auth::hash_password;
///
/// let hash = hash_password("amil-secret").unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Checks `password` against a stored PHC hash.
///
/// Returns `Ok(false)` for a mismatch; errors are reserved for hashes that
/// cannot be parsed or checked.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}

/// Spends the same work as [`verify_password`] when no account matched, so a
/// login for an unknown email takes as long as one with a wrong password.
pub fn verify_without_account(password: &str) {
    static DECOY: OnceLock<Option<String>> = OnceLock::new();
    if let Some(hash) = DECOY.get_or_init(|| hash_password("no-such-account").ok()) {
        let _ = verify_password(password, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let hash = hash_password("bismillah-2026").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("bismillah-2026", &hash).unwrap());
        assert!(!verify_password("bismillah-2025", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        assert_ne!(
            hash_password("same-password").unwrap(),
            hash_password("same-password").unwrap()
        );
    }

    #[test]
    fn test_seeded_placeholder_hash_is_rejected() {
        let result = verify_password("anything", "$argon2id$test_hash");
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
    }

    #[test]
    fn test_decoy_verification_does_not_panic() {
        verify_without_account("whatever");
        verify_without_account("whatever");
    }
}
