//! Password hashing and verification using bcrypt.
//!
//! Every hash embeds its own random salt and work factor, so the same password hashes to a
//! different string each time while still verifying against all of them.

use crate::error::AuthError;

/// bcrypt work factor used when the configuration does not override it.
pub const DEFAULT_COST: u32 = 10;

/// bcrypt only reads this many bytes of input; longer passwords are refused rather than truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hash a password with [`DEFAULT_COST`].
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    hash_password_with_cost(password, DEFAULT_COST)
}

/// Hash a password with an explicit work factor (4..=31).
///
/// Fails on a password longer than [`MAX_PASSWORD_BYTES`], an out-of-range cost, or when the
/// system entropy source is unavailable.
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, AuthError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AuthError::EncodingError(format!(
            "password exceeds {MAX_PASSWORD_BYTES} bytes"
        )));
    }
    bcrypt::hash(password, cost).map_err(|e| AuthError::EncodingError(e.to_string()))
}

/// Check a plaintext candidate against a stored hash.
///
/// A malformed hash never matches, nor does a candidate longer than [`MAX_PASSWORD_BYTES`].
/// The digest comparison inside `bcrypt` is constant-time.
pub fn verify_password(password: &str, hash: &str) -> bool {
    if password.len() > MAX_PASSWORD_BYTES {
        return false;
    }
    bcrypt::verify(password, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_embeds_cost_and_salt() {
        let hash = hash_password("Secret123").expect("Failed to hash password");

        assert!(hash.starts_with("$2b$10$"), "unexpected hash format: {hash}");
        assert_eq!(hash.len(), 60);
        assert!(verify_password("Secret123", &hash));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = hash_password_with_cost("Secret123", TEST_COST).unwrap();

        assert!(verify_password("Secret123", &hash));
        assert!(!verify_password("secret123", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let first = hash_password_with_cost("Secret123", TEST_COST).unwrap();
        let second = hash_password_with_cost("Secret123", TEST_COST).unwrap();

        assert_ne!(first, second);
        assert!(verify_password("Secret123", &first));
        assert!(verify_password("Secret123", &second));
    }

    #[test]
    fn test_malformed_hash_is_false_not_error() {
        assert!(!verify_password("Secret123", ""));
        assert!(!verify_password("Secret123", "plaintext-password"));
        assert!(!verify_password("Secret123", "$2b$10$tooshort"));
    }

    #[test]
    fn test_invalid_cost_is_encoding_error() {
        let result = hash_password_with_cost("Secret123", 99);
        assert!(matches!(result, Err(AuthError::EncodingError(_))));
    }

    #[test]
    fn test_long_passwords_are_not_truncated() {
        let at_limit = "a".repeat(MAX_PASSWORD_BYTES);
        let hash = hash_password_with_cost(&at_limit, TEST_COST).unwrap();
        assert!(verify_password(&at_limit, &hash));

        let stored = format!("{at_limit}X");
        let candidate = format!("{at_limit}Y");
        assert!(matches!(
            hash_password_with_cost(&stored, TEST_COST),
            Err(AuthError::EncodingError(_))
        ));
        assert!(!verify_password(&candidate, &hash));
        assert!(!verify_password(&stored, &hash));
    }

    #[test]
    fn test_unicode_and_empty_passwords() {
        for password in ["", "pässwörd", "パスワード", "with spaces and\ttabs"] {
            let hash = hash_password_with_cost(password, TEST_COST).unwrap();
            assert!(verify_password(password, &hash), "failed for {password:?}");
        }
    }
}
