// Credential hashing with argon2
//
// Every hash gets a fresh salt, so equal passwords never produce equal
// hashes. Verification treats a malformed stored hash as a mismatch rather
// than an error: attacker-influenced input must never turn into a 500.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use medassist_core::{CoreError, Result};

/// One-way hash of `password` with a freshly generated salt.
///
/// Fails only if the hasher itself fails (entropy exhaustion, parameter
/// corruption), which callers treat as unrecoverable.
pub fn hash(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| CoreError::internal(format!("password hashing failed: {err}")))?;
    Ok(hash.to_string())
}

/// Verify `password` against a stored hash. Returns false on mismatch or on a
/// hash that does not parse.
pub fn verify(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_roundtrip() {
        let hashed = hash("pw1").unwrap();
        assert!(verify("pw1", &hashed));
    }

    #[test]
    fn wrong_password_fails() {
        let hashed = hash("pw1").unwrap();
        assert!(!verify("pw2", &hashed));
    }

    #[test]
    fn same_password_hashes_differently() {
        let first = hash("pw1").unwrap();
        let second = hash("pw1").unwrap();
        assert_ne!(first, second);
        assert!(verify("pw1", &first));
        assert!(verify("pw1", &second));
    }

    #[test]
    fn malformed_hash_is_a_mismatch_not_an_error() {
        assert!(!verify("pw1", "not-a-phc-string"));
        assert!(!verify("pw1", ""));
        assert!(!verify("pw1", "$argon2id$corrupted"));
    }

    #[test]
    fn empty_password_still_roundtrips() {
        let hashed = hash("").unwrap();
        assert!(verify("", &hashed));
        assert!(!verify("x", &hashed));
    }
}
