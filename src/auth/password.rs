use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::VaultError;

/// Hash a password with Argon2id and a fresh random salt, producing a
/// self-describing PHC string.
pub fn hash(password: &str) -> Result<String, VaultError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC string. An unparseable hash
/// counts as a mismatch rather than an error.
pub fn verify(password: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash("secret123").unwrap();
        assert!(verify("secret123", &hash));
        assert!(!verify("secret124", &hash));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash("same_password").unwrap();
        let b = hash("same_password").unwrap();
        assert_ne!(a, b);
        assert!(verify("same_password", &a));
        assert!(verify("same_password", &b));
    }

    #[test]
    fn garbage_hash_is_a_mismatch() {
        assert!(!verify("anything", "not-a-phc-string"));
    }
}
