// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id password hashes in PHC string format.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use barberbook_core::BarberError;
use ring::rand::{SecureRandom, SystemRandom};

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn hash_password(password: &str) -> Result<String, BarberError> {
    let mut salt = [0u8; 16];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| BarberError::Internal("system random source unavailable".into()))?;
    let salt = SaltString::encode_b64(&salt)
        .map_err(|e| BarberError::Internal(format!("failed to encode salt: {e}")))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| BarberError::Internal(format!("password hashing failed: {e}")))
}

/// `false` for a wrong password and for an unparsable stored hash.
pub fn verify_password(password: &str, phc: &str) -> bool {
    PasswordHash::new(phc)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashes_verify_and_are_salted() {
        let a = hash_password("secret1").unwrap();
        let b = hash_password("secret1").unwrap();

        assert!(a.starts_with("$argon2id$"));
        assert_ne!(a, b);
        assert!(verify_password("secret1", &a));
        assert!(!verify_password("secret2", &a));
    }

    #[test]
    fn garbage_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
