// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Argon2id passphrase stretching.

use argon2::{Algorithm, Argon2, Params, Version};
use barberbook_config::model::VaultConfig;
use barberbook_core::BarberError;
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::cipher::KEY_LEN;

pub const SALT_LEN: usize = 16;

/// Argon2id cost parameters. Persisted next to the wrapped key so a vault
/// created with one configuration still unlocks after the config changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// KiB.
    pub memory_cost: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl From<&VaultConfig> for KdfParams {
    fn from(config: &VaultConfig) -> Self {
        Self {
            memory_cost: config.kdf_memory_cost,
            iterations: config.kdf_iterations,
            parallelism: config.kdf_parallelism,
        }
    }
}

impl KdfParams {
    pub fn derive(
        &self,
        passphrase: &[u8],
        salt: &[u8; SALT_LEN],
    ) -> Result<Zeroizing<[u8; KEY_LEN]>, BarberError> {
        let params = Params::new(
            self.memory_cost,
            self.iterations,
            self.parallelism,
            Some(KEY_LEN),
        )
        .map_err(|e| BarberError::Vault(format!("invalid Argon2id parameters: {e}")))?;

        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password_into(passphrase, salt, key.as_mut_slice())
            .map_err(|e| BarberError::Vault(format!("key derivation failed: {e}")))?;
        Ok(key)
    }
}

pub fn generate_salt() -> Result<[u8; SALT_LEN], BarberError> {
    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| BarberError::Vault("system random source unavailable".into()))?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: KdfParams = KdfParams {
        memory_cost: 32768,
        iterations: 2,
        parallelism: 1,
    };

    #[test]
    fn derivation_is_deterministic_per_salt() {
        let salt = [7u8; SALT_LEN];
        let a = FAST.derive(b"correct horse", &salt).unwrap();
        let b = FAST.derive(b"correct horse", &salt).unwrap();
        let c = FAST.derive(b"correct horse", &[8u8; SALT_LEN]).unwrap();
        let d = FAST.derive(b"battery staple", &salt).unwrap();

        assert_eq!(*a, *b);
        assert_ne!(*a, *c);
        assert_ne!(*a, *d);
    }

    #[test]
    fn params_follow_config() {
        let config = VaultConfig::default();
        let params = KdfParams::from(&config);
        assert_eq!(params.memory_cost, config.kdf_memory_cost);
        assert_eq!(params.parallelism, config.kdf_parallelism);
    }

    #[test]
    fn salts_are_random() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
    }
}
