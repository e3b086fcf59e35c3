// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase-protected key/value store inside the application database.
//!
//! `vault_meta` holds a single key envelope: the master key sealed under the
//! passphrase-derived key, with the salt and KDF parameters needed to derive
//! it again. `vault_entries` holds values sealed under the master key.
//! Changing the passphrase re-seals only the envelope.

use barberbook_config::model::VaultConfig;
use barberbook_core::BarberError;
use ring::aead::NONCE_LEN;
use rusqlite::{OptionalExtension, params};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::cipher::{self, KEY_LEN, Sealed};
use crate::kdf::{KdfParams, SALT_LEN, generate_salt};

const ENVELOPE_KEY: &str = "key_envelope";

#[derive(Serialize, Deserialize)]
struct KeyEnvelope {
    kdf: KdfParams,
    salt: String,
    nonce: String,
    wrapped_key: String,
}

impl KeyEnvelope {
    fn seal(
        master_key: &[u8; KEY_LEN],
        passphrase: &SecretString,
        kdf: KdfParams,
    ) -> Result<Self, BarberError> {
        let salt = generate_salt()?;
        let wrapping_key = kdf.derive(passphrase.expose_secret().as_bytes(), &salt)?;
        let sealed = cipher::seal(&wrapping_key, master_key)?;
        Ok(Self {
            kdf,
            salt: hex::encode(salt),
            nonce: hex::encode(sealed.nonce),
            wrapped_key: hex::encode(sealed.ciphertext),
        })
    }

    fn open(&self, passphrase: &SecretString) -> Result<Zeroizing<[u8; KEY_LEN]>, BarberError> {
        let salt: [u8; SALT_LEN] = decode_fixed(&self.salt, "salt")?;
        let sealed = Sealed {
            ciphertext: hex::decode(&self.wrapped_key)
                .map_err(|_| corrupted("wrapped key"))?,
            nonce: decode_fixed(&self.nonce, "nonce")?,
        };
        let wrapping_key = self.kdf.derive(passphrase.expose_secret().as_bytes(), &salt)?;
        let plaintext = cipher::open(&wrapping_key, &sealed)
            .map_err(|_| BarberError::Vault("wrong passphrase or corrupted vault".into()))?;

        let mut master_key = Zeroizing::new([0u8; KEY_LEN]);
        if plaintext.len() != KEY_LEN {
            return Err(corrupted("master key"));
        }
        master_key.copy_from_slice(&plaintext);
        Ok(master_key)
    }
}

fn decode_fixed<const N: usize>(value: &str, what: &str) -> Result<[u8; N], BarberError> {
    hex::decode(value)
        .ok()
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or_else(|| corrupted(what))
}

fn corrupted(what: &str) -> BarberError {
    BarberError::Vault(format!("corrupted vault {what}"))
}

fn map_db_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> BarberError {
    BarberError::Vault(format!("vault database error: {e}"))
}

/// An unlocked vault. The master key lives only in memory.
pub struct Vault {
    master_key: Zeroizing<[u8; KEY_LEN]>,
    conn: tokio_rusqlite::Connection,
}

impl std::fmt::Debug for Vault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vault")
            .field("master_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Vault {
    pub async fn exists(conn: &tokio_rusqlite::Connection) -> Result<bool, BarberError> {
        conn.call(|conn| -> Result<bool, rusqlite::Error> {
            conn.query_row(
                "SELECT EXISTS (SELECT 1 FROM vault_meta WHERE key = ?1)",
                params![ENVELOPE_KEY],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_db_err)
    }

    /// Initialize a new vault protected by `passphrase`.
    pub async fn create(
        conn: tokio_rusqlite::Connection,
        passphrase: &SecretString,
        config: &VaultConfig,
    ) -> Result<Self, BarberError> {
        if Self::exists(&conn).await? {
            return Err(BarberError::Vault("vault already exists".into()));
        }
        let master_key = cipher::random_key()?;
        let envelope = KeyEnvelope::seal(&master_key, passphrase, KdfParams::from(config))?;
        write_envelope(&conn, &envelope).await?;

        info!("credential vault created");
        Ok(Self { master_key, conn })
    }

    pub async fn unlock(
        conn: tokio_rusqlite::Connection,
        passphrase: &SecretString,
    ) -> Result<Self, BarberError> {
        let raw = conn
            .call(|conn| -> Result<Option<Vec<u8>>, rusqlite::Error> {
                conn.query_row(
                    "SELECT value FROM vault_meta WHERE key = ?1",
                    params![ENVELOPE_KEY],
                    |row| row.get(0),
                )
                .optional()
            })
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| BarberError::Vault("no vault has been created yet".into()))?;

        let envelope: KeyEnvelope =
            serde_json::from_slice(&raw).map_err(|_| corrupted("key envelope"))?;
        let master_key = envelope.open(passphrase)?;

        debug!("credential vault unlocked");
        Ok(Self { master_key, conn })
    }

    /// Unlock the vault, creating it on first use.
    pub async fn open_or_create(
        conn: tokio_rusqlite::Connection,
        passphrase: &SecretString,
        config: &VaultConfig,
    ) -> Result<Self, BarberError> {
        if Self::exists(&conn).await? {
            Self::unlock(conn, passphrase).await
        } else {
            Self::create(conn, passphrase, config).await
        }
    }

    /// Store or replace an entry.
    pub async fn put(&self, name: &str, value: &[u8]) -> Result<(), BarberError> {
        let sealed = cipher::seal(&self.master_key, value)?;
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO vault_entries (name, ciphertext, nonce) VALUES (?1, ?2, ?3) \
                     ON CONFLICT (name) DO UPDATE SET ciphertext = excluded.ciphertext, \
                     nonce = excluded.nonce, \
                     updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')",
                    params![name, sealed.ciphertext, sealed.nonce.to_vec()],
                )?;
                Ok(())
            })
            .await
            .map_err(map_db_err)
    }

    pub async fn get(&self, name: &str) -> Result<Option<Zeroizing<Vec<u8>>>, BarberError> {
        let name = name.to_string();
        let row = self
            .conn
            .call(move |conn| -> Result<Option<(Vec<u8>, Vec<u8>)>, rusqlite::Error> {
                conn.query_row(
                    "SELECT ciphertext, nonce FROM vault_entries WHERE name = ?1",
                    params![name],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()
            })
            .await
            .map_err(map_db_err)?;

        let Some((ciphertext, nonce)) = row else {
            return Ok(None);
        };
        let nonce: [u8; NONCE_LEN] = nonce.try_into().map_err(|_| corrupted("entry nonce"))?;
        cipher::open(&self.master_key, &Sealed { ciphertext, nonce }).map(Some)
    }

    /// Returns `false` when there was nothing to remove.
    pub async fn remove(&self, name: &str) -> Result<bool, BarberError> {
        let name = name.to_string();
        self.conn
            .call(move |conn| -> Result<bool, rusqlite::Error> {
                Ok(conn.execute("DELETE FROM vault_entries WHERE name = ?1", params![name])? > 0)
            })
            .await
            .map_err(map_db_err)
    }

    /// Re-wrap the master key under a new passphrase.
    pub async fn change_passphrase(
        &self,
        new_passphrase: &SecretString,
        config: &VaultConfig,
    ) -> Result<(), BarberError> {
        let envelope = KeyEnvelope::seal(&self.master_key, new_passphrase, KdfParams::from(config))?;
        write_envelope(&self.conn, &envelope).await?;
        info!("credential vault passphrase changed");
        Ok(())
    }
}

async fn write_envelope(
    conn: &tokio_rusqlite::Connection,
    envelope: &KeyEnvelope,
) -> Result<(), BarberError> {
    let raw = serde_json::to_vec(envelope)
        .map_err(|e| BarberError::Vault(format!("failed to encode key envelope: {e}")))?;
    conn.call(move |conn| -> Result<(), rusqlite::Error> {
        conn.execute(
            "INSERT INTO vault_meta (key, value) VALUES (?1, ?2) \
             ON CONFLICT (key) DO UPDATE SET value = excluded.value",
            params![ENVELOPE_KEY, raw],
        )?;
        Ok(())
    })
    .await
    .map_err(map_db_err)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use barberbook_storage::Database;
    use tempfile::TempDir;

    pub(crate) fn fast_config() -> VaultConfig {
        VaultConfig {
            kdf_memory_cost: 32768,
            kdf_iterations: 2,
            kdf_parallelism: 1,
        }
    }

    pub(crate) async fn test_db() -> (Database, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.db");
        let db = Database::open(path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn pass(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[tokio::test]
    async fn create_then_unlock_with_same_passphrase() {
        let (db, _dir) = test_db().await;
        let conn = db.connection().clone();
        assert!(!Vault::exists(&conn).await.unwrap());

        let vault = Vault::create(conn.clone(), &pass("hunter22"), &fast_config())
            .await
            .unwrap();
        vault.put("token", b"abc").await.unwrap();
        drop(vault);

        let vault = Vault::unlock(conn, &pass("hunter22")).await.unwrap();
        assert_eq!(vault.get("token").await.unwrap().unwrap().as_slice(), b"abc");
    }

    #[tokio::test]
    async fn wrong_passphrase_is_refused() {
        let (db, _dir) = test_db().await;
        let conn = db.connection().clone();
        Vault::create(conn.clone(), &pass("right"), &fast_config())
            .await
            .unwrap();

        let err = Vault::unlock(conn, &pass("wrong")).await.unwrap_err();
        assert!(err.to_string().contains("wrong passphrase"));
    }

    #[tokio::test]
    async fn creating_twice_fails() {
        let (db, _dir) = test_db().await;
        let conn = db.connection().clone();
        Vault::create(conn.clone(), &pass("p"), &fast_config()).await.unwrap();
        assert!(Vault::create(conn, &pass("p"), &fast_config()).await.is_err());
    }

    #[tokio::test]
    async fn entries_can_be_replaced_and_removed() {
        let (db, _dir) = test_db().await;
        let vault = Vault::open_or_create(db.connection().clone(), &pass("p"), &fast_config())
            .await
            .unwrap();

        vault.put("k", b"one").await.unwrap();
        vault.put("k", b"two").await.unwrap();
        assert_eq!(vault.get("k").await.unwrap().unwrap().as_slice(), b"two");

        assert!(vault.remove("k").await.unwrap());
        assert!(!vault.remove("k").await.unwrap());
        assert!(vault.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn passphrase_change_keeps_entries() {
        let (db, _dir) = test_db().await;
        let conn = db.connection().clone();
        let vault = Vault::create(conn.clone(), &pass("old"), &fast_config())
            .await
            .unwrap();
        vault.put("k", b"kept").await.unwrap();
        vault
            .change_passphrase(&pass("new"), &fast_config())
            .await
            .unwrap();

        assert!(Vault::unlock(conn.clone(), &pass("old")).await.is_err());
        let vault = Vault::unlock(conn, &pass("new")).await.unwrap();
        assert_eq!(vault.get("k").await.unwrap().unwrap().as_slice(), b"kept");
    }

    #[tokio::test]
    async fn debug_output_hides_master_key() {
        let (db, _dir) = test_db().await;
        let vault = Vault::create(db.connection().clone(), &pass("p"), &fast_config())
            .await
            .unwrap();
        assert!(format!("{vault:?}").contains("[REDACTED]"));
    }
}
