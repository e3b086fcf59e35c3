// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted local storage for the signed-in user's session.
//!
//! A random master key encrypts every entry with AES-256-GCM. The master key
//! is stored wrapped by a key derived from the operator's passphrase with
//! Argon2id. Passwords are never written, only the email and session token.

pub mod cache;
pub mod cipher;
pub mod kdf;
pub mod prompt;
pub mod vault;

pub use cache::{CachedCredentials, CredentialCache};
pub use kdf::KdfParams;
pub use prompt::{VAULT_KEY_ENV_VAR, passphrase, passphrase_with_confirm};
pub use vault::Vault;
