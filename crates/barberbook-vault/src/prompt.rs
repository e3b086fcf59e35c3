// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault passphrase from the environment or an interactive prompt.

use std::io::IsTerminal;

use barberbook_core::BarberError;
use secrecy::SecretString;

pub const VAULT_KEY_ENV_VAR: &str = "BARBERBOOK_VAULT_KEY";

fn from_env() -> Option<SecretString> {
    std::env::var(VAULT_KEY_ENV_VAR)
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
}

fn read(prompt: &str) -> Result<String, BarberError> {
    eprint!("{prompt}");
    let value = rpassword::read_password()
        .map_err(|e| BarberError::Vault(format!("failed to read passphrase: {e}")))?;
    if value.is_empty() {
        return Err(BarberError::Vault("empty passphrase not allowed".into()));
    }
    Ok(value)
}

fn unavailable() -> BarberError {
    BarberError::Vault(format!(
        "no vault passphrase, set {VAULT_KEY_ENV_VAR} or run interactively"
    ))
}

/// `BARBERBOOK_VAULT_KEY` if set, otherwise ask on the terminal.
pub fn passphrase() -> Result<SecretString, BarberError> {
    if let Some(key) = from_env() {
        return Ok(key);
    }
    if !std::io::stdin().is_terminal() {
        return Err(unavailable());
    }
    read("Vault passphrase: ").map(SecretString::from)
}

/// Like [`passphrase`], but an interactive user must type it twice.
pub fn passphrase_with_confirm() -> Result<SecretString, BarberError> {
    if let Some(key) = from_env() {
        return Ok(key);
    }
    if !std::io::stdin().is_terminal() {
        return Err(unavailable());
    }
    let first = read("New vault passphrase: ")?;
    let second = read("Confirm vault passphrase: ")?;
    if first != second {
        return Err(BarberError::Vault("passphrases do not match".into()));
    }
    Ok(SecretString::from(first))
}
