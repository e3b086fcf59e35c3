// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The remembered login: email plus session token, never the password.

use barberbook_core::BarberError;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;
use zeroize::Zeroizing;

use crate::vault::Vault;

const ENTRY: &str = "session_credentials";

/// Credentials restored on start-up.
pub struct CachedCredentials {
    pub email: String,
    pub session_token: SecretString,
}

impl std::fmt::Debug for CachedCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedCredentials")
            .field("email", &self.email)
            .field("session_token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Serialize)]
struct PayloadRef<'a> {
    email: &'a str,
    session_token: &'a str,
}

#[derive(Deserialize)]
struct Payload {
    email: String,
    session_token: String,
}

#[derive(Debug)]
pub struct CredentialCache {
    vault: Vault,
}

impl CredentialCache {
    pub fn new(vault: Vault) -> Self {
        Self { vault }
    }

    /// Remember the session after a successful sign-in.
    pub async fn save(&self, email: &str, session_token: &SecretString) -> Result<(), BarberError> {
        let payload = PayloadRef {
            email,
            session_token: session_token.expose_secret(),
        };
        let bytes = Zeroizing::new(
            serde_json::to_vec(&payload)
                .map_err(|e| BarberError::Vault(format!("failed to encode credentials: {e}")))?,
        );
        self.vault.put(ENTRY, &bytes).await?;
        debug!(email, "session credentials cached");
        Ok(())
    }

    pub async fn load(&self) -> Result<Option<CachedCredentials>, BarberError> {
        let Some(bytes) = self.vault.get(ENTRY).await? else {
            return Ok(None);
        };
        let payload: Payload = serde_json::from_slice(&bytes)
            .map_err(|_| BarberError::Vault("cached credentials are unreadable".into()))?;
        Ok(Some(CachedCredentials {
            email: payload.email,
            session_token: SecretString::from(payload.session_token),
        }))
    }

    /// Forget the session, typically on sign-out.
    pub async fn clear(&self) -> Result<(), BarberError> {
        if self.vault.remove(ENTRY).await? {
            debug!("session credentials cleared");
        }
        Ok(())
    }
}
