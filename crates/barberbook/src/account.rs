// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `barberbook account` subcommands.
//!
//! The session token from `login` is kept in the encrypted credential vault
//! inside the same database, so later commands can resume it.

use std::io::IsTerminal;

use barberbook_core::BarberError;
use barberbook_vault::{CredentialCache, Vault};
use clap::Subcommand;
use secrecy::SecretString;
use serde::Serialize;
use tracing::{debug, info};

use crate::app::App;
use crate::output;

#[derive(Subcommand, Debug)]
pub enum AccountCommand {
    /// Sign in and remember the session.
    Login { email: String },
    /// End the remembered session.
    Logout,
    /// Show who the remembered session belongs to.
    Whoami,
}

#[derive(Serialize)]
struct WhoamiView<'a> {
    email: &'a str,
    name: &'a str,
    role: String,
    expires_at: String,
}

fn read_password() -> Result<SecretString, BarberError> {
    let stdin = std::io::stdin();
    let password = if stdin.is_terminal() {
        rpassword::prompt_password("Password: ")
    } else {
        let mut line = String::new();
        stdin.read_line(&mut line).map(|_| line.trim_end_matches(['\r', '\n']).to_string())
    }
    .map_err(|e| BarberError::Internal(format!("failed to read password: {e}")))?;
    Ok(SecretString::from(password))
}

async fn credential_cache(app: &App) -> Result<CredentialCache, BarberError> {
    let conn = app.storage.db()?.connection().clone();
    let passphrase = barberbook_vault::passphrase()?;
    let vault = Vault::open_or_create(conn, &passphrase, &app.config.vault).await?;
    Ok(CredentialCache::new(vault))
}

pub async fn run(app: &App, cmd: AccountCommand, json: bool) -> Result<(), BarberError> {
    match cmd {
        AccountCommand::Login { email } => {
            let password = read_password()?;
            let session = app.auth.sign_in(&email, &password).await?;
            let cache = credential_cache(app).await?;
            cache.save(&session.email, session.token()).await?;
            info!(user_id = %session.user_id, "signed in");
            if !json {
                output::line(format!("signed in as {} ({})", session.email, session.role));
            }
            Ok(())
        }
        AccountCommand::Logout => {
            let cache = credential_cache(app).await?;
            let Some(cached) = cache.load().await? else {
                output::line("not signed in");
                return Ok(());
            };
            match app.auth.resume(&cached.session_token).await {
                Ok(session) => app.auth.sign_out(session).await?,
                Err(BarberError::Unauthorized(reason)) => {
                    debug!(%reason, "cached session already gone");
                }
                Err(e) => return Err(e),
            }
            cache.clear().await?;
            if !json {
                output::line(format!("signed out {}", cached.email));
            }
            Ok(())
        }
        AccountCommand::Whoami => {
            let cache = credential_cache(app).await?;
            let cached = cache
                .load()
                .await?
                .ok_or_else(|| BarberError::Unauthorized("Not signed in".into()))?;
            let session = app.auth.resume(&cached.session_token).await?;
            let profile = app.auth.profile(&session).await?;
            if json {
                return output::json(&WhoamiView {
                    email: &profile.email,
                    name: &profile.name,
                    role: profile.role.to_string(),
                    expires_at: session.expires_at.to_rfc3339(),
                });
            }
            output::line(format!(
                "{} <{}> ({}), session valid until {}",
                profile.name,
                profile.email,
                profile.role,
                session.expires_at.format("%Y-%m-%d %H:%M UTC")
            ));
            Ok(())
        }
    }
}
