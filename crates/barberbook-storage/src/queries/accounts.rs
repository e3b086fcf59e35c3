// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User accounts and login sessions.

use barberbook_core::{Account, BarberError, Role, SessionRecord, UserProfile};
use rusqlite::{OptionalExtension, Row, params};

use crate::database::{Database, map_tr_err};
use crate::queries::parse_enum;

const PROFILE_COLUMNS: &str = "id, email, name, phone, role, email_verified, created_at";

fn profile_from_row(row: &Row<'_>) -> Result<UserProfile, rusqlite::Error> {
    Ok(UserProfile {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        phone: row.get(3)?,
        role: parse_enum::<Role>(4, row.get(4)?)?,
        email_verified: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn session_from_row(row: &Row<'_>) -> Result<SessionRecord, rusqlite::Error> {
    Ok(SessionRecord {
        token_hash: row.get(0)?,
        user_id: row.get(1)?,
        role: parse_enum::<Role>(2, row.get(2)?)?,
        created_at: row.get(3)?,
        expires_at: row.get(4)?,
    })
}

/// Returns `false` when the email (case-insensitive) or id is taken.
pub async fn insert_account(db: &Database, account: &Account) -> Result<bool, BarberError> {
    let account = account.clone();
    db.connection()
        .call(move |conn| {
            let p = &account.profile;
            let inserted = conn.execute(
                "INSERT INTO users (id, email, name, phone, role, email_verified, \
                 password_hash, verification_token, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9) ON CONFLICT DO NOTHING",
                params![
                    p.id,
                    p.email,
                    p.name,
                    p.phone,
                    p.role.to_string(),
                    p.email_verified,
                    account.password_hash,
                    account.verification_token,
                    p.created_at,
                ],
            )?;
            Ok(inserted == 1)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn account_by_email(db: &Database, email: &str) -> Result<Option<Account>, BarberError> {
    let email = email.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!(
                    "SELECT {PROFILE_COLUMNS}, password_hash, verification_token \
                     FROM users WHERE email = ?1"
                ),
                params![email],
                |row| {
                    Ok(Account {
                        profile: profile_from_row(row)?,
                        password_hash: row.get(7)?,
                        verification_token: row.get(8)?,
                    })
                },
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn profile(db: &Database, user_id: &str) -> Result<Option<UserProfile>, BarberError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {PROFILE_COLUMNS} FROM users WHERE id = ?1"),
                params![user_id],
                profile_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Consume the pending verification token. Returns `false` when `token` is
/// not the pending one.
pub async fn mark_email_verified(
    db: &Database,
    user_id: &str,
    token: &str,
) -> Result<bool, BarberError> {
    let user_id = user_id.to_string();
    let token = token.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE users SET email_verified = 1, verification_token = NULL \
                 WHERE id = ?1 AND verification_token = ?2",
                params![user_id, token],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn insert_session(db: &Database, session: &SessionRecord) -> Result<(), BarberError> {
    let s = session.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sessions (token_hash, user_id, role, created_at, expires_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5) ON CONFLICT DO NOTHING",
                params![s.token_hash, s.user_id, s.role.to_string(), s.created_at, s.expires_at],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn session_by_token_hash(
    db: &Database,
    token_hash: &str,
) -> Result<Option<SessionRecord>, BarberError> {
    let token_hash = token_hash.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT token_hash, user_id, role, created_at, expires_at \
                 FROM sessions WHERE token_hash = ?1",
                params![token_hash],
                session_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn delete_session(db: &Database, token_hash: &str) -> Result<bool, BarberError> {
    let token_hash = token_hash.to_string();
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM sessions WHERE token_hash = ?1",
                params![token_hash],
            )?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Remove an account and, through the foreign key, its sessions.
pub async fn delete_account(db: &Database, user_id: &str) -> Result<bool, BarberError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute("DELETE FROM users WHERE id = ?1", params![user_id])?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_tr_err)
}
