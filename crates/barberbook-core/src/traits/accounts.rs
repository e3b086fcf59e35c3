// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;

use crate::error::BarberError;
use crate::types::{Account, SessionRecord, UserProfile};

/// User accounts and login sessions.
#[async_trait]
pub trait AccountStore: Send + Sync + 'static {
    /// Insert an account. Returns `false` when the email is already registered.
    async fn insert_account(&self, account: &Account) -> Result<bool, BarberError>;

    async fn account_by_email(&self, email: &str) -> Result<Option<Account>, BarberError>;

    async fn profile(&self, user_id: &str) -> Result<Option<UserProfile>, BarberError>;

    /// Mark the email verified if `token` matches the pending token.
    async fn mark_email_verified(&self, user_id: &str, token: &str) -> Result<bool, BarberError>;

    async fn insert_session(&self, session: &SessionRecord) -> Result<(), BarberError>;

    async fn session_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionRecord>, BarberError>;

    async fn delete_session(&self, token_hash: &str) -> Result<bool, BarberError>;

    /// Remove an account together with its sessions.
    async fn delete_account(&self, user_id: &str) -> Result<bool, BarberError>;
}
