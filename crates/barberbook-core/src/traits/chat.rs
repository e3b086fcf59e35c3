// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;

use crate::error::BarberError;
use crate::types::{AppendOutcome, Chat, Message};

/// Chat header and message persistence.
#[async_trait]
pub trait ChatStore: Send + Sync + 'static {
    /// Create the header if missing. An existing header is left untouched.
    /// Returns `true` when a new header was written.
    async fn upsert_chat(&self, chat: &Chat) -> Result<bool, BarberError>;

    async fn get_chat(&self, chat_id: &str) -> Result<Option<Chat>, BarberError>;

    /// Headers of a shop ordered by most recent activity, at most `limit`.
    async fn chats_for_shop(
        &self,
        shop_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Chat>, BarberError>;

    /// Append a message and update the header in one transaction.
    ///
    /// `last_message` and `last_message_time` always follow the new message;
    /// `unread_count` is incremented only when `bump_unread` is set. A message
    /// id that already exists changes nothing.
    async fn append_message(
        &self,
        message: &Message,
        bump_unread: bool,
    ) -> Result<AppendOutcome, BarberError>;

    /// Zero the unread counter and flag messages as read.
    /// Returns `false` when the chat does not exist.
    async fn reset_unread(&self, chat_id: &str) -> Result<bool, BarberError>;

    /// The `limit` most recent messages, returned oldest first.
    async fn messages(
        &self,
        chat_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Message>, BarberError>;
}
