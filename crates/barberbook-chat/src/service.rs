// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat service: header initialization, sending, read receipts and live views.

use std::sync::Arc;

use barberbook_core::traits::{AccountStore, ChatStore};
use barberbook_core::{
    AppendOutcome, BarberError, Chat, Clock, DomainEvent, EventBus, Message, Subscription,
};
use barberbook_resilience::{RetryPolicy, with_retry};
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_SNAPSHOT_LIMIT: u32 = 500;

const UNKNOWN_CUSTOMER: &str = "Unknown User";

/// Deterministic conversation id for a shop and customer.
pub fn chat_id(shop_id: &str, customer_id: &str) -> String {
    format!("{shop_id}_{customer_id}")
}

pub struct ChatService {
    chats: Arc<dyn ChatStore>,
    accounts: Arc<dyn AccountStore>,
    clock: Arc<dyn Clock>,
    events: EventBus,
    retry: RetryPolicy,
    snapshot_limit: u32,
}

impl ChatService {
    pub fn new(
        chats: Arc<dyn ChatStore>,
        accounts: Arc<dyn AccountStore>,
        clock: Arc<dyn Clock>,
        events: EventBus,
    ) -> Self {
        Self {
            chats,
            accounts,
            clock,
            events,
            retry: RetryPolicy::default(),
            snapshot_limit: DEFAULT_SNAPSHOT_LIMIT,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_snapshot_limit(mut self, limit: u32) -> Self {
        self.snapshot_limit = limit;
        self
    }

    /// Make sure the chat header exists and return its id.
    ///
    /// An existing header keeps its counters and last message.
    pub async fn initialize_chat(
        &self,
        shop_id: &str,
        customer_id: &str,
    ) -> Result<String, BarberError> {
        let id = chat_id(shop_id, customer_id);
        let customer_name =
            with_retry(&self.retry, || self.accounts.profile(customer_id))
                .await?
                .map(|profile| profile.name)
                .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string());

        let header = Chat {
            id: id.clone(),
            shop_id: shop_id.to_string(),
            customer_id: customer_id.to_string(),
            customer_name,
            last_message: None,
            last_message_time: None,
            unread_count: 0,
            created_at: self.clock.now(),
        };
        let created = with_retry(&self.retry, || self.chats.upsert_chat(&header)).await?;

        if created {
            info!(chat_id = %id, shop_id, "chat initialized");
            self.events.publish(DomainEvent::ChatInitialized {
                shop_id: shop_id.to_string(),
                chat_id: id.clone(),
            });
        }
        Ok(id)
    }

    /// Send a message in the conversation between `shop_id` and `customer_id`.
    ///
    /// Messages from the customer raise the owner's unread badge by one;
    /// messages from the shop leave it alone.
    pub async fn send_message(
        &self,
        shop_id: &str,
        customer_id: &str,
        content: &str,
        sender_id: &str,
        sender_name: &str,
    ) -> Result<Message, BarberError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(BarberError::Validation("Message cannot be empty".into()));
        }

        let message = Message {
            id: Uuid::new_v4().to_string(),
            chat_id: chat_id(shop_id, customer_id),
            sender_id: sender_id.to_string(),
            sender_name: sender_name.to_string(),
            content: content.to_string(),
            timestamp: self.clock.now(),
            read: false,
        };
        let from_customer = sender_id == customer_id;

        let mut outcome = self.append(&message, from_customer).await?;
        if outcome == AppendOutcome::ChatMissing {
            self.initialize_chat(shop_id, customer_id).await?;
            outcome = self.append(&message, from_customer).await?;
        }

        match outcome {
            AppendOutcome::Appended => {}
            AppendOutcome::Duplicate => {
                debug!(message_id = %message.id, "message already stored by an earlier attempt");
            }
            AppendOutcome::ChatMissing => {
                return Err(BarberError::NotFound {
                    entity: "chat",
                    id: message.chat_id,
                });
            }
        }

        debug!(chat_id = %message.chat_id, from_customer, "message sent");
        self.events.publish(DomainEvent::MessageSent {
            shop_id: shop_id.to_string(),
            chat_id: message.chat_id.clone(),
            message_id: message.id.clone(),
        });
        Ok(message)
    }

    /// Clear the owner's unread badge.
    pub async fn mark_messages_as_read(
        &self,
        shop_id: &str,
        customer_id: &str,
    ) -> Result<(), BarberError> {
        let id = chat_id(shop_id, customer_id);
        let found = with_retry(&self.retry, || self.chats.reset_unread(&id)).await?;
        if !found {
            return Err(BarberError::NotFound { entity: "chat", id });
        }

        self.events.publish(DomainEvent::ChatRead {
            shop_id: shop_id.to_string(),
            chat_id: id,
        });
        Ok(())
    }

    pub async fn chat(&self, chat_id: &str) -> Result<Option<Chat>, BarberError> {
        with_retry(&self.retry, || self.chats.get_chat(chat_id)).await
    }

    /// Every message of a conversation, oldest first.
    pub async fn messages(&self, chat_id: &str) -> Result<Vec<Message>, BarberError> {
        with_retry(&self.retry, || self.chats.messages(chat_id, None)).await
    }

    /// Owner inbox, most recent activity first.
    pub async fn chats_for_shop(&self, shop_id: &str) -> Result<Vec<Chat>, BarberError> {
        with_retry(&self.retry, || self.chats.chats_for_shop(shop_id, None)).await
    }

    /// Latest messages of one conversation, refreshed on every change to it.
    pub fn subscribe_messages(&self, chat_id: &str) -> Subscription<Message> {
        let store = self.chats.clone();
        let retry = self.retry;
        let limit = self.snapshot_limit;
        let watched = chat_id.to_string();
        let chat_id = chat_id.to_string();
        Subscription::new(
            self.events.subscribe(),
            move |event: &DomainEvent| event.chat_id() == Some(watched.as_str()),
            move || {
                let store = store.clone();
                let chat_id = chat_id.clone();
                async move { with_retry(&retry, || store.messages(&chat_id, Some(limit))).await }
            },
        )
    }

    /// The shop's inbox, refreshed whenever any of its chats changes.
    pub fn subscribe_shop_chats(&self, shop_id: &str) -> Subscription<Chat> {
        let store = self.chats.clone();
        let retry = self.retry;
        let limit = self.snapshot_limit;
        let watched = shop_id.to_string();
        let shop_id = shop_id.to_string();
        Subscription::new(
            self.events.subscribe(),
            move |event: &DomainEvent| event.chat_id().is_some() && event.shop_id() == watched,
            move || {
                let store = store.clone();
                let shop_id = shop_id.clone();
                async move {
                    with_retry(&retry, || store.chats_for_shop(&shop_id, Some(limit))).await
                }
            },
        )
    }

    async fn append(
        &self,
        message: &Message,
        bump_unread: bool,
    ) -> Result<AppendOutcome, BarberError> {
        with_retry(&self.retry, || self.chats.append_message(message, bump_unread)).await
    }
}
