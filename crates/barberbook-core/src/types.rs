// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by storage adapters and services.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by storage health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Backend is fully operational.
    Healthy,
    /// Backend is operational but experiencing issues.
    Degraded(String),
    /// Backend is not operational.
    Unhealthy(String),
}

/// The two tenant roles of the product.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Barber,
}

/// Public profile of a signed-up user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// A profile together with its credential material, as persisted.
#[derive(Clone)]
pub struct Account {
    pub profile: UserProfile,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Pending email verification token, cleared once verified.
    pub verification_token: Option<String>,
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("profile", &self.profile)
            .field("password_hash", &"[REDACTED]")
            .field("verification_token", &self.verification_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// A persisted login session. Only the SHA-256 of the bearer token is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token_hash: String,
    pub user_id: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// A promotional offer issued by a shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    pub id: String,
    pub shop_id: String,
    pub title: String,
    pub description: String,
    /// Percentage, 0 to 100.
    pub discount: u8,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Eight-character uppercase redemption token.
    pub code: String,
    /// Data URI of the QR image encoding `code`.
    pub qr_code: String,
    /// Owner-controlled kill switch, independent of the date window.
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Position of `now` relative to an offer window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WindowStatus {
    Scheduled,
    Running,
    Expired,
}

/// Inclusive window check: `start <= now <= end`.
pub fn within_window(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= start && now <= end
}

impl Offer {
    /// Whether `now` falls inside the offer window, ignoring the `active` flag.
    pub fn is_within_window(&self, now: DateTime<Utc>) -> bool {
        within_window(self.start_date, self.end_date, now)
    }

    /// Derived effective status: switched on and inside the window.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.active && self.is_within_window(now)
    }

    /// Time-based status, orthogonal to the `active` flag.
    pub fn window_status(&self, now: DateTime<Utc>) -> WindowStatus {
        if now < self.start_date {
            WindowStatus::Scheduled
        } else if now > self.end_date {
            WindowStatus::Expired
        } else {
            WindowStatus::Running
        }
    }
}

/// One-time consumption record linking a customer to an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferRedemption {
    pub id: String,
    pub offer_id: String,
    pub customer_id: String,
    pub shop_id: String,
    pub redeemed_at: DateTime<Utc>,
}

/// Denormalized per-conversation summary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    /// `{shop_id}_{customer_id}`.
    pub id: String,
    pub shop_id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub last_message: Option<String>,
    pub last_message_time: Option<DateTime<Utc>>,
    /// Owner-facing unread badge.
    pub unread_count: u32,
    pub created_at: DateTime<Utc>,
}

/// A single chat message. Immutable once sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub chat_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub read: bool,
}

/// Result of appending a message to a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The message row was written and the header updated.
    Appended,
    /// A message with the same id already exists; nothing changed.
    Duplicate,
    /// No chat header exists for the message's chat id.
    ChatMissing,
}

/// Result of a keyed, idempotent insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome<T> {
    /// The row was written.
    Inserted,
    /// A row with the same natural key already exists.
    Existing(T),
}

/// Day of the week used as a working-hours key.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// Opening hours for a single day, as `HH:MM` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub open: String,
    pub close: String,
    pub closed: bool,
}

/// Weekly opening hours. Days without an entry are unspecified.
pub type WorkingHours = BTreeMap<Weekday, DayHours>;

/// A barber shop. Its id is the owner's user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub id: String,
    pub name: String,
    /// Code customers type to connect to the shop.
    pub code: String,
    pub owner_id: String,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub working_hours: WorkingHours,
    pub created_at: DateTime<Utc>,
}

/// A customer's connection to a shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerShop {
    pub id: String,
    pub customer_id: String,
    pub shop_id: String,
    pub shop_code: String,
    pub created_at: DateTime<Utc>,
}

/// A connected customer as seen from the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopCustomer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub connection_date: DateTime<Utc>,
}

/// One entry of a shop's price list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceItem {
    pub id: String,
    pub shop_id: String,
    pub name: String,
    /// Price in minor currency units.
    pub price_cents: i64,
    pub duration_minutes: Option<u32>,
    pub created_at: DateTime<Utc>,
}

/// Dashboard counters for a shop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopStats {
    pub customer_count: u64,
    pub active_offers_count: u64,
}
