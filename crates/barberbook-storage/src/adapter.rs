// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of every storage trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use barberbook_config::model::StorageConfig;
use barberbook_core::traits::{
    AccountStore, ChatStore, OfferStore, PriceStore, RedemptionStore, ShopStore, StorageAdapter,
};
use barberbook_core::{
    Account, AppendOutcome, BarberError, Chat, CustomerShop, HealthStatus, InsertOutcome, Message,
    Offer, OfferRedemption, PriceItem, SessionRecord, Shop, ShopCustomer, UserProfile,
    WorkingHours,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed storage.
///
/// The database is opened by [`StorageAdapter::initialize`]; every other call
/// fails until then.
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Construct and initialize in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, BarberError> {
        let storage = Self::new(config);
        storage.initialize().await?;
        Ok(storage)
    }

    /// The underlying database, once initialized.
    pub fn db(&self) -> Result<&Database, BarberError> {
        self.db.get().ok_or_else(|| BarberError::Storage {
            source: "storage not initialized, call initialize() first".into(),
        })
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn initialize(&self) -> Result<(), BarberError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| BarberError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn health_check(&self) -> Result<HealthStatus, BarberError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> { conn.execute_batch("SELECT 1;") })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn close(&self) -> Result<(), BarberError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl OfferStore for SqliteStorage {
    async fn insert_offer(&self, offer: &Offer) -> Result<(), BarberError> {
        queries::offers::insert_offer(self.db()?, offer).await
    }

    async fn get_offer(&self, offer_id: &str) -> Result<Option<Offer>, BarberError> {
        queries::offers::get_offer(self.db()?, offer_id).await
    }

    async fn list_offers(&self, shop_id: &str) -> Result<Vec<Offer>, BarberError> {
        queries::offers::list_offers(self.db()?, shop_id).await
    }

    async fn set_offer_active(&self, offer_id: &str, active: bool) -> Result<bool, BarberError> {
        queries::offers::set_offer_active(self.db()?, offer_id, active).await
    }
}

#[async_trait]
impl RedemptionStore for SqliteStorage {
    async fn insert_redemption(
        &self,
        redemption: &OfferRedemption,
    ) -> Result<InsertOutcome<OfferRedemption>, BarberError> {
        queries::redemptions::insert_redemption(self.db()?, redemption).await
    }

    async fn find_redemption(
        &self,
        offer_id: &str,
        customer_id: &str,
    ) -> Result<Option<OfferRedemption>, BarberError> {
        queries::redemptions::find_redemption(self.db()?, offer_id, customer_id).await
    }

    async fn redemptions_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<OfferRedemption>, BarberError> {
        queries::redemptions::redemptions_for_customer(self.db()?, customer_id).await
    }

    async fn count_redemptions(&self, offer_id: &str) -> Result<u64, BarberError> {
        queries::redemptions::count_redemptions(self.db()?, offer_id).await
    }
}

#[async_trait]
impl ChatStore for SqliteStorage {
    async fn upsert_chat(&self, chat: &Chat) -> Result<bool, BarberError> {
        queries::chats::upsert_chat(self.db()?, chat).await
    }

    async fn get_chat(&self, chat_id: &str) -> Result<Option<Chat>, BarberError> {
        queries::chats::get_chat(self.db()?, chat_id).await
    }

    async fn chats_for_shop(
        &self,
        shop_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Chat>, BarberError> {
        queries::chats::chats_for_shop(self.db()?, shop_id, limit).await
    }

    async fn append_message(
        &self,
        message: &Message,
        bump_unread: bool,
    ) -> Result<AppendOutcome, BarberError> {
        queries::chats::append_message(self.db()?, message, bump_unread).await
    }

    async fn reset_unread(&self, chat_id: &str) -> Result<bool, BarberError> {
        queries::chats::reset_unread(self.db()?, chat_id).await
    }

    async fn messages(
        &self,
        chat_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Message>, BarberError> {
        queries::chats::messages(self.db()?, chat_id, limit).await
    }
}

#[async_trait]
impl ShopStore for SqliteStorage {
    async fn insert_shop(&self, shop: &Shop) -> Result<bool, BarberError> {
        queries::shops::insert_shop(self.db()?, shop).await
    }

    async fn get_shop(&self, shop_id: &str) -> Result<Option<Shop>, BarberError> {
        queries::shops::get_shop(self.db()?, shop_id).await
    }

    async fn find_shop_by_code(&self, code: &str) -> Result<Option<Shop>, BarberError> {
        queries::shops::find_shop_by_code(self.db()?, code).await
    }

    async fn shop_code_exists(&self, code: &str) -> Result<bool, BarberError> {
        queries::shops::shop_code_exists(self.db()?, code).await
    }

    async fn update_shop_name(&self, shop_id: &str, name: &str) -> Result<bool, BarberError> {
        queries::shops::update_shop_name(self.db()?, shop_id, name).await
    }

    async fn update_working_hours(
        &self,
        shop_id: &str,
        hours: &WorkingHours,
    ) -> Result<bool, BarberError> {
        queries::shops::update_working_hours(self.db()?, shop_id, hours).await
    }

    async fn insert_connection(
        &self,
        connection: &CustomerShop,
    ) -> Result<InsertOutcome<CustomerShop>, BarberError> {
        queries::shops::insert_connection(self.db()?, connection).await
    }

    async fn delete_connection(&self, connection_id: &str) -> Result<bool, BarberError> {
        queries::shops::delete_connection(self.db()?, connection_id).await
    }

    async fn connections_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<CustomerShop>, BarberError> {
        queries::shops::connections_for_customer(self.db()?, customer_id).await
    }

    async fn shop_customers(&self, shop_id: &str) -> Result<Vec<ShopCustomer>, BarberError> {
        queries::shops::shop_customers(self.db()?, shop_id).await
    }

    async fn count_connections(&self, shop_id: &str) -> Result<u64, BarberError> {
        queries::shops::count_connections(self.db()?, shop_id).await
    }
}

#[async_trait]
impl PriceStore for SqliteStorage {
    async fn insert_price(&self, item: &PriceItem) -> Result<(), BarberError> {
        queries::prices::insert_price(self.db()?, item).await
    }

    async fn prices_for_shop(&self, shop_id: &str) -> Result<Vec<PriceItem>, BarberError> {
        queries::prices::prices_for_shop(self.db()?, shop_id).await
    }

    async fn delete_price(&self, shop_id: &str, price_id: &str) -> Result<bool, BarberError> {
        queries::prices::delete_price(self.db()?, shop_id, price_id).await
    }
}

#[async_trait]
impl AccountStore for SqliteStorage {
    async fn insert_account(&self, account: &Account) -> Result<bool, BarberError> {
        queries::accounts::insert_account(self.db()?, account).await
    }

    async fn account_by_email(&self, email: &str) -> Result<Option<Account>, BarberError> {
        queries::accounts::account_by_email(self.db()?, email).await
    }

    async fn profile(&self, user_id: &str) -> Result<Option<UserProfile>, BarberError> {
        queries::accounts::profile(self.db()?, user_id).await
    }

    async fn mark_email_verified(&self, user_id: &str, token: &str) -> Result<bool, BarberError> {
        queries::accounts::mark_email_verified(self.db()?, user_id, token).await
    }

    async fn insert_session(&self, session: &SessionRecord) -> Result<(), BarberError> {
        queries::accounts::insert_session(self.db()?, session).await
    }

    async fn session_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<SessionRecord>, BarberError> {
        queries::accounts::session_by_token_hash(self.db()?, token_hash).await
    }

    async fn delete_session(&self, token_hash: &str) -> Result<bool, BarberError> {
        queries::accounts::delete_session(self.db()?, token_hash).await
    }

    async fn delete_account(&self, user_id: &str) -> Result<bool, BarberError> {
        queries::accounts::delete_account(self.db()?, user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn initialize_creates_database_file() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(storage.name(), "sqlite");
        storage.initialize().await.unwrap();
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn initialize_twice_fails() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("twice.db");
        let storage = SqliteStorage::open(make_config(db_path.to_str().unwrap()))
            .await
            .unwrap();
        assert!(storage.initialize().await.is_err());
    }

    #[tokio::test]
    async fn calls_before_initialize_fail() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lazy.db");
        let storage = SqliteStorage::new(make_config(db_path.to_str().unwrap()));

        assert!(storage.health_check().await.is_err());
        assert!(storage.get_offer("o1").await.is_err());
    }

    #[tokio::test]
    async fn health_check_and_close() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let storage = SqliteStorage::open(make_config(db_path.to_str().unwrap()))
            .await
            .unwrap();

        assert_eq!(storage.health_check().await.unwrap(), HealthStatus::Healthy);
        storage.close().await.unwrap();
    }
}
