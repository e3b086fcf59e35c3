// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fully wired service stack over a throwaway database.

use std::sync::Arc;

use barberbook_auth::{AuthService, ShopDetails, SignUp};
use barberbook_chat::ChatService;
use barberbook_config::model::{AuthConfig, BarberBookConfig, StorageConfig};
use barberbook_core::traits::{OfferStore, StorageAdapter};
use barberbook_core::{BarberError, EventBus, FixedClock, Role, Shop, UserProfile};
use barberbook_offers::OfferManager;
use barberbook_resilience::RetryPolicy;
use barberbook_shops::ShopService;
use barberbook_storage::SqliteStorage;
use chrono::{DateTime, TimeZone, Utc};
use secrecy::SecretString;

/// Password given to every account created through the harness.
pub const TEST_PASSWORD: &str = "password123";

pub struct TestHarnessBuilder {
    now: DateTime<Utc>,
    retry: RetryPolicy,
    snapshot_limit: u32,
    offer_store: Option<Box<dyn FnOnce(Arc<dyn OfferStore>) -> Arc<dyn OfferStore> + Send>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            now: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).single().unwrap_or_default(),
            retry: RetryPolicy::immediate(3),
            snapshot_limit: 500,
            offer_store: None,
        }
    }

    /// Start the clock at `now` instead of 2024-06-01 12:00 UTC.
    pub fn starting_at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_snapshot_limit(mut self, limit: u32) -> Self {
        self.snapshot_limit = limit;
        self
    }

    /// Route the offer manager's offer calls through a wrapper.
    pub fn wrap_offer_store<F>(mut self, wrap: F) -> Self
    where
        F: FnOnce(Arc<dyn OfferStore>) -> Arc<dyn OfferStore> + Send + 'static,
    {
        self.offer_store = Some(Box::new(wrap));
        self
    }

    pub async fn build(self) -> Result<TestHarness, BarberError> {
        let temp_dir = tempfile::TempDir::new().map_err(BarberError::storage)?;
        let mut config = BarberBookConfig::default();
        config.storage = StorageConfig {
            database_path: temp_dir.path().join("test.db").to_string_lossy().into_owned(),
            wal_mode: true,
        };
        config.chat.snapshot_limit = self.snapshot_limit;
        config.auth = AuthConfig {
            session_ttl_hours: 24,
            require_verified_email: true,
        };

        let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
        storage.initialize().await?;
        let clock = Arc::new(FixedClock::new(self.now));
        let events = EventBus::new(config.chat.event_capacity);

        let offer_store: Arc<dyn OfferStore> = match self.offer_store {
            Some(wrap) => wrap(storage.clone()),
            None => storage.clone(),
        };
        let offers = Arc::new(
            OfferManager::new(offer_store, storage.clone(), clock.clone(), events.clone())
                .with_retry_policy(self.retry)
                .with_qr_min_dimension(config.offers.qr_min_dimension),
        );
        let chat = Arc::new(
            ChatService::new(storage.clone(), storage.clone(), clock.clone(), events.clone())
                .with_retry_policy(self.retry)
                .with_snapshot_limit(self.snapshot_limit),
        );
        let shops = Arc::new(
            ShopService::new(
                storage.clone(),
                storage.clone(),
                storage.clone(),
                clock.clone(),
            )
            .with_retry_policy(self.retry),
        );
        let auth = Arc::new(
            AuthService::new(storage.clone(), shops.clone(), clock.clone(), &config.auth)
                .with_retry_policy(self.retry),
        );

        Ok(TestHarness {
            storage,
            clock,
            events,
            offers,
            chat,
            shops,
            auth,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// Every service over one temporary SQLite database.
pub struct TestHarness {
    pub storage: Arc<SqliteStorage>,
    pub clock: Arc<FixedClock>,
    pub events: EventBus,
    pub offers: Arc<OfferManager>,
    pub chat: Arc<ChatService>,
    pub shops: Arc<ShopService>,
    pub auth: Arc<AuthService>,
    pub config: BarberBookConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    pub async fn new() -> Result<Self, BarberError> {
        Self::builder().build().await
    }

    /// Sign up and verify a barber with a shop.
    pub async fn barber(
        &self,
        email: &str,
        shop_name: &str,
        phone: &str,
    ) -> Result<(UserProfile, Shop), BarberError> {
        let outcome = self
            .auth
            .sign_up(SignUp {
                email: email.to_string(),
                password: SecretString::from(TEST_PASSWORD.to_string()),
                name: format!("{shop_name} Owner"),
                phone: phone.to_string(),
                role: Role::Barber,
                shop: Some(ShopDetails {
                    name: shop_name.to_string(),
                    location: None,
                }),
            })
            .await?;
        self.auth
            .verify_email(&outcome.profile.id, &outcome.verification_token)
            .await?;
        let shop = outcome
            .shop
            .ok_or_else(|| BarberError::Internal("barber sign-up created no shop".into()))?;
        Ok((outcome.profile, shop))
    }

    /// Sign up and verify a customer.
    pub async fn customer(&self, email: &str, name: &str) -> Result<UserProfile, BarberError> {
        let outcome = self
            .auth
            .sign_up(SignUp {
                email: email.to_string(),
                password: SecretString::from(TEST_PASSWORD.to_string()),
                name: name.to_string(),
                phone: "5550000".to_string(),
                role: Role::Customer,
                shop: None,
            })
            .await?;
        self.auth
            .verify_email(&outcome.profile.id, &outcome.verification_token)
            .await?;
        Ok(outcome.profile)
    }
}
