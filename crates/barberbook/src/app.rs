// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service wiring for one CLI invocation.

use std::sync::Arc;

use barberbook_auth::AuthService;
use barberbook_chat::ChatService;
use barberbook_config::BarberBookConfig;
use barberbook_core::traits::StorageAdapter;
use barberbook_core::{BarberError, Clock, EventBus, SystemClock};
use barberbook_offers::OfferManager;
use barberbook_shops::ShopService;
use barberbook_storage::SqliteStorage;
use tracing::debug;

pub struct App {
    pub config: BarberBookConfig,
    pub storage: Arc<SqliteStorage>,
    pub offers: OfferManager,
    pub chat: ChatService,
    pub shops: Arc<ShopService>,
    pub auth: AuthService,
}

impl App {
    /// Open (and migrate) the configured database and build every service.
    pub async fn open(config: BarberBookConfig) -> Result<Self, BarberError> {
        let storage = Arc::new(SqliteStorage::open(config.storage.clone()).await?);
        debug!(path = %config.storage.database_path, "database ready");

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let events = EventBus::new(config.chat.event_capacity);
        let retry = config.retry.policy();

        let offers = OfferManager::new(storage.clone(), storage.clone(), clock.clone(), events.clone())
            .with_retry_policy(retry)
            .with_qr_min_dimension(config.offers.qr_min_dimension);
        let chat = ChatService::new(storage.clone(), storage.clone(), clock.clone(), events)
            .with_retry_policy(retry)
            .with_snapshot_limit(config.chat.snapshot_limit);
        let shops = Arc::new(
            ShopService::new(storage.clone(), storage.clone(), storage.clone(), clock.clone())
                .with_retry_policy(retry),
        );
        let auth = AuthService::new(storage.clone(), shops.clone(), clock, &config.auth)
            .with_retry_policy(retry);

        Ok(Self {
            config,
            storage,
            offers,
            chat,
            shops,
            auth,
        })
    }

    /// Flush the WAL before exit.
    pub async fn close(self) -> Result<(), BarberError> {
        self.storage.close().await
    }
}
