// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shop service over the shop, price and offer stores.

use std::sync::Arc;

use barberbook_core::traits::{OfferStore, PriceStore, ShopStore};
use barberbook_core::{
    BarberError, Clock, CustomerShop, InsertOutcome, PriceItem, Shop, ShopCustomer, ShopStats,
    WorkingHours,
};
use barberbook_resilience::{RetryPolicy, with_retry};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::code::{all_suffix_codes, code_candidates, normalize_shop_code, random_code};
use crate::hours::validate_working_hours;

const RANDOM_CODE_ATTEMPTS: usize = 20;
const CREATE_ATTEMPTS: usize = 3;

/// Owner input for a price list entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPrice {
    pub name: String,
    pub price_cents: i64,
    pub duration_minutes: Option<u32>,
}

impl NewPrice {
    fn validate(&self) -> Result<(), BarberError> {
        if self.name.trim().is_empty() {
            return Err(BarberError::Validation("Service name is required".into()));
        }
        if self.price_cents < 0 {
            return Err(BarberError::Validation("Price cannot be negative".into()));
        }
        if self.duration_minutes == Some(0) {
            return Err(BarberError::Validation("Duration must be positive".into()));
        }
        Ok(())
    }
}

pub struct ShopService {
    shops: Arc<dyn ShopStore>,
    prices: Arc<dyn PriceStore>,
    offers: Arc<dyn OfferStore>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
}

impl ShopService {
    pub fn new(
        shops: Arc<dyn ShopStore>,
        prices: Arc<dyn PriceStore>,
        offers: Arc<dyn OfferStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            shops,
            prices,
            offers,
            clock,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// First unused code derived from the name and phone, else an unused
    /// random one. Fails with `Conflict` once every suffix for the name
    /// prefix is taken.
    pub async fn generate_unique_shop_code(
        &self,
        name: &str,
        phone: &str,
    ) -> Result<String, BarberError> {
        for candidate in code_candidates(name, phone) {
            if !self.code_taken(&candidate).await? {
                return Ok(candidate);
            }
            debug!(code = %candidate, "shop code taken");
        }

        for _ in 0..RANDOM_CODE_ATTEMPTS {
            let candidate = random_code(name, &mut rand::thread_rng());
            if !self.code_taken(&candidate).await? {
                return Ok(candidate);
            }
        }

        // Random draws keep missing: the prefix is nearly full, so walk it.
        for candidate in all_suffix_codes(name) {
            if !self.code_taken(&candidate).await? {
                return Ok(candidate);
            }
        }
        warn!(name, "no shop code left for this name prefix");
        Err(BarberError::Conflict(
            "No shop code is available for this shop name".into(),
        ))
    }

    async fn code_taken(&self, code: &str) -> Result<bool, BarberError> {
        with_retry(&self.retry, || self.shops.shop_code_exists(code)).await
    }

    /// Create the shop owned by `owner_id`. The shop id is the owner id.
    pub async fn create_shop(
        &self,
        owner_id: &str,
        name: &str,
        phone: &str,
        location: Option<&str>,
    ) -> Result<Shop, BarberError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BarberError::Validation("Shop name is required".into()));
        }
        if self.shop(owner_id).await?.is_some() {
            return Err(BarberError::Conflict("Shop already exists".into()));
        }

        for _ in 0..CREATE_ATTEMPTS {
            let shop = Shop {
                id: owner_id.to_string(),
                name: name.to_string(),
                code: self.generate_unique_shop_code(name, phone).await?,
                owner_id: owner_id.to_string(),
                location: location.map(str::trim).filter(|l| !l.is_empty()).map(String::from),
                image_url: None,
                working_hours: WorkingHours::new(),
                created_at: self.clock.now(),
            };

            let inserted = with_retry(&self.retry, || self.shops.insert_shop(&shop)).await?;
            if !inserted {
                // Either a retried attempt already committed this row or the
                // code was claimed in between.
                match self.shop(owner_id).await? {
                    Some(stored) if stored.code == shop.code => {}
                    Some(_) => return Err(BarberError::Conflict("Shop already exists".into())),
                    None => {
                        debug!(code = %shop.code, "shop code claimed concurrently, regenerating");
                        continue;
                    }
                }
            }

            info!(shop_id = %shop.id, code = %shop.code, "shop created");
            return Ok(shop);
        }

        Err(BarberError::Conflict(
            "Shop code was just taken, please try again".into(),
        ))
    }

    pub async fn shop(&self, shop_id: &str) -> Result<Option<Shop>, BarberError> {
        with_retry(&self.retry, || self.shops.get_shop(shop_id)).await
    }

    pub async fn update_name(&self, shop_id: &str, name: &str) -> Result<(), BarberError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BarberError::Validation("Shop name is required".into()));
        }
        let updated =
            with_retry(&self.retry, || self.shops.update_shop_name(shop_id, name)).await?;
        if !updated {
            return Err(shop_not_found(shop_id));
        }
        Ok(())
    }

    pub async fn update_working_hours(
        &self,
        shop_id: &str,
        hours: &WorkingHours,
    ) -> Result<(), BarberError> {
        validate_working_hours(hours)?;
        let updated =
            with_retry(&self.retry, || self.shops.update_working_hours(shop_id, hours)).await?;
        if !updated {
            return Err(shop_not_found(shop_id));
        }
        Ok(())
    }

    /// Connect a customer to the shop owning `shop_code`.
    pub async fn connect_to_shop(
        &self,
        customer_id: &str,
        shop_code: &str,
    ) -> Result<CustomerShop, BarberError> {
        let code = normalize_shop_code(shop_code);
        let shop = with_retry(&self.retry, || self.shops.find_shop_by_code(&code))
            .await?
            .ok_or_else(|| BarberError::NotFound {
                entity: "shop code",
                id: code.clone(),
            })?;

        let connection = CustomerShop {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            shop_id: shop.id.clone(),
            shop_code: shop.code.clone(),
            created_at: self.clock.now(),
        };
        match with_retry(&self.retry, || self.shops.insert_connection(&connection)).await? {
            InsertOutcome::Inserted => {}
            InsertOutcome::Existing(existing) if existing.id == connection.id => {}
            InsertOutcome::Existing(_) => {
                return Err(BarberError::Conflict(
                    "Already connected to this shop".into(),
                ));
            }
        }

        info!(customer_id, shop_id = %shop.id, "customer connected to shop");
        Ok(connection)
    }

    pub async fn disconnect(&self, connection_id: &str) -> Result<(), BarberError> {
        let deleted =
            with_retry(&self.retry, || self.shops.delete_connection(connection_id)).await?;
        if !deleted {
            return Err(BarberError::NotFound {
                entity: "connection",
                id: connection_id.to_string(),
            });
        }
        Ok(())
    }

    pub async fn customer_shops(&self, customer_id: &str) -> Result<Vec<CustomerShop>, BarberError> {
        with_retry(&self.retry, || self.shops.connections_for_customer(customer_id)).await
    }

    pub async fn shop_customers(&self, shop_id: &str) -> Result<Vec<ShopCustomer>, BarberError> {
        with_retry(&self.retry, || self.shops.shop_customers(shop_id)).await
    }

    /// Dashboard counters. An offer counts while switched on and not yet ended.
    pub async fn shop_stats(&self, shop_id: &str) -> Result<ShopStats, BarberError> {
        let now = self.clock.now();
        let customer_count =
            with_retry(&self.retry, || self.shops.count_connections(shop_id)).await?;
        let offers = with_retry(&self.retry, || self.offers.list_offers(shop_id)).await?;
        let active_offers_count = offers
            .iter()
            .filter(|offer| offer.active && offer.end_date > now)
            .count() as u64;
        Ok(ShopStats {
            customer_count,
            active_offers_count,
        })
    }

    pub async fn create_price(&self, shop_id: &str, input: NewPrice) -> Result<PriceItem, BarberError> {
        input.validate()?;
        let item = PriceItem {
            id: Uuid::new_v4().to_string(),
            shop_id: shop_id.to_string(),
            name: input.name.trim().to_string(),
            price_cents: input.price_cents,
            duration_minutes: input.duration_minutes,
            created_at: self.clock.now(),
        };
        with_retry(&self.retry, || self.prices.insert_price(&item)).await?;
        Ok(item)
    }

    pub async fn prices(&self, shop_id: &str) -> Result<Vec<PriceItem>, BarberError> {
        with_retry(&self.retry, || self.prices.prices_for_shop(shop_id)).await
    }

    pub async fn delete_price(&self, shop_id: &str, price_id: &str) -> Result<(), BarberError> {
        let deleted =
            with_retry(&self.retry, || self.prices.delete_price(shop_id, price_id)).await?;
        if !deleted {
            return Err(BarberError::NotFound {
                entity: "price",
                id: price_id.to_string(),
            });
        }
        Ok(())
    }
}

fn shop_not_found(shop_id: &str) -> BarberError {
    BarberError::NotFound {
        entity: "shop",
        id: shop_id.to_string(),
    }
}
