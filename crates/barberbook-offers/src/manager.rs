// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Owner-facing offer lifecycle and the customer redemption flow.
//!
//! Every storage call is wrapped in the retry helper. Writes are idempotent
//! (ids are chosen before the first attempt), so a retried write that had in
//! fact committed is harmless.

use std::collections::HashSet;
use std::sync::Arc;

use barberbook_core::traits::{OfferStore, RedemptionStore};
use barberbook_core::{
    BarberError, Clock, DomainEvent, EventBus, InsertOutcome, Offer, OfferRedemption,
    Subscription, within_window,
};
use barberbook_resilience::{RetryPolicy, with_retry};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::{debug, info};
use uuid::Uuid;

use crate::code::{generate_offer_code, render_qr_data_uri};
use crate::validation::redemption_error;

const DEFAULT_QR_DIMENSION: u32 = 400;

/// Owner input for a new offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOffer {
    pub title: String,
    pub description: String,
    pub discount: u8,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Owner dashboard tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OfferFilter {
    #[default]
    All,
    /// Switched on and inside the window right now.
    Active,
    /// Everything else.
    Inactive,
}

impl OfferFilter {
    pub fn matches(self, offer: &Offer, now: DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            Self::Active => offer.is_live_at(now),
            Self::Inactive => !offer.is_live_at(now),
        }
    }
}

/// Per-tab counts for a shop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferCounts {
    pub active: usize,
    pub inactive: usize,
    pub total: usize,
}

pub struct OfferManager {
    offers: Arc<dyn OfferStore>,
    redemptions: Arc<dyn RedemptionStore>,
    clock: Arc<dyn Clock>,
    events: EventBus,
    retry: RetryPolicy,
    qr_min_dimension: u32,
}

impl OfferManager {
    pub fn new(
        offers: Arc<dyn OfferStore>,
        redemptions: Arc<dyn RedemptionStore>,
        clock: Arc<dyn Clock>,
        events: EventBus,
    ) -> Self {
        Self {
            offers,
            redemptions,
            clock,
            events,
            retry: RetryPolicy::default(),
            qr_min_dimension: DEFAULT_QR_DIMENSION,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_qr_min_dimension(mut self, dimension: u32) -> Self {
        self.qr_min_dimension = dimension;
        self
    }

    /// Create and persist an offer for `shop_id`.
    ///
    /// `active` starts as whether the window contains the current time; it is
    /// not re-evaluated later.
    pub async fn create(&self, shop_id: &str, input: NewOffer) -> Result<Offer, BarberError> {
        let title = input.title.trim();
        if title.is_empty() {
            return Err(BarberError::Validation("Title is required".into()));
        }
        if input.discount > 100 {
            return Err(BarberError::Validation(
                "Discount must be between 0 and 100".into(),
            ));
        }
        if input.start_date >= input.end_date {
            return Err(BarberError::Validation(
                "End date must be after start date".into(),
            ));
        }

        let now = self.clock.now();
        let code = generate_offer_code();
        let offer = Offer {
            id: Uuid::new_v4().to_string(),
            shop_id: shop_id.to_string(),
            title: title.to_string(),
            description: input.description.trim().to_string(),
            discount: input.discount,
            start_date: input.start_date,
            end_date: input.end_date,
            qr_code: render_qr_data_uri(&code, self.qr_min_dimension)?,
            code,
            active: within_window(input.start_date, input.end_date, now),
            created_at: now,
        };

        with_retry(&self.retry, || self.offers.insert_offer(&offer)).await?;

        info!(offer_id = %offer.id, shop_id, active = offer.active, "offer created");
        self.events.publish(DomainEvent::OfferCreated {
            shop_id: offer.shop_id.clone(),
            offer_id: offer.id.clone(),
        });
        Ok(offer)
    }

    /// Set the owner kill switch. Existing redemptions are unaffected.
    pub async fn toggle_status(&self, offer_id: &str, active: bool) -> Result<Offer, BarberError> {
        let mut offer = self.load(offer_id).await?;
        let updated =
            with_retry(&self.retry, || self.offers.set_offer_active(offer_id, active)).await?;
        if !updated {
            return Err(not_found(offer_id));
        }
        offer.active = active;

        info!(offer_id, active, "offer status changed");
        self.events.publish(DomainEvent::OfferStatusChanged {
            shop_id: offer.shop_id.clone(),
            offer_id: offer.id.clone(),
            active,
        });
        Ok(offer)
    }

    /// Record a redemption. The caller must already have validated the code.
    ///
    /// At most one redemption per offer and customer is ever stored; any later
    /// or concurrent attempt fails with [`BarberError::AlreadyRedeemed`].
    pub async fn redeem(
        &self,
        offer_id: &str,
        customer_id: &str,
        shop_id: &str,
    ) -> Result<OfferRedemption, BarberError> {
        let redemption = OfferRedemption {
            id: Uuid::new_v4().to_string(),
            offer_id: offer_id.to_string(),
            customer_id: customer_id.to_string(),
            shop_id: shop_id.to_string(),
            redeemed_at: self.clock.now(),
        };

        let outcome = with_retry(&self.retry, || {
            self.redemptions.insert_redemption(&redemption)
        })
        .await?;

        match outcome {
            InsertOutcome::Inserted => {}
            // Our own write, committed by an attempt that then reported failure.
            InsertOutcome::Existing(existing) if existing.id == redemption.id => {}
            InsertOutcome::Existing(_) => {
                debug!(offer_id, customer_id, "duplicate redemption refused");
                return Err(BarberError::AlreadyRedeemed {
                    offer_id: offer_id.to_string(),
                    customer_id: customer_id.to_string(),
                });
            }
        }

        info!(offer_id, customer_id, shop_id, "offer redeemed");
        self.events.publish(DomainEvent::OfferRedeemed {
            shop_id: shop_id.to_string(),
            offer_id: offer_id.to_string(),
            customer_id: customer_id.to_string(),
        });
        Ok(redemption)
    }

    /// Full customer flow: code, availability and window checks, then redeem.
    pub async fn redeem_with_code(
        &self,
        offer_id: &str,
        customer_id: &str,
        scanned_code: &str,
    ) -> Result<OfferRedemption, BarberError> {
        let offer = self.load(offer_id).await?;
        if let Some(rejection) = redemption_error(scanned_code, &offer, self.clock.now()) {
            debug!(offer_id, %rejection, "offer code rejected");
            return Err(rejection.into());
        }
        self.redeem(&offer.id, customer_id, &offer.shop_id).await
    }

    pub async fn get(&self, offer_id: &str) -> Result<Offer, BarberError> {
        self.load(offer_id).await
    }

    /// Offers of a shop matching `filter` at the current time, newest first.
    pub async fn list(&self, shop_id: &str, filter: OfferFilter) -> Result<Vec<Offer>, BarberError> {
        let now = self.clock.now();
        let offers = with_retry(&self.retry, || self.offers.list_offers(shop_id)).await?;
        Ok(offers
            .into_iter()
            .filter(|offer| filter.matches(offer, now))
            .collect())
    }

    pub async fn counts(&self, shop_id: &str) -> Result<OfferCounts, BarberError> {
        let now = self.clock.now();
        let offers = with_retry(&self.retry, || self.offers.list_offers(shop_id)).await?;
        let active = offers.iter().filter(|o| o.is_live_at(now)).count();
        Ok(OfferCounts {
            active,
            inactive: offers.len() - active,
            total: offers.len(),
        })
    }

    /// Live offers of a shop the customer has not redeemed yet.
    pub async fn offers_for_customer(
        &self,
        shop_id: &str,
        customer_id: &str,
    ) -> Result<Vec<Offer>, BarberError> {
        let redeemed = self.redeemed_offer_ids(customer_id).await?;
        let live = self.list(shop_id, OfferFilter::Active).await?;
        Ok(live
            .into_iter()
            .filter(|offer| !redeemed.contains(&offer.id))
            .collect())
    }

    pub async fn redeemed_offer_ids(&self, customer_id: &str) -> Result<HashSet<String>, BarberError> {
        let redemptions = with_retry(&self.retry, || {
            self.redemptions.redemptions_for_customer(customer_id)
        })
        .await?;
        Ok(redemptions.into_iter().map(|r| r.offer_id).collect())
    }

    pub async fn redemption_count(&self, offer_id: &str) -> Result<u64, BarberError> {
        with_retry(&self.retry, || self.redemptions.count_redemptions(offer_id)).await
    }

    /// All offers of a shop, re-delivered after every offer change in that shop.
    pub fn subscribe_shop_offers(&self, shop_id: &str) -> Subscription<Offer> {
        let store = self.offers.clone();
        let retry = self.retry;
        let watched = shop_id.to_string();
        let shop_id = shop_id.to_string();
        Subscription::new(
            self.events.subscribe(),
            move |event: &DomainEvent| event.is_offer_event() && event.shop_id() == watched,
            move || {
                let store = store.clone();
                let shop_id = shop_id.clone();
                async move { with_retry(&retry, || store.list_offers(&shop_id)).await }
            },
        )
    }

    async fn load(&self, offer_id: &str) -> Result<Offer, BarberError> {
        with_retry(&self.retry, || self.offers.get_offer(offer_id))
            .await?
            .ok_or_else(|| not_found(offer_id))
    }
}

fn not_found(offer_id: &str) -> BarberError {
    BarberError::NotFound {
        entity: "offer",
        id: offer_id.to_string(),
    }
}
