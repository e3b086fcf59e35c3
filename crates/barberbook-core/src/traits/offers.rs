// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;

use crate::error::BarberError;
use crate::types::{InsertOutcome, Offer, OfferRedemption};

/// Offer persistence.
#[async_trait]
pub trait OfferStore: Send + Sync + 'static {
    /// Insert an offer. Re-inserting an existing id is a no-op, so callers
    /// can safely retry with the same pre-generated id.
    async fn insert_offer(&self, offer: &Offer) -> Result<(), BarberError>;

    async fn get_offer(&self, offer_id: &str) -> Result<Option<Offer>, BarberError>;

    /// All offers of a shop, newest first.
    async fn list_offers(&self, shop_id: &str) -> Result<Vec<Offer>, BarberError>;

    /// Set the `active` flag. Returns `false` when no such offer exists.
    async fn set_offer_active(&self, offer_id: &str, active: bool) -> Result<bool, BarberError>;
}

/// Redemption persistence keyed by `(offer_id, customer_id)`.
#[async_trait]
pub trait RedemptionStore: Send + Sync + 'static {
    /// Conditionally insert a redemption.
    ///
    /// When a redemption for the same offer and customer already exists the
    /// stored row is returned as [`InsertOutcome::Existing`] and nothing is
    /// written.
    async fn insert_redemption(
        &self,
        redemption: &OfferRedemption,
    ) -> Result<InsertOutcome<OfferRedemption>, BarberError>;

    async fn find_redemption(
        &self,
        offer_id: &str,
        customer_id: &str,
    ) -> Result<Option<OfferRedemption>, BarberError>;

    async fn redemptions_for_customer(
        &self,
        customer_id: &str,
    ) -> Result<Vec<OfferRedemption>, BarberError>;

    async fn count_redemptions(&self, offer_id: &str) -> Result<u64, BarberError>;
}
