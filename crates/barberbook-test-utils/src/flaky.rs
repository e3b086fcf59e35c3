// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offer store wrapper that injects transient storage failures.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use barberbook_core::traits::OfferStore;
use barberbook_core::{BarberError, Offer};

/// Fails the first `failures` calls (any method) with a storage error, then
/// delegates to the wrapped store. Writes that fail never reach the store.
pub struct FlakyOfferStore {
    inner: Arc<dyn OfferStore>,
    remaining_failures: AtomicU32,
    calls: AtomicU32,
}

impl FlakyOfferStore {
    pub fn new(inner: Arc<dyn OfferStore>, failures: u32) -> Self {
        Self {
            inner,
            remaining_failures: AtomicU32::new(failures),
            calls: AtomicU32::new(0),
        }
    }

    /// Total calls seen, failed ones included.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn gate(&self) -> Result<(), BarberError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failed = self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failed {
            Err(BarberError::storage("injected transient failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl OfferStore for FlakyOfferStore {
    async fn insert_offer(&self, offer: &Offer) -> Result<(), BarberError> {
        self.gate()?;
        self.inner.insert_offer(offer).await
    }

    async fn get_offer(&self, offer_id: &str) -> Result<Option<Offer>, BarberError> {
        self.gate()?;
        self.inner.get_offer(offer_id).await
    }

    async fn list_offers(&self, shop_id: &str) -> Result<Vec<Offer>, BarberError> {
        self.gate()?;
        self.inner.list_offers(shop_id).await
    }

    async fn set_offer_active(&self, offer_id: &str, active: bool) -> Result<bool, BarberError> {
        self.gate()?;
        self.inner.set_offer_active(offer_id, active).await
    }
}
