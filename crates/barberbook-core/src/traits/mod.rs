// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence seams for the BarberBook services.
//!
//! Every trait uses `#[async_trait]` so services can hold `Arc<dyn ...>`
//! handles and tests can substitute wrappers around a real backend.

pub mod accounts;
pub mod chat;
pub mod offers;
pub mod shops;
pub mod storage;

pub use accounts::AccountStore;
pub use chat::ChatStore;
pub use offers::{OfferStore, RedemptionStore};
pub use shops::{PriceStore, ShopStore};
pub use storage::StorageAdapter;
