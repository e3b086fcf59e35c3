// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Promotional offers: code and QR generation, redemption-time validation,
//! and the owner-facing lifecycle (create, toggle, list, redeem).

pub mod code;
pub mod manager;
pub mod validation;

pub use code::{generate_offer_code, render_qr_data_uri};
pub use manager::{NewOffer, OfferCounts, OfferFilter, OfferManager};
pub use validation::{code_matches, redemption_error, validation_error};
