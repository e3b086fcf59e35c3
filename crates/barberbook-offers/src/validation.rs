// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Checks applied when a customer scans or types an offer code.
//!
//! Code correctness is decided before timing, so a wrong code on an expired
//! offer reports the wrong code.

use barberbook_core::{Offer, OfferRejection, within_window};
use chrono::{DateTime, Utc};

/// Trimmed, case-insensitive comparison.
pub fn code_matches(scanned: &str, expected: &str) -> bool {
    scanned.trim().eq_ignore_ascii_case(expected.trim())
}

fn code_error(scanned: &str, offer: &Offer) -> Option<OfferRejection> {
    if scanned.trim().is_empty() {
        return Some(OfferRejection::EmptyCode);
    }
    if !code_matches(scanned, &offer.code) {
        return Some(OfferRejection::InvalidCode);
    }
    None
}

fn window_error(offer: &Offer, now: DateTime<Utc>) -> Option<OfferRejection> {
    if within_window(offer.start_date, offer.end_date, now) {
        None
    } else if now < offer.start_date {
        Some(OfferRejection::NotActiveYet)
    } else {
        Some(OfferRejection::Expired)
    }
}

/// First failing check for `scanned` against `offer` at `now`, if any.
///
/// The `active` flag is not consulted here.
pub fn validation_error(scanned: &str, offer: &Offer, now: DateTime<Utc>) -> Option<OfferRejection> {
    code_error(scanned, offer).or_else(|| window_error(offer, now))
}

/// Like [`validation_error`], with the owner's switch checked between the
/// code and the window. A wrong code never reveals that an offer is off.
pub fn redemption_error(scanned: &str, offer: &Offer, now: DateTime<Utc>) -> Option<OfferRejection> {
    code_error(scanned, offer)
        .or_else(|| (!offer.active).then_some(OfferRejection::Unavailable))
        .or_else(|| window_error(offer, now))
}
