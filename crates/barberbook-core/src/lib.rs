// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for BarberBook.
//!
//! Shared error type, domain types, storage traits, the clock abstraction and
//! the in-process event bus with its snapshot subscriptions.

pub mod clock;
pub mod error;
pub mod events;
pub mod subscription;
pub mod traits;
pub mod types;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{BarberError, OfferRejection};
pub use events::{DomainEvent, EventBus};
pub use subscription::Subscription;
pub use traits::{
    AccountStore, ChatStore, OfferStore, PriceStore, RedemptionStore, ShopStore, StorageAdapter,
};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use std::str::FromStr;

    fn offer(start: chrono::DateTime<Utc>, end: chrono::DateTime<Utc>, active: bool) -> Offer {
        Offer {
            id: "O1".into(),
            shop_id: "S1".into(),
            title: "Fade Friday".into(),
            description: String::new(),
            discount: 20,
            start_date: start,
            end_date: end,
            code: "ABCD1234".into(),
            qr_code: String::new(),
            active,
            created_at: start,
        }
    }

    #[test]
    fn window_is_inclusive_at_both_ends() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
        assert!(within_window(start, end, start));
        assert!(within_window(start, end, end));
        assert!(!within_window(start, end, start - chrono::Duration::seconds(1)));
        assert!(!within_window(start, end, end + chrono::Duration::seconds(1)));
    }

    #[test]
    fn live_requires_flag_and_window() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
        let mid = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

        assert!(offer(start, end, true).is_live_at(mid));
        assert!(!offer(start, end, false).is_live_at(mid));
        assert_eq!(offer(start, end, false).window_status(mid), WindowStatus::Running);
        assert_eq!(
            offer(mid, end, true).window_status(start),
            WindowStatus::Scheduled
        );
        assert_eq!(
            offer(start, mid, true).window_status(end),
            WindowStatus::Expired
        );
    }

    #[test]
    fn user_messages_hide_internal_detail() {
        let storage = BarberError::storage(std::io::Error::other("disk full"));
        assert_eq!(storage.user_message(), "Something went wrong. Please try again.");

        let missing = BarberError::NotFound {
            entity: "offer",
            id: "O1".into(),
        };
        assert_eq!(missing.user_message(), "Offer not found");

        let rejected: BarberError = OfferRejection::Expired.into();
        assert_eq!(rejected.user_message(), "This offer has expired");

        let dup = BarberError::AlreadyRedeemed {
            offer_id: "O1".into(),
            customer_id: "C1".into(),
        };
        assert_eq!(dup.user_message(), "You have already redeemed this offer");
    }

    #[test]
    fn role_and_weekday_parse_lowercase() {
        assert_eq!(Role::from_str("barber").unwrap(), Role::Barber);
        assert_eq!(Role::Customer.to_string(), "customer");
        assert_eq!(Weekday::from_str("sunday").unwrap(), Weekday::Sunday);
        assert!(Weekday::Monday < Weekday::Sunday);
    }

    #[test]
    fn working_hours_serialize_as_day_map() {
        let mut hours = WorkingHours::new();
        hours.insert(
            Weekday::Monday,
            DayHours {
                open: "09:00".into(),
                close: "17:00".into(),
                closed: false,
            },
        );
        let json = serde_json::to_value(&hours).unwrap();
        assert_eq!(json["monday"]["open"], "09:00");
    }

    #[test]
    fn account_debug_redacts_secrets() {
        let account = Account {
            profile: UserProfile {
                id: "U1".into(),
                email: "a@b.co".into(),
                name: "Ana".into(),
                phone: "555".into(),
                role: Role::Customer,
                email_verified: false,
                created_at: Utc::now(),
            },
            password_hash: "$argon2id$secret".into(),
            verification_token: Some("tok".into()),
        };
        let debug = format!("{account:?}");
        assert!(!debug.contains("secret"));
        assert!(!debug.contains("\"tok\""));
    }

    proptest! {
        #[test]
        fn live_implies_running(offset_secs in -1_000_000i64..1_000_000, active: bool) {
            let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            let end = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
            let now = start + chrono::Duration::seconds(offset_secs);
            let o = offer(start, end, active);
            if o.is_live_at(now) {
                prop_assert_eq!(o.window_status(now), WindowStatus::Running);
            }
            prop_assert_eq!(o.is_within_window(now), o.window_status(now) == WindowStatus::Running);
        }
    }
}
