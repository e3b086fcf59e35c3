// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use barberbook_config::model::StorageConfig;
use barberbook_core::traits::{AccountStore, OfferStore, ShopStore};
use barberbook_core::{
    Account, BarberError, DayHours, FixedClock, Offer, Role, Shop, UserProfile, Weekday,
    WorkingHours,
};
use barberbook_resilience::RetryPolicy;
use barberbook_shops::{NewPrice, ShopService};
use barberbook_storage::SqliteStorage;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tempfile::TempDir;

struct Fixture {
    shops: ShopService,
    storage: Arc<SqliteStorage>,
    _dir: TempDir,
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

async fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let config = StorageConfig {
        database_path: dir.path().join("shops.db").to_string_lossy().into_owned(),
        wal_mode: false,
    };
    let storage = Arc::new(SqliteStorage::open(config).await.unwrap());
    let shops = ShopService::new(
        storage.clone(),
        storage.clone(),
        storage.clone(),
        Arc::new(FixedClock::new(now())),
    )
    .with_retry_policy(RetryPolicy::immediate(1));
    Fixture {
        shops,
        storage,
        _dir: dir,
    }
}

fn offer(id: &str, active: bool, end: DateTime<Utc>) -> Offer {
    Offer {
        id: id.into(),
        shop_id: "B1".into(),
        title: id.into(),
        description: String::new(),
        discount: 10,
        start_date: now() - Duration::days(30),
        end_date: end,
        code: "ABCD1234".into(),
        qr_code: "data:image/svg+xml;base64,".into(),
        active,
        created_at: now(),
    }
}

#[tokio::test]
async fn shop_codes_skip_taken_candidates() {
    let fx = fixture().await;

    let first = fx
        .shops
        .create_shop("B1", "Fade Masters", "5550123", Some("Main St"))
        .await
        .unwrap();
    assert_eq!(first.code, "FAD555");
    assert_eq!(first.location.as_deref(), Some("Main St"));

    let second = fx
        .shops
        .create_shop("B2", "Fade Factory", "5550123", None)
        .await
        .unwrap();
    assert_eq!(second.code, "FAD550");
}

/// Occupy every `FAD` code except `keep`.
async fn occupy_fad_codes(storage: &SqliteStorage, keep: Option<u32>) {
    for n in (100..=999).filter(|n| Some(*n) != keep) {
        let code = format!("FAD{n}");
        let shop = Shop {
            id: format!("owner-{code}"),
            name: "Fade".into(),
            code,
            owner_id: format!("owner-{n}"),
            location: None,
            image_url: None,
            working_hours: WorkingHours::new(),
            created_at: now(),
        };
        assert!(storage.insert_shop(&shop).await.unwrap());
    }
}

#[tokio::test]
async fn random_fallback_only_returns_free_codes() {
    let fx = fixture().await;
    occupy_fad_codes(&fx.storage, Some(457)).await;

    let code = fx.shops.generate_unique_shop_code("Fade", "").await.unwrap();
    assert_eq!(code, "FAD457");
    let shop = fx.shops.create_shop("B1", "Fade", "", None).await.unwrap();
    assert_eq!(shop.code, "FAD457");
}

#[tokio::test]
async fn exhausted_prefix_is_a_conflict() {
    let fx = fixture().await;
    occupy_fad_codes(&fx.storage, None).await;

    let err = fx.shops.generate_unique_shop_code("Fade", "").await.unwrap_err();
    assert_eq!(err.user_message(), "No shop code is available for this shop name");
    assert!(fx.shops.create_shop("B1", "Fade", "", None).await.is_err());
    assert!(fx.shops.shop("B1").await.unwrap().is_none());
}

#[tokio::test]
async fn owner_cannot_create_two_shops() {
    let fx = fixture().await;
    fx.shops.create_shop("B1", "Clips", "1234", None).await.unwrap();
    assert!(matches!(
        fx.shops.create_shop("B1", "Clips Again", "9876", None).await,
        Err(BarberError::Conflict(_))
    ));
}

#[tokio::test]
async fn connecting_twice_conflicts() {
    let fx = fixture().await;
    let shop = fx.shops.create_shop("B1", "Clips", "1234", None).await.unwrap();

    let typed = shop.code.to_lowercase();
    let connection = fx.shops.connect_to_shop("C1", &typed).await.unwrap();
    assert_eq!(connection.shop_id, "B1");

    let err = fx.shops.connect_to_shop("C1", &shop.code).await.unwrap_err();
    assert_eq!(err.user_message(), "Already connected to this shop");
    assert_eq!(fx.shops.customer_shops("C1").await.unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_code_is_rejected() {
    let fx = fixture().await;
    let err = fx.shops.connect_to_shop("C1", "NOPE000").await.unwrap_err();
    assert!(matches!(err, BarberError::NotFound { .. }));
    assert_eq!(err.user_message(), "Invalid shop code");
}

#[tokio::test]
async fn disconnect_removes_connection() {
    let fx = fixture().await;
    let shop = fx.shops.create_shop("B1", "Clips", "1234", None).await.unwrap();
    let connection = fx.shops.connect_to_shop("C1", &shop.code).await.unwrap();

    fx.shops.disconnect(&connection.id).await.unwrap();
    assert!(fx.shops.customer_shops("C1").await.unwrap().is_empty());
    assert!(fx.shops.disconnect(&connection.id).await.is_err());
}

#[tokio::test]
async fn shop_customers_include_profiles() {
    let fx = fixture().await;
    let shop = fx.shops.create_shop("B1", "Clips", "1234", None).await.unwrap();
    let account = Account {
        profile: UserProfile {
            id: "C1".into(),
            email: "alice@example.com".into(),
            name: "Alice".into(),
            phone: "5550100".into(),
            role: Role::Customer,
            email_verified: true,
            created_at: now(),
        },
        password_hash: "unused".into(),
        verification_token: None,
    };
    fx.storage.insert_account(&account).await.unwrap();
    fx.shops.connect_to_shop("C1", &shop.code).await.unwrap();

    let customers = fx.shops.shop_customers("B1").await.unwrap();
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].name, "Alice");
    assert_eq!(customers[0].connection_date, now());
}

#[tokio::test]
async fn stats_count_customers_and_running_offers() {
    let fx = fixture().await;
    let shop = fx.shops.create_shop("B1", "Clips", "1234", None).await.unwrap();
    fx.shops.connect_to_shop("C1", &shop.code).await.unwrap();
    fx.shops.connect_to_shop("C2", &shop.code).await.unwrap();

    let later = now() + Duration::days(30);
    fx.storage.insert_offer(&offer("running", true, later)).await.unwrap();
    fx.storage.insert_offer(&offer("switched-off", false, later)).await.unwrap();
    fx.storage
        .insert_offer(&offer("ended", true, now() - Duration::days(1)))
        .await
        .unwrap();

    let stats = fx.shops.shop_stats("B1").await.unwrap();
    assert_eq!(stats.customer_count, 2);
    assert_eq!(stats.active_offers_count, 1);
}

#[tokio::test]
async fn working_hours_are_validated_and_saved() {
    let fx = fixture().await;
    fx.shops.create_shop("B1", "Clips", "1234", None).await.unwrap();

    let mut hours = WorkingHours::new();
    hours.insert(
        Weekday::Monday,
        DayHours {
            open: "09:00".into(),
            close: "17:30".into(),
            closed: false,
        },
    );
    fx.shops.update_working_hours("B1", &hours).await.unwrap();
    let shop = fx.shops.shop("B1").await.unwrap().unwrap();
    assert_eq!(shop.working_hours, hours);

    hours.insert(
        Weekday::Tuesday,
        DayHours {
            open: "17:00".into(),
            close: "09:00".into(),
            closed: false,
        },
    );
    assert!(fx.shops.update_working_hours("B1", &hours).await.is_err());

    fx.shops.update_name("B1", "Clips & Co").await.unwrap();
    assert_eq!(fx.shops.shop("B1").await.unwrap().unwrap().name, "Clips & Co");
    assert!(fx.shops.update_name("missing", "X").await.is_err());
}

#[tokio::test]
async fn price_list_validates_entries() {
    let fx = fixture().await;

    let haircut = fx
        .shops
        .create_price(
            "B1",
            NewPrice {
                name: "Haircut".into(),
                price_cents: 2500,
                duration_minutes: Some(30),
            },
        )
        .await
        .unwrap();

    for bad in [
        NewPrice {
            name: " ".into(),
            price_cents: 100,
            duration_minutes: None,
        },
        NewPrice {
            name: "Shave".into(),
            price_cents: -1,
            duration_minutes: None,
        },
        NewPrice {
            name: "Shave".into(),
            price_cents: 100,
            duration_minutes: Some(0),
        },
    ] {
        assert!(matches!(
            fx.shops.create_price("B1", bad).await,
            Err(BarberError::Validation(_))
        ));
    }

    assert_eq!(fx.shops.prices("B1").await.unwrap(), vec![haircut.clone()]);
    assert!(fx.shops.delete_price("B2", &haircut.id).await.is_err());
    fx.shops.delete_price("B1", &haircut.id).await.unwrap();
    assert!(fx.shops.prices("B1").await.unwrap().is_empty());
}
