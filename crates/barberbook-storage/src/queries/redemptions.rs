// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offer redemptions keyed by `(offer_id, customer_id)`.

use barberbook_core::{BarberError, InsertOutcome, OfferRedemption};
use rusqlite::{OptionalExtension, Row, params};
use tracing::debug;

use crate::database::{Database, map_tr_err};

fn redemption_from_row(row: &Row<'_>) -> Result<OfferRedemption, rusqlite::Error> {
    Ok(OfferRedemption {
        id: row.get(0)?,
        offer_id: row.get(1)?,
        customer_id: row.get(2)?,
        shop_id: row.get(3)?,
        redeemed_at: row.get(4)?,
    })
}

/// Conditional insert. A second redemption of the same offer by the same
/// customer writes nothing and returns the stored row.
pub async fn insert_redemption(
    db: &Database,
    redemption: &OfferRedemption,
) -> Result<InsertOutcome<OfferRedemption>, BarberError> {
    let r = redemption.clone();
    let outcome = db
        .connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let inserted = tx.execute(
                "INSERT INTO offer_redemptions \
                 (id, offer_id, customer_id, shop_id, redeemed_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5) ON CONFLICT DO NOTHING",
                params![r.id, r.offer_id, r.customer_id, r.shop_id, r.redeemed_at],
            )?;
            let outcome = if inserted == 1 {
                InsertOutcome::Inserted
            } else {
                let existing = tx.query_row(
                    "SELECT id, offer_id, customer_id, shop_id, redeemed_at \
                     FROM offer_redemptions WHERE offer_id = ?1 AND customer_id = ?2",
                    params![r.offer_id, r.customer_id],
                    redemption_from_row,
                )?;
                InsertOutcome::Existing(existing)
            };
            tx.commit()?;
            Ok(outcome)
        })
        .await
        .map_err(map_tr_err)?;

    if let InsertOutcome::Existing(_) = &outcome {
        debug!(
            offer_id = %redemption.offer_id,
            customer_id = %redemption.customer_id,
            "redemption already recorded"
        );
    }
    Ok(outcome)
}

pub async fn find_redemption(
    db: &Database,
    offer_id: &str,
    customer_id: &str,
) -> Result<Option<OfferRedemption>, BarberError> {
    let offer_id = offer_id.to_string();
    let customer_id = customer_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT id, offer_id, customer_id, shop_id, redeemed_at \
                 FROM offer_redemptions WHERE offer_id = ?1 AND customer_id = ?2",
                params![offer_id, customer_id],
                redemption_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn redemptions_for_customer(
    db: &Database,
    customer_id: &str,
) -> Result<Vec<OfferRedemption>, BarberError> {
    let customer_id = customer_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, offer_id, customer_id, shop_id, redeemed_at \
                 FROM offer_redemptions WHERE customer_id = ?1 ORDER BY redeemed_at DESC",
            )?;
            let rows = stmt.query_map(params![customer_id], redemption_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn count_redemptions(db: &Database, offer_id: &str) -> Result<u64, BarberError> {
    let offer_id = offer_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM offer_redemptions WHERE offer_id = ?1",
                params![offer_id],
                |row| row.get::<_, i64>(0),
            )
        })
        .await
        .map(|n| n.max(0) as u64)
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::testing::{at, setup_db};

    fn make_redemption(id: &str, offer: &str, customer: &str) -> OfferRedemption {
        OfferRedemption {
            id: id.to_string(),
            offer_id: offer.to_string(),
            customer_id: customer.to_string(),
            shop_id: "shop-a".to_string(),
            redeemed_at: at(2, 10),
        }
    }

    #[tokio::test]
    async fn second_redemption_returns_existing_row() {
        let (db, _dir) = setup_db().await;
        let first = make_redemption("r1", "o1", "c1");

        assert_eq!(
            insert_redemption(&db, &first).await.unwrap(),
            InsertOutcome::Inserted
        );
        let dup = make_redemption("r2", "o1", "c1");
        assert_eq!(
            insert_redemption(&db, &dup).await.unwrap(),
            InsertOutcome::Existing(first)
        );
        assert_eq!(count_redemptions(&db, "o1").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn different_customers_redeem_independently() {
        let (db, _dir) = setup_db().await;
        insert_redemption(&db, &make_redemption("r1", "o1", "c1")).await.unwrap();
        insert_redemption(&db, &make_redemption("r2", "o1", "c2")).await.unwrap();
        insert_redemption(&db, &make_redemption("r3", "o2", "c1")).await.unwrap();

        assert_eq!(count_redemptions(&db, "o1").await.unwrap(), 2);
        assert_eq!(redemptions_for_customer(&db, "c1").await.unwrap().len(), 2);
        assert!(find_redemption(&db, "o2", "c2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn concurrent_duplicates_store_one_row() {
        let (db, _dir) = setup_db().await;
        let mut handles = Vec::new();
        for i in 0..8 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                insert_redemption(&db, &make_redemption(&format!("r{i}"), "o1", "c1")).await
            }));
        }

        let mut inserted = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() == InsertOutcome::Inserted {
                inserted += 1;
            }
        }
        assert_eq!(inserted, 1);
        assert_eq!(count_redemptions(&db, "o1").await.unwrap(), 1);
    }
}
