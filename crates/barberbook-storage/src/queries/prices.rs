// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shop price lists.

use barberbook_core::{BarberError, PriceItem};
use rusqlite::params;

use crate::database::{Database, map_tr_err};

pub async fn insert_price(db: &Database, item: &PriceItem) -> Result<(), BarberError> {
    let item = item.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO price_items \
                 (id, shop_id, name, price_cents, duration_minutes, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6) ON CONFLICT DO NOTHING",
                params![
                    item.id,
                    item.shop_id,
                    item.name,
                    item.price_cents,
                    item.duration_minutes,
                    item.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn prices_for_shop(db: &Database, shop_id: &str) -> Result<Vec<PriceItem>, BarberError> {
    let shop_id = shop_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, shop_id, name, price_cents, duration_minutes, created_at \
                 FROM price_items WHERE shop_id = ?1 ORDER BY created_at ASC, rowid ASC",
            )?;
            let rows = stmt.query_map(params![shop_id], |row| {
                Ok(PriceItem {
                    id: row.get(0)?,
                    shop_id: row.get(1)?,
                    name: row.get(2)?,
                    price_cents: row.get(3)?,
                    duration_minutes: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Delete scoped to the owning shop.
pub async fn delete_price(db: &Database, shop_id: &str, price_id: &str) -> Result<bool, BarberError> {
    let shop_id = shop_id.to_string();
    let price_id = price_id.to_string();
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM price_items WHERE id = ?1 AND shop_id = ?2",
                params![price_id, shop_id],
            )?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_tr_err)
}
