// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Offer rows.

use barberbook_core::{BarberError, Offer};
use rusqlite::{OptionalExtension, Row, params};

use crate::database::{Database, map_tr_err};

const OFFER_COLUMNS: &str = "id, shop_id, title, description, discount, start_date, end_date, \
                             code, qr_code, active, created_at";

fn offer_from_row(row: &Row<'_>) -> Result<Offer, rusqlite::Error> {
    Ok(Offer {
        id: row.get(0)?,
        shop_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        discount: row.get(4)?,
        start_date: row.get(5)?,
        end_date: row.get(6)?,
        code: row.get(7)?,
        qr_code: row.get(8)?,
        active: row.get(9)?,
        created_at: row.get(10)?,
    })
}

/// Insert unless the id already exists.
pub async fn insert_offer(db: &Database, offer: &Offer) -> Result<(), BarberError> {
    let offer = offer.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO offers (id, shop_id, title, description, discount, \
                 start_date, end_date, code, qr_code, active, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11) ON CONFLICT DO NOTHING",
                params![
                    offer.id,
                    offer.shop_id,
                    offer.title,
                    offer.description,
                    offer.discount,
                    offer.start_date,
                    offer.end_date,
                    offer.code,
                    offer.qr_code,
                    offer.active,
                    offer.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_offer(db: &Database, offer_id: &str) -> Result<Option<Offer>, BarberError> {
    let offer_id = offer_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {OFFER_COLUMNS} FROM offers WHERE id = ?1"),
                params![offer_id],
                offer_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Offers of one shop, newest first.
pub async fn list_offers(db: &Database, shop_id: &str) -> Result<Vec<Offer>, BarberError> {
    let shop_id = shop_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {OFFER_COLUMNS} FROM offers WHERE shop_id = ?1 \
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt.query_map(params![shop_id], offer_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn set_offer_active(
    db: &Database,
    offer_id: &str,
    active: bool,
) -> Result<bool, BarberError> {
    let offer_id = offer_id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE offers SET active = ?1 WHERE id = ?2",
                params![active, offer_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}
