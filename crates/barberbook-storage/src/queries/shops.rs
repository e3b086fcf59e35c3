// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shops and customer connections.

use barberbook_core::{BarberError, CustomerShop, InsertOutcome, Shop, ShopCustomer, WorkingHours};
use rusqlite::{OptionalExtension, Row, params};

use crate::database::{Database, map_tr_err};
use crate::queries::{parse_json, to_json};

const SHOP_COLUMNS: &str =
    "id, name, code, owner_id, location, image_url, working_hours, created_at";

fn shop_from_row(row: &Row<'_>) -> Result<Shop, rusqlite::Error> {
    Ok(Shop {
        id: row.get(0)?,
        name: row.get(1)?,
        code: row.get(2)?,
        owner_id: row.get(3)?,
        location: row.get(4)?,
        image_url: row.get(5)?,
        working_hours: parse_json(6, row.get(6)?)?,
        created_at: row.get(7)?,
    })
}

fn connection_from_row(row: &Row<'_>) -> Result<CustomerShop, rusqlite::Error> {
    Ok(CustomerShop {
        id: row.get(0)?,
        customer_id: row.get(1)?,
        shop_id: row.get(2)?,
        shop_code: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Returns `false` when the id or code is already in use.
pub async fn insert_shop(db: &Database, shop: &Shop) -> Result<bool, BarberError> {
    let shop = shop.clone();
    db.connection()
        .call(move |conn| {
            let hours = to_json(&shop.working_hours)?;
            let inserted = conn.execute(
                "INSERT INTO shops \
                 (id, name, code, owner_id, location, image_url, working_hours, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) ON CONFLICT DO NOTHING",
                params![
                    shop.id,
                    shop.name,
                    shop.code,
                    shop.owner_id,
                    shop.location,
                    shop.image_url,
                    hours,
                    shop.created_at,
                ],
            )?;
            Ok(inserted == 1)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_shop(db: &Database, shop_id: &str) -> Result<Option<Shop>, BarberError> {
    let shop_id = shop_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {SHOP_COLUMNS} FROM shops WHERE id = ?1"),
                params![shop_id],
                shop_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn find_shop_by_code(db: &Database, code: &str) -> Result<Option<Shop>, BarberError> {
    let code = code.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {SHOP_COLUMNS} FROM shops WHERE code = ?1"),
                params![code],
                shop_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn shop_code_exists(db: &Database, code: &str) -> Result<bool, BarberError> {
    let code = code.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT EXISTS (SELECT 1 FROM shops WHERE code = ?1)",
                params![code],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}

pub async fn update_shop_name(db: &Database, shop_id: &str, name: &str) -> Result<bool, BarberError> {
    let shop_id = shop_id.to_string();
    let name = name.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE shops SET name = ?1 WHERE id = ?2",
                params![name, shop_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn update_working_hours(
    db: &Database,
    shop_id: &str,
    hours: &WorkingHours,
) -> Result<bool, BarberError> {
    let shop_id = shop_id.to_string();
    let hours = hours.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE shops SET working_hours = ?1 WHERE id = ?2",
                params![to_json(&hours)?, shop_id],
            )?;
            Ok(changed > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Insert unless the pair `(customer_id, shop_id)` is already connected.
pub async fn insert_connection(
    db: &Database,
    connection: &CustomerShop,
) -> Result<InsertOutcome<CustomerShop>, BarberError> {
    let c = connection.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let inserted = tx.execute(
                "INSERT INTO customer_shops (id, customer_id, shop_id, shop_code, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5) ON CONFLICT DO NOTHING",
                params![c.id, c.customer_id, c.shop_id, c.shop_code, c.created_at],
            )?;
            let outcome = if inserted == 1 {
                InsertOutcome::Inserted
            } else {
                InsertOutcome::Existing(tx.query_row(
                    "SELECT id, customer_id, shop_id, shop_code, created_at FROM customer_shops \
                     WHERE customer_id = ?1 AND shop_id = ?2",
                    params![c.customer_id, c.shop_id],
                    connection_from_row,
                )?)
            };
            tx.commit()?;
            Ok(outcome)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn delete_connection(db: &Database, connection_id: &str) -> Result<bool, BarberError> {
    let connection_id = connection_id.to_string();
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM customer_shops WHERE id = ?1",
                params![connection_id],
            )?;
            Ok(deleted > 0)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn connections_for_customer(
    db: &Database,
    customer_id: &str,
) -> Result<Vec<CustomerShop>, BarberError> {
    let customer_id = customer_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, customer_id, shop_id, shop_code, created_at FROM customer_shops \
                 WHERE customer_id = ?1 ORDER BY created_at DESC",
            )?;
            let rows = stmt.query_map(params![customer_id], connection_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Connected customers that have a profile, most recent connection first.
pub async fn shop_customers(db: &Database, shop_id: &str) -> Result<Vec<ShopCustomer>, BarberError> {
    let shop_id = shop_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT u.id, u.name, u.email, u.phone, cs.created_at \
                 FROM customer_shops cs JOIN users u ON u.id = cs.customer_id \
                 WHERE cs.shop_id = ?1 ORDER BY cs.created_at DESC",
            )?;
            let rows = stmt.query_map(params![shop_id], |row| {
                Ok(ShopCustomer {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    phone: row.get(3)?,
                    connection_date: row.get(4)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

pub async fn count_connections(db: &Database, shop_id: &str) -> Result<u64, BarberError> {
    let shop_id = shop_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM customer_shops WHERE shop_id = ?1",
                params![shop_id],
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
    use barberbook_core::{DayHours, Weekday};
    use crate::queries::testing::{at, setup_db};

    fn make_shop(id: &str, code: &str) -> Shop {
        Shop {
            id: id.to_string(),
            name: "Sharp Cuts".to_string(),
            code: code.to_string(),
            owner_id: id.to_string(),
            location: Some("Main St".to_string()),
            image_url: None,
            working_hours: WorkingHours::new(),
            created_at: at(1, 8),
        }
    }

    fn make_connection(id: &str, customer: &str, shop: &Shop, day: u32) -> CustomerShop {
        CustomerShop {
            id: id.to_string(),
            customer_id: customer.to_string(),
            shop_id: shop.id.clone(),
            shop_code: shop.code.clone(),
            created_at: at(day, 8),
        }
    }

    #[tokio::test]
    async fn code_uniqueness_is_enforced() {
        let (db, _dir) = setup_db().await;
        assert!(insert_shop(&db, &make_shop("s1", "SHA123")).await.unwrap());
        assert!(!insert_shop(&db, &make_shop("s2", "SHA123")).await.unwrap());
        assert!(shop_code_exists(&db, "SHA123").await.unwrap());
        assert!(!shop_code_exists(&db, "SHA999").await.unwrap());
        assert_eq!(
            find_shop_by_code(&db, "SHA123").await.unwrap().unwrap().id,
            "s1"
        );
    }

    #[tokio::test]
    async fn working_hours_roundtrip_through_json_column() {
        let (db, _dir) = setup_db().await;
        insert_shop(&db, &make_shop("s1", "SHA123")).await.unwrap();

        let mut hours = WorkingHours::new();
        hours.insert(
            Weekday::Saturday,
            DayHours {
                open: "10:00".to_string(),
                close: "14:00".to_string(),
                closed: false,
            },
        );
        assert!(update_working_hours(&db, "s1", &hours).await.unwrap());
        assert!(update_shop_name(&db, "s1", "Sharper Cuts").await.unwrap());

        let shop = get_shop(&db, "s1").await.unwrap().unwrap();
        assert_eq!(shop.working_hours, hours);
        assert_eq!(shop.name, "Sharper Cuts");
    }

    #[tokio::test]
    async fn second_connection_returns_existing() {
        let (db, _dir) = setup_db().await;
        let shop = make_shop("s1", "SHA123");
        insert_shop(&db, &shop).await.unwrap();

        let first = make_connection("cs1", "c1", &shop, 2);
        assert_eq!(insert_connection(&db, &first).await.unwrap(), InsertOutcome::Inserted);
        assert_eq!(
            insert_connection(&db, &make_connection("cs2", "c1", &shop, 3))
                .await
                .unwrap(),
            InsertOutcome::Existing(first)
        );
        assert_eq!(count_connections(&db, "s1").await.unwrap(), 1);

        assert!(delete_connection(&db, "cs1").await.unwrap());
        assert_eq!(count_connections(&db, "s1").await.unwrap(), 0);
        assert!(connections_for_customer(&db, "c1").await.unwrap().is_empty());
    }
}
