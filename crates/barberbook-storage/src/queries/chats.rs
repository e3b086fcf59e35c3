// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat headers and messages.
//!
//! A message append and its header update always commit together.

use barberbook_core::{AppendOutcome, BarberError, Chat, Message};
use rusqlite::{OptionalExtension, Row, params};

use crate::database::{Database, map_tr_err};
use crate::queries::sql_limit;

const CHAT_COLUMNS: &str = "id, shop_id, customer_id, customer_name, last_message, \
                            last_message_time, unread_count, created_at";

fn chat_from_row(row: &Row<'_>) -> Result<Chat, rusqlite::Error> {
    Ok(Chat {
        id: row.get(0)?,
        shop_id: row.get(1)?,
        customer_id: row.get(2)?,
        customer_name: row.get(3)?,
        last_message: row.get(4)?,
        last_message_time: row.get(5)?,
        unread_count: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn message_from_row(row: &Row<'_>) -> Result<Message, rusqlite::Error> {
    Ok(Message {
        id: row.get(0)?,
        chat_id: row.get(1)?,
        sender_id: row.get(2)?,
        sender_name: row.get(3)?,
        content: row.get(4)?,
        timestamp: row.get(5)?,
        read: row.get(6)?,
    })
}

/// Create the header if absent. Never touches an existing row.
pub async fn upsert_chat(db: &Database, chat: &Chat) -> Result<bool, BarberError> {
    let chat = chat.clone();
    db.connection()
        .call(move |conn| {
            let inserted = conn.execute(
                "INSERT INTO chats (id, shop_id, customer_id, customer_name, last_message, \
                 last_message_time, unread_count, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
                 ON CONFLICT (id) DO NOTHING",
                params![
                    chat.id,
                    chat.shop_id,
                    chat.customer_id,
                    chat.customer_name,
                    chat.last_message,
                    chat.last_message_time,
                    chat.unread_count,
                    chat.created_at,
                ],
            )?;
            Ok(inserted == 1)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_chat(db: &Database, chat_id: &str) -> Result<Option<Chat>, BarberError> {
    let chat_id = chat_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {CHAT_COLUMNS} FROM chats WHERE id = ?1"),
                params![chat_id],
                chat_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Inbox order: most recent message first, silent chats last.
pub async fn chats_for_shop(
    db: &Database,
    shop_id: &str,
    limit: Option<u32>,
) -> Result<Vec<Chat>, BarberError> {
    let shop_id = shop_id.to_string();
    let limit = sql_limit(limit);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CHAT_COLUMNS} FROM chats WHERE shop_id = ?1 \
                 ORDER BY last_message_time IS NULL, last_message_time DESC, created_at DESC \
                 LIMIT ?2"
            ))?;
            let rows = stmt.query_map(params![shop_id, limit], chat_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Insert the message and refresh the header in one transaction.
pub async fn append_message(
    db: &Database,
    message: &Message,
    bump_unread: bool,
) -> Result<AppendOutcome, BarberError> {
    let m = message.clone();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;

            let chat_exists: bool = tx.query_row(
                "SELECT EXISTS (SELECT 1 FROM chats WHERE id = ?1)",
                params![m.chat_id],
                |row| row.get(0),
            )?;
            if !chat_exists {
                return Ok(AppendOutcome::ChatMissing);
            }

            let inserted = tx.execute(
                "INSERT INTO chat_messages \
                 (id, chat_id, sender_id, sender_name, content, timestamp, read) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) ON CONFLICT DO NOTHING",
                params![
                    m.id,
                    m.chat_id,
                    m.sender_id,
                    m.sender_name,
                    m.content,
                    m.timestamp,
                    m.read,
                ],
            )?;
            if inserted == 0 {
                return Ok(AppendOutcome::Duplicate);
            }

            tx.execute(
                "UPDATE chats SET last_message = ?2, last_message_time = ?3, \
                 unread_count = unread_count + ?4 WHERE id = ?1",
                params![m.chat_id, m.content, m.timestamp, i64::from(bump_unread)],
            )?;
            tx.commit()?;
            Ok(AppendOutcome::Appended)
        })
        .await
        .map_err(map_tr_err)
}

/// Zero the badge and flag the customer's messages as read.
pub async fn reset_unread(db: &Database, chat_id: &str) -> Result<bool, BarberError> {
    let chat_id = chat_id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let updated = tx.execute(
                "UPDATE chats SET unread_count = 0 WHERE id = ?1",
                params![chat_id],
            )?;
            tx.execute(
                "UPDATE chat_messages SET read = 1 \
                 WHERE chat_id = ?1 AND read = 0 \
                 AND sender_id = (SELECT customer_id FROM chats WHERE id = ?1)",
                params![chat_id],
            )?;
            tx.commit()?;
            Ok(updated > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// The `limit` newest messages, oldest first. Ties on timestamp keep
/// insertion order.
pub async fn messages(
    db: &Database,
    chat_id: &str,
    limit: Option<u32>,
) -> Result<Vec<Message>, BarberError> {
    let chat_id = chat_id.to_string();
    let limit = sql_limit(limit);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, chat_id, sender_id, sender_name, content, timestamp, read FROM ( \
                     SELECT seq, id, chat_id, sender_id, sender_name, content, timestamp, read \
                     FROM chat_messages WHERE chat_id = ?1 \
                     ORDER BY timestamp DESC, seq DESC LIMIT ?2 \
                 ) ORDER BY timestamp ASC, seq ASC",
            )?;
            let rows = stmt.query_map(params![chat_id, limit], message_from_row)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::testing::{at, setup_db};

    fn make_chat(shop: &str, customer: &str) -> Chat {
        Chat {
            id: format!("{shop}_{customer}"),
            shop_id: shop.to_string(),
            customer_id: customer.to_string(),
            customer_name: "Sam".to_string(),
            last_message: None,
            last_message_time: None,
            unread_count: 0,
            created_at: at(1, 9),
        }
    }

    fn make_message(id: &str, chat: &Chat, sender: &str, hour: u32) -> Message {
        Message {
            id: id.to_string(),
            chat_id: chat.id.clone(),
            sender_id: sender.to_string(),
            sender_name: sender.to_uppercase(),
            content: format!("message {id}"),
            timestamp: at(2, hour),
            read: false,
        }
    }

    #[tokio::test]
    async fn upsert_does_not_clobber_counters() {
        let (db, _dir) = setup_db().await;
        let chat = make_chat("shop", "cust");
        assert!(upsert_chat(&db, &chat).await.unwrap());

        append_message(&db, &make_message("m1", &chat, "cust", 10), true)
            .await
            .unwrap();
        assert!(!upsert_chat(&db, &chat).await.unwrap());

        let stored = get_chat(&db, &chat.id).await.unwrap().unwrap();
        assert_eq!(stored.unread_count, 1);
        assert_eq!(stored.last_message.as_deref(), Some("message m1"));
    }

    #[tokio::test]
    async fn append_updates_header_and_counts_only_when_bumped() {
        let (db, _dir) = setup_db().await;
        let chat = make_chat("shop", "cust");
        upsert_chat(&db, &chat).await.unwrap();

        append_message(&db, &make_message("m1", &chat, "cust", 10), true).await.unwrap();
        append_message(&db, &make_message("m2", &chat, "shop", 11), false).await.unwrap();

        let stored = get_chat(&db, &chat.id).await.unwrap().unwrap();
        assert_eq!(stored.unread_count, 1);
        assert_eq!(stored.last_message.as_deref(), Some("message m2"));
        assert_eq!(stored.last_message_time, Some(at(2, 11)));
    }

    #[tokio::test]
    async fn duplicate_and_orphan_appends_change_nothing() {
        let (db, _dir) = setup_db().await;
        let chat = make_chat("shop", "cust");
        upsert_chat(&db, &chat).await.unwrap();
        let message = make_message("m1", &chat, "cust", 10);

        assert_eq!(
            append_message(&db, &message, true).await.unwrap(),
            AppendOutcome::Appended
        );
        assert_eq!(
            append_message(&db, &message, true).await.unwrap(),
            AppendOutcome::Duplicate
        );
        assert_eq!(get_chat(&db, &chat.id).await.unwrap().unwrap().unread_count, 1);

        let orphan = make_message("m2", &make_chat("shop", "ghost"), "ghost", 10);
        assert_eq!(
            append_message(&db, &orphan, true).await.unwrap(),
            AppendOutcome::ChatMissing
        );
    }

    #[tokio::test]
    async fn reset_marks_customer_messages_read() {
        let (db, _dir) = setup_db().await;
        let chat = make_chat("shop", "cust");
        upsert_chat(&db, &chat).await.unwrap();
        append_message(&db, &make_message("m1", &chat, "cust", 10), true).await.unwrap();
        append_message(&db, &make_message("m2", &chat, "shop", 11), false).await.unwrap();

        assert!(reset_unread(&db, &chat.id).await.unwrap());
        assert_eq!(get_chat(&db, &chat.id).await.unwrap().unwrap().unread_count, 0);

        let msgs = messages(&db, &chat.id, None).await.unwrap();
        assert!(msgs[0].read);
        assert!(!msgs[1].read);
        assert!(!reset_unread(&db, "shop_nobody").await.unwrap());
    }

    #[tokio::test]
    async fn messages_are_ascending_and_limit_keeps_newest() {
        let (db, _dir) = setup_db().await;
        let chat = make_chat("shop", "cust");
        upsert_chat(&db, &chat).await.unwrap();
        append_message(&db, &make_message("late", &chat, "cust", 15), true).await.unwrap();
        append_message(&db, &make_message("early", &chat, "cust", 9), true).await.unwrap();
        append_message(&db, &make_message("tie-a", &chat, "cust", 12), true).await.unwrap();
        append_message(&db, &make_message("tie-b", &chat, "cust", 12), true).await.unwrap();

        let ids: Vec<String> = messages(&db, &chat.id, None)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec!["early", "tie-a", "tie-b", "late"]);

        let newest: Vec<String> = messages(&db, &chat.id, Some(2))
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(newest, vec!["tie-b", "late"]);
    }

    #[tokio::test]
    async fn inbox_orders_by_last_activity() {
        let (db, _dir) = setup_db().await;
        let quiet = make_chat("shop", "quiet");
        let older = make_chat("shop", "older");
        let newer = make_chat("shop", "newer");
        for chat in [&quiet, &older, &newer] {
            upsert_chat(&db, chat).await.unwrap();
        }
        upsert_chat(&db, &make_chat("elsewhere", "x")).await.unwrap();
        append_message(&db, &make_message("m1", &older, "older", 8), true).await.unwrap();
        append_message(&db, &make_message("m2", &newer, "newer", 9), true).await.unwrap();

        let ids: Vec<String> = chats_for_shop(&db, "shop", None)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.customer_id)
            .collect();
        assert_eq!(ids, vec!["newer", "older", "quiet"]);
        assert_eq!(chats_for_shop(&db, "shop", Some(1)).await.unwrap().len(), 1);
    }
}
