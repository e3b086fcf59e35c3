// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed queries, one module per aggregate.

pub mod accounts;
pub mod chats;
pub mod offers;
pub mod prices;
pub mod redemptions;
pub mod shops;

use std::str::FromStr;

use rusqlite::types::Type;

/// Parse a strum-backed enum column.
pub(crate) fn parse_enum<T>(idx: usize, raw: String) -> Result<T, rusqlite::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    T::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Decode a JSON text column.
pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(
    idx: usize,
    raw: String,
) -> Result<T, rusqlite::Error> {
    serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Encode a value for a JSON text column.
pub(crate) fn to_json<T: serde::Serialize>(value: &T) -> Result<String, rusqlite::Error> {
    serde_json::to_string(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// `None` maps to SQLite's "no limit".
pub(crate) fn sql_limit(limit: Option<u32>) -> i64 {
    limit.map_or(-1, i64::from)
}
