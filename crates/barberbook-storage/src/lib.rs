// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for BarberBook.
//!
//! WAL-mode SQLite with embedded refinery migrations and a single background
//! connection (`tokio-rusqlite`) that serializes all access. [`SqliteStorage`]
//! implements every storage trait from `barberbook-core`.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStorage;
pub use database::Database;
