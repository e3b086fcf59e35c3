// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One conversation per (shop, customer) pair, with an owner-facing unread
//! badge kept on the chat header.

pub mod service;

pub use service::{ChatService, DEFAULT_SNAPSHOT_LIMIT, chat_id};
