// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shop management: join codes, customer connections, opening hours, the
//! price list and dashboard counters.

pub mod code;
pub mod hours;
pub mod service;

pub use code::{code_candidates, normalize_shop_code};
pub use hours::validate_working_hours;
pub use service::{NewPrice, ShopService};
