// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Resilience helpers for BarberBook.

pub mod retry;

pub use retry::{RetryPolicy, retry_delay, with_retry};
