// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for BarberBook integration tests.
//!
//! - [`TestHarness`]: every service wired to a temporary SQLite database, a
//!   manually driven clock and a private event bus.
//! - [`FlakyOfferStore`]: an offer store that fails a set number of calls
//!   before delegating, for exercising retries.

pub mod flaky;
pub mod harness;

pub use flaky::FlakyOfferStore;
pub use harness::{TestHarness, TestHarnessBuilder};
