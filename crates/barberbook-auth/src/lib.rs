// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sign-up, email verification, sign-in and session handling.
//!
//! Callers receive an explicit [`Session`] on sign-in and pass it to whatever
//! needs the current user. Sessions are persisted by the hash of their bearer
//! token and expire after the configured lifetime.

pub mod password;
pub mod service;
pub mod session;
pub mod token;

pub use service::{AuthService, ShopDetails, SignUp, SignUpOutcome};
pub use session::Session;
