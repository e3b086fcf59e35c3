// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random bearer tokens and their stored digests.

use barberbook_core::BarberError;
use ring::digest::{SHA256, digest};
use ring::rand::{SecureRandom, SystemRandom};

const SESSION_TOKEN_BYTES: usize = 32;
const VERIFICATION_TOKEN_BYTES: usize = 16;

fn random_hex(len: usize) -> Result<String, BarberError> {
    let mut bytes = vec![0u8; len];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| BarberError::Internal("system random source unavailable".into()))?;
    Ok(hex::encode(bytes))
}

pub fn new_session_token() -> Result<String, BarberError> {
    random_hex(SESSION_TOKEN_BYTES)
}

pub fn new_verification_token() -> Result<String, BarberError> {
    random_hex(VERIFICATION_TOKEN_BYTES)
}

/// Hex SHA-256, the only form in which session tokens are persisted.
pub fn token_hash(token: &str) -> String {
    hex::encode(digest(&SHA256, token.as_bytes()))
}
