// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the BarberBook workspace.

use thiserror::Error;

/// Message shown to end users for failures they cannot act on.
const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// The primary error type used across all BarberBook services and storage adapters.
#[derive(Debug, Error)]
pub enum BarberError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Caller-supplied input failed a business rule (empty title, bad date range).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A scanned or typed offer code was refused.
    #[error("offer rejected: {0}")]
    OfferRejected(#[from] OfferRejection),

    /// The customer already holds a redemption for this offer.
    #[error("offer {offer_id} already redeemed by customer {customer_id}")]
    AlreadyRedeemed {
        offer_id: String,
        customer_id: String,
    },

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The write would violate a uniqueness rule (duplicate email, double connection).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Missing, expired, or insufficient session.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Credential vault errors (wrong passphrase, corrupted entries).
    #[error("vault error: {0}")]
    Vault(String),

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BarberError {
    /// Wrap any error as a storage failure.
    pub fn storage<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Storage {
            source: source.into(),
        }
    }

    /// Short inline string suitable for display next to the control that failed.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::Conflict(message) | Self::Unauthorized(message) => {
                message.clone()
            }
            Self::OfferRejected(rejection) => rejection.to_string(),
            Self::AlreadyRedeemed { .. } => "You have already redeemed this offer".to_string(),
            Self::NotFound {
                entity: "shop code",
                ..
            } => "Invalid shop code".to_string(),
            Self::NotFound { entity, .. } => {
                let mut chars = entity.chars();
                match chars.next() {
                    Some(first) => format!("{}{} not found", first.to_uppercase(), chars.as_str()),
                    None => "Not found".to_string(),
                }
            }
            Self::Config(_)
            | Self::Storage { .. }
            | Self::Vault(_)
            | Self::Timeout { .. }
            | Self::Internal(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

/// Why an offer code was refused, in the order the checks are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OfferRejection {
    /// Nothing (or only whitespace) was entered.
    #[error("Please enter a valid offer code")]
    EmptyCode,
    /// The code does not belong to this offer.
    #[error("Invalid code for this offer")]
    InvalidCode,
    /// The offer window has not opened yet.
    #[error("This offer is not active yet")]
    NotActiveYet,
    /// The offer window has closed.
    #[error("This offer has expired")]
    Expired,
    /// The shop switched the offer off.
    #[error("This offer is no longer available")]
    Unavailable,
}
