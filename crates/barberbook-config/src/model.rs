// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model.
//!
//! Every section rejects unknown keys and falls back to per-field defaults, so
//! an empty file yields a working configuration.

use std::time::Duration;

use barberbook_resilience::RetryPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BarberBookConfig {
    #[serde(default)]
    pub app: AppConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Backoff used for every storage call made by the services.
    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub offers: OffersConfig,

    #[serde(default)]
    pub chat: ChatConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub vault: VaultConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    /// trace, debug, info, warn or error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_app_name() -> String {
    "barberbook".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("barberbook").join("barberbook.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("barberbook.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default = "default_min_timeout_ms")]
    pub min_timeout_ms: u64,

    #[serde(default = "default_max_timeout_ms")]
    pub max_timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retries: default_retries(),
            min_timeout_ms: default_min_timeout_ms(),
            max_timeout_ms: default_max_timeout_ms(),
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retries,
            Duration::from_millis(self.min_timeout_ms),
            Duration::from_millis(self.max_timeout_ms),
        )
    }
}

fn default_retries() -> u32 {
    3
}

fn default_min_timeout_ms() -> u64 {
    1000
}

fn default_max_timeout_ms() -> u64 {
    5000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OffersConfig {
    /// Minimum rendered QR size in pixels.
    #[serde(default = "default_qr_min_dimension")]
    pub qr_min_dimension: u32,
}

impl Default for OffersConfig {
    fn default() -> Self {
        Self {
            qr_min_dimension: default_qr_min_dimension(),
        }
    }
}

fn default_qr_min_dimension() -> u32 {
    400
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Maximum entries delivered per subscription snapshot.
    #[serde(default = "default_snapshot_limit")]
    pub snapshot_limit: u32,

    /// Broadcast buffer per subscriber before it lags.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            snapshot_limit: default_snapshot_limit(),
            event_capacity: default_event_capacity(),
        }
    }
}

fn default_snapshot_limit() -> u32 {
    500
}

fn default_event_capacity() -> usize {
    256
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u32,

    /// Refuse sign-in until the email address is verified.
    #[serde(default = "default_require_verified_email")]
    pub require_verified_email: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: default_session_ttl_hours(),
            require_verified_email: default_require_verified_email(),
        }
    }
}

fn default_session_ttl_hours() -> u32 {
    720
}

fn default_require_verified_email() -> bool {
    true
}

/// Argon2id parameters for the credential cache.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// Memory cost in KiB.
    #[serde(default = "default_kdf_memory_cost")]
    pub kdf_memory_cost: u32,

    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    #[serde(default = "default_kdf_parallelism")]
    pub kdf_parallelism: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_memory_cost: default_kdf_memory_cost(),
            kdf_iterations: default_kdf_iterations(),
            kdf_parallelism: default_kdf_parallelism(),
        }
    }
}

fn default_kdf_memory_cost() -> u32 {
    65536
}

fn default_kdf_iterations() -> u32 {
    3
}

fn default_kdf_parallelism() -> u32 {
    4
}
