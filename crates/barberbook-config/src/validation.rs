// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::BarberBookConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration, collecting every failure.
pub fn validate_config(config: &BarberBookConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if !LOG_LEVELS.contains(&config.app.log_level.as_str()) {
        fail(format!(
            "app.log_level must be one of {}, got `{}`",
            LOG_LEVELS.join(", "),
            config.app.log_level
        ));
    }

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.retry.retries < 1 {
        fail("retry.retries must be at least 1".to_string());
    }

    if config.retry.min_timeout_ms > config.retry.max_timeout_ms {
        fail(format!(
            "retry.min_timeout_ms ({}) must not exceed retry.max_timeout_ms ({})",
            config.retry.min_timeout_ms, config.retry.max_timeout_ms
        ));
    }

    if config.offers.qr_min_dimension == 0 {
        fail("offers.qr_min_dimension must be positive".to_string());
    }

    if config.chat.snapshot_limit < 1 {
        fail("chat.snapshot_limit must be at least 1".to_string());
    }

    if config.chat.event_capacity < 1 {
        fail("chat.event_capacity must be at least 1".to_string());
    }

    if config.auth.session_ttl_hours < 1 {
        fail("auth.session_ttl_hours must be at least 1".to_string());
    }

    if config.vault.kdf_memory_cost < 32768 {
        fail(format!(
            "vault.kdf_memory_cost must be at least 32768 (32 MiB), got {}",
            config.vault.kdf_memory_cost
        ));
    }

    if config.vault.kdf_iterations < 2 {
        fail(format!(
            "vault.kdf_iterations must be at least 2, got {}",
            config.vault.kdf_iterations
        ));
    }

    if config.vault.kdf_parallelism < 1 {
        fail(format!(
            "vault.kdf_parallelism must be at least 1, got {}",
            config.vault.kdf_parallelism
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &BarberBookConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.to_string())
            .collect()
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&BarberBookConfig::default()).is_ok());
    }

    #[test]
    fn inverted_retry_bounds_fail() {
        let mut config = BarberBookConfig::default();
        config.retry.min_timeout_ms = 10_000;
        let errs = messages(&config);
        assert_eq!(errs.len(), 1);
        assert!(errs[0].contains("retry.min_timeout_ms"));
    }

    #[test]
    fn all_failures_are_collected() {
        let mut config = BarberBookConfig::default();
        config.storage.database_path = "  ".to_string();
        config.retry.retries = 0;
        config.chat.snapshot_limit = 0;
        config.auth.session_ttl_hours = 0;
        config.app.log_level = "loud".to_string();

        let errs = messages(&config);
        assert_eq!(errs.len(), 5);
        assert!(errs.iter().any(|m| m.contains("database_path")));
        assert!(errs.iter().any(|m| m.contains("retry.retries")));
        assert!(errs.iter().any(|m| m.contains("snapshot_limit")));
        assert!(errs.iter().any(|m| m.contains("session_ttl_hours")));
        assert!(errs.iter().any(|m| m.contains("log_level")));
    }

    #[test]
    fn weak_kdf_parameters_fail() {
        let mut config = BarberBookConfig::default();
        config.vault.kdf_memory_cost = 1024;
        config.vault.kdf_iterations = 1;
        assert_eq!(messages(&config).len(), 2);
    }
}
