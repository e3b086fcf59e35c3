// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

use barberbook_config::diagnostic::ConfigError;
use barberbook_config::model::BarberBookConfig;
use barberbook_config::{load_and_validate_str, load_config_from_str};

#[test]
fn full_document_deserializes() {
    let toml = r#"
[app]
name = "shopfront"
log_level = "debug"

[storage]
database_path = "/tmp/bb.db"
wal_mode = false

[retry]
retries = 4
min_timeout_ms = 200
max_timeout_ms = 800

[offers]
qr_min_dimension = 256

[chat]
snapshot_limit = 100
event_capacity = 64

[auth]
session_ttl_hours = 24
require_verified_email = false

[vault]
kdf_memory_cost = 32768
kdf_iterations = 2
kdf_parallelism = 1
"#;

    let config = load_and_validate_str(toml).expect("valid config");
    assert_eq!(config.app.name, "shopfront");
    assert_eq!(config.storage.database_path, "/tmp/bb.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.offers.qr_min_dimension, 256);
    assert_eq!(config.chat.snapshot_limit, 100);
    assert_eq!(config.chat.event_capacity, 64);
    assert_eq!(config.auth.session_ttl_hours, 24);
    assert!(!config.auth.require_verified_email);

    let policy = config.retry.policy();
    assert_eq!(policy.retries, 4);
    assert_eq!(policy.min_timeout, Duration::from_millis(200));
    assert_eq!(policy.max_timeout, Duration::from_millis(800));
}

#[test]
fn empty_document_uses_defaults() {
    let config = load_config_from_str("").expect("defaults");
    assert_eq!(config.app.name, "barberbook");
    assert_eq!(config.app.log_level, "info");
    assert_eq!(config.retry.retries, 3);
    assert_eq!(config.retry.min_timeout_ms, 1000);
    assert_eq!(config.retry.max_timeout_ms, 5000);
    assert_eq!(config.offers.qr_min_dimension, 400);
    assert_eq!(config.chat.snapshot_limit, 500);
    assert_eq!(config.auth.session_ttl_hours, 720);
    assert!(config.auth.require_verified_email);
    assert!(config.storage.database_path.ends_with("barberbook.db"));
}

#[test]
fn unknown_key_gets_suggestion() {
    let toml = r#"
[chat]
snapshot_limt = 10
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { key, suggestion: Some(s), .. }
            if key == "snapshot_limt" && s == "snapshot_limit"
    )));
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let toml = r#"
[payments]
enabled = true
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::UnknownKey { key, .. } if key == "payments"))
    );
}

#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[retry]
retries = "three"
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(!errors.is_empty());
    assert!(errors.iter().any(|e| e.to_string().contains("retries")));
}

#[test]
fn semantic_errors_surface_through_loader() {
    let toml = r#"
[retry]
retries = 0
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains("retry.retries")))
    );
}

#[test]
fn defaults_serialize_to_toml() {
    let rendered = toml::to_string(&BarberBookConfig::default()).expect("serializable");
    assert!(rendered.contains("[retry]"));
    assert!(rendered.contains("snapshot_limit = 500"));
}
