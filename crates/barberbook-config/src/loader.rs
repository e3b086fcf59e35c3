// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Figment-based layered loading.
//!
//! Later layers override earlier ones:
//! defaults, `/etc/barberbook/barberbook.toml`,
//! `~/.config/barberbook/barberbook.toml`, `./barberbook.toml`, then
//! `BARBERBOOK_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::BarberBookConfig;
use crate::{CONFIG_FILE, SYSTEM_CONFIG_PATH};

/// Top-level sections that env var names are mapped onto.
const SECTIONS: &[&str] = &["app", "storage", "retry", "offers", "chat", "auth", "vault"];

pub(crate) fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("barberbook").join(CONFIG_FILE))
}

/// Full hierarchy, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(BarberBookConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(CONFIG_FILE))
        .merge(env_provider())
}

pub fn load_config() -> Result<BarberBookConfig, figment::Error> {
    build_figment().extract()
}

/// Defaults plus one inline document; no files, no env.
pub fn load_config_from_str(toml_content: &str) -> Result<BarberBookConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BarberBookConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Defaults, one explicit file, then env overrides.
pub fn load_config_from_path(path: &Path) -> Result<BarberBookConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(BarberBookConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Map `BARBERBOOK_CHAT_SNAPSHOT_LIMIT` to `chat.snapshot_limit`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// keys that themselves contain underscores survive intact.
pub(crate) fn env_provider() -> Env {
    Env::prefixed("BARBERBOOK_").map(|key| map_env_key(key.as_str()).into())
}

pub(crate) fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_keep_inner_underscores() {
        assert_eq!(map_env_key("chat_snapshot_limit"), "chat.snapshot_limit");
        assert_eq!(map_env_key("storage_database_path"), "storage.database_path");
        assert_eq!(map_env_key("retry_min_timeout_ms"), "retry.min_timeout_ms");
        assert_eq!(map_env_key("vault_key"), "vault.key");
        assert_eq!(map_env_key("unrelated"), "unrelated");
    }

    #[test]
    fn env_overrides_apply_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("BARBERBOOK_CHAT_SNAPSHOT_LIMIT", "42");
            jail.set_env("BARBERBOOK_APP_LOG_LEVEL", "debug");
            let config: BarberBookConfig = Figment::new()
                .merge(Serialized::defaults(BarberBookConfig::default()))
                .merge(env_provider())
                .extract()?;
            assert_eq!(config.chat.snapshot_limit, 42);
            assert_eq!(config.app.log_level, "debug");
            Ok(())
        });
    }

    #[test]
    fn local_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
[retry]
retries = 5
"#,
            )?;
            let config = load_config_from_path(Path::new(CONFIG_FILE))?;
            assert_eq!(config.retry.retries, 5);
            assert_eq!(config.retry.min_timeout_ms, 1000);
            Ok(())
        });
    }
}
