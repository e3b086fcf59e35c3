// SPDX-FileCopyrightText: 2026 BarberBook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for BarberBook.
//!
//! TOML files are merged over compiled defaults, then `BARBERBOOK_*`
//! environment variables are applied. Unknown keys are rejected and reported
//! as miette diagnostics with typo suggestions.
//!
//! ```no_run
//! use barberbook_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("database: {}", config.storage.database_path);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::BarberBookConfig;

const CONFIG_FILE: &str = "barberbook.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/barberbook/barberbook.toml";

/// Load from the standard file hierarchy and validate.
pub fn load_and_validate() -> Result<BarberBookConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(
            err,
            &collect_toml_sources(),
        )),
    }
}

/// Load a specific file (plus env overrides) and validate.
pub fn load_and_validate_path(path: &std::path::Path) -> Result<BarberBookConfig, Vec<ConfigError>> {
    match loader::load_config_from_path(path) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = std::fs::read_to_string(path)
                .map(|content| vec![(path.display().to_string(), content)])
                .unwrap_or_default();
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Load an inline TOML document and validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<BarberBookConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => {
            let sources = vec![("<inline>".to_string(), toml_content.to_string())];
            Err(diagnostic::figment_to_config_errors(err, &sources))
        }
    }
}

/// Read every config file that exists so diagnostics can point into it.
fn collect_toml_sources() -> Vec<(String, String)> {
    let mut sources = Vec::new();

    if let Ok(content) = std::fs::read_to_string(CONFIG_FILE) {
        let path = std::env::current_dir()
            .map(|d| d.join(CONFIG_FILE).display().to_string())
            .unwrap_or_else(|_| CONFIG_FILE.to_string());
        sources.push((path, content));
    }

    if let Some(path) = loader::user_config_path()
        && let Ok(content) = std::fs::read_to_string(&path)
    {
        sources.push((path.display().to_string(), content));
    }

    if let Ok(content) = std::fs::read_to_string(SYSTEM_CONFIG_PATH) {
        sources.push((SYSTEM_CONFIG_PATH.to_string(), content));
    }

    sources
}
