//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Config file (repolens.toml, when present)
//! 3. Environment variables (REPOLENS_* prefix, `__` between section and
//!    field so snake_case field names survive the mapping)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::Path;
use tracing::debug;

use super::types::Config;
use crate::types::{RepoLensError, Result};

/// Default config file name, resolved against the working directory
const CONFIG_FILE: &str = "repolens.toml";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → repolens.toml → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let file = Path::new(CONFIG_FILE);
        if file.exists() {
            debug!("Loading config from: {}", file.display());
            figment = figment.merge(Toml::file(file));
        }

        // e.g. REPOLENS_SELECTOR__MAX_SELECT -> selector.max_select; a
        // single-underscore split would shred snake_case field names
        figment = figment.merge(Env::prefixed("REPOLENS_").split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| RepoLensError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| RepoLensError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                r#"
                [selector]
                max_select = 30

                [llm]
                model = "claude-haiku-4"
                "#,
            )?;
            let config = ConfigLoader::load_from_file(Path::new("custom.toml"))
                .expect("config should load");
            assert_eq!(config.selector.max_select, 30);
            assert_eq!(config.llm.model, "claude-haiku-4");
            // untouched sections keep defaults
            assert_eq!(config.selector.min_select, 10);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_file_values_fail_validation() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "bad.toml",
                r#"
                [retry]
                max_attempts = 0
                "#,
            )?;
            assert!(ConfigLoader::load_from_file(Path::new("bad.toml")).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("REPOLENS_GITHUB__TIMEOUT_SECS", "45");
            let config = ConfigLoader::load().expect("config should load");
            assert_eq!(config.github.timeout_secs, 45);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_snake_case_fields() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("REPOLENS_SELECTOR__MAX_SELECT", "25");
            jail.set_env("REPOLENS_RETRY__MAX_ATTEMPTS", "5");
            jail.set_env("REPOLENS_LLM__MODEL", "claude-haiku-4");
            let config = ConfigLoader::load().expect("config should load");
            assert_eq!(config.selector.max_select, 25);
            assert_eq!(config.retry.max_attempts, 5);
            assert_eq!(config.llm.model, "claude-haiku-4");
            Ok(())
        });
    }
}
