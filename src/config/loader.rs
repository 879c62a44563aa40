//! Configuration loading
//!
//! Layers, lowest to highest precedence: built-in defaults, the root config
//! file, environment variable overrides.

use super::{paths, schema::Config};
use anyhow::{Context, Result};
use std::path::Path;

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with all layers applied
    pub fn load() -> Result<Config> {
        let path = paths::root_config_path();
        let config = if path.exists() {
            Self::load_file(&path)?
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Self::load_defaults()
        };

        Ok(Self::apply_env_overrides(config))
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the root config file, if present
    ///
    /// Fails on YAML syntax errors, invalid value types, and values that
    /// cannot work (zero timeout, zero indent).
    pub fn validate() -> Result<()> {
        let root_path = paths::root_config_path();
        if !root_path.exists() {
            return Ok(());
        }

        let config = Self::load_file(&root_path)?;
        Self::check(&config)
    }

    fn check(config: &Config) -> Result<()> {
        if config.catalog.timeout_seconds == 0 {
            anyhow::bail!("catalog.timeoutSeconds must be greater than 0");
        }
        if config.composition.indent == 0 {
            anyhow::bail!("composition.indent must be greater than 0");
        }
        if config.default_namespace.trim().is_empty() {
            anyhow::bail!("defaultNamespace must not be empty");
        }
        Ok(())
    }

    /// Load default configuration
    pub fn load_defaults() -> Config {
        Config::default()
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut config: Config) -> Config {
        // KUBECOMPOSE_DEFAULT_NAMESPACE override
        if let Ok(namespace) = std::env::var("KUBECOMPOSE_DEFAULT_NAMESPACE") {
            if !namespace.is_empty() {
                config.default_namespace = namespace;
            }
        }

        // KUBECOMPOSE_CATALOG_TIMEOUT override (seconds)
        if let Ok(timeout) = std::env::var("KUBECOMPOSE_CATALOG_TIMEOUT") {
            match timeout.parse::<u64>() {
                Ok(secs) if secs > 0 => config.catalog.timeout_seconds = secs,
                _ => tracing::warn!("Ignoring invalid KUBECOMPOSE_CATALOG_TIMEOUT: {}", timeout),
            }
        }

        config
    }

    /// Save configuration to a file
    pub fn save(config: &Config, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }

        let yaml =
            serde_yaml::to_string(config).context("Failed to serialize configuration to YAML")?;

        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Save root configuration
    pub fn save_root(config: &Config) -> Result<()> {
        Self::save(config, &paths::root_config_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert_eq!(config.default_namespace, "default");
        assert!(ConfigLoader::check(&config).is_ok());
    }

    #[test]
    fn test_save_and_load_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("config.yaml");

        let mut config = Config::default();
        config.default_namespace = "team-a".to_string();
        config.catalog.groups = vec!["moodlecontroller.kubeplus".to_string()];

        ConfigLoader::save(&config, &path).unwrap();
        let loaded = ConfigLoader::load_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_file_missing() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(ConfigLoader::load_file(&tmp.path().join("absent.yaml")).is_err());
    }

    #[test]
    fn test_check_rejects_zero_timeout() {
        let mut config = Config::default();
        config.catalog.timeout_seconds = 0;
        assert!(ConfigLoader::check(&config).is_err());
    }

    #[test]
    fn test_env_overrides() {
        // SAFETY: set_var is unsafe in Rust 2024 due to potential data races.
        // No other test reads these variables.
        unsafe {
            std::env::set_var("KUBECOMPOSE_DEFAULT_NAMESPACE", "from-env");
            std::env::set_var("KUBECOMPOSE_CATALOG_TIMEOUT", "4");
        }

        let config = ConfigLoader::apply_env_overrides(Config::default());

        assert_eq!(config.default_namespace, "from-env");
        assert_eq!(config.catalog.timeout_seconds, 4);

        // SAFETY: same as above
        unsafe {
            std::env::remove_var("KUBECOMPOSE_DEFAULT_NAMESPACE");
            std::env::remove_var("KUBECOMPOSE_CATALOG_TIMEOUT");
        }
    }
}
