//! Configuration system for kubecompose
//!
//! Layered YAML configuration: built-in defaults, an optional root config
//! file, and environment variable overrides.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{CatalogConfig, CompositionConfig, Config, DocsConfig};

/// Get a configuration value by key (dot notation)
pub fn get_config_value(config: &schema::Config, key: &str) -> anyhow::Result<String> {
    match key {
        "defaultNamespace" => Ok(config.default_namespace.clone()),
        "catalog.timeoutSeconds" => Ok(config.catalog.timeout_seconds.to_string()),
        "catalog.retries" => Ok(config.catalog.retries.to_string()),
        "catalog.groups" => Ok(config.catalog.groups.join(",")),
        "composition.minRebuildIntervalSeconds" => {
            Ok(config.composition.min_rebuild_interval_seconds.to_string())
        }
        "composition.indent" => Ok(config.composition.indent.to_string()),
        "docs.namespace" => Ok(config.docs.namespace.clone()),
        "docs.usageAnnotation" => Ok(config.docs.usage_annotation.clone()),
        "docs.implementationAnnotation" => Ok(config.docs.implementation_annotation.clone()),
        "docs.openApiAnnotation" => Ok(config.docs.open_api_annotation.clone()),
        _ => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }
}

/// Set a configuration value by key (dot notation)
pub fn set_config_value(config: &mut schema::Config, key: &str, value: &str) -> anyhow::Result<()> {
    use anyhow::Context;
    match key {
        "defaultNamespace" => {
            config.default_namespace = value.to_string();
        }
        "catalog.timeoutSeconds" => {
            config.catalog.timeout_seconds = value
                .parse()
                .context("catalog.timeoutSeconds must be a number")?;
        }
        "catalog.retries" => {
            config.catalog.retries = value.parse().context("catalog.retries must be a number")?;
        }
        "catalog.groups" => {
            // Comma-separated list format
            config.catalog.groups = value
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        "composition.minRebuildIntervalSeconds" => {
            config.composition.min_rebuild_interval_seconds = value
                .parse()
                .context("composition.minRebuildIntervalSeconds must be a number")?;
        }
        "composition.indent" => {
            config.composition.indent = value
                .parse()
                .context("composition.indent must be a number")?;
        }
        "docs.namespace" => {
            config.docs.namespace = value.to_string();
        }
        "docs.usageAnnotation" => {
            config.docs.usage_annotation = value.to_string();
        }
        "docs.implementationAnnotation" => {
            config.docs.implementation_annotation = value.to_string();
        }
        "docs.openApiAnnotation" => {
            config.docs.open_api_annotation = value.to_string();
        }
        _ => return Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
    }

    Ok(())
}
