//! Configuration schema definitions
//!
//! Defines the structure of configuration files using serde for serialization.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Namespace used when a query names none
    #[serde(default = "default_namespace")]
    pub default_namespace: String,

    /// Resource catalog configuration
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Composition building and rendering
    #[serde(default)]
    pub composition: CompositionConfig,

    /// Documentation lookup
    #[serde(default)]
    pub docs: DocsConfig,
}

/// Resource catalog configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogConfig {
    /// Upper bound for one catalog fetch
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Extra attempts after a failed fetch
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// API groups to catalog; empty means every group
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,
}

/// Composition building and rendering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompositionConfig {
    /// A forest younger than this is reused instead of rebuilt (0 = always rebuild)
    #[serde(default)]
    pub min_rebuild_interval_seconds: u64,

    /// Spaces per depth level in text output
    #[serde(default = "default_indent")]
    pub indent: usize,
}

/// Documentation lookup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocsConfig {
    /// Namespace holding kind-level ConfigMaps (schemas, implementation notes)
    #[serde(default = "default_docs_namespace")]
    pub namespace: String,

    /// CRD annotation naming the usage ConfigMap (`<configmap>.<key>`)
    #[serde(default = "default_usage_annotation")]
    pub usage_annotation: String,

    /// CRD annotation naming the implementation notes ConfigMap
    #[serde(default = "default_implementation_annotation")]
    pub implementation_annotation: String,

    /// CRD annotation naming the OpenAPI document ConfigMap
    #[serde(default = "default_openapi_annotation")]
    pub open_api_annotation: String,
}

impl CatalogConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl CompositionConfig {
    pub fn min_rebuild_interval(&self) -> Duration {
        Duration::from_secs(self.min_rebuild_interval_seconds)
    }
}

// Default value functions
fn default_namespace() -> String {
    "default".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_retries() -> u32 {
    2
}

fn default_indent() -> usize {
    2
}

fn default_docs_namespace() -> String {
    "default".to_string()
}

fn default_usage_annotation() -> String {
    "platform-as-code/usage".to_string()
}

fn default_implementation_annotation() -> String {
    "platform-as-code/implementation_choices".to_string()
}

fn default_openapi_annotation() -> String {
    "platform-as-code/openapispec".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_namespace: default_namespace(),
            catalog: CatalogConfig::default(),
            composition: CompositionConfig::default(),
            docs: DocsConfig::default(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
            retries: default_retries(),
            groups: Vec::new(),
        }
    }
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            min_rebuild_interval_seconds: 0,
            indent: default_indent(),
        }
    }
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            namespace: default_docs_namespace(),
            usage_annotation: default_usage_annotation(),
            implementation_annotation: default_implementation_annotation(),
            open_api_annotation: default_openapi_annotation(),
        }
    }
}
