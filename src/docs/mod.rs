//! Documentation synthesis for custom resource kinds
//!
//! Resolves schema excerpts from raw OpenAPI documents and assembles man pages
//! from usage guidance and implementation notes. Neither touches the
//! composition registry.

pub mod man_page;
pub mod schema;

use crate::error::DiscoveryError;
use async_trait::async_trait;

pub use man_page::{assemble, compose_man_page};
pub use schema::{parse_schema, resolve, split_type_path};

/// Source of raw documentation for custom resource kinds
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentationSource: Send + Sync {
    /// Raw OpenAPI document for `kind`, `None` if the kind has none
    async fn fetch_raw_schema(&self, kind: &str) -> Result<Option<Vec<u8>>, DiscoveryError>;

    /// Usage guidance for `kind` as published in `namespace`
    async fn fetch_usage_text(
        &self,
        kind: &str,
        namespace: &str,
    ) -> Result<Option<String>, DiscoveryError>;

    /// Implementation notes for `kind`
    async fn fetch_implementation_text(&self, kind: &str)
    -> Result<Option<String>, DiscoveryError>;
}
