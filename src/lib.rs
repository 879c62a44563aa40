//! kubecompose library
//!
//! Discovers which custom resources own which inside a namespace and
//! synthesizes documentation for custom resource kinds. Used by the
//! `kubecompose` binary and by the integration tests.

pub mod cli;
pub mod composition;
pub mod config;
pub mod docs;
pub mod error;
pub mod kube;
pub mod services;

// Re-export commonly used types for convenience
pub use composition::{
    CatalogEntry, CompositionForest, CompositionNode, CompositionRegistry, GraphBuilder,
    NamespaceScope, OwnerLink, ResourceCatalog, ResourceRef,
};
pub use docs::DocumentationSource;
pub use error::DiscoveryError;
pub use services::DiscoveryService;
