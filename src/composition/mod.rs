//! Composition discovery
//!
//! Reconstructs which custom resources own which, one forest per namespace:
//! - `builder` turns a catalog listing into a forest
//! - `registry` publishes the latest forest per namespace
//! - `query` finds nodes and subtrees by kind and instance
//! - `render` turns matches into text

pub mod builder;
pub mod model;
pub mod query;
pub mod registry;
pub mod render;

pub use builder::{GraphBuilder, ResourceCatalog, build_forest};
pub use model::{
    BuildStats, CatalogEntry, CompositionForest, CompositionNode, NamespaceScope, OwnerLink,
    ResourceRef,
};
pub use query::{query_node, query_subtrees};
pub use registry::CompositionRegistry;
pub use render::{describe, render, render_json, render_with_indent};
