//! Composition registry
//!
//! Holds the most recently built forest per namespace scope. Forests are
//! immutable once published; a rebuild swaps in a whole new map, so a reader
//! holding an `Arc<CompositionForest>` never sees a half-built tree and never
//! blocks a concurrent rebuild.

use crate::composition::builder::GraphBuilder;
use crate::composition::model::{CompositionForest, NamespaceScope};
use crate::error::DiscoveryError;
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

type ForestMap = HashMap<String, Arc<CompositionForest>>;

/// Thread-safe store of published composition forests
pub struct CompositionRegistry {
    forests: ArcSwap<ForestMap>,
    next_generation: AtomicU64,
}

impl CompositionRegistry {
    pub fn new() -> Self {
        Self {
            forests: ArcSwap::from_pointee(HashMap::new()),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Build a fresh forest for `scope` and publish it
    pub async fn rebuild(
        &self,
        builder: &GraphBuilder,
        scope: &NamespaceScope,
    ) -> Result<Arc<CompositionForest>, DiscoveryError> {
        let forest = builder.build(scope).await?;
        Ok(self.publish(forest))
    }

    /// Replace the stored forest for the forest's scope
    ///
    /// Concurrent publishes for the same scope resolve last-writer-wins.
    pub fn publish(&self, mut forest: CompositionForest) -> Arc<CompositionForest> {
        forest.generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let key = forest.scope.key().to_string();
        let forest = Arc::new(forest);

        self.forests.rcu(|current| {
            let mut next = ForestMap::clone(current);
            next.insert(key.clone(), Arc::clone(&forest));
            next
        });

        tracing::debug!(
            "Published composition forest generation {} for {}",
            forest.generation,
            forest.scope
        );

        forest
    }

    /// Latest forest for `scope`, or an empty forest if it was never built
    pub fn current(&self, scope: &NamespaceScope) -> Arc<CompositionForest> {
        self.forests
            .load()
            .get(scope.key())
            .cloned()
            .unwrap_or_else(|| Arc::new(CompositionForest::empty(scope.clone())))
    }

    /// Whether a forest has been published for `scope`
    pub fn is_built(&self, scope: &NamespaceScope) -> bool {
        self.forests.load().contains_key(scope.key())
    }

    /// Keys of every scope with a published forest, sorted
    pub fn built_scopes(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.forests.load().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl Default for CompositionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composition::builder::build_forest;
    use crate::composition::model::{CatalogEntry, ResourceRef};

    fn forest_with(namespace: &str, names: &[&str]) -> CompositionForest {
        let entries = names
            .iter()
            .map(|name| {
                CatalogEntry::root(ResourceRef::new(
                    "Postgres",
                    name,
                    namespace,
                    &format!("uid-{}", name),
                ))
            })
            .collect();
        build_forest(&NamespaceScope::Named(namespace.to_string()), entries)
    }

    #[test]
    fn test_current_is_empty_before_first_build() {
        let registry = CompositionRegistry::new();
        let scope = NamespaceScope::Named("default".to_string());

        let forest = registry.current(&scope);
        assert!(forest.is_empty());
        assert_eq!(forest.scope, scope);
        assert!(!registry.is_built(&scope));
    }

    #[test]
    fn test_publish_replaces_forest() {
        let registry = CompositionRegistry::new();
        let scope = NamespaceScope::Named("default".to_string());

        registry.publish(forest_with("default", &["pg1"]));
        let first = registry.current(&scope);
        registry.publish(forest_with("default", &["pg1", "pg2"]));
        let second = registry.current(&scope);

        // A reader holding the old snapshot keeps seeing it unchanged
        assert_eq!(first.node_count(), 1);
        assert_eq!(second.node_count(), 2);
        assert!(second.generation > first.generation);
    }

    #[test]
    fn test_scopes_are_independent() {
        let registry = CompositionRegistry::new();
        registry.publish(forest_with("team-a", &["a1"]));
        registry.publish(forest_with("team-b", &["b1", "b2"]));

        assert_eq!(
            registry
                .current(&NamespaceScope::Named("team-a".to_string()))
                .node_count(),
            1
        );
        assert_eq!(
            registry
                .current(&NamespaceScope::Named("team-b".to_string()))
                .node_count(),
            2
        );
        assert_eq!(registry.built_scopes(), vec!["team-a", "team-b"]);
    }
}
