//! Query engine over composition forests
//!
//! Lookups walk the forest depth-first, roots in stored order, which is the
//! same order the renderer uses.

use crate::composition::model::{CompositionForest, CompositionNode};

fn matches(node: &CompositionNode, kind: &str, instance: &str) -> bool {
    node.resource.kind == kind && (instance.is_empty() || node.resource.name == instance)
}

/// First node of `kind` named `instance` (any name when `instance` is empty)
///
/// Returns `None` when `kind` is empty or nothing matches.
pub fn query_node<'a>(
    forest: &'a CompositionForest,
    kind: &str,
    instance: &str,
) -> Option<&'a CompositionNode> {
    if kind.is_empty() {
        return None;
    }
    forest
        .walk()
        .map(|(_, node)| node)
        .find(|node| matches(node, kind, instance))
}

/// Subtrees rooted at matching nodes
///
/// With an instance name this is at most the first match; without one it is
/// every node of `kind`, in traversal order. A match nested under another
/// match appears both inside the outer subtree and on its own.
pub fn query_subtrees<'a>(
    forest: &'a CompositionForest,
    kind: &str,
    instance: &str,
) -> Vec<&'a CompositionNode> {
    if kind.is_empty() {
        return Vec::new();
    }
    if !instance.is_empty() {
        return query_node(forest, kind, instance).into_iter().collect();
    }
    forest
        .walk()
        .map(|(_, node)| node)
        .filter(|node| matches(node, kind, instance))
        .collect()
}
