//! Data structures for composition trees

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Identifies one cluster object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ResourceRef {
    pub kind: String,
    pub name: String,
    pub namespace: String,
    pub uid: String,
}

impl ResourceRef {
    pub fn new(kind: &str, name: &str, namespace: &str, uid: &str) -> Self {
        Self {
            kind: kind.to_string(),
            name: name.to_string(),
            namespace: namespace.to_string(),
            uid: uid.to_string(),
        }
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.name)
    }
}

/// Names the object that logically contains a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerLink {
    pub owner_uid: String,
    pub owner_kind: String,
}

/// One row of a catalog listing: a resource and its declared owner, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub resource: ResourceRef,
    pub owner: Option<OwnerLink>,
}

impl CatalogEntry {
    /// A resource without an owner link
    pub fn root(resource: ResourceRef) -> Self {
        Self {
            resource,
            owner: None,
        }
    }

    /// A resource owned by the object with `owner_uid`
    pub fn owned(resource: ResourceRef, owner_kind: &str, owner_uid: &str) -> Self {
        Self {
            resource,
            owner: Some(OwnerLink {
                owner_uid: owner_uid.to_string(),
                owner_kind: owner_kind.to_string(),
            }),
        }
    }
}

/// Which namespace(s) a forest covers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NamespaceScope {
    Named(String),
    All,
}

impl NamespaceScope {
    /// Registry key for this scope
    pub fn key(&self) -> &str {
        match self {
            NamespaceScope::Named(ns) => ns,
            NamespaceScope::All => "*",
        }
    }

    /// Whether a resource in `namespace` belongs to this scope
    pub fn contains(&self, namespace: &str) -> bool {
        match self {
            NamespaceScope::Named(ns) => ns == namespace,
            NamespaceScope::All => true,
        }
    }
}

impl fmt::Display for NamespaceScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamespaceScope::Named(ns) => write!(f, "{}", ns),
            NamespaceScope::All => write!(f, "all namespaces"),
        }
    }
}

/// A resource and the resources it owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionNode {
    #[serde(flatten)]
    pub resource: ResourceRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerLink>,
    pub children: Vec<CompositionNode>,
}

impl CompositionNode {
    /// Number of nodes in this subtree, including this one
    pub fn subtree_size(&self) -> usize {
        self.walk().count()
    }

    /// Depth-first pre-order walk over this subtree, yielding `(depth, node)`
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }
}

// Unlinks descendants onto a heap stack so deep chains drop without recursion
impl Drop for CompositionNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Pre-order iterator returned by [`CompositionNode::walk`]
pub struct Walk<'a> {
    stack: Vec<(usize, &'a CompositionNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a CompositionNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        // Reverse so the first child is visited next
        for child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}

/// Counters describing what a build had to correct
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Catalog entries seen
    pub entries: usize,
    /// Entries whose owner uid did not resolve and became roots
    pub orphans: usize,
    /// Owner-link cycles broken by demoting a node to root
    pub cycles_broken: usize,
    /// Later entries that repeated an already-seen uid
    pub duplicates_dropped: usize,
    /// Entries outside the forest's namespace
    pub foreign_dropped: usize,
}

/// An ordered set of composition trees for one namespace scope
#[derive(Debug, Clone)]
pub struct CompositionForest {
    pub scope: NamespaceScope,
    pub roots: Vec<CompositionNode>,
    pub generation: u64,
    pub built_at: DateTime<Utc>,
    pub stats: BuildStats,
}

impl CompositionForest {
    /// A forest that has never been built
    pub fn empty(scope: NamespaceScope) -> Self {
        Self {
            scope,
            roots: Vec::new(),
            generation: 0,
            built_at: DateTime::<Utc>::default(),
            stats: BuildStats::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Total number of nodes across all trees
    pub fn node_count(&self) -> usize {
        self.roots.iter().map(CompositionNode::subtree_size).sum()
    }

    /// Depth-first pre-order walk over every tree, roots in stored order
    pub fn walk(&self) -> impl Iterator<Item = (usize, &CompositionNode)> {
        self.roots.iter().flat_map(CompositionNode::walk)
    }
}
