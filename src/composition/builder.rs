//! Graph builder for composition forests
//!
//! Turns a flat, unordered catalog listing into a forest of ownership trees.
//! Every catalog entry ends up in exactly one tree: entries whose owner does
//! not resolve become orphan roots, and owner-link cycles are broken by
//! dropping one owner link per cycle.

use crate::composition::model::{
    BuildStats, CatalogEntry, CompositionForest, CompositionNode, NamespaceScope,
};
use crate::error::DiscoveryError;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

/// Default bound on a single catalog fetch
pub const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(10);

/// Default number of extra attempts after a failed catalog fetch
pub const DEFAULT_CATALOG_RETRIES: u32 = 2;

/// Read access to the resources currently in the cluster
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceCatalog: Send + Sync {
    /// List every custom resource in `scope` together with its owner link
    async fn fetch_catalog(
        &self,
        scope: &NamespaceScope,
    ) -> Result<Vec<CatalogEntry>, DiscoveryError>;
}

/// Builds composition forests from a [`ResourceCatalog`]
#[derive(Clone)]
pub struct GraphBuilder {
    catalog: Arc<dyn ResourceCatalog>,
    timeout: Duration,
    retries: u32,
}

impl GraphBuilder {
    pub fn new(catalog: Arc<dyn ResourceCatalog>) -> Self {
        Self {
            catalog,
            timeout: DEFAULT_CATALOG_TIMEOUT,
            retries: DEFAULT_CATALOG_RETRIES,
        }
    }

    /// Bound each catalog fetch attempt
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Number of extra attempts after a failed fetch
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Fetch the catalog for `scope` and build its forest
    pub async fn build(&self, scope: &NamespaceScope) -> Result<CompositionForest, DiscoveryError> {
        let entries = self.fetch_with_retry(scope).await?;
        let forest = build_forest(scope, entries);

        tracing::info!(
            "Built composition forest for {}: {} roots, {} nodes",
            scope,
            forest.roots.len(),
            forest.node_count()
        );

        Ok(forest)
    }

    async fn fetch_with_retry(
        &self,
        scope: &NamespaceScope,
    ) -> Result<Vec<CatalogEntry>, DiscoveryError> {
        let attempts = self.retries.saturating_add(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match tokio::time::timeout(self.timeout, self.catalog.fetch_catalog(scope)).await {
                Ok(Ok(entries)) => {
                    tracing::debug!(
                        "Fetched {} catalog entries for {} (attempt {})",
                        entries.len(),
                        scope,
                        attempt
                    );
                    return Ok(entries);
                }
                Ok(Err(e)) => {
                    tracing::warn!(
                        "Catalog fetch for {} failed (attempt {}/{}): {}",
                        scope,
                        attempt,
                        attempts,
                        e
                    );
                    if e.is_benign() {
                        return Err(e);
                    }
                    last_error = Some(e);
                }
                Err(_) => {
                    tracing::warn!(
                        "Catalog fetch for {} timed out after {:?} (attempt {}/{})",
                        scope,
                        self.timeout,
                        attempt,
                        attempts
                    );
                    last_error = Some(DiscoveryError::CatalogUnavailable(format!(
                        "timed out after {:?}",
                        self.timeout
                    )));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DiscoveryError::CatalogUnavailable("no fetch attempted".to_string())
        }))
    }
}

/// Build a forest from a catalog listing
///
/// Roots and children keep the order in which they appear in `entries`, so
/// the same listing always produces the same forest.
pub fn build_forest(scope: &NamespaceScope, entries: Vec<CatalogEntry>) -> CompositionForest {
    let mut stats = BuildStats {
        entries: entries.len(),
        ..Default::default()
    };

    // Index by uid, first occurrence wins
    let mut index: HashMap<String, usize> = HashMap::with_capacity(entries.len());
    let mut kept: Vec<CatalogEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !scope.contains(&entry.resource.namespace) {
            tracing::debug!(
                "Dropping {} from namespace '{}' outside {}",
                entry.resource,
                entry.resource.namespace,
                scope
            );
            stats.foreign_dropped += 1;
            continue;
        }
        if index.contains_key(&entry.resource.uid) {
            tracing::warn!(
                "Dropping {} with duplicate uid {}",
                entry.resource,
                entry.resource.uid
            );
            stats.duplicates_dropped += 1;
            continue;
        }
        index.insert(entry.resource.uid.clone(), kept.len());
        kept.push(entry);
    }

    let mut parent: Vec<Option<usize>> = Vec::with_capacity(kept.len());
    for entry in &kept {
        let owner = match &entry.owner {
            Some(link) => {
                let resolved = index.get(&link.owner_uid).copied();
                if resolved.is_none() {
                    tracing::debug!(
                        "Owner {} ({}) of {} not in catalog, treating as root",
                        link.owner_kind,
                        link.owner_uid,
                        entry.resource
                    );
                    stats.orphans += 1;
                }
                resolved
            }
            None => None,
        };
        parent.push(owner);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); kept.len()];
    for (idx, owner) in parent.iter().enumerate() {
        if let Some(owner) = owner {
            children[*owner].push(idx);
        }
    }

    let mut placed = vec![false; kept.len()];
    for idx in 0..kept.len() {
        if parent[idx].is_none() {
            mark_reachable(idx, &children, &mut placed);
        }
    }

    // Anything not reachable from a root hangs off an owner-link cycle
    for idx in 0..kept.len() {
        if placed[idx] {
            continue;
        }
        let entry_point = find_cycle_entry(idx, &parent);
        if let Some(owner) = parent[entry_point].take() {
            children[owner].retain(|&child| child != entry_point);
            tracing::warn!(
                "Owner-link cycle detected: dropping link from {} to {}, promoting it to root",
                kept[entry_point].resource,
                kept[owner].resource
            );
        }
        kept[entry_point].owner = None;
        stats.cycles_broken += 1;
        mark_reachable(entry_point, &children, &mut placed);
    }

    let mut slots: Vec<Option<CatalogEntry>> = kept.into_iter().map(Some).collect();
    let roots = (0..slots.len())
        .filter(|&idx| parent[idx].is_none())
        .filter_map(|idx| attach(idx, &children, &mut slots))
        .collect();

    CompositionForest {
        scope: scope.clone(),
        roots,
        generation: 0,
        built_at: Utc::now(),
        stats,
    }
}

fn mark_reachable(start: usize, children: &[Vec<usize>], placed: &mut [bool]) {
    let mut stack = vec![start];
    while let Some(idx) = stack.pop() {
        if placed[idx] {
            continue;
        }
        placed[idx] = true;
        stack.extend(children[idx].iter().copied());
    }
}

/// Climb owner links from `start` until a node repeats; that node closes the cycle
fn find_cycle_entry(start: usize, parent: &[Option<usize>]) -> usize {
    let mut on_path = HashSet::new();
    let mut current = start;
    loop {
        on_path.insert(current);
        match parent[current] {
            Some(owner) if on_path.contains(&owner) => return owner,
            Some(owner) => current = owner,
            None => return current,
        }
    }
}

/// Materialize the subtree at `root`; a slot is consumed once, so no node is attached twice
///
/// Nodes are built bottom-up from a pre-order listing, so chain depth does
/// not grow the call stack.
fn attach(
    root: usize,
    children: &[Vec<usize>],
    slots: &mut [Option<CatalogEntry>],
) -> Option<CompositionNode> {
    let mut order = Vec::new();
    let mut stack = vec![root];
    while let Some(idx) = stack.pop() {
        if slots[idx].is_none() {
            continue;
        }
        order.push(idx);
        stack.extend(children[idx].iter().rev().copied());
    }

    let mut built: HashMap<usize, CompositionNode> = HashMap::with_capacity(order.len());
    for &idx in order.iter().rev() {
        let Some(entry) = slots[idx].take() else {
            continue;
        };
        let nested = children[idx]
            .iter()
            .filter_map(|child| built.remove(child))
            .collect();
        built.insert(
            idx,
            CompositionNode {
                resource: entry.resource,
                owner: entry.owner,
                children: nested,
            },
        );
    }

    built.remove(&root)
}
