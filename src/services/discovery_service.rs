//! Discovery service
//!
//! Front door for composition queries, schema excerpts and man pages. Holds
//! the graph builder, the composition registry and the documentation source,
//! and turns every expected "nothing to show" outcome into explanatory text.
//! Only an unreachable catalog is returned as an error.

use crate::composition::render::DEFAULT_INDENT;
use crate::composition::{
    CompositionForest, CompositionRegistry, GraphBuilder, NamespaceScope, describe, query_node,
    query_subtrees, render_json, render_with_indent,
};
use crate::docs::{DocumentationSource, assemble, parse_schema, resolve, split_type_path};
use crate::error::DiscoveryError;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Namespace used when a caller supplies none
pub const DEFAULT_NAMESPACE: &str = "default";

/// Service answering composition and documentation queries
pub struct DiscoveryService {
    builder: GraphBuilder,
    registry: Arc<CompositionRegistry>,
    docs: Arc<dyn DocumentationSource>,
    default_namespace: String,
    indent: usize,
    min_rebuild_interval: Duration,
}

impl DiscoveryService {
    pub fn new(
        builder: GraphBuilder,
        registry: Arc<CompositionRegistry>,
        docs: Arc<dyn DocumentationSource>,
    ) -> Self {
        Self {
            builder,
            registry,
            docs,
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            indent: DEFAULT_INDENT,
            min_rebuild_interval: Duration::ZERO,
        }
    }

    pub fn with_default_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.default_namespace = namespace.into();
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Forests younger than `interval` are reused by [`Self::ensure_fresh`]
    pub fn with_min_rebuild_interval(mut self, interval: Duration) -> Self {
        self.min_rebuild_interval = interval;
        self
    }

    pub fn registry(&self) -> &Arc<CompositionRegistry> {
        &self.registry
    }

    /// Scope for a caller-supplied namespace, applying the fallback for ""
    pub fn scope(&self, namespace: &str) -> NamespaceScope {
        if namespace.is_empty() {
            NamespaceScope::Named(self.default_namespace.clone())
        } else {
            NamespaceScope::Named(namespace.to_string())
        }
    }

    /// Make sure `scope` has a recent forest, rebuilding if needed
    pub async fn ensure_fresh(
        &self,
        scope: &NamespaceScope,
    ) -> Result<Arc<CompositionForest>, DiscoveryError> {
        if self.registry.is_built(scope) && !self.min_rebuild_interval.is_zero() {
            let current = self.registry.current(scope);
            let age = (Utc::now() - current.built_at)
                .to_std()
                .unwrap_or(Duration::ZERO);
            if age < self.min_rebuild_interval {
                tracing::debug!(
                    "Reusing forest generation {} for {} (age {:?})",
                    current.generation,
                    scope,
                    age
                );
                return Ok(current);
            }
        }

        self.registry.rebuild(&self.builder, scope).await
    }

    /// Rebuild the forest for `namespace`, then render every subtree matching the query
    pub async fn build_and_query(
        &self,
        kind: &str,
        instance: &str,
        namespace: &str,
    ) -> Result<String, DiscoveryError> {
        self.build_and_query_in(kind, instance, &self.scope(namespace))
            .await
    }

    pub async fn build_and_query_in(
        &self,
        kind: &str,
        instance: &str,
        scope: &NamespaceScope,
    ) -> Result<String, DiscoveryError> {
        let forest = self.registry.rebuild(&self.builder, scope).await?;
        let matches = query_subtrees(&forest, kind, instance);
        if matches.is_empty() {
            return Ok(not_found(kind, instance, scope).to_string());
        }
        Ok(render_with_indent(&matches, self.indent))
    }

    /// Same as [`Self::build_and_query`], rendered as a JSON array
    ///
    /// No match yields `[]`.
    pub async fn build_and_query_json(
        &self,
        kind: &str,
        instance: &str,
        namespace: &str,
    ) -> Result<String, DiscoveryError> {
        self.build_and_query_json_in(kind, instance, &self.scope(namespace))
            .await
    }

    pub async fn build_and_query_json_in(
        &self,
        kind: &str,
        instance: &str,
        scope: &NamespaceScope,
    ) -> Result<String, DiscoveryError> {
        let forest = self.registry.rebuild(&self.builder, scope).await?;
        let matches = query_subtrees(&forest, kind, instance);
        Ok(render_json(&matches).unwrap_or_else(|e| {
            tracing::warn!("Failed to serialize composition for {}: {}", kind, e);
            "[]".to_string()
        }))
    }

    /// Describe the first matching node of the published forest without rebuilding
    pub fn query_resource_info(&self, kind: &str, instance: &str, namespace: &str) -> String {
        self.query_resource_info_in(kind, instance, &self.scope(namespace))
    }

    pub fn query_resource_info_in(
        &self,
        kind: &str,
        instance: &str,
        scope: &NamespaceScope,
    ) -> String {
        let forest = self.registry.current(scope);
        match query_node(&forest, kind, instance) {
            Some(node) => describe(node),
            None => not_found(kind, instance, scope).to_string(),
        }
    }

    /// Schema excerpt for `dotted_path` from the schema document of `kind`
    ///
    /// The definition is selected by the first segment of `dotted_path`. An
    /// empty `kind` means the document of that same first segment, so
    /// `explain("", "Postgres.PostgresSpec.UserSpec")` reads the Postgres schema.
    pub async fn explain(&self, kind: &str, dotted_path: &str) -> String {
        let (first, _) = split_type_path(dotted_path);
        let kind = if kind.is_empty() { first } else { kind };
        if kind.is_empty() || first.is_empty() {
            return "No custom resource kind given to explain.".to_string();
        }

        let raw = match self.docs.fetch_raw_schema(kind).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                return format!("No schema available for custom resource kind '{}'.", kind);
            }
            Err(e) => {
                tracing::warn!("Failed to fetch schema for {}: {}", kind, e);
                return format!("Schema for '{}' could not be retrieved: {}", kind, e);
            }
        };

        match parse_schema(&raw).and_then(|document| resolve(&document, dotted_path)) {
            Ok(excerpt) => excerpt,
            Err(DiscoveryError::DefinitionNotFound(key)) => {
                tracing::debug!("Schema for {} has no definition {}", kind, key);
                format!("No schema available for custom resource kind '{}'.", kind)
            }
            Err(e) => {
                tracing::warn!("Unusable schema for {}: {}", kind, e);
                e.to_string()
            }
        }
    }

    /// Usage guidance and implementation notes for `kind`
    pub async fn man_page(&self, kind: &str, namespace: &str) -> String {
        let namespace = if namespace.is_empty() {
            self.default_namespace.as_str()
        } else {
            namespace
        };
        assemble(self.docs.as_ref(), kind, namespace).await
    }
}

fn not_found(kind: &str, instance: &str, scope: &NamespaceScope) -> DiscoveryError {
    DiscoveryError::NotFound {
        kind: kind.to_string(),
        instance: instance.to_string(),
        namespace: scope.to_string(),
    }
}
