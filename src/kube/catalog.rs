//! Cluster-backed resource catalog
//!
//! Lists every instance of every namespaced CRD and reports its owner link.

use crate::composition::{CatalogEntry, NamespaceScope, ResourceCatalog, ResourceRef};
use crate::error::DiscoveryError;
use crate::kube::crd;
use async_trait::async_trait;
use futures::{StreamExt, stream};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use kube::api::{Api, ListParams};
use kube::core::{ApiResource, DynamicObject};
use kube::{Client, ResourceExt};

/// Number of CRD instance listings in flight at once
const LIST_CONCURRENCY: usize = 8;

/// [`ResourceCatalog`] reading custom resources from the Kubernetes API
#[derive(Clone)]
pub struct KubeCatalog {
    client: Client,
    groups: Vec<String>,
}

impl KubeCatalog {
    /// `groups` restricts the catalog to CRDs of those API groups; empty means all
    pub fn new(client: Client, groups: Vec<String>) -> Self {
        Self { client, groups }
    }

    fn wants_group(&self, group: &str) -> bool {
        self.groups.is_empty() || self.groups.iter().any(|g| g == group)
    }

    async fn list_instances(
        &self,
        api_resource: &ApiResource,
        scope: &NamespaceScope,
    ) -> Result<Vec<DynamicObject>, kube::Error> {
        let api: Api<DynamicObject> = match scope {
            NamespaceScope::Named(namespace) => {
                Api::namespaced_with(self.client.clone(), namespace, api_resource)
            }
            NamespaceScope::All => Api::all_with(self.client.clone(), api_resource),
        };
        Ok(api.list(&ListParams::default()).await?.items)
    }
}

#[async_trait]
impl ResourceCatalog for KubeCatalog {
    async fn fetch_catalog(
        &self,
        scope: &NamespaceScope,
    ) -> Result<Vec<CatalogEntry>, DiscoveryError> {
        let crds = crd::list_crds(&self.client)
            .await
            .map_err(|e| DiscoveryError::CatalogUnavailable(e.to_string()))?;

        let resources: Vec<ApiResource> = crds
            .iter()
            .filter(|c| crd::is_namespaced(c) && self.wants_group(&c.spec.group))
            .filter_map(crd::api_resource)
            .collect();

        tracing::debug!(
            "Cataloguing {} custom resource kinds in {}",
            resources.len(),
            scope
        );

        // buffered() keeps CRD-name order while listing concurrently
        let listings: Vec<(ApiResource, Result<Vec<DynamicObject>, kube::Error>)> =
            stream::iter(resources)
                .map(|ar| async move {
                    let listed = self.list_instances(&ar, scope).await;
                    (ar, listed)
                })
                .buffered(LIST_CONCURRENCY)
                .collect()
                .await;

        let mut entries = Vec::new();
        for (ar, listed) in listings {
            match listed {
                Ok(objects) => {
                    entries.extend(objects.iter().map(|obj| entry_from_object(&ar.kind, obj)))
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: failed to list instances: {}", ar.kind, e);
                }
            }
        }

        Ok(entries)
    }
}

/// Map a listed object to a catalog entry
///
/// List responses omit per-item type metadata, so the kind comes from the CRD.
pub fn entry_from_object(kind: &str, obj: &DynamicObject) -> CatalogEntry {
    let resource = ResourceRef::new(
        kind,
        &obj.name_any(),
        obj.namespace().as_deref().unwrap_or_default(),
        obj.uid().as_deref().unwrap_or_default(),
    );

    match owner_reference(obj.owner_references()) {
        Some(owner) => CatalogEntry::owned(resource, &owner.kind, &owner.uid),
        None => CatalogEntry::root(resource),
    }
}

/// The controller owner reference, else the first one
pub fn owner_reference(refs: &[OwnerReference]) -> Option<&OwnerReference> {
    refs.iter()
        .find(|r| r.controller == Some(true))
        .or_else(|| refs.first())
}
