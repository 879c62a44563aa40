//! Cluster-backed documentation source
//!
//! Kind documentation lives in ConfigMaps referenced from CRD annotations.
//! An annotation value `postgres-usage.usage.txt` names ConfigMap
//! `postgres-usage` and data key `usage.txt`; the value is split at the
//! first dot.

use crate::config::DocsConfig;
use crate::docs::DocumentationSource;
use crate::docs::schema::definition_key;
use crate::error::DiscoveryError;
use crate::kube::crd;
use async_trait::async_trait;
use k8s_openapi::api::core::v1::ConfigMap;
use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::CustomResourceDefinition;
use kube::api::Api;
use kube::{Client, ResourceExt};

/// [`DocumentationSource`] reading CRD annotations and ConfigMaps
#[derive(Clone)]
pub struct KubeDocumentation {
    client: Client,
    docs: DocsConfig,
}

/// ConfigMap name and data key referenced by an annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigMapRef {
    pub name: String,
    pub key: String,
}

/// Parse an annotation value of the form `<configmap>.<key>`
pub fn parse_configmap_ref(value: &str) -> Option<ConfigMapRef> {
    let (name, key) = value.trim().split_once('.')?;
    if name.is_empty() || key.is_empty() {
        return None;
    }
    Some(ConfigMapRef {
        name: name.to_string(),
        key: key.to_string(),
    })
}

/// Wrap a CRD's OpenAPI schema in a document `resolve` understands
pub fn wrap_crd_schema(kind: &str, schema: serde_json::Value) -> serde_json::Value {
    let mut definitions = serde_json::Map::new();
    definitions.insert(definition_key(kind), schema);
    serde_json::json!({ "definitions": definitions })
}

fn unavailable(e: kube::Error) -> DiscoveryError {
    DiscoveryError::CatalogUnavailable(e.to_string())
}

impl KubeDocumentation {
    pub fn new(client: Client, docs: DocsConfig) -> Self {
        Self { client, docs }
    }

    async fn crd_for(
        &self,
        kind: &str,
    ) -> Result<Option<CustomResourceDefinition>, DiscoveryError> {
        let found = crd::find_crd(&self.client, kind)
            .await
            .map_err(unavailable)?;
        if found.is_none() {
            tracing::debug!("No CRD defines kind {}", kind);
        }
        Ok(found)
    }

    /// Annotation value on `crd`, parsed as a ConfigMap reference
    fn annotated_ref(
        &self,
        crd: &CustomResourceDefinition,
        annotation: &str,
    ) -> Option<ConfigMapRef> {
        let value = crd.annotations().get(annotation)?;
        let parsed = parse_configmap_ref(value);
        if parsed.is_none() {
            tracing::warn!(
                "Ignoring malformed {} annotation on {}: {}",
                annotation,
                crd.name_any(),
                value
            );
        }
        parsed
    }

    async fn read_configmap(
        &self,
        reference: &ConfigMapRef,
        namespace: &str,
    ) -> Result<Option<String>, DiscoveryError> {
        let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
        let Some(cm) = api.get_opt(&reference.name).await.map_err(unavailable)? else {
            tracing::debug!("ConfigMap {}/{} not found", namespace, reference.name);
            return Ok(None);
        };

        Ok(cm.data.and_then(|mut data| data.remove(&reference.key)))
    }

    async fn annotated_text(
        &self,
        kind: &str,
        annotation: &str,
        namespace: &str,
    ) -> Result<Option<String>, DiscoveryError> {
        let Some(crd) = self.crd_for(kind).await? else {
            return Ok(None);
        };
        match self.annotated_ref(&crd, annotation) {
            Some(reference) => self.read_configmap(&reference, namespace).await,
            None => Ok(None),
        }
    }
}

#[async_trait]
impl DocumentationSource for KubeDocumentation {
    async fn fetch_raw_schema(&self, kind: &str) -> Result<Option<Vec<u8>>, DiscoveryError> {
        let Some(crd) = self.crd_for(kind).await? else {
            return Ok(None);
        };

        if let Some(reference) = self.annotated_ref(&crd, &self.docs.open_api_annotation) {
            let text = self
                .read_configmap(&reference, &self.docs.namespace)
                .await?;
            return Ok(text.map(String::into_bytes));
        }

        // No published document; fall back to the CRD's own schema
        let Some(schema) = crd::openapi_schema(&crd) else {
            return Ok(None);
        };
        let document = wrap_crd_schema(kind, schema);
        serde_json::to_vec(&document)
            .map(Some)
            .map_err(|e| DiscoveryError::SchemaMalformed(e.to_string()))
    }

    async fn fetch_usage_text(
        &self,
        kind: &str,
        namespace: &str,
    ) -> Result<Option<String>, DiscoveryError> {
        self.annotated_text(kind, &self.docs.usage_annotation, namespace)
            .await
    }

    async fn fetch_implementation_text(
        &self,
        kind: &str,
    ) -> Result<Option<String>, DiscoveryError> {
        self.annotated_text(
            kind,
            &self.docs.implementation_annotation,
            &self.docs.namespace,
        )
        .await
    }
}
