//! CustomResourceDefinition helpers

use k8s_openapi::apiextensions_apiserver::pkg::apis::apiextensions::v1::{
    CustomResourceDefinition, CustomResourceDefinitionVersion,
};
use kube::api::{Api, ListParams};
use kube::core::{ApiResource, GroupVersionKind};
use kube::{Client, ResourceExt};

/// List every CRD in the cluster, sorted by name
pub async fn list_crds(client: &Client) -> Result<Vec<CustomResourceDefinition>, kube::Error> {
    let api: Api<CustomResourceDefinition> = Api::all(client.clone());
    let mut crds = api.list(&ListParams::default()).await?.items;
    crds.sort_by_key(|crd| crd.name_any());
    Ok(crds)
}

/// Find the CRD defining `kind`
pub async fn find_crd(
    client: &Client,
    kind: &str,
) -> Result<Option<CustomResourceDefinition>, kube::Error> {
    Ok(list_crds(client)
        .await?
        .into_iter()
        .find(|crd| crd.spec.names.kind == kind))
}

/// The storage version, else the first served version
pub fn preferred_version(
    crd: &CustomResourceDefinition,
) -> Option<&CustomResourceDefinitionVersion> {
    crd.spec
        .versions
        .iter()
        .find(|v| v.storage && v.served)
        .or_else(|| crd.spec.versions.iter().find(|v| v.served))
}

pub fn is_namespaced(crd: &CustomResourceDefinition) -> bool {
    crd.spec.scope == "Namespaced"
}

/// Dynamic API resource for a CRD's preferred version
pub fn api_resource(crd: &CustomResourceDefinition) -> Option<ApiResource> {
    let version = preferred_version(crd)?;
    let gvk = GroupVersionKind::gvk(&crd.spec.group, &version.name, &crd.spec.names.kind);
    Some(ApiResource::from_gvk_with_plural(
        &gvk,
        &crd.spec.names.plural,
    ))
}

/// The preferred version's OpenAPI v3 schema as JSON
pub fn openapi_schema(crd: &CustomResourceDefinition) -> Option<serde_json::Value> {
    let schema = preferred_version(crd)?
        .schema
        .as_ref()?
        .open_api_v3_schema
        .as_ref()?;
    serde_json::to_value(schema).ok()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use serde_json::json;

    pub fn crd(group: &str, kind: &str, plural: &str, scope: &str) -> CustomResourceDefinition {
        serde_json::from_value(json!({
            "apiVersion": "apiextensions.k8s.io/v1",
            "kind": "CustomResourceDefinition",
            "metadata": {
                "name": format!("{}.{}", plural, group),
                "annotations": {
                    "platform-as-code/usage": "postgres-usage.usage"
                }
            },
            "spec": {
                "group": group,
                "names": {"kind": kind, "plural": plural},
                "scope": scope,
                "versions": [
                    {"name": "v1alpha1", "served": true, "storage": false},
                    {
                        "name": "v1",
                        "served": true,
                        "storage": true,
                        "schema": {
                            "openAPIV3Schema": {
                                "type": "object",
                                "properties": {"spec": {"type": "object"}}
                            }
                        }
                    }
                ]
            }
        }))
        .unwrap()
    }
}
