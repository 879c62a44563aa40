//! Kubernetes client module
//!
//! Handles connection to the Kubernetes API server and provides the
//! cluster-backed catalog and documentation sources.
//!
//! HTTP/HTTPS proxies are honoured via the standard `HTTP_PROXY`,
//! `HTTPS_PROXY` and `NO_PROXY` environment variables.

pub mod catalog;
pub mod crd;
pub mod docs;

pub use catalog::KubeCatalog;
pub use docs::KubeDocumentation;

use anyhow::{Context, Result};
use kube::{Client, Config};
use std::time::Duration;

/// Initialize and return a Kubernetes client
///
/// Uses the default kubeconfig loading strategy:
/// 1. In-cluster config (if running in a pod)
/// 2. KUBECONFIG environment variable
/// 3. ~/.kube/config
///
/// `read_timeout` bounds every API response so a stalled server surfaces as an
/// error instead of hanging the caller.
pub async fn create_client(read_timeout: Duration) -> Result<Client> {
    let mut config = Config::infer()
        .await
        .context("Failed to infer Kubernetes configuration")?;
    config.read_timeout = Some(read_timeout);

    tracing::debug!(
        "Connecting to Kubernetes API at {} (read timeout {:?})",
        config.cluster_url,
        read_timeout
    );

    let client = Client::try_from(config).context("Failed to create Kubernetes client")?;
    Ok(client)
}
