use async_trait::async_trait;
use k8s_openapi::api::apps::v1::DaemonSet;
use kube::{Api, Client, api::PostParams};
use tracing::{debug, error, info};

#[cfg(test)]
use mockall::automock;

use crate::{
    Deployment,
    config::OperatorConfig,
    reconcilier::{
        Error,
        daemonset::{NODE_DAEMONSET_NAME, node_daemonset},
    },
};

/// The two DaemonSet calls the node installer needs from the API server.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DaemonSetClient: Send + Sync {
    /// Fetches the DaemonSet, `Ok(None)` when it does not exist.
    async fn get_opt(&self, namespace: &str, name: &str) -> Result<Option<DaemonSet>, kube::Error>;

    async fn create(&self, namespace: &str, ds: &DaemonSet) -> Result<DaemonSet, kube::Error>;
}

#[async_trait]
impl DaemonSetClient for Client {
    async fn get_opt(&self, namespace: &str, name: &str) -> Result<Option<DaemonSet>, kube::Error> {
        Api::<DaemonSet>::namespaced(self.clone(), namespace)
            .get_opt(name)
            .await
    }

    async fn create(&self, namespace: &str, ds: &DaemonSet) -> Result<DaemonSet, kube::Error> {
        Api::<DaemonSet>::namespaced(self.clone(), namespace)
            .create(&PostParams::default(), ds)
            .await
    }
}

/// Outcome of a successful pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// A DaemonSet with the node name was already there; nothing was sent.
    Exists,
    Created,
}

/// Creates the node DaemonSet unless one with the same name already exists.
///
/// Existing objects are never compared nor updated. Any API failure ends the pass
/// and is handed back untouched; a racing creator shows up as a `Create` conflict.
pub async fn ensure_node_daemonset<C>(
    client: &C,
    csi: &Deployment,
    config: &OperatorConfig,
) -> Result<NodeState, Error>
where
    C: DaemonSetClient + ?Sized,
{
    let namespace = csi.target_namespace();

    let existing = client
        .get_opt(namespace, NODE_DAEMONSET_NAME)
        .await
        .map_err(|source| {
            error!("Failed to get daemon set {namespace}/{NODE_DAEMONSET_NAME}: {source}");
            Error::Query {
                kind: "DaemonSet",
                namespace: namespace.to_string(),
                name: NODE_DAEMONSET_NAME.to_string(),
                source,
            }
        })?;

    if existing.is_some() {
        debug!("Daemon set {namespace}/{NODE_DAEMONSET_NAME} already deployed");
        return Ok(NodeState::Exists);
    }

    let ds = node_daemonset(csi, config);

    client.create(namespace, &ds).await.map_err(|source| {
        error!("Failed to create daemon set {namespace}/{NODE_DAEMONSET_NAME}: {source}");
        Error::Create {
            kind: "DaemonSet",
            namespace: namespace.to_string(),
            name: NODE_DAEMONSET_NAME.to_string(),
            source,
        }
    })?;

    info!("Daemon set {namespace}/{NODE_DAEMONSET_NAME} created");
    Ok(NodeState::Created)
}
