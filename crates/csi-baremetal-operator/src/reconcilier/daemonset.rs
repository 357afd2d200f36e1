use std::collections::BTreeMap;

use k8s_openapi::{
    api::{
        apps::v1::{DaemonSet, DaemonSetSpec},
        core::v1::{PodSpec, PodTemplateSpec},
    },
    apimachinery::pkg::apis::meta::v1::LabelSelector,
};

use crate::{
    Deployment,
    config::OperatorConfig,
    k8s_helper::metadata::{ObjectMetaBuilder, labels},
    reconcilier::{containers::node_containers, volumes::node_volumes},
};

pub const CSI_NAME: &str = "csi-baremetal";
pub const NODE_DAEMONSET_NAME: &str = "csi-baremetal-node";
pub const NODE_SERVICE_ACCOUNT: &str = "csi-node-sa";

/// The node DaemonSet for `csi`, targeting every node of the cluster.
pub fn node_daemonset(csi: &Deployment, config: &OperatorConfig) -> DaemonSet {
    DaemonSet {
        metadata: ObjectMetaBuilder::new()
            .name(NODE_DAEMONSET_NAME)
            .namespace(csi.target_namespace())
            .into(),
        spec: Some(DaemonSetSpec {
            selector: LabelSelector {
                match_labels: Some(labels("app", NODE_DAEMONSET_NAME)),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: ObjectMetaBuilder::new()
                    .with_label("app", NODE_DAEMONSET_NAME)
                    .with_label("app.kubernetes.io/name", CSI_NAME)
                    // Lets Prometheus find the driver metrics on its own
                    .with_annotation("prometheus.io/scrape", "true")
                    .with_annotation("prometheus.io/port", config.metrics_port)
                    .with_annotation("prometheus.io/path", "/metrics")
                    .into(),
                spec: Some(PodSpec {
                    volumes: Some(node_volumes()),
                    containers: node_containers(csi, config),
                    termination_grace_period_seconds: Some(
                        config.termination_grace_period_seconds,
                    ),
                    node_selector: Some(BTreeMap::new()),
                    service_account_name: Some(NODE_SERVICE_ACCOUNT.to_string()),
                    // The driver and drive manager share IPC objects.
                    host_ipc: Some(true),
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        ..Default::default()
    }
}
