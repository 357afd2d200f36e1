use std::sync::Arc;

use kube::{
    Client, Resource, ResourceExt,
    runtime::{
        controller::Action,
        events::{Event, EventType, Recorder},
    },
};
use tracing::info;

use crate::{
    Deployment,
    config::OperatorConfig,
    reconcilier::{
        Error,
        daemonset::NODE_DAEMONSET_NAME,
        node::{NodeState, ensure_node_daemonset},
    },
};

#[derive(Clone)]
pub struct Context {
    pub client: Client,
    pub recorder: Recorder,
    pub config: OperatorConfig,
}

/// Installs the per-node part of the driver for one Deployment.
///
/// Only creation is handled: once the DaemonSet exists nothing is left to do
/// until the Deployment changes again.
pub async fn reconcile(obj: Arc<Deployment>, ctx: Arc<Context>) -> Result<Action, Error> {
    info!("Reconciling deployment {}", obj.name_any());

    let state = ensure_node_daemonset(&ctx.client, &obj, &ctx.config).await?;

    if state == NodeState::Created {
        ctx.recorder
            .publish(
                &Event {
                    type_: EventType::Normal,
                    reason: "NodeDaemonSet".into(),
                    note: Some(format!(
                        "Created daemon set {}/{}",
                        obj.target_namespace(),
                        NODE_DAEMONSET_NAME
                    )),
                    action: "CreatedDaemonSet".into(),
                    secondary: None,
                },
                &obj.object_ref(&()),
            )
            .await?;
    }

    Ok(Action::await_change())
}
