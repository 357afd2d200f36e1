use std::{sync::Arc, time::Duration};

use crate::{Context, Deployment, config::OperatorConfig, reconcile, reconcilier::Error};
use futures::StreamExt;
use kube::{
    Api, Client, ResourceExt,
    api::ListParams,
    runtime::{
        controller::{Action, Controller},
        events::{Recorder, Reporter},
        watcher::Config,
    },
};
use tracing::{error, info};

fn error_policy(object: Arc<Deployment>, err: &Error, _ctx: Arc<Context>) -> Action {
    error!("Error reconciling deployment {}: {:#?}", object.name_any(), err);
    Action::requeue(Duration::from_secs(5))
}

pub async fn controller(config: OperatorConfig) {
    let client = Client::try_default()
        .await
        .expect("failed to create kube Client");

    let reporter = Reporter {
        controller: "csi-baremetal-operator".into(),
        instance: std::env::var("CONTROLLER_POD_NAME").ok(),
    };

    let recorder = Recorder::new(client.clone(), reporter);

    let context = Arc::new(Context {
        client: client.clone(),
        recorder,
        config,
    });

    let deployments = Api::<Deployment>::all(client.clone());

    if let Err(e) = deployments.list(&ListParams::default().limit(1)).await {
        error!("CRD is not queryable; {e:?}. Is the CRD installed?");
        info!("Installation: cargo run --bin crdgen | kubectl apply -f -");
        std::process::exit(1);
    }
    Controller::new(deployments, Config::default().any_semantic())
        .shutdown_on_signal()
        .run(reconcile, error_policy, context.clone())
        .filter_map(|x| async move { std::result::Result::ok(x) })
        .for_each(|_| futures::future::ready(()))
        .await;
}
