mod controller;
mod crd;

pub mod config;
pub mod k8s_helper;
pub mod reconcilier;
pub use controller::controller;
pub use crd::{Deployment, DeploymentSpec, DriveMgr, Driver, Image, Node, Sidecar};
pub use reconcilier::implementation::Context;
pub use reconcilier::implementation::reconcile;
