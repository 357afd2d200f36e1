pub mod containers;
pub mod daemonset;
pub mod image;
pub mod implementation;
pub mod node;
pub mod sidecar;
pub mod volumes;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to look up {kind} {namespace}/{name}")]
    Query {
        kind: &'static str,
        namespace: String,
        name: String,
        #[source]
        source: kube::Error,
    },
    #[error("failed to create {kind} {namespace}/{name}")]
    Create {
        kind: &'static str,
        namespace: String,
        name: String,
        #[source]
        source: kube::Error,
    },
    #[error("kubernetes API error")]
    KubeError(
        #[from]
        #[source]
        kube::Error,
    ),
}
