use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Desired installation of the bare-metal CSI driver on the cluster.
#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, JsonSchema, Default)]
#[kube(
    kind = "Deployment",
    group = "csi-baremetal.dell.com",
    version = "v1",
    shortname = "csibm",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    /// Namespace the driver components are installed into.
    #[serde(default)]
    pub namespace: String,
    /// Registry prepended to every image that does not bring its own.
    #[serde(default)]
    pub global_registry: String,
    pub driver: Driver,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default)]
pub struct Driver {
    pub node: Node,
}

/// Per-node part of the driver: the node service, the drive manager and their sidecars.
#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub image: Image,
    pub drive_mgr: DriveMgr,
    /// Overrides for the well-known sidecars. Unknown names are ignored.
    #[serde(default)]
    pub sidecars: Vec<Sidecar>,
    /// Images are referenced without registry, for clusters preloaded by kind.
    #[serde(default)]
    pub test_env: bool,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default)]
pub struct DriveMgr {
    pub image: Image,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub name: String,
    #[serde(default)]
    pub registry: String,
    pub tag: String,
    #[serde(default)]
    pub pull_policy: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, JsonSchema, Default, PartialEq, Eq)]
pub struct Sidecar {
    pub name: String,
    pub image: Image,
}

impl Deployment {
    /// Target namespace of the driver, `default` when left empty.
    pub fn target_namespace(&self) -> &str {
        if self.spec.namespace.is_empty() {
            "default"
        } else {
            &self.spec.namespace
        }
    }
}

#[cfg(test)]
mod tests {
    use kube::CustomResourceExt;

    use super::*;

    #[test]
    fn crd_is_cluster_scoped() {
        let crd = Deployment::crd();

        assert_eq!(crd.spec.scope, "Cluster");
        assert_eq!(crd.spec.group, "csi-baremetal.dell.com");
        assert_eq!(crd.spec.names.kind, "Deployment");
    }

    #[test]
    fn manifest_fields_are_camel_case_with_optional_registries() {
        let csi: Deployment = serde_json::from_value(serde_json::json!({
            "apiVersion": "csi-baremetal.dell.com/v1",
            "kind": "Deployment",
            "metadata": { "name": "csi-baremetal" },
            "spec": {
                "globalRegistry": "reg.example.com",
                "driver": {
                    "node": {
                        "image": { "name": "node", "tag": "1.2.3" },
                        "driveMgr": { "image": { "name": "drivemgr", "tag": "1.2.3" } },
                        "testEnv": true
                    }
                }
            }
        }))
        .unwrap();

        assert_eq!(csi.spec.global_registry, "reg.example.com");
        assert_eq!(csi.spec.driver.node.image.registry, "");
        assert!(csi.spec.driver.node.test_env);
        assert!(csi.spec.driver.node.sidecars.is_empty());
        assert_eq!(csi.target_namespace(), "default");
    }
}
