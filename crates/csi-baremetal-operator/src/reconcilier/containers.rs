use k8s_openapi::{
    api::core::v1::{Container, ExecAction, HTTPGetAction, Probe},
    apimachinery::pkg::util::intstr::IntOrString,
};

use crate::{
    Deployment,
    config::OperatorConfig,
    k8s_helper::{
        container::ContainerBuilder,
        env::{EnvValue, RuntimeField},
    },
    reconcilier::{
        image::resolve_image,
        sidecar::resolve_sidecar,
        volumes::{
            CSI_PATH_VOLUME, CSI_SOCKET_DIR_VOLUME, DRIVE_CONFIG_VOLUME, HOST_DEV_VOLUME,
            HOST_HOME_VOLUME, HOST_ROOT_VOLUME, HOST_RUN_LOCK_VOLUME, HOST_RUN_LVM_VOLUME,
            HOST_RUN_UDEV_VOLUME, HOST_SYS_VOLUME, LOGS_VOLUME, MOUNTPOINT_DIR_VOLUME,
            REGISTRATION_DIR_VOLUME,
        },
    },
};

pub const LIVENESS_PROBE_SIDECAR: &str = "liveness-probe";
pub const DRIVER_REGISTRAR_SIDECAR: &str = "csi-node-driver-registrar";
pub const NODE_CONTAINER: &str = "node";
pub const DRIVE_MANAGER_CONTAINER: &str = "drivemgr";

const LIVENESS_PROBE_TAG: &str = "v2.1.0";
const DRIVER_REGISTRAR_TAG: &str = "v1.0.1-gke.0";
const SIDECAR_PULL_POLICY: &str = "Always";

const LIVENESS_CONTAINER_PORT: i32 = 9808;
const METRICS_PATH: &str = "/metrics";

/// The liveness-probe sidecar, the registrar, the node driver and the drive manager,
/// always in that order.
pub fn node_containers(csi: &Deployment, config: &OperatorConfig) -> Vec<Container> {
    vec![
        liveness_probe(csi),
        driver_registrar(csi),
        node_driver(csi, config),
        drive_manager(csi, config),
    ]
}

fn liveness_probe(csi: &Deployment) -> Container {
    let node = &csi.spec.driver.node;
    let sidecar = resolve_sidecar(
        &node.sidecars,
        LIVENESS_PROBE_SIDECAR,
        &csi.spec.global_registry,
        LIVENESS_PROBE_TAG,
        SIDECAR_PULL_POLICY,
    );

    ContainerBuilder::new(LIVENESS_PROBE_SIDECAR)
        .image(resolve_image(
            &sidecar.image,
            &csi.spec.global_registry,
            node.test_env,
        ))
        .pull_policy(&sidecar.image.pull_policy)
        .args(&["--csi-address=/csi/csi.sock"])
        .with_mount(CSI_SOCKET_DIR_VOLUME, "/csi")
        .into()
}

fn driver_registrar(csi: &Deployment) -> Container {
    let node = &csi.spec.driver.node;
    let sidecar = resolve_sidecar(
        &node.sidecars,
        DRIVER_REGISTRAR_SIDECAR,
        &csi.spec.global_registry,
        DRIVER_REGISTRAR_TAG,
        SIDECAR_PULL_POLICY,
    );

    ContainerBuilder::new(DRIVER_REGISTRAR_SIDECAR)
        .image(resolve_image(
            &sidecar.image,
            &csi.spec.global_registry,
            node.test_env,
        ))
        .pull_policy(&sidecar.image.pull_policy)
        .args(&[
            "--v=5",
            "--csi-address=$(ADDRESS)",
            "--kubelet-registration-path=$(DRIVER_REG_SOCK_PATH)",
        ])
        // Runs inside the container on shutdown; its failure never reaches us.
        .with_pre_stop(&[
            "/bin/sh",
            "-c",
            "rm -rf /registration/csi-baremetal /registration/csi-baremetal-reg.sock",
        ])
        .with_env("ADDRESS", "/csi/csi.sock")
        .with_env(
            "DRIVER_REG_SOCK_PATH",
            "/var/lib/kubelet/plugins/csi-baremetal/csi.sock",
        )
        .with_env_value("KUBE_NODE_NAME", EnvValue::Runtime(RuntimeField::NodeName))
        .with_mount(CSI_SOCKET_DIR_VOLUME, "/csi")
        .with_mount(REGISTRATION_DIR_VOLUME, "/registration")
        .into()
}

fn node_driver(csi: &Deployment, config: &OperatorConfig) -> Container {
    let node = &csi.spec.driver.node;

    ContainerBuilder::new(NODE_CONTAINER)
        .image(resolve_image(
            &node.image,
            &csi.spec.global_registry,
            node.test_env,
        ))
        .pull_policy(&node.image.pull_policy)
        .args(&[
            "--csiendpoint=$(CSI_ENDPOINT)".to_string(),
            "--nodename=$(KUBE_NODE_NAME)".to_string(),
            "--namespace=$(NAMESPACE)".to_string(),
            "--extender=true".to_string(),
            format!("--usenodeannotation={}", config.use_node_annotation),
            "--loglevel=info".to_string(),
            format!("--metrics-address=:{}", config.metrics_port),
            format!("--metrics-path={METRICS_PATH}"),
            format!("--drivemgrendpoint={}", config.drive_manager_endpoint()),
        ])
        .with_port(&config.liveness_port_name, LIVENESS_CONTAINER_PORT)
        .with_port("metrics", config.metrics_port)
        // Node initialization can be slow, so give it five minutes before the first check.
        .with_liveness_probe(Probe {
            http_get: Some(HTTPGetAction {
                path: Some("/healthz".to_string()),
                port: IntOrString::String(config.liveness_port_name.clone()),
                ..Default::default()
            }),
            initial_delay_seconds: Some(300),
            timeout_seconds: Some(3),
            period_seconds: Some(10),
            failure_threshold: Some(5),
            ..Default::default()
        })
        .with_readiness_probe(Probe {
            exec: Some(ExecAction {
                command: Some(vec!["/health_probe".to_string(), "-addr=:9999".to_string()]),
            }),
            initial_delay_seconds: Some(3),
            period_seconds: Some(3),
            success_threshold: Some(3),
            failure_threshold: Some(100),
            ..Default::default()
        })
        .with_env("CSI_ENDPOINT", "unix:///csi/csi.sock")
        .with_env("LOG_FORMAT", "text")
        .with_env_value("KUBE_NODE_NAME", EnvValue::Runtime(RuntimeField::NodeName))
        .with_env_value("MY_POD_IP", EnvValue::Runtime(RuntimeField::PodIp))
        .with_env_value("NAMESPACE", EnvValue::Runtime(RuntimeField::Namespace))
        .privileged()
        .with_mount(LOGS_VOLUME, "/var/log")
        .with_mount(HOST_DEV_VOLUME, "/dev")
        .with_mount(HOST_SYS_VOLUME, "/sys")
        .with_mount(HOST_RUN_UDEV_VOLUME, "/run/udev")
        .with_mount(HOST_RUN_LVM_VOLUME, "/run/lvm")
        .with_mount(HOST_RUN_LOCK_VOLUME, "/run/lock")
        .with_mount(CSI_SOCKET_DIR_VOLUME, "/csi")
        .with_bidirectional_mount(MOUNTPOINT_DIR_VOLUME, "/var/lib/kubelet/pods")
        .with_bidirectional_mount(CSI_PATH_VOLUME, "/var/lib/kubelet/plugins/kubernetes.io/csi")
        .with_bidirectional_mount(HOST_ROOT_VOLUME, "/hostroot")
        .into()
}

fn drive_manager(csi: &Deployment, config: &OperatorConfig) -> Container {
    let node = &csi.spec.driver.node;
    let image = &node.drive_mgr.image;

    ContainerBuilder::new(DRIVE_MANAGER_CONTAINER)
        .image(resolve_image(image, &csi.spec.global_registry, node.test_env))
        .pull_policy(&image.pull_policy)
        .args(&[
            "--loglevel=info".to_string(),
            format!("--drivemgrendpoint={}", config.drive_manager_endpoint()),
            format!("--usenodeannotation={}", config.use_node_annotation),
        ])
        .with_env("LOG_FORMAT", "text")
        .with_env_value("KUBE_NODE_NAME", EnvValue::Runtime(RuntimeField::NodeName))
        .privileged()
        .with_mount(HOST_DEV_VOLUME, "/dev")
        .with_mount(HOST_HOME_VOLUME, "/host/home")
        .with_mount(DRIVE_CONFIG_VOLUME, "/etc/config")
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crd::{DeploymentSpec, DriveMgr, Driver, Image, Node, Sidecar};

    fn image(name: &str, tag: &str) -> Image {
        Image {
            name: name.into(),
            registry: "reg.example.com".into(),
            tag: tag.into(),
            pull_policy: "IfNotPresent".into(),
        }
    }

    fn deployment(sidecars: Vec<Sidecar>, test_env: bool) -> Deployment {
        Deployment::new(
            "csi-baremetal",
            DeploymentSpec {
                namespace: "csi".into(),
                global_registry: "reg.example.com".into(),
                driver: Driver {
                    node: Node {
                        image: image("node", "1.2.3"),
                        drive_mgr: DriveMgr {
                            image: image("drivemgr", "1.2.3"),
                        },
                        sidecars,
                        test_env,
                    },
                },
            },
        )
    }

    fn container<'a>(containers: &'a [Container], name: &str) -> &'a Container {
        containers.iter().find(|c| c.name == name).unwrap()
    }

    #[test]
    fn four_containers_in_fixed_order() {
        let containers = node_containers(&deployment(vec![], false), &OperatorConfig::default());

        let names: Vec<_> = containers.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                LIVENESS_PROBE_SIDECAR,
                DRIVER_REGISTRAR_SIDECAR,
                NODE_CONTAINER,
                DRIVE_MANAGER_CONTAINER
            ]
        );
    }

    #[test]
    fn sidecars_fall_back_to_default_tags() {
        let containers = node_containers(&deployment(vec![], false), &OperatorConfig::default());

        let liveness = containers[0].image.as_deref().unwrap();
        let registrar = containers[1].image.as_deref().unwrap();
        assert_eq!(liveness, "reg.example.com/liveness-probe:v2.1.0");
        assert!(registrar.ends_with(":v1.0.1-gke.0"));
        assert_eq!(containers[0].image_pull_policy.as_deref(), Some("Always"));
    }

    #[test]
    fn liveness_override_takes_precedence() {
        let overrides = vec![Sidecar {
            name: LIVENESS_PROBE_SIDECAR.into(),
            image: Image {
                name: "livenessprobe".into(),
                registry: "mirror.local".into(),
                tag: "v9.9.9".into(),
                pull_policy: "Never".into(),
            },
        }];

        let containers = node_containers(&deployment(overrides, false), &OperatorConfig::default());

        let liveness = container(&containers, LIVENESS_PROBE_SIDECAR);
        assert_eq!(
            liveness.image.as_deref(),
            Some("mirror.local/livenessprobe:v9.9.9")
        );
        assert_eq!(liveness.image_pull_policy.as_deref(), Some("Never"));
        // The registrar is untouched by an unrelated override.
        assert!(
            containers[1]
                .image
                .as_deref()
                .unwrap()
                .ends_with(":v1.0.1-gke.0")
        );
    }

    #[test]
    fn test_env_images_have_no_registry() {
        let containers = node_containers(&deployment(vec![], true), &OperatorConfig::default());

        for c in &containers {
            assert!(!c.image.as_deref().unwrap().contains('/'), "{}", c.name);
        }
    }

    #[test]
    fn production_images_start_with_registry() {
        let containers = node_containers(&deployment(vec![], false), &OperatorConfig::default());

        for c in &containers {
            assert!(
                c.image.as_deref().unwrap().starts_with("reg.example.com/"),
                "{}",
                c.name
            );
        }
        assert_eq!(
            container(&containers, NODE_CONTAINER).image.as_deref(),
            Some("reg.example.com/node:1.2.3")
        );
    }

    #[test]
    fn images_without_registry_use_global_registry() {
        let mut csi = deployment(vec![], false);
        csi.spec.driver.node.image = Image {
            name: "node".into(),
            tag: "1.2.3".into(),
            ..Default::default()
        };
        csi.spec.driver.node.drive_mgr.image = Image {
            name: "drivemgr".into(),
            tag: "1.2.3".into(),
            ..Default::default()
        };

        let containers = node_containers(&csi, &OperatorConfig::default());

        let images: Vec<_> = containers
            .iter()
            .map(|c| c.image.as_deref().unwrap())
            .collect();
        assert_eq!(
            images,
            vec![
                "reg.example.com/liveness-probe:v2.1.0",
                "reg.example.com/csi-node-driver-registrar:v1.0.1-gke.0",
                "reg.example.com/node:1.2.3",
                "reg.example.com/drivemgr:1.2.3",
            ]
        );
    }

    #[test]
    fn node_args_follow_config() {
        let config = OperatorConfig {
            metrics_port: 9100,
            use_node_annotation: true,
            drive_manager_port: 7777,
            ..Default::default()
        };
        let containers = node_containers(&deployment(vec![], false), &config);

        let args = container(&containers, NODE_CONTAINER).args.clone().unwrap();
        assert!(args.contains(&"--usenodeannotation=true".to_string()));
        assert!(args.contains(&"--metrics-address=:9100".to_string()));
        assert!(args.contains(&"--drivemgrendpoint=tcp://localhost:7777".to_string()));

        let drivemgr = container(&containers, DRIVE_MANAGER_CONTAINER).args.clone().unwrap();
        assert_eq!(
            drivemgr,
            vec![
                "--loglevel=info",
                "--drivemgrendpoint=tcp://localhost:7777",
                "--usenodeannotation=true"
            ]
        );
    }

    #[test]
    fn node_driver_probes_and_privileges() {
        let containers = node_containers(&deployment(vec![], false), &OperatorConfig::default());
        let node = container(&containers, NODE_CONTAINER);

        let liveness = node.liveness_probe.as_ref().unwrap();
        let http = liveness.http_get.as_ref().unwrap();
        assert_eq!(http.path.as_deref(), Some("/healthz"));
        assert_eq!(http.port, IntOrString::String("liveness".into()));
        assert_eq!(liveness.initial_delay_seconds, Some(300));
        assert_eq!(liveness.failure_threshold, Some(5));

        let readiness = node.readiness_probe.as_ref().unwrap();
        assert!(readiness.exec.is_some());
        assert_eq!(readiness.success_threshold, Some(3));
        assert_eq!(readiness.failure_threshold, Some(100));

        assert_eq!(
            node.security_context.as_ref().and_then(|s| s.privileged),
            Some(true)
        );
        assert!(containers[0].liveness_probe.is_none());
        assert!(containers[0].security_context.is_none());
    }

    #[test]
    fn only_mount_namespace_paths_are_bidirectional() {
        let containers = node_containers(&deployment(vec![], false), &OperatorConfig::default());

        let mut bidirectional: Vec<_> = containers
            .iter()
            .flat_map(|c| c.volume_mounts.iter().flatten())
            .filter(|m| m.mount_propagation.as_deref() == Some("Bidirectional"))
            .map(|m| m.name.as_str())
            .collect();
        bidirectional.sort();

        assert_eq!(
            bidirectional,
            vec![CSI_PATH_VOLUME, HOST_ROOT_VOLUME, MOUNTPOINT_DIR_VOLUME]
        );
    }

    #[test]
    fn node_name_is_resolved_by_the_kubelet() {
        let containers = node_containers(&deployment(vec![], false), &OperatorConfig::default());

        for c in &containers[1..] {
            let env = c.env.as_ref().unwrap();
            let node_name = env.iter().find(|e| e.name == "KUBE_NODE_NAME").unwrap();
            assert!(node_name.value.is_none(), "{}", c.name);
            let field = node_name.value_from.as_ref().unwrap().field_ref.as_ref().unwrap();
            assert_eq!(field.field_path, "spec.nodeName");
        }
    }
}
