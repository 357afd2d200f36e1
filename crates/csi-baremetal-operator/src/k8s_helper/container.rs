use k8s_openapi::api::core::v1::{
    Container, ContainerPort, ExecAction, Lifecycle, LifecycleHandler, Probe, SecurityContext,
    VolumeMount,
};

use crate::k8s_helper::env::EnvValue;

pub struct ContainerBuilder {
    inner: Container,
}

impl ContainerBuilder {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self {
            inner: Container {
                name: name.into(),
                ..Default::default()
            },
        }
    }

    pub fn pull_policy(mut self, policy: &str) -> Self {
        self.inner.image_pull_policy = Some(policy.into());
        self
    }

    pub fn image<T: Into<String>>(mut self, image: T) -> Self {
        self.inner.image = Some(image.into());
        self
    }

    pub fn args<T: ToString>(mut self, args: &[T]) -> Self {
        self.inner.args = Some(args.iter().map(|a| a.to_string()).collect());
        self
    }

    /// Pushes an env entry, either a literal or a field the kubelet fills in at start.
    pub fn with_env_value<T: ToString>(mut self, name: T, value: EnvValue) -> Self {
        let mut envs = self.inner.env.unwrap_or_default();

        envs.push(value.into_env_var(name.to_string()));

        self.inner.env = Some(envs);
        self
    }

    pub fn with_env<T: ToString, U: ToString>(self, name: T, value: U) -> Self {
        self.with_env_value(name, EnvValue::Static(value.to_string()))
    }

    pub fn with_mount<T: ToString, U: ToString>(self, name: T, path: U) -> Self {
        self.push_mount(VolumeMount {
            name: name.to_string(),
            mount_path: path.to_string(),
            ..Default::default()
        })
    }

    /// Mounts a volume with `Bidirectional` propagation, so mounts made on either
    /// side become visible on the other. Only allowed for privileged containers.
    pub fn with_bidirectional_mount<T: ToString, U: ToString>(self, name: T, path: U) -> Self {
        self.push_mount(VolumeMount {
            name: name.to_string(),
            mount_path: path.to_string(),
            mount_propagation: Some("Bidirectional".to_string()),
            ..Default::default()
        })
    }

    fn push_mount(mut self, mount: VolumeMount) -> Self {
        let mut mounts = self.inner.volume_mounts.unwrap_or_default();

        mounts.push(mount);

        self.inner.volume_mounts = Some(mounts);
        self
    }

    pub fn with_port(mut self, name: impl AsRef<str>, port: i32) -> Self {
        let port = ContainerPort {
            name: Some(name.as_ref().to_string()),
            container_port: port,
            protocol: Some("TCP".to_string()),
            ..Default::default()
        };
        let mut ports = self.inner.ports.unwrap_or_default();

        ports.push(port);

        self.inner.ports = Some(ports);
        self
    }

    pub fn with_readiness_probe(mut self, probe: Probe) -> Self {
        self.inner.readiness_probe = Some(probe);

        self
    }

    pub fn with_liveness_probe(mut self, probe: Probe) -> Self {
        self.inner.liveness_probe = Some(probe);
        self
    }

    pub fn privileged(mut self) -> Self {
        self.inner.security_context = Some(SecurityContext {
            privileged: Some(true),
            ..Default::default()
        });
        self
    }

    pub fn with_pre_stop<T: ToString>(mut self, command: &[T]) -> Self {
        self.inner.lifecycle = Some(Lifecycle {
            pre_stop: Some(LifecycleHandler {
                exec: Some(ExecAction {
                    command: Some(command.iter().map(|c| c.to_string()).collect()),
                }),
                ..Default::default()
            }),
            ..Default::default()
        });
        self
    }
}

impl From<ContainerBuilder> for Container {
    fn from(builder: ContainerBuilder) -> Self {
        builder.inner
    }
}
