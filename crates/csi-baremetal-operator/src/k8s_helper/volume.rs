use k8s_openapi::api::core::v1::{
    ConfigMapVolumeSource, EmptyDirVolumeSource, HostPathVolumeSource, Volume,
};

/// How the kubelet treats a missing host path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostPathType {
    /// The directory must already exist on the node.
    Directory,
    DirectoryOrCreate,
}

impl HostPathType {
    fn as_str(&self) -> &'static str {
        match self {
            HostPathType::Directory => "Directory",
            HostPathType::DirectoryOrCreate => "DirectoryOrCreate",
        }
    }
}

pub struct VolumeBuilder {
    inner: Volume,
}

impl VolumeBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            inner: Volume {
                name: name.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn empty_dir(mut self) -> Self {
        self.inner.empty_dir = Some(EmptyDirVolumeSource::default());
        self
    }

    pub fn host_path(mut self, path: &str, kind: HostPathType) -> Self {
        self.inner.host_path = Some(HostPathVolumeSource {
            path: path.to_string(),
            type_: Some(kind.as_str().to_string()),
        });
        self
    }

    /// A config map volume that still mounts (empty) when the map does not exist.
    pub fn optional_config_map(mut self, config_map: &str) -> Self {
        self.inner.config_map = Some(ConfigMapVolumeSource {
            name: config_map.to_string(),
            optional: Some(true),
            ..Default::default()
        });
        self
    }
}

impl From<VolumeBuilder> for Volume {
    fn from(builder: VolumeBuilder) -> Self {
        builder.inner
    }
}
