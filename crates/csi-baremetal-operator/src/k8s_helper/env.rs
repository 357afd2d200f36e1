use k8s_openapi::api::core::v1::{EnvVar, EnvVarSource, ObjectFieldSelector};

/// Pod metadata the kubelet resolves when the container starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuntimeField {
    NodeName,
    Namespace,
    PodIp,
}

impl RuntimeField {
    pub fn field_path(&self) -> &'static str {
        match self {
            RuntimeField::NodeName => "spec.nodeName",
            RuntimeField::Namespace => "metadata.namespace",
            RuntimeField::PodIp => "status.podIP",
        }
    }

    fn api_version(&self) -> Option<String> {
        match self {
            RuntimeField::PodIp => None,
            _ => Some("v1".to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnvValue {
    /// Known when the manifest is built.
    Static(String),
    /// Left for the platform to substitute at container start.
    Runtime(RuntimeField),
}

impl EnvValue {
    pub fn into_env_var(self, name: String) -> EnvVar {
        match self {
            EnvValue::Static(value) => EnvVar {
                name,
                value: Some(value),
                ..Default::default()
            },
            EnvValue::Runtime(field) => EnvVar {
                name,
                value_from: Some(EnvVarSource {
                    field_ref: Some(ObjectFieldSelector {
                        api_version: field.api_version(),
                        field_path: field.field_path().to_string(),
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
        }
    }
}
