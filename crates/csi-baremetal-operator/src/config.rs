use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid value `{value}` for {key}")]
    InvalidValue { key: String, value: String },
}

/// Process-wide settings shared by every installed component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperatorConfig {
    /// Port the driver serves Prometheus metrics on.
    pub metrics_port: i32,
    /// Name of the container port used by the liveness probe.
    pub liveness_port_name: String,
    pub termination_grace_period_seconds: i64,
    /// Whether node identity is read from a node annotation instead of the hostname.
    pub use_node_annotation: bool,
    pub drive_manager_port: i32,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            metrics_port: 8787,
            liveness_port_name: "liveness".to_string(),
            termination_grace_period_seconds: 10,
            use_node_annotation: false,
            drive_manager_port: 8888,
        }
    }
}

impl OperatorConfig {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from defaults, overridden by whatever `lookup` returns.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = parse(&lookup, "CSI_OPERATOR_METRICS_PORT")? {
            config.metrics_port = port;
        }
        if let Some(name) = lookup("CSI_OPERATOR_LIVENESS_PORT_NAME") {
            config.liveness_port_name = name;
        }
        if let Some(seconds) = parse(&lookup, "CSI_OPERATOR_TERMINATION_GRACE_PERIOD")? {
            config.termination_grace_period_seconds = seconds;
        }
        if let Some(flag) = parse(&lookup, "CSI_OPERATOR_USE_NODE_ANNOTATION")? {
            config.use_node_annotation = flag;
        }
        if let Some(port) = parse(&lookup, "CSI_OPERATOR_DRIVE_MANAGER_PORT")? {
            config.drive_manager_port = port;
        }

        Ok(config)
    }

    pub fn drive_manager_endpoint(&self) -> String {
        format!("tcp://localhost:{}", self.drive_manager_port)
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>, Error>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| Error::InvalidValue {
                    key: key.to_string(),
                    value: raw.clone(),
                })
        })
        .transpose()
}
