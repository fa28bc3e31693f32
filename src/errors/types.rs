use thiserror::Error;

#[derive(Debug, Error)]
pub enum VantageError {
    /// Carries every problem found in one build pass, so a bad topology can
    /// be fixed in a single edit instead of one error at a time.
    #[error("Configuration error: {}", .0.join("; "))]
    Config(Vec<String>),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Topology not found: {0}")]
    TopologyNotFound(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl VantageError {
    /// Single-problem configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(vec![message.into()])
    }
}
