use std::path::Path;

use tracing::{debug, warn};

use super::schema::TOPOLOGY_SCHEMA;
use super::types::TopologyConfig;
use crate::errors::VantageError;

/// Supported declarative formats, detected by extension with a content
/// sniff fallback for unknown extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
    Yaml,
}

pub async fn load_topology(path: &Path) -> Result<TopologyConfig, VantageError> {
    if !path.exists() {
        return Err(VantageError::config(format!(
            "topology file not found: {}",
            path.display()
        )));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(VantageError::config("topology file exceeds 1MB limit"));
    }

    let content = tokio::fs::read_to_string(path).await?;
    let doc = decode(&content, detect_format(path, &content))?;

    validate_schema(&doc);

    let config: TopologyConfig = serde_json::from_value(doc)?;
    debug!(
        hosts = config.hosts.len(),
        vulnerabilities = config.vulnerabilities.len(),
        exploits = config.exploits.len(),
        "Topology file decoded"
    );
    Ok(config)
}

fn detect_format(path: &Path, content: &str) -> Format {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Format::Toml,
        Some("json") => Format::Json,
        Some("yaml") | Some("yml") => Format::Yaml,
        _ => {
            let trimmed = content.trim_start();
            if trimmed.starts_with('{') {
                Format::Json
            } else if trimmed.starts_with("[[") || content.contains("]]\n") {
                Format::Toml
            } else {
                Format::Yaml
            }
        }
    }
}

/// Every format decodes into a generic JSON value first so schema
/// validation and typed decoding share one code path.
fn decode(content: &str, format: Format) -> Result<serde_json::Value, VantageError> {
    let value = match format {
        Format::Toml => toml::from_str(content)?,
        Format::Json => serde_json::from_str(content)?,
        Format::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(value)
}

/// Structural schema validation is advisory: referential problems are
/// caught authoritatively by the graph builder, so a schema mismatch only
/// warns here.
fn validate_schema(doc: &serde_json::Value) {
    let compiled = match jsonschema::JSONSchema::compile(&TOPOLOGY_SCHEMA) {
        Ok(compiled) => compiled,
        Err(e) => {
            warn!(error = %e, "Topology schema failed to compile");
            return;
        }
    };

    let validation = compiled.validate(doc);
    if let Err(errors) = validation {
        for error in errors {
            warn!(validation_error = %error, path = %error.instance_path, "Topology schema warning");
        }
    }
}
