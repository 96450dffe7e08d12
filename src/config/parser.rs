use std::path::Path;
use crate::errors::LabsightError;
use super::types::{LabsightConfig, MAX_UPLOAD_BYTES, PROVIDERS};
use super::schema::CONFIG_SCHEMA;
use tracing::warn;

pub async fn parse_config(path: &Path) -> Result<LabsightConfig, LabsightError> {
    if !path.exists() {
        return Err(LabsightError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(LabsightError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

/// Parse YAML config text. An empty document yields the defaults.
pub fn parse_config_str(content: &str) -> Result<LabsightConfig, LabsightError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
    if yaml.is_null() {
        return Ok(LabsightConfig::default());
    }

    validate_schema(&yaml)?;

    let config: LabsightConfig = serde_yaml::from_value(yaml)?;

    validate_conflicts(&config)?;

    Ok(config)
}

/// Load from `path` if given, otherwise the built-in defaults.
pub async fn load_config(path: Option<&str>) -> Result<LabsightConfig, LabsightError> {
    match path {
        Some(p) => parse_config(Path::new(p)).await,
        None => Ok(LabsightConfig::default()),
    }
}

/// Schema violations are advisory; typed parsing and the semantic checks
/// below decide what is fatal.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), LabsightError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| LabsightError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| LabsightError::Config(format!("Schema compilation error: {}", e)))?;

    if let Err(errors) = compiled.validate(&json_value) {
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

fn validate_conflicts(config: &LabsightConfig) -> Result<(), LabsightError> {
    if !PROVIDERS.contains(&config.llm.provider.as_str()) {
        return Err(LabsightError::Config(format!(
            "Unknown LLM provider '{}' (expected one of: {})",
            config.llm.provider,
            PROVIDERS.join(", ")
        )));
    }

    if config.llm.provider == "local" && config.llm.base_url.is_none() {
        return Err(LabsightError::Config("llm.base_url is required for the local provider".into()));
    }

    let limit = config.analysis.max_upload_bytes;
    if limit == 0 || limit > MAX_UPLOAD_BYTES {
        return Err(LabsightError::Config(format!(
            "analysis.max_upload_bytes must be between 1 and {} (got {})",
            MAX_UPLOAD_BYTES, limit
        )));
    }

    if config.llm.max_tokens == 0 {
        return Err(LabsightError::Config("llm.max_tokens must be positive".into()));
    }

    Ok(())
}
