//! Config file loading.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Env var naming the config file when `--config` is not given.
pub const CONFIG_PATH_ENV: &str = "DOCSIGHT_CONFIG";

/// Load the config file as a raw JSON value tree.
///
/// The tree is kept untyped so `${VAR}` substitution can run before
/// deserialization. Returns an empty object if the file doesn't exist.
pub async fn load_raw_config(path: &Path) -> Result<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    let value: Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    debug!(path = %path.display(), "Loaded config file");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn missing_file_yields_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let value = load_raw_config(&dir.path().join("absent.yaml")).await.unwrap();
        assert_eq!(value, serde_json::json!({}));
    }

    #[tokio::test]
    async fn parses_yaml_into_value() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "resultBucket: ocr-results\nserver:\n  port: 3000").unwrap();
        let value = load_raw_config(file.path()).await.unwrap();
        assert_eq!(value["resultBucket"], "ocr-results");
        assert_eq!(value["server"]["port"], 3000);
    }

    #[tokio::test]
    async fn invalid_yaml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "resultBucket: [unterminated").unwrap();
        let err = load_raw_config(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config YAML"));
    }
}
