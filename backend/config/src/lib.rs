//! `docsight-config`: runtime configuration for the docsight handler.
//!
//! Provides:
//! - Typed config schema (destination bucket, endpoints, auth, server, logging)
//! - YAML file loading with `${ENV_VAR}` substitution
//! - Environment overrides for the well-known variables
//! - Default value application
//! - Validation and redaction for safe logging

pub mod defaults;
pub mod env;
pub mod io;
pub mod redact;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides, process_env, resolve_env_vars, MissingEnvVarError};
pub use io::{load_raw_config, CONFIG_PATH_ENV};
pub use redact::redact;
pub use schema::{
    AuthConfig, AuthMode, DocsightConfig, HttpConfig, LogFormat, LoggingConfig, ServerConfig,
};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// Load the optional config file, substitute env vars, apply env overrides
/// and defaults.
///
/// Validation is left to the caller so it can run after logging is set up.
pub async fn load_and_prepare(
    path: Option<&Path>,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<DocsightConfig> {
    let raw = match path {
        Some(path) => load_raw_config(path).await?,
        None => Value::Object(Default::default()),
    };

    let value = resolve_env_vars(&raw, lookup).context("Failed to resolve env vars in config")?;

    let config: DocsightConfig =
        serde_json::from_value(value).context("Failed to deserialize config")?;

    let config = apply_env_overrides(config, lookup)?;
    Ok(apply_all_defaults(config))
}

/// JSON snapshot of the config with secrets masked.
pub fn redacted_snapshot(config: &DocsightConfig) -> Value {
    match serde_json::to_value(config) {
        Ok(value) => redact(&value),
        Err(_) => Value::Null,
    }
}
