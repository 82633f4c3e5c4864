//! Environment handling for config values.
//!
//! Two jobs:
//! - `${VAR_NAME}` substitution inside string values of the config file.
//!   Only uppercase `[A-Z_][A-Z0-9_]*` names are matched; `$${VAR}` escapes
//!   to a literal `${VAR}`.
//! - Well-known environment variables that override file values.
//!
//! All lookups go through a caller-supplied function so tests never touch
//! the process environment.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;

use crate::schema::{
    AuthConfig, AuthMode, DocsightConfig, LogFormat, LoggingConfig, ServerConfig,
};

/// Matches `${VAR}` and the escaped `$${VAR}` in one pass.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?\$\{([A-Z_][A-Z0-9_]*)\}").unwrap());

pub const RESULT_BUCKET: &str = "RESULT_BUCKET";
pub const VISION_ENDPOINT: &str = "VISION_ENDPOINT";
pub const STORAGE_ENDPOINT: &str = "STORAGE_ENDPOINT";
pub const AUTH_MODE: &str = "DOCSIGHT_AUTH_MODE";
pub const ACCESS_TOKEN: &str = "DOCSIGHT_ACCESS_TOKEN";
pub const BIND_ADDRESS: &str = "DOCSIGHT_BIND";
pub const PORT: &str = "PORT";
pub const LOG_LEVEL: &str = "RUST_LOG";
pub const LOG_FORMAT: &str = "DOCSIGHT_LOG_FORMAT";
pub const LOG_DIR: &str = "DOCSIGHT_LOG_DIR";

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Read a variable from the real process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Substitute `${VAR}` references in a config value tree.
///
/// Only string leaves are processed. Unset or empty variables are an error.
pub fn resolve_env_vars(value: &Value, lookup: &dyn Fn(&str) -> Option<String>) -> Result<Value> {
    substitute_value(value, lookup, "")
}

fn substitute_value(
    value: &Value,
    lookup: &dyn Fn(&str) -> Option<String>,
    path: &str,
) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, lookup, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, lookup, &format!("{path}[{i}]")))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, lookup, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(
    s: &str,
    lookup: &dyn Fn(&str) -> Option<String>,
    path: &str,
) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &Captures| {
        let whole = &caps[0];
        let var_name = &caps[1];
        if whole.starts_with("$$") {
            return format!("${{{var_name}}}");
        }
        match lookup(var_name).filter(|v| !v.is_empty()) {
            Some(val) => val,
            None => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Apply the well-known environment overrides on top of a file config.
///
/// Empty variables are ignored. Unparseable values are an error rather than
/// being silently dropped.
pub fn apply_env_overrides(
    mut config: DocsightConfig,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<DocsightConfig> {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(bucket) = get(RESULT_BUCKET) {
        config.result_bucket = Some(bucket);
    }
    if let Some(url) = get(VISION_ENDPOINT) {
        config.vision_endpoint = Some(url);
    }
    if let Some(url) = get(STORAGE_ENDPOINT) {
        config.storage_endpoint = Some(url);
    }

    if let Some(mode) = get(AUTH_MODE) {
        let auth = config.auth.get_or_insert_with(AuthConfig::default);
        auth.mode = Some(parse_auth_mode(&mode)?);
    }
    if let Some(token) = get(ACCESS_TOKEN) {
        let auth = config.auth.get_or_insert_with(AuthConfig::default);
        auth.access_token = Some(token);
    }

    if let Some(bind) = get(BIND_ADDRESS) {
        let server = config.server.get_or_insert_with(ServerConfig::default);
        server.bind_address = Some(bind);
    }
    if let Some(port) = get(PORT) {
        let port: u16 = port
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{PORT} must be a port number, got {port:?}"))?;
        let server = config.server.get_or_insert_with(ServerConfig::default);
        server.port = Some(port);
    }

    if let Some(level) = get(LOG_LEVEL) {
        let logging = config.logging.get_or_insert_with(LoggingConfig::default);
        logging.level = Some(level);
    }
    if let Some(format) = get(LOG_FORMAT) {
        let logging = config.logging.get_or_insert_with(LoggingConfig::default);
        logging.format = Some(parse_log_format(&format)?);
    }
    if let Some(dir) = get(LOG_DIR) {
        let logging = config.logging.get_or_insert_with(LoggingConfig::default);
        logging.dir = Some(dir);
    }

    Ok(config)
}

fn parse_auth_mode(raw: &str) -> Result<AuthMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "metadata" => Ok(AuthMode::Metadata),
        "static" => Ok(AuthMode::Static),
        "none" => Ok(AuthMode::None),
        other => bail!("{AUTH_MODE} must be one of metadata, static, none; got {other:?}"),
    }
}

fn parse_log_format(raw: &str) -> Result<LogFormat> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "json" => Ok(LogFormat::Json),
        "pretty" => Ok(LogFormat::Pretty),
        other => bail!("{LOG_FORMAT} must be json or pretty; got {other:?}"),
    }
}
