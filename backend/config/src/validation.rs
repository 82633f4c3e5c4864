//! Config validation with user-friendly error messages.

use crate::defaults::{DEFAULT_STORAGE_ENDPOINT, DEFAULT_VISION_ENDPOINT};
use crate::schema::{AuthMode, DocsightConfig};
use thiserror::Error;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &DocsightConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_result_bucket(config, &mut report);
    validate_endpoints(config, &mut report);
    validate_auth(config, &mut report);
    validate_server(config, &mut report);
    report
}

/// The destination bucket has no default; without it no result can be saved.
fn validate_result_bucket(config: &DocsightConfig, report: &mut ValidationReport) {
    match config.result_bucket.as_deref() {
        None => report.error(
            "resultBucket",
            "destination bucket is not configured (set RESULT_BUCKET)",
        ),
        Some(bucket) if bucket.trim().is_empty() => {
            report.error("resultBucket", "destination bucket must not be empty")
        }
        Some(bucket) if bucket.trim() != bucket => report.error(
            "resultBucket",
            format!("bucket name '{bucket}' has leading or trailing whitespace"),
        ),
        Some(bucket) if bucket.contains('/') => {
            report.error("resultBucket", "bucket name must not contain '/'")
        }
        Some(_) => {}
    }
}

fn validate_endpoints(config: &DocsightConfig, report: &mut ValidationReport) {
    for (path, url) in [
        ("visionEndpoint", config.vision_endpoint()),
        ("storageEndpoint", config.storage_endpoint()),
    ] {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            report.error(path, format!("'{url}' is not an http(s) URL"));
        } else if url.ends_with('/') {
            report.warn(path, "trailing '/' will produce '//' in request paths");
        }
    }
}

fn validate_auth(config: &DocsightConfig, report: &mut ValidationReport) {
    let auth = config.auth();
    match auth.mode() {
        AuthMode::Static => {
            if auth.access_token.as_deref().map_or(true, str::is_empty) {
                report.error("auth.accessToken", "static auth mode requires an access token");
            }
        }
        AuthMode::Metadata => {
            if auth.access_token.is_some() {
                report.warn("auth.accessToken", "ignored in metadata auth mode");
            }
        }
        AuthMode::None => {
            let production = config.vision_endpoint() == DEFAULT_VISION_ENDPOINT
                || config.storage_endpoint() == DEFAULT_STORAGE_ENDPOINT;
            if production {
                report.warn(
                    "auth.mode",
                    "no credentials will be sent to the production endpoints",
                );
            }
        }
    }
}

fn validate_server(config: &DocsightConfig, report: &mut ValidationReport) {
    if config.port() == 0 {
        report.warn("server.port", "port 0 binds an ephemeral port");
    }
    if config.bind_address().trim().is_empty() {
        report.error("server.bindAddress", "bind address must not be empty");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::apply_all_defaults;
    use crate::schema::AuthConfig;

    fn with_bucket() -> DocsightConfig {
        apply_all_defaults(DocsightConfig {
            result_bucket: Some("ocr-results".into()),
            ..Default::default()
        })
    }

    #[test]
    fn minimal_config_is_valid() {
        let report = validate(&with_bucket());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
    }

    #[test]
    fn missing_result_bucket_is_error() {
        let report = validate(&apply_all_defaults(DocsightConfig::default()));
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "resultBucket");
        assert!(report.errors[0].message.contains("RESULT_BUCKET"));
    }

    #[test]
    fn blank_result_bucket_is_error() {
        let mut cfg = with_bucket();
        cfg.result_bucket = Some("   ".into());
        assert!(!validate(&cfg).is_valid());
    }

    #[test]
    fn padded_result_bucket_is_error() {
        let mut cfg = with_bucket();
        cfg.result_bucket = Some(" ocr-results ".into());
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "resultBucket");
        assert!(report.errors[0].message.contains("whitespace"));
    }

    #[test]
    fn static_auth_without_token_is_error() {
        let mut cfg = with_bucket();
        cfg.auth = Some(AuthConfig {
            mode: Some(AuthMode::Static),
            ..Default::default()
        });
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "auth.accessToken");
    }

    #[test]
    fn non_http_endpoint_is_error() {
        let mut cfg = with_bucket();
        cfg.vision_endpoint = Some("vision.googleapis.com/v1".into());
        let report = validate(&cfg);
        assert!(report.errors.iter().any(|e| e.path == "visionEndpoint"));
    }

    #[test]
    fn anonymous_production_calls_warn() {
        let mut cfg = with_bucket();
        cfg.auth = Some(AuthConfig {
            mode: Some(AuthMode::None),
            ..Default::default()
        });
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert!(report.warnings.iter().any(|w| w.path == "auth.mode"));
    }
}
