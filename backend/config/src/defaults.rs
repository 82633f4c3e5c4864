//! Config defaults: applies default values to a parsed config.

use crate::schema::{AuthConfig, AuthMode, DocsightConfig, LoggingConfig, ServerConfig};

/// Production image annotation REST API.
pub const DEFAULT_VISION_ENDPOINT: &str = "https://vision.googleapis.com/v1";

/// Production object storage JSON API.
pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://storage.googleapis.com";

/// Token endpoint of the compute metadata server.
pub const DEFAULT_METADATA_TOKEN_ENDPOINT: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Serverless hosts inject `PORT`; this is what they default it to.
pub const DEFAULT_PORT: u16 = 8080;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
///
/// `resultBucket` is never defaulted: a missing destination is reported by
/// validation instead.
pub fn apply_all_defaults(config: DocsightConfig) -> DocsightConfig {
    let config = apply_endpoint_defaults(config);
    let config = apply_auth_defaults(config);
    let config = apply_server_defaults(config);
    apply_logging_defaults(config)
}

fn apply_endpoint_defaults(mut config: DocsightConfig) -> DocsightConfig {
    config
        .vision_endpoint
        .get_or_insert_with(|| DEFAULT_VISION_ENDPOINT.to_string());
    config
        .storage_endpoint
        .get_or_insert_with(|| DEFAULT_STORAGE_ENDPOINT.to_string());
    config
}

/// Metadata mode is the default; a static token without an explicit mode
/// switches to static.
fn apply_auth_defaults(mut config: DocsightConfig) -> DocsightConfig {
    let auth = config.auth.get_or_insert_with(AuthConfig::default);
    if auth.mode.is_none() {
        auth.mode = Some(if auth.access_token.is_some() {
            AuthMode::Static
        } else {
            AuthMode::Metadata
        });
    }
    if auth.mode == Some(AuthMode::Metadata) && auth.metadata_endpoint.is_none() {
        auth.metadata_endpoint = Some(DEFAULT_METADATA_TOKEN_ENDPOINT.to_string());
    }
    config
}

fn apply_server_defaults(mut config: DocsightConfig) -> DocsightConfig {
    let server = config.server.get_or_insert_with(ServerConfig::default);
    server
        .bind_address
        .get_or_insert_with(|| DEFAULT_BIND_ADDRESS.to_string());
    server.port.get_or_insert(DEFAULT_PORT);
    config
}

fn apply_logging_defaults(mut config: DocsightConfig) -> DocsightConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    logging
        .level
        .get_or_insert_with(|| DEFAULT_LOG_LEVEL.to_string());
    logging.format.get_or_insert_with(Default::default);
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LogFormat;

    #[test]
    fn fills_endpoints_and_server() {
        let cfg = apply_all_defaults(DocsightConfig::default());
        assert_eq!(cfg.vision_endpoint.as_deref(), Some(DEFAULT_VISION_ENDPOINT));
        assert_eq!(cfg.storage_endpoint.as_deref(), Some(DEFAULT_STORAGE_ENDPOINT));
        assert_eq!(cfg.port(), DEFAULT_PORT);
        assert_eq!(cfg.bind_address(), DEFAULT_BIND_ADDRESS);
        assert_eq!(cfg.log_format(), LogFormat::Json);
    }

    #[test]
    fn does_not_invent_result_bucket() {
        let cfg = apply_all_defaults(DocsightConfig::default());
        assert!(cfg.result_bucket.is_none());
    }

    #[test]
    fn defaults_to_metadata_auth() {
        let cfg = apply_all_defaults(DocsightConfig::default());
        let auth = cfg.auth();
        assert_eq!(auth.mode(), AuthMode::Metadata);
        assert_eq!(auth.metadata_endpoint(), DEFAULT_METADATA_TOKEN_ENDPOINT);
    }

    #[test]
    fn token_without_mode_means_static() {
        let mut cfg = DocsightConfig::default();
        cfg.auth = Some(AuthConfig {
            access_token: Some("ya29.token".into()),
            ..Default::default()
        });
        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.auth().mode(), AuthMode::Static);
        assert!(cfg.auth().metadata_endpoint.is_none());
    }

    #[test]
    fn does_not_override_user_values() {
        let mut cfg = DocsightConfig::default();
        cfg.vision_endpoint = Some("http://localhost:9000/v1".into());
        cfg.server = Some(ServerConfig {
            port: Some(3000),
            ..Default::default()
        });
        let cfg = apply_all_defaults(cfg);
        assert_eq!(cfg.vision_endpoint(), "http://localhost:9000/v1");
        assert_eq!(cfg.port(), 3000);
    }
}
