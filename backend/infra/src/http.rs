//! Shared outbound HTTP client.

use std::time::Duration;

use anyhow::{Context, Result};
use docsight_config::HttpConfig;
use reqwest::{Client, RequestBuilder};

const DEFAULT_USER_AGENT: &str = concat!("docsight/", env!("CARGO_PKG_VERSION"));

/// Build the pooled client shared by every invocation of the process.
///
/// No timeout is set unless configured: the host's deadline bounds the call.
pub fn build_client(config: &HttpConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT));
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().context("Failed to build HTTP client")
}

/// Attach a bearer token when one is available.
pub fn authorized(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn sends_default_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("user-agent", DEFAULT_USER_AGENT))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = build_client(&HttpConfig::default()).unwrap();
        let response = client.get(server.uri()).send().await.unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn configured_timeout_applies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let client = build_client(&HttpConfig {
            timeout_secs: Some(1),
            user_agent: Some("docsight-test".into()),
        })
        .unwrap();
        let err = client.get(server.uri()).send().await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn bearer_token_is_optional() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("authorization", "Bearer ya29.test"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = build_client(&HttpConfig::default()).unwrap();
        let with_token = authorized(client.get(server.uri()), Some("ya29.test"))
            .send()
            .await
            .unwrap();
        assert_eq!(with_token.status(), 200);

        let without = authorized(client.get(server.uri()), None).send().await.unwrap();
        assert_eq!(without.status(), 404);
    }
}
