//! Access-token sources.
//!
//! Credentials belong to the hosting environment. In production the compute
//! metadata server hands out a token for the attached service account; a
//! fixed token or no token at all cover local runs and emulators.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use docsight_config::{AuthConfig, AuthMode};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Supplies the bearer token for one outbound call.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Source name for logs (e.g., "metadata").
    fn name(&self) -> &str;

    /// `Ok(None)` means the call goes out unauthenticated.
    async fn token(&self) -> Result<Option<String>>;
}

/// Sends no credentials.
pub struct NoCredentials;

#[async_trait]
impl TokenSource for NoCredentials {
    fn name(&self) -> &str {
        "none"
    }

    async fn token(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

/// A fixed bearer token.
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    fn name(&self) -> &str {
        "static"
    }

    async fn token(&self) -> Result<Option<String>> {
        Ok(Some(self.token.clone()))
    }
}

/// Fetches a fresh token from the metadata server on every call.
pub struct MetadataServerToken {
    client: Client,
    endpoint: String,
}

impl MetadataServerToken {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[derive(Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[async_trait]
impl TokenSource for MetadataServerToken {
    fn name(&self) -> &str {
        "metadata"
    }

    async fn token(&self) -> Result<Option<String>> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .context("Metadata server request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Metadata server returned {}: {}", status, body);
        }

        let token: MetadataTokenResponse = response
            .json()
            .await
            .context("Failed to parse metadata server token response")?;

        debug!(expires_in = ?token.expires_in, "Obtained access token from metadata server");
        Ok(Some(token.access_token))
    }
}

/// Pick the token source described by the auth config.
pub fn token_source_from_config(auth: &AuthConfig, client: &Client) -> Arc<dyn TokenSource> {
    match auth.mode() {
        AuthMode::Metadata => Arc::new(MetadataServerToken::new(
            client.clone(),
            auth.metadata_endpoint(),
        )),
        AuthMode::Static => Arc::new(StaticToken::new(
            auth.access_token.clone().unwrap_or_default(),
        )),
        AuthMode::None => Arc::new(NoCredentials),
    }
}
