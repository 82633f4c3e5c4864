//! Cloud Storage JSON API uploader.
//!
//! Uses the simple media upload (`uploadType=media`), which creates the
//! object or replaces it if it already exists.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use bytes::Bytes;
use docsight_core::ObjectStore;
use docsight_infra::{TokenSource, authorized};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

pub struct GcsObjectStore {
    client: Client,
    base_url: String,
    credentials: Arc<dyn TokenSource>,
}

impl GcsObjectStore {
    pub fn new(client: Client, credentials: Arc<dyn TokenSource>) -> Self {
        Self {
            client,
            base_url: "https://storage.googleapis.com".to_string(),
            credentials,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn upload_url(&self, bucket: &str) -> String {
        format!(
            "{}/upload/storage/v1/b/{}/o",
            self.base_url.trim_end_matches('/'),
            bucket
        )
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    async fn put(&self, bucket: &str, name: &str, content_type: &str, payload: Bytes) -> Result<()> {
        let token = self
            .credentials
            .token()
            .await
            .with_context(|| format!("Failed to obtain {} credentials", self.credentials.name()))?;

        debug!(bucket, name, bytes = payload.len(), "Uploading object");

        // The object name goes in the query string, so `/` and spaces are
        // percent-encoded by reqwest rather than treated as path segments.
        let response = authorized(self.client.post(self.upload_url(bucket)), token.as_deref())
            .query(&[("uploadType", "media"), ("name", name)])
            .header(CONTENT_TYPE, content_type)
            .body(payload)
            .send()
            .await
            .context("Storage HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            bail!("Storage API returned {}: {}", status, error_body);
        }

        Ok(())
    }
}
