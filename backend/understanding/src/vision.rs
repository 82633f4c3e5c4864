//! Image annotation via the Cloud Vision REST API.
//!
//! Each call acquires its own access token and request, and drops both when
//! the call returns, whatever the result. Only the connection pool inside
//! `reqwest::Client` outlives a call.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use docsight_core::{BatchAnnotateImagesRequest, BatchAnnotateImagesResponse, ImageAnnotator};
use docsight_infra::{TokenSource, authorized};
use reqwest::Client;
use tracing::debug;

pub struct CloudVisionClient {
    client: Client,
    base_url: String,
    credentials: Arc<dyn TokenSource>,
}

impl CloudVisionClient {
    pub fn new(client: Client, credentials: Arc<dyn TokenSource>) -> Self {
        Self {
            client,
            base_url: "https://vision.googleapis.com/v1".to_string(),
            credentials,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn annotate_url(&self) -> String {
        format!("{}/images:annotate", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ImageAnnotator for CloudVisionClient {
    fn name(&self) -> &str {
        "cloud-vision"
    }

    async fn batch_annotate(
        &self,
        request: &BatchAnnotateImagesRequest,
    ) -> Result<BatchAnnotateImagesResponse> {
        let token = self
            .credentials
            .token()
            .await
            .with_context(|| format!("Failed to obtain {} credentials", self.credentials.name()))?;

        debug!(
            requests = request.requests.len(),
            url = %self.annotate_url(),
            "Sending batch annotate request"
        );

        let response = authorized(self.client.post(self.annotate_url()), token.as_deref())
            .json(request)
            .send()
            .await
            .context("Vision HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            bail!("Vision API returned {}: {}", status, error_body);
        }

        response
            .json::<BatchAnnotateImagesResponse>()
            .await
            .context("Failed to parse Vision API response")
    }
}
