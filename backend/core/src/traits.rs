use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;

use crate::annotation::{BatchAnnotateImagesRequest, BatchAnnotateImagesResponse};

/// Client for the external image annotation (OCR) service.
#[async_trait]
pub trait ImageAnnotator: Send + Sync {
    /// Backend name (e.g., "cloud-vision").
    fn name(&self) -> &str;

    /// Send a batch of requests and return the parallel list of responses.
    ///
    /// `Err` means the exchange itself failed. Per-image failures reported by
    /// the service come back inside the responses.
    async fn batch_annotate(
        &self,
        request: &BatchAnnotateImagesRequest,
    ) -> Result<BatchAnnotateImagesResponse>;
}

/// Write side of object storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create `name` in `bucket`, replacing any existing object.
    async fn put(&self, bucket: &str, name: &str, content_type: &str, payload: Bytes)
        -> Result<()>;
}
