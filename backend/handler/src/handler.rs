//! The storage-event OCR handler.
//!
//! One invocation runs `validate → build request → annotate → store` once,
//! with early exits for missing input, no text, and service failures.
//! Service failures are logged and reported as an [`Outcome`]; only invalid
//! input and storage faults come back as [`HandlerError`].

use std::sync::Arc;

use bytes::Bytes;
use tracing::{error, info, instrument};

use docsight_core::{
    AnnotateImageResponse, BatchAnnotateImagesRequest, BatchAnnotateImagesResponse, HandlerError,
    ImageAnnotator, ObjectRef, ObjectStore, Outcome, StorageEvent,
};
use docsight_logging::redact_sensitive_data;
use docsight_understanding::{build_request, single_request_batch};

/// Content type of stored result documents.
pub const RESULT_CONTENT_TYPE: &str = "application/json";

/// Process-wide settings the handler needs, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub result_bucket: String,
}

pub struct OcrHandler {
    annotator: Arc<dyn ImageAnnotator>,
    store: Arc<dyn ObjectStore>,
    result_bucket: String,
}

impl OcrHandler {
    /// Fails with `MissingConfiguration` when no destination bucket is set,
    /// so the problem shows at startup instead of on the first upload.
    pub fn new(
        config: HandlerConfig,
        annotator: Arc<dyn ImageAnnotator>,
        store: Arc<dyn ObjectStore>,
    ) -> Result<Self, HandlerError> {
        let result_bucket = config.result_bucket.trim().to_string();
        if result_bucket.is_empty() {
            return Err(HandlerError::MissingConfiguration(
                "result bucket is not set".to_string(),
            ));
        }
        Ok(Self {
            annotator,
            store,
            result_bucket,
        })
    }

    pub fn result_bucket(&self) -> &str {
        &self.result_bucket
    }

    /// Process one storage event.
    ///
    /// `Err` fails the invocation; every `Ok` outcome counts as handled.
    pub async fn handle(&self, event: &StorageEvent) -> Result<Outcome, HandlerError> {
        let object = event.validate()?;
        self.detect_text(&object).await
    }

    #[instrument(skip_all, fields(bucket = %object.bucket, name = %object.name))]
    async fn detect_text(&self, object: &ObjectRef) -> Result<Outcome, HandlerError> {
        info!("Looking for text in image {}", object.name);

        let request = build_request(object);
        info!(gcs_path = %request.image_uri(), "Built annotation request");

        let response = match self.annotate(single_request_batch(request)).await {
            Ok(Some(response)) => response,
            Ok(None) => {
                info!("Image {} contains no text", object.name);
                return Ok(Outcome::NoText);
            }
            Err(detail) => {
                error!(annotator = self.annotator.name(), "Error detecting text: {}", detail);
                return Ok(Outcome::TransportFailure { detail });
            }
        };

        if let Some(status) = &response.error {
            error!(code = status.code, "Error in vision API call: {}", status.message);
            return Ok(Outcome::ServiceError {
                message: status.message.clone(),
            });
        }

        let Some(text) = response.text() else {
            info!("Image {} contains no text", object.name);
            return Ok(Outcome::NoText);
        };
        info!("Extracted text from image: {}", text);

        self.save_result(object, &response).await
    }

    /// One request out, first response back. Failures are flattened to a
    /// redacted message since they end the invocation anyway.
    async fn annotate(
        &self,
        batch: BatchAnnotateImagesRequest,
    ) -> Result<Option<AnnotateImageResponse>, String> {
        self.annotator
            .batch_annotate(&batch)
            .await
            .map(BatchAnnotateImagesResponse::into_first)
            .map_err(|e| redact_sensitive_data(&format!("{e:#}")))
    }

    async fn save_result(
        &self,
        object: &ObjectRef,
        response: &AnnotateImageResponse,
    ) -> Result<Outcome, HandlerError> {
        let result_name = object.result_name();
        info!(
            "Saving result to {} in bucket {}",
            result_name, self.result_bucket
        );

        let payload = serde_json::to_vec(response)?;
        self.store
            .put(
                &self.result_bucket,
                &result_name,
                RESULT_CONTENT_TYPE,
                Bytes::from(payload),
            )
            .await
            .map_err(|source| HandlerError::StorageWrite {
                bucket: self.result_bucket.clone(),
                object: result_name.clone(),
                source,
            })?;

        info!("File saved");
        Ok(Outcome::Saved {
            bucket: self.result_bucket.clone(),
            object: result_name,
        })
    }
}
