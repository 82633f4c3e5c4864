//! Wire model of the image annotation service.
//!
//! Only the fields this handler reads are typed. Everything else the service
//! returns lands in the flattened maps so the stored result document carries
//! the full response untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Annotation features understood by the service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureType {
    /// Sparse text in photographs.
    TextDetection,
    /// Dense text laid out as pages, blocks and paragraphs.
    DocumentTextDetection,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImageSource {
    pub gcs_image_uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Image {
    pub source: ImageSource,
}

/// One image plus the features requested for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnnotateImageRequest {
    pub image: Image,
    pub features: Vec<Feature>,
}

impl AnnotateImageRequest {
    pub fn image_uri(&self) -> &str {
        &self.image.source.gcs_image_uri
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BatchAnnotateImagesRequest {
    pub requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BatchAnnotateImagesResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}

impl BatchAnnotateImagesResponse {
    /// The response for a batch of one. `None` when the service sent nothing.
    pub fn into_first(self) -> Option<AnnotateImageResponse> {
        self.responses.into_iter().next()
    }
}

/// Per-image result. Serialized verbatim as the stored result document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text_annotation: Option<TextAnnotation>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Status>,

    /// Remaining service fields (`textAnnotations`, `context`, ...).
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl AnnotateImageResponse {
    /// Extracted text, if the service found any.
    pub fn text(&self) -> Option<&str> {
        self.full_text_annotation
            .as_ref()
            .map(|a| a.text.as_str())
            .filter(|t| !t.is_empty())
    }
}

/// Aggregated text plus its page/block/paragraph/word/symbol breakdown.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TextAnnotation {
    #[serde(default)]
    pub text: String,

    #[serde(flatten)]
    pub structure: Map<String, Value>,
}

/// Error descriptor embedded in a per-image response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<Value>,
}
