//! Optical Character Recognition (OCR) requests
//!
//! Builds the annotation request that asks the vision service to extract
//! dense text from an image already sitting in object storage. The service
//! fetches the image itself; no image bytes pass through this process.

use docsight_core::{
    AnnotateImageRequest, BatchAnnotateImagesRequest, Feature, FeatureType, Image, ImageSource,
    ObjectRef,
};

/// Addressing scheme the vision service uses for storage objects.
pub const GCS_SCHEME: &str = "gs";

/// Dense document text detection, never the sparse photo mode.
pub const OCR_FEATURE: FeatureType = FeatureType::DocumentTextDetection;

/// `gs://<bucket>/<name>`, with the name used exactly as received.
pub fn image_uri(object: &ObjectRef) -> String {
    format!("{}://{}/{}", GCS_SCHEME, object.bucket, object.name)
}

/// The single dense-text request for an uploaded image.
pub fn build_request(object: &ObjectRef) -> AnnotateImageRequest {
    AnnotateImageRequest {
        image: Image {
            source: ImageSource {
                gcs_image_uri: image_uri(object),
            },
        },
        features: vec![Feature { kind: OCR_FEATURE }],
    }
}

/// Wrap one request as the batch the service API expects.
pub fn single_request_batch(request: AnnotateImageRequest) -> BatchAnnotateImagesRequest {
    BatchAnnotateImagesRequest {
        requests: vec![request],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(bucket: &str, name: &str) -> ObjectRef {
        ObjectRef {
            bucket: bucket.into(),
            name: name.into(),
        }
    }

    #[test]
    fn uri_is_scheme_bucket_and_name() {
        assert_eq!(image_uri(&object("b", "img.png")), "gs://b/img.png");
    }

    #[test]
    fn name_is_not_escaped() {
        let uri = image_uri(&object("uploads", "scans/2024 Q1/page%201.png"));
        assert_eq!(uri, "gs://uploads/scans/2024 Q1/page%201.png");
    }

    #[test]
    fn requests_document_text_detection_only() {
        let request = build_request(&object("b", "img.png"));
        assert_eq!(request.image_uri(), "gs://b/img.png");
        assert_eq!(request.features.len(), 1);
        assert_eq!(request.features[0].kind, FeatureType::DocumentTextDetection);
    }

    #[test]
    fn batch_holds_exactly_one_request() {
        let batch = single_request_batch(build_request(&object("b", "img.png")));
        assert_eq!(batch.requests.len(), 1);
    }
}
