pub mod ocr;
pub mod vision;

pub use ocr::{build_request, image_uri, single_request_batch, GCS_SCHEME, OCR_FEATURE};
pub use vision::CloudVisionClient;
