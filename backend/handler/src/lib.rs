pub mod handler;

pub use handler::{HandlerConfig, OcrHandler, RESULT_CONTENT_TYPE};
