use serde::Serialize;

/// Terminal state of an invocation that did not fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Text was found and the result document was stored.
    Saved { bucket: String, object: String },
    /// The service found no text in the image.
    NoText,
    /// The service answered with an embedded error descriptor.
    ServiceError { message: String },
    /// The service could not be reached or its answer could not be read.
    TransportFailure { detail: String },
}

impl Outcome {
    pub fn wrote_result(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Saved { .. } => "saved",
            Self::NoText => "no_text",
            Self::ServiceError { .. } => "service_error",
            Self::TransportFailure { .. } => "transport_failure",
        }
    }
}
