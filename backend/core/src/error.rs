use thiserror::Error;

use crate::event::InvalidEvent;

/// Faults that fail an invocation and are surfaced to the host.
///
/// Annotation-service failures are not here: they are logged and reported
/// as an [`Outcome`](crate::Outcome) instead.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidEvent),

    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("failed to encode annotation result: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write {object} to bucket {bucket}")]
    StorageWrite {
        bucket: String,
        object: String,
        #[source]
        source: anyhow::Error,
    },
}

impl HandlerError {
    /// True when the fault was caused by the triggering event itself.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
