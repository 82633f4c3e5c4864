use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use docsight_core::{HandlerError, InvalidEvent, StorageEvent};
use docsight_handler::OcrHandler;

/// Shared application state for the event receiver.
pub struct AppState {
    pub handler: OcrHandler,
}

/// Build the Axum router: event delivery on `/`, health on `/api/health`.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(receive_event))
        .route("/api/health", get(health))
        .with_state(state)
}

/// Storage notification delivered by the platform's event dispatch.
///
/// Handled outcomes (including service failures) answer 200 so the platform
/// does not redeliver; faults answer 4xx/5xx and count as failed invocations.
async fn receive_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let invocation_id = header(&headers, "ce-id").unwrap_or_else(|| Uuid::new_v4().to_string());
    let span = info_span!(
        "invocation",
        id = %invocation_id,
        ce_type = header(&headers, "ce-type").as_deref().unwrap_or("-"),
    );

    async move {
        let result = match decode_event(&body) {
            Ok(event) => state.handler.handle(&event).await,
            Err(invalid) => Err(HandlerError::InvalidInput(invalid)),
        };

        match result {
            Ok(outcome) => {
                info!(outcome = outcome.label(), "Invocation handled");
                (StatusCode::OK, Json(outcome)).into_response()
            }
            Err(err) if err.is_client_error() => {
                warn!(error = %err, "Rejected event");
                error_response(StatusCode::BAD_REQUEST, &err)
            }
            Err(err) => {
                error!(error = %err, detail = %source_chain(&err), "Invocation failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, &err)
            }
        }
    }
    .instrument(span)
    .await
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "docsight",
        "version": env!("CARGO_PKG_VERSION"),
        "resultBucket": state.handler.result_bucket(),
    }))
}

fn decode_event(body: &[u8]) -> Result<StorageEvent, InvalidEvent> {
    let payload: Value =
        serde_json::from_slice(body).map_err(|e| InvalidEvent::Malformed(e.to_string()))?;
    StorageEvent::from_payload(payload)
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn source_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = Vec::new();
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    docsight_logging::redact_sensitive_data(&parts.join(": "))
}

fn error_response(status: StatusCode, err: &HandlerError) -> Response {
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use docsight_core::{
        AnnotateImageResponse, BatchAnnotateImagesRequest, BatchAnnotateImagesResponse,
        ImageAnnotator, ObjectStore, TextAnnotation,
    };
    use docsight_handler::HandlerConfig;
    use docsight_storage::InMemoryObjectStore;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    struct TextAnnotator(Option<&'static str>);

    #[async_trait]
    impl ImageAnnotator for TextAnnotator {
        fn name(&self) -> &str {
            "fixed-text"
        }

        async fn batch_annotate(
            &self,
            _request: &BatchAnnotateImagesRequest,
        ) -> Result<BatchAnnotateImagesResponse> {
            let Some(text) = self.0 else {
                return Err(anyhow!("connection reset by peer"));
            };
            Ok(BatchAnnotateImagesResponse {
                responses: vec![AnnotateImageResponse {
                    full_text_annotation: Some(TextAnnotation {
                        text: text.to_string(),
                        ..Default::default()
                    }),
                    ..Default::default()
                }],
            })
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl ObjectStore for BrokenStore {
        async fn put(&self, _: &str, _: &str, _: &str, _: Bytes) -> Result<()> {
            Err(anyhow!("Storage API returned 503 Service Unavailable"))
        }
    }

    fn app(annotator: TextAnnotator, store: Arc<dyn ObjectStore>) -> Router {
        let handler = OcrHandler::new(
            HandlerConfig {
                result_bucket: "ocr-results".into(),
            },
            Arc::new(annotator),
            store,
        )
        .unwrap();
        build_router(Arc::new(AppState { handler }))
    }

    async fn post(app: Router, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header("content-type", "application/json")
                    .header("ce-id", "1234567890")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn bare_record_is_processed() {
        let store = InMemoryObjectStore::new();
        let (status, body) = post(
            app(TextAnnotator(Some("hello")), Arc::new(store.clone())),
            r#"{"bucket":"uploads","name":"img.png","contentType":"image/png"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "saved");
        assert_eq!(body["object"], "img.png.json");
        assert!(store.get("ocr-results", "img.png.json").is_some());
    }

    #[tokio::test]
    async fn structured_cloud_event_is_processed() {
        let store = InMemoryObjectStore::new();
        let (status, body) = post(
            app(TextAnnotator(Some("hello")), Arc::new(store.clone())),
            r#"{"specversion":"1.0","id":"abc","type":"google.cloud.storage.object.v1.finalized","data":{"bucket":"uploads","name":"scan.jpg"}}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["object"], "scan.jpg.json");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn numeric_size_and_odd_timestamp_are_accepted() {
        let store = InMemoryObjectStore::new();
        let (status, body) = post(
            app(TextAnnotator(Some("hello")), Arc::new(store.clone())),
            r#"{"bucket":"uploads","name":"img.png","size":48213,"timeCreated":"2024-04-05 10:11"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "saved");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn missing_name_is_bad_request() {
        let store = InMemoryObjectStore::new();
        let (status, body) = post(
            app(TextAnnotator(Some("hello")), Arc::new(store.clone())),
            r#"{"bucket":"uploads"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Missing name parameter"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let (status, _) = post(
            app(TextAnnotator(Some("hello")), Arc::new(InMemoryObjectStore::new())),
            "{not json",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn transport_failure_is_still_ok() {
        let store = InMemoryObjectStore::new();
        let (status, body) = post(
            app(TextAnnotator(None), Arc::new(store.clone())),
            r#"{"bucket":"uploads","name":"img.png"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "transport_failure");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn storage_failure_is_server_error() {
        let (status, body) = post(
            app(TextAnnotator(Some("hello")), Arc::new(BrokenStore)),
            r#"{"bucket":"uploads","name":"img.png"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("img.png.json"));
    }

    #[tokio::test]
    async fn health_reports_result_bucket() {
        let response = app(TextAnnotator(None), Arc::new(InMemoryObjectStore::new()))
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["resultBucket"], "ocr-results");
    }
}
