//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::assistant::{AiAnswer, ApiEnvelope, GeoAssistant};
use crate::constants::api::GEORESPONSE_PATH;
use crate::server::state::AppState;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Create the API router
pub fn create_router<A>(state: Arc<AppState<A>>) -> Router
where
    A: GeoAssistant + 'static,
{
    Router::new()
        .route(GEORESPONSE_PATH, post(georesponse_handler::<A>))
        .route("/api/status", get(status_handler::<A>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// 400 with a plain error envelope
fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiEnvelope::<AiAnswer>::message(message)),
    )
        .into_response()
}

/// Pull the prompt out of `{"prompt": ...}` or a bare JSON string
fn extract_prompt(body: &Value) -> Option<&str> {
    match body {
        Value::String(prompt) => Some(prompt.as_str()),
        Value::Object(map) => map.get("prompt").and_then(Value::as_str),
        _ => None,
    }
}

/// Answer a geography question
///
/// POST /api/georesponse
async fn georesponse_handler<A: GeoAssistant>(
    State(state): State<Arc<AppState<A>>>,
    body: Bytes,
) -> Response {
    let body: Value = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(_) => return bad_request("Invalid request body"),
    };

    let prompt = match extract_prompt(&body).map(str::trim) {
        Some(prompt) if !prompt.is_empty() => prompt,
        _ => return bad_request("prompt is required"),
    };

    let result = state.assistant().ask(prompt).await;
    if let Err(err) = &result {
        warn!("Assistant failed: {}", err);
    }

    Json(ApiEnvelope::from(result)).into_response()
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Geocoding credential present
    pub search_configured: bool,
    /// Assistant backend available
    pub assistant_configured: bool,
    /// Model used for answers
    pub model: String,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler<A: GeoAssistant>(
    State(state): State<Arc<AppState<A>>>,
) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        search_configured: state.config.search_configured(),
        assistant_configured: state.assistant().is_configured(),
        model: state.config.assistant.model.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::openai::OpenAiAssistant;
    use crate::config::Config;
    use crate::error::AiError;
    use crate::testing::StubAssistant;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    fn create_test_app(assistant: StubAssistant) -> Router {
        create_router(Arc::new(AppState::new(Config::default(), assistant)))
    }

    async fn post_body(app: Router, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(GEORESPONSE_PATH)
                    .header("content-type", "application/json")
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
    async fn test_status_endpoint() {
        let app = create_test_app(StubAssistant::silent());

        let response = app
            .oneshot(Request::builder().uri("/api/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let status: StatusResponse = serde_json::from_slice(&body).unwrap();

        assert!(status.running);
        assert!(!status.search_configured);
        assert_eq!(status.model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_status_reports_server_backend() {
        let mut config = Config::default();
        config.assistant.endpoint = "http://127.0.0.1:7878".to_string();
        config.assistant.openai_api_key = String::new();
        let assistant = OpenAiAssistant::from_config(&config.assistant);
        let app = create_router(Arc::new(AppState::new(config, assistant)));

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/api/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let status: StatusResponse = serde_json::from_slice(&body).unwrap();
        assert!(!status.assistant_configured);

        let (_, body) = post_body(app, r#"{"prompt": "Where is Oslo?"}"#).await;
        assert_eq!(body["code"], "NOT_CONFIGURED");
    }

    #[tokio::test]
    async fn test_prompt_object() {
        let (status, body) = post_body(
            create_test_app(StubAssistant::answering("Paris")),
            r#"{"prompt": "Capital of France?"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["reply"], "You asked: Capital of France?");
        assert_eq!(body["data"]["navigateTo"], "Paris");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn test_bare_string_prompt() {
        let (status, body) =
            post_body(create_test_app(StubAssistant::silent()), r#""Where is Nairobi?""#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["reply"], "You asked: Where is Nairobi?");
        assert_eq!(body["data"]["navigateTo"], Value::Null);
    }

    #[tokio::test]
    async fn test_missing_prompt() {
        for payload in [r#"{}"#, r#"{"prompt": "   "}"#, r#"{"prompt": 5}"#, "null"] {
            let (status, body) = post_body(create_test_app(StubAssistant::silent()), payload).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
            assert_eq!(body, json!({ "status": "error", "error": "prompt is required" }));
        }
    }

    #[tokio::test]
    async fn test_invalid_body() {
        let assistant = StubAssistant::silent();
        let (status, body) = post_body(create_test_app(assistant.clone()), "{prompt:").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "status": "error", "error": "Invalid request body" }));
        assert_eq!(assistant.calls(), 0);
    }

    #[tokio::test]
    async fn test_assistant_failure_envelope() {
        let assistant =
            StubAssistant::failing(AiError::BackendFailure("Rate limit reached".to_string()));
        let (status, body) =
            post_body(create_test_app(assistant), r#"{"prompt": "Where is Oslo?"}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status": "error", "error": "Rate limit reached", "code": "BACKEND_FAILURE" })
        );
    }
}
