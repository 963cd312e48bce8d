//! HTTP route handlers.

pub mod ask;
pub mod refresh;
pub mod status;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use memqa_core::Error;

use crate::state::AppState;

/// Build the axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(status::routes())
        .merge(ask::routes())
        .merge(refresh::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Error shape returned to HTTP clients.
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            // No built index: the service refuses to answer rather than
            // respond from nothing.
            Error::IndexEmpty => StatusCode::SERVICE_UNAVAILABLE,
            Error::Corpus(_) | Error::Ingestion(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use memqa_answer::{LlmConfig, LlmProvider, Synthesizer};
    use memqa_core::{EmbeddingBackend, QaConfig};
    use memqa_corpus::CorpusClient;

    /// AppState with a hash embedder, an unreachable corpus URL, and a
    /// dummy LLM key. Nothing here touches the network unless a handler
    /// actually fetches or synthesizes.
    fn test_state() -> Arc<AppState> {
        let mut config = QaConfig::default();
        config.embedding.backend = EmbeddingBackend::Hash;
        let embedder = memqa_embed::create_embedder(&config.embedding).unwrap();
        let corpus = CorpusClient::new("http://127.0.0.1:9", 10).unwrap();
        let synthesizer = Synthesizer::new(LlmConfig {
            provider: LlmProvider::Gemini,
            model: "gemini-1.5-flash".into(),
            api_key: "test-key".into(),
        })
        .unwrap();
        Arc::new(AppState::new(config, embedder, corpus, synthesizer))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_status_reports_zero_before_build() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "online");
        assert_eq!(json["indexed_messages"], 0);
        assert_eq!(json["embedding_dimension"], 384);
    }

    #[tokio::test]
    async fn test_ask_without_index_is_service_unavailable() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::post("/ask")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{ "question": "Who is in London?" }"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_ask_empty_question_is_bad_request() {
        let app = build_router(test_state());
        let response = app
            .oneshot(
                Request::post("/ask")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{ "question": "   " }"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
