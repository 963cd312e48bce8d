//! The question-answering route.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::debug;

use memqa_answer::NO_RELEVANT_INFO;
use memqa_core::Error;
use memqa_index::ScoredMessage;

use crate::routes::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/ask", post(ask))
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
    /// Optional override of the configured result count.
    #[serde(default)]
    pub top_k: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<ContextEntry>,
}

/// A retrieved message as returned to the client.
#[derive(Debug, Serialize)]
pub struct ContextEntry {
    pub id: String,
    pub user_name: String,
    pub message: String,
    pub score: f64,
}

impl From<&ScoredMessage> for ContextEntry {
    fn from(hit: &ScoredMessage) -> Self {
        Self {
            id: hit.message.id.clone(),
            user_name: hit.message.user_name.clone(),
            message: hit.message.message.clone(),
            score: hit.score,
        }
    }
}

async fn ask(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let question = req.question.trim().to_string();
    if question.is_empty() {
        return Err(ApiError::bad_request("question must not be empty"));
    }

    // 503 before embedding work if no index is installed.
    let index = state.index.current()?;

    let embedder = state.embedder.clone();
    let question_text = question.clone();
    let question_vector = tokio::task::spawn_blocking(move || embedder.embed(&question_text))
        .await
        .map_err(|e| ApiError::from(Error::Embedding(format!("embed task failed: {e}"))))??;

    let k = req.top_k.unwrap_or(state.config.top_k);
    let hits = index.query(&question_vector, k)?;

    let relevant: Vec<ScoredMessage> = hits
        .into_iter()
        .filter(|hit| hit.score >= state.config.min_score)
        .collect();

    debug!(
        k,
        relevant = relevant.len(),
        "Retrieved context for question"
    );

    if relevant.is_empty() {
        return Ok(Json(AskResponse {
            answer: NO_RELEVANT_INFO.to_string(),
            context: Vec::new(),
        }));
    }

    let answer = state.synthesizer.synthesize(&question, &relevant).await?;

    Ok(Json(AskResponse {
        context: relevant.iter().map(ContextEntry::from).collect(),
        answer,
    }))
}
