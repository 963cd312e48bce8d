//! Root status route.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(status))
}

async fn status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let indexed = state
        .index
        .current()
        .map(|index| index.len())
        .unwrap_or(0);

    Json(serde_json::json!({
        "status": "online",
        "message": "Member Q&A System is running.",
        "indexed_messages": indexed,
        "embedding_dimension": state.embedder.dimension(),
    }))
}
