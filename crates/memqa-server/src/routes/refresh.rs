//! Full index rebuild (rebuild-and-swap).

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::routes::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/index/refresh", post(refresh))
}

/// Re-fetch the corpus and rebuild the whole index. Queries running
/// against the old index finish against the old index; the swap is a
/// single reference replacement.
async fn refresh(State(state): State<Arc<AppState>>) -> Result<Json<serde_json::Value>, ApiError> {
    let indexed = state.rebuild_index().await?;
    Ok(Json(serde_json::json!({
        "status": "rebuilt",
        "indexed_messages": indexed,
    })))
}
