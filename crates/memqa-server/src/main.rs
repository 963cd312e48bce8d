//! MemQA — answers natural-language questions about member messages.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = memqa_core::QaConfig::from_env()?;
    let llm_config = memqa_answer::LlmConfig::from_env()?;
    let port = config.port;

    // One-time slow model load happens here, before any traffic.
    let embedder = memqa_embed::create_embedder(&config.embedding)?;

    let corpus = memqa_corpus::CorpusClient::new(config.corpus_url.clone(), config.fetch_limit)?;
    let synthesizer = memqa_answer::Synthesizer::new(llm_config)?;

    let state = Arc::new(AppState::new(config, embedder, corpus, synthesizer));

    // Fail closed: no query traffic is accepted unless the full corpus
    // was fetched and indexed.
    let indexed = state.rebuild_index().await?;
    info!(messages = indexed, "Ingestion complete, accepting traffic");

    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("MemQA server listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
