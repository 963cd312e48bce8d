//! Shared application state.

use std::sync::Arc;

use tracing::info;

use memqa_answer::Synthesizer;
use memqa_core::{Error, QaConfig, Result};
use memqa_corpus::CorpusClient;
use memqa_embed::Embedder;
use memqa_index::{IndexHandle, SemanticIndex};

/// Shared state accessible from all route handlers. Everything here is
/// read-only after construction except the index handle, which is only
/// ever replaced wholesale by `rebuild_index`.
pub struct AppState {
    pub config: QaConfig,
    pub embedder: Arc<dyn Embedder>,
    pub index: IndexHandle,
    pub corpus: CorpusClient,
    pub synthesizer: Synthesizer,
}

impl AppState {
    pub fn new(
        config: QaConfig,
        embedder: Arc<dyn Embedder>,
        corpus: CorpusClient,
        synthesizer: Synthesizer,
    ) -> Self {
        Self {
            config,
            embedder,
            index: IndexHandle::empty(),
            corpus,
            synthesizer,
        }
    }

    /// Fetch the corpus, build a fresh index, and atomically swap it in.
    ///
    /// The bulk embed is CPU-bound for seconds at corpus scale, so it runs
    /// on a blocking thread. On any failure the previously installed index
    /// (if any) stays active. Returns the number of indexed messages.
    pub async fn rebuild_index(&self) -> Result<usize> {
        let messages = self.corpus.fetch_all().await?;
        let embedder = self.embedder.clone();

        let index = tokio::task::spawn_blocking(move || {
            let mut index = SemanticIndex::new();
            index.build(messages, embedder.as_ref())?;
            Ok::<_, Error>(index)
        })
        .await
        .map_err(|e| Error::Ingestion(format!("index build task failed: {e}")))??;

        let count = index.len();
        self.index.install(index);
        info!(messages = count, "Semantic index installed");
        Ok(count)
    }
}
