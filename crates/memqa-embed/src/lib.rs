//! MemQA Embed — the embedding model adapter.
//!
//! The `Embedder` trait turns text into fixed-dimension `Array1<f32>`
//! vectors. Backends:
//! - `OnnxEmbedder`: ONNX Runtime with all-MiniLM-L6-v2, 384-dim
//!   (requires the `onnx` feature and model files on disk)
//! - `HashEmbedder`: deterministic token feature hashing, used by tests
//!   and available as an explicit opt-in when no model is installed
//!
//! Model unavailability is an error, never a silent fallback: a corpus
//! indexed with a degraded backend would quietly ruin answer quality.

pub mod cache;
pub mod embedder;
pub mod hash_embedder;
pub mod onnx_embedder;

pub use cache::EmbeddingCache;
pub use embedder::Embedder;
pub use hash_embedder::HashEmbedder;

#[cfg(feature = "onnx")]
pub use onnx_embedder::OnnxEmbedder;

use std::sync::Arc;

use memqa_core::{EmbeddingBackend, EmbeddingConfig, Result};

/// Construct the embedder selected by configuration.
///
/// The ONNX model is loaded eagerly here, once, so that the slow load
/// happens at startup rather than on the first request.
pub fn create_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    match config.backend {
        EmbeddingBackend::Hash => {
            tracing::info!(dim = config.dimension, "Using hash embedder");
            Ok(Arc::new(HashEmbedder::new(config.dimension)))
        }
        EmbeddingBackend::Onnx => {
            #[cfg(feature = "onnx")]
            {
                let embedder = OnnxEmbedder::load(&config.model_dir)?;
                tracing::info!(dim = embedder.dimension(), "Using ONNX embedder");
                Ok(Arc::new(embedder))
            }
            #[cfg(not(feature = "onnx"))]
            {
                Err(memqa_core::Error::Embedding(
                    "ONNX backend requested but this build has no onnx feature; \
                     set MEMQA_EMBEDDING_BACKEND=hash or rebuild with --features onnx"
                        .into(),
                ))
            }
        }
    }
}
