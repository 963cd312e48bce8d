//! Environment-driven configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default upstream data API serving the member message corpus.
pub const DEFAULT_CORPUS_URL: &str = "https://november7-730026606190.europe-west1.run.app";

/// Embedding backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// ONNX Runtime with all-MiniLM-L6-v2 (requires model files on disk).
    Onnx,
    /// Deterministic token feature hashing. No model files needed; used in
    /// tests and as an explicit opt-in for development.
    Hash,
}

/// Embedding model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub backend: EmbeddingBackend,
    /// Directory holding `model.onnx` and `tokenizer.json` (ONNX backend).
    pub model_dir: PathBuf,
    /// Embedding dimension (384 for all-MiniLM-L6-v2).
    pub dimension: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Onnx,
            model_dir: PathBuf::from("data/models"),
            dimension: 384,
        }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaConfig {
    /// HTTP server port.
    pub port: u16,
    /// Base URL of the upstream message API.
    pub corpus_url: String,
    /// Page limit passed to the upstream fetch (high enough to get the
    /// whole corpus in one call).
    pub fetch_limit: usize,
    /// Default number of messages retrieved per question.
    pub top_k: usize,
    /// Minimum cosine similarity for a retrieved message to be handed to
    /// the answer synthesizer.
    pub min_score: f64,
    /// Embedding model settings.
    pub embedding: EmbeddingConfig,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            corpus_url: DEFAULT_CORPUS_URL.to_string(),
            fetch_limit: 5000,
            top_k: 10,
            min_score: 0.3,
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl QaConfig {
    /// Build configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// - `PORT`
    /// - `MEMQA_CORPUS_URL`
    /// - `MEMQA_FETCH_LIMIT`
    /// - `MEMQA_TOP_K`
    /// - `MEMQA_MIN_SCORE`
    /// - `MEMQA_EMBEDDING_BACKEND` (`onnx` | `hash`)
    /// - `MEMQA_MODEL_DIR`
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(port) = std::env::var("PORT") {
            config.port = port
                .parse()
                .map_err(|_| Error::Config(format!("invalid PORT: {port}")))?;
        }
        if let Ok(url) = std::env::var("MEMQA_CORPUS_URL") {
            config.corpus_url = url;
        }
        if let Ok(limit) = std::env::var("MEMQA_FETCH_LIMIT") {
            config.fetch_limit = limit
                .parse()
                .map_err(|_| Error::Config(format!("invalid MEMQA_FETCH_LIMIT: {limit}")))?;
        }
        if let Ok(k) = std::env::var("MEMQA_TOP_K") {
            config.top_k = k
                .parse()
                .map_err(|_| Error::Config(format!("invalid MEMQA_TOP_K: {k}")))?;
        }
        if let Ok(score) = std::env::var("MEMQA_MIN_SCORE") {
            config.min_score = score
                .parse()
                .map_err(|_| Error::Config(format!("invalid MEMQA_MIN_SCORE: {score}")))?;
        }
        if let Ok(backend) = std::env::var("MEMQA_EMBEDDING_BACKEND") {
            config.embedding.backend = match backend.as_str() {
                "onnx" => EmbeddingBackend::Onnx,
                "hash" => EmbeddingBackend::Hash,
                other => {
                    return Err(Error::Config(format!(
                        "invalid MEMQA_EMBEDDING_BACKEND: {other} (expected onnx or hash)"
                    )))
                }
            };
        }
        if let Ok(dir) = std::env::var("MEMQA_MODEL_DIR") {
            config.embedding.model_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QaConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.fetch_limit, 5000);
        assert_eq!(config.top_k, 10);
        assert_eq!(config.embedding.dimension, 384);
        assert_eq!(config.embedding.backend, EmbeddingBackend::Onnx);
    }
}
