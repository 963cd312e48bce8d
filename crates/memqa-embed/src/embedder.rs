//! The `Embedder` trait.

use ndarray::Array1;

use memqa_core::{Error, Result};

/// Trait for embedding backends.
///
/// Implementations must be deterministic within a process lifetime: the
/// same text always maps to the same vector. Both ingestion and query-time
/// embedding go through this trait so corpus and question vectors live in
/// the same space.
pub trait Embedder: Send + Sync {
    /// Embed a single text. Fails on empty input or an unavailable model.
    fn embed(&self, text: &str) -> Result<Array1<f32>>;

    /// Embed a batch of texts, preserving input order.
    ///
    /// All-or-nothing: one bad text fails the whole batch so ingestion is
    /// never silently incomplete.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Array1<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Fixed output dimension of this backend.
    fn dimension(&self) -> usize;
}

/// Reject empty or whitespace-only input before it reaches a model.
pub(crate) fn check_input(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::Embedding("cannot embed empty text".into()));
    }
    Ok(())
}
