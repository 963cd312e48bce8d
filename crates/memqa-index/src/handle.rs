//! Atomically swappable handle to the active index.
//!
//! Queries run against whatever index was installed when they started;
//! a rebuild installs a complete replacement in one pointer swap, so
//! in-flight readers see fully-old or fully-new, never a mix.

use std::sync::Arc;

use parking_lot::RwLock;

use memqa_core::{Error, Result};

use crate::index::SemanticIndex;

pub struct IndexHandle {
    inner: RwLock<Option<Arc<SemanticIndex>>>,
}

impl IndexHandle {
    /// A handle with no index installed. `current` fails until the first
    /// `install`.
    pub fn empty() -> Self {
        Self {
            inner: RwLock::new(None),
        }
    }

    /// Swap in a fully built index, replacing any previous one. Readers
    /// holding the old `Arc` keep a consistent view until they drop it.
    pub fn install(&self, index: SemanticIndex) {
        *self.inner.write() = Some(Arc::new(index));
    }

    /// The currently active index, or `Error::IndexEmpty` if none has
    /// been installed yet.
    pub fn current(&self) -> Result<Arc<SemanticIndex>> {
        self.inner.read().clone().ok_or(Error::IndexEmpty)
    }

    pub fn is_ready(&self) -> bool {
        self.inner.read().is_some()
    }
}

impl Default for IndexHandle {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memqa_core::Message;
    use memqa_embed::{Embedder, HashEmbedder};

    fn small_corpus(body: &str) -> Vec<Message> {
        vec![Message {
            id: "1".into(),
            user_id: "u1".into(),
            user_name: "Layla".into(),
            timestamp: "2025-06-01T12:00:00Z".into(),
            message: body.into(),
        }]
    }

    #[test]
    fn test_empty_handle_fails_closed() {
        let handle = IndexHandle::empty();
        assert!(!handle.is_ready());
        assert!(matches!(handle.current(), Err(Error::IndexEmpty)));
    }

    #[test]
    fn test_install_and_query() {
        let embedder = HashEmbedder::new(64);
        let mut index = SemanticIndex::new();
        index.build(small_corpus("hello world"), &embedder).unwrap();

        let handle = IndexHandle::empty();
        handle.install(index);
        assert!(handle.is_ready());

        let q = embedder.embed("hello").unwrap();
        let results = handle.current().unwrap().query(&q, 1).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_swap_replaces_wholesale_while_reader_keeps_old() {
        let embedder = HashEmbedder::new(64);

        let mut first = SemanticIndex::new();
        first.build(small_corpus("old corpus"), &embedder).unwrap();
        let handle = IndexHandle::empty();
        handle.install(first);

        let reader = handle.current().unwrap();

        let mut second = SemanticIndex::new();
        second
            .build(small_corpus("new corpus entirely"), &embedder)
            .unwrap();
        handle.install(second);

        // The pre-swap reader still sees the old corpus in full.
        let q = embedder.embed("old corpus").unwrap();
        let old_hit = reader.query(&q, 1).unwrap();
        assert_eq!(old_hit[0].message.message, "old corpus");

        // New readers see the replacement.
        let new_hit = handle.current().unwrap().query(&q, 1).unwrap();
        assert_eq!(new_hit[0].message.message, "new corpus entirely");
    }
}
