//! MemQA Index — the in-memory semantic index.
//!
//! Owns the corpus messages and a parallel sequence of their embedding
//! vectors; answers nearest-neighbor queries by brute-force cosine scan
//! with partial top-K selection. Brute force is the chosen baseline at
//! corpus scale (~3,300 messages); the `query` contract leaves room to
//! swap in an approximate-nearest-neighbor structure without touching
//! callers.

pub mod handle;
pub mod index;

pub use handle::IndexHandle;
pub use index::{cosine_similarity, ScoredMessage, SemanticIndex};
