//! Semantic index build and query.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ndarray::Array1;
use serde::Serialize;
use tracing::info;

use memqa_core::{Error, Message, Result};
use memqa_embed::Embedder;

/// A retrieved message with its cosine similarity to the question.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredMessage {
    pub message: Message,
    pub score: f64,
}

/// Cosine similarity in double precision.
///
/// Returns 0.0 (not an error) when either vector has zero norm, so a
/// degenerate embedding cannot fault a query. Result is clamped to
/// [-1, 1] against accumulated rounding.
pub fn cosine_similarity(a: &Array1<f32>, b: &Array1<f32>) -> f64 {
    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(-1.0, 1.0)
}

/// Ranking candidate: ordered by score, ties broken by corpus position
/// (earlier position ranks higher) so results are reproducible.
#[derive(Debug)]
struct Candidate {
    score: f64,
    position: usize,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| other.position.cmp(&self.position))
    }
}

/// In-memory semantic index over the message corpus.
///
/// Holds the full ordered message sequence and a same-length parallel
/// sequence of embedding vectors (`vectors[i]` belongs to `messages[i]`).
/// Built once at startup; read-only from the perspective of query traffic.
/// Rebuild is all-or-nothing — there is no incremental insertion.
pub struct SemanticIndex {
    messages: Vec<Message>,
    vectors: Vec<Array1<f32>>,
    built: bool,
}

impl SemanticIndex {
    /// An empty, never-built index. Queries fail until `build` succeeds.
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            vectors: Vec::new(),
            built: false,
        }
    }

    /// Embed every message and store the parallel sequences, fully
    /// replacing any prior contents.
    ///
    /// Fails with `Error::Ingestion` on an empty corpus, a message with a
    /// missing id or empty body, or a failed embedding batch. On failure
    /// the previous contents are left untouched.
    pub fn build(&mut self, messages: Vec<Message>, embedder: &dyn Embedder) -> Result<()> {
        if messages.is_empty() {
            return Err(Error::Ingestion("corpus is empty".into()));
        }
        for (i, msg) in messages.iter().enumerate() {
            if msg.id.trim().is_empty() {
                return Err(Error::Ingestion(format!(
                    "message at position {i} has no id"
                )));
            }
            if msg.message.trim().is_empty() {
                return Err(Error::Ingestion(format!(
                    "message {} has an empty body",
                    msg.id
                )));
            }
        }

        let texts: Vec<String> = messages.iter().map(|m| m.indexable_text()).collect();
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let vectors = embedder
            .embed_batch(&refs)
            .map_err(|e| Error::Ingestion(format!("batch embedding failed: {e}")))?;

        debug_assert_eq!(vectors.len(), messages.len());

        self.messages = messages;
        self.vectors = vectors;
        self.built = true;

        info!(messages = self.messages.len(), "semantic index built");
        Ok(())
    }

    /// Rank all stored messages against `question` and return the top
    /// `min(k, len)` by descending cosine similarity.
    ///
    /// `k == 0` is degenerate but well-defined: an empty result. Fails
    /// with `Error::IndexEmpty` if no build has succeeded.
    ///
    /// Linear scan over N vectors plus an O(N log K) bounded-heap
    /// selection; no full sort of the corpus.
    pub fn query(&self, question: &Array1<f32>, k: usize) -> Result<Vec<ScoredMessage>> {
        if !self.built {
            return Err(Error::IndexEmpty);
        }
        if k == 0 {
            return Ok(Vec::new());
        }

        // Min-heap of the best k candidates seen so far.
        let mut heap: BinaryHeap<std::cmp::Reverse<Candidate>> =
            BinaryHeap::with_capacity(k.min(self.vectors.len()) + 1);
        for (position, vector) in self.vectors.iter().enumerate() {
            let score = cosine_similarity(question, vector);
            heap.push(std::cmp::Reverse(Candidate { score, position }));
            if heap.len() > k {
                heap.pop();
            }
        }

        let mut candidates: Vec<Candidate> = heap.into_iter().map(|r| r.0).collect();
        candidates.sort_by(|a, b| b.cmp(a));

        Ok(candidates
            .into_iter()
            .map(|c| ScoredMessage {
                message: self.messages[c.position].clone(),
                score: c.score,
            })
            .collect())
    }

    /// Number of indexed messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Whether a build has succeeded.
    pub fn is_built(&self) -> bool {
        self.built
    }
}

impl Default for SemanticIndex {
    fn default() -> Self {
        Self::new()
    }
}
