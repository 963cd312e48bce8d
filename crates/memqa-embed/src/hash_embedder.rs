//! Deterministic feature-hashing embedder.
//!
//! Tokenizes on non-alphanumeric boundaries, hashes each lowercased token
//! into a bucket of a fixed-dimension vector with a hash-derived sign, then
//! L2-normalizes. Texts sharing tokens get positive cosine similarity;
//! disjoint texts land near zero. No model files, fully deterministic
//! across runs, so it backs the test suite and `hash`-backend deployments.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use ndarray::Array1;

use memqa_core::Result;

use crate::embedder::{check_input, Embedder};

pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn token_hash(token: &str) -> u64 {
        // DefaultHasher::new() uses fixed keys, so this is stable across
        // processes as well as within one.
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        hasher.finish()
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Array1<f32>> {
        check_input(text)?;

        let mut vector = Array1::<f32>::zeros(self.dimension);
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let h = Self::token_hash(&token.to_lowercase());
            let bucket = (h % self.dimension as u64) as usize;
            let sign = if (h >> 32) & 1 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.mapv_inplace(|v| v / norm);
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let embedder = HashEmbedder::new(384);
        let a = embedder.embed("I love London trips").unwrap();
        let b = embedder.embed("I love London trips").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_dimension() {
        let embedder = HashEmbedder::new(128);
        let v = embedder.embed("hello world").unwrap();
        assert_eq!(v.len(), 128);
        assert_eq!(embedder.dimension(), 128);
    }

    #[test]
    fn test_unit_norm() {
        let embedder = HashEmbedder::new(384);
        let v = embedder.embed("a steakhouse dinner").unwrap();
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_text_fails() {
        let embedder = HashEmbedder::new(384);
        assert!(embedder.embed("").is_err());
        assert!(embedder.embed("   ").is_err());
    }

    #[test]
    fn test_case_insensitive_tokens() {
        let embedder = HashEmbedder::new(384);
        let a = embedder.embed("LONDON").unwrap();
        let b = embedder.embed("london").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_batch_preserves_order_and_fails_whole() {
        let embedder = HashEmbedder::new(64);
        let ok = embedder.embed_batch(&["one", "two", "three"]).unwrap();
        assert_eq!(ok.len(), 3);
        assert_eq!(ok[1], embedder.embed("two").unwrap());

        let bad = embedder.embed_batch(&["one", "", "three"]);
        assert!(bad.is_err());
    }
}
