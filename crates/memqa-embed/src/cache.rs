//! LRU + TTL cache for computed embeddings.
//!
//! Repeated questions (and rebuilds over an unchanged corpus) skip model
//! inference entirely, which also pins down determinism: a cache hit is
//! bit-identical to the first computation.

use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

use ndarray::Array1;
use parking_lot::Mutex;

struct Entry {
    vector: Array1<f32>,
    inserted_at: Instant,
}

struct Inner {
    entries: HashMap<String, Entry>,
    recency: VecDeque<String>,
    capacity: usize,
    ttl: Duration,
}

/// Thread-safe LRU embedding cache keyed by input text.
pub struct EmbeddingCache {
    inner: Mutex<Inner>,
}

impl EmbeddingCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::with_capacity(capacity),
                recency: VecDeque::with_capacity(capacity),
                capacity,
                ttl,
            }),
        }
    }

    /// 2000 entries, 1-hour TTL.
    pub fn default_cache() -> Self {
        Self::new(2000, Duration::from_secs(3600))
    }

    /// Look up a cached vector. Expired entries are dropped on access.
    pub fn get(&self, text: &str) -> Option<Array1<f32>> {
        let mut inner = self.inner.lock();

        let fresh = match inner.entries.get(text) {
            Some(entry) => entry.inserted_at.elapsed() < inner.ttl,
            None => return None,
        };

        if !fresh {
            inner.entries.remove(text);
            inner.recency.retain(|k| k != text);
            return None;
        }

        let vector = inner.entries[text].vector.clone();
        if let Some(pos) = inner.recency.iter().position(|k| k == text) {
            inner.recency.remove(pos);
        }
        inner.recency.push_back(text.to_string());
        Some(vector)
    }

    /// Insert a vector, evicting the least recently used entry at capacity.
    pub fn put(&self, text: String, vector: Array1<f32>) {
        let mut inner = self.inner.lock();

        if inner.entries.contains_key(&text) {
            inner.recency.retain(|k| k != &text);
        } else {
            while inner.entries.len() >= inner.capacity {
                match inner.recency.pop_front() {
                    Some(oldest) => {
                        inner.entries.remove(&oldest);
                    }
                    None => break,
                }
            }
        }

        inner.recency.push_back(text.clone());
        inner.entries.insert(
            text,
            Entry {
                vector,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.recency.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_hit_and_miss() {
        let cache = EmbeddingCache::new(8, Duration::from_secs(60));
        assert!(cache.get("q").is_none());

        cache.put("q".into(), array![0.5, 0.5]);
        assert_eq!(cache.get("q").unwrap(), array![0.5, 0.5]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_lru_eviction_order() {
        let cache = EmbeddingCache::new(2, Duration::from_secs(60));
        cache.put("a".into(), array![1.0]);
        cache.put("b".into(), array![2.0]);

        // Touch "a" so "b" becomes the eviction candidate.
        cache.get("a");
        cache.put("c".into(), array![3.0]);

        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn test_ttl_expiry() {
        let cache = EmbeddingCache::new(8, Duration::from_millis(1));
        cache.put("q".into(), array![1.0]);
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get("q").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_overwrite_same_key() {
        let cache = EmbeddingCache::new(2, Duration::from_secs(60));
        cache.put("q".into(), array![1.0]);
        cache.put("q".into(), array![2.0]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("q").unwrap(), array![2.0]);
    }
}
