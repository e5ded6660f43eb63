//! Process-lifetime relevance score memo.

use moka::sync::Cache;

use crate::hashing::score_cache_key;

/// Unbounded (query, content prefix) -> score cache.
///
/// Concurrent reads and inserts are safe; a racing insert for the same key is last-write-wins.
/// Clones share the same underlying storage.
#[derive(Clone)]
pub struct ScoreCache {
    entries: Cache<[u8; 32], f32>,
}

impl std::fmt::Debug for ScoreCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoreCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl Default for ScoreCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreCache {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().build(),
        }
    }

    #[inline]
    pub fn get(&self, query: &str, content: &str) -> Option<f32> {
        self.entries.get(&score_cache_key(query, content))
    }

    #[inline]
    pub fn insert(&self, query: &str, content: &str, score: f32) {
        self.entries.insert(score_cache_key(query, content), score);
    }

    /// Returns the number of cached scores.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks();
    }
}
