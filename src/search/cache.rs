//! Memoized query results.
//!
//! The index never changes after construction, so entries never go stale;
//! the cache lives and dies with its matcher.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use crate::config::MatchAlgorithm;
use crate::model::Candidate;

/// Everything that can change the answer to a `candidates` call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub query: String,
    pub algorithm: MatchAlgorithm,
    pub languages: Vec<String>,
    pub limit: usize,
    pub spellcheck: bool,
    /// `f64::to_bits` of the frequency hint.
    pub frequency_hint: u64,
}

pub struct CandidateCache {
    inner: Mutex<LruCache<CacheKey, Vec<Candidate>>>,
}

impl std::fmt::Debug for CandidateCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidateCache")
            .field("len", &self.len())
            .finish()
    }
}

impl CandidateCache {
    /// A cache holding up to `capacity` results, or `None` when zero.
    pub fn new(capacity: usize) -> Option<Self> {
        NonZeroUsize::new(capacity).map(|cap| Self {
            inner: Mutex::new(LruCache::new(cap)),
        })
    }

    pub fn get(&self, key: &CacheKey) -> Option<Vec<Candidate>> {
        self.inner.lock().get(key).cloned()
    }

    pub fn put(&self, key: CacheKey, candidates: Vec<Candidate>) {
        self.inner.lock().put(key, candidates);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
