//! Parsed ELM library cache
//!
//! Validating a group resolves several identifiers against the same
//! artifact, and a measure's artifact rarely changes between edits. Parsed
//! libraries are cached keyed by the artifact text itself, so a changed
//! artifact is always a miss.

use crate::elm::ElmLibrary;
use crate::error::CqlResult;
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Bounded in-memory cache of parsed libraries, evicted in insertion order
pub struct LibraryCache {
    parsed: Arc<DashMap<String, Arc<ElmLibrary>>>,

    /// Cached keys, oldest first. Writers hold this lock while touching `parsed`.
    order: Mutex<VecDeque<String>>,

    /// Maximum number of libraries to keep
    capacity: usize,

    hits: AtomicU64,
    misses: AtomicU64,
}

impl LibraryCache {
    /// Create a new library cache
    pub fn new(capacity: usize) -> Self {
        Self {
            parsed: Arc::new(DashMap::new()),
            order: Mutex::new(VecDeque::new()),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Get a parsed library from cache
    pub fn get(&self, artifact: &str) -> Option<Arc<ElmLibrary>> {
        self.parsed.get(artifact).map(|entry| entry.clone())
    }

    /// Store a parsed library in cache, evicting the oldest entries when full
    pub fn put(&self, artifact: &str, library: Arc<ElmLibrary>) {
        if self.capacity == 0 {
            return;
        }

        let mut order = self.order.lock().unwrap_or_else(PoisonError::into_inner);
        if self.parsed.contains_key(artifact) {
            self.parsed.insert(artifact.to_string(), library);
            return;
        }

        while self.parsed.len() >= self.capacity {
            let Some(oldest) = order.pop_front() else {
                break;
            };
            if let Some((_, evicted)) = self.parsed.remove(&oldest) {
                tracing::debug!(
                    library = evicted.identifier.as_deref().unwrap_or("<anonymous>"),
                    "Evicted library from cache"
                );
            }
        }

        order.push_back(artifact.to_string());
        self.parsed.insert(artifact.to_string(), library);
    }

    /// Get or parse a library
    pub fn get_or_parse(&self, artifact: &str) -> CqlResult<Arc<ElmLibrary>> {
        if let Some(lib) = self.get(artifact) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(
                library = lib.identifier.as_deref().unwrap_or("<anonymous>"),
                "Library found in cache"
            );
            return Ok(lib);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let library = Arc::new(ElmLibrary::parse(artifact)?);
        tracing::debug!(
            library = library.identifier.as_deref().unwrap_or("<anonymous>"),
            definitions = library.len(),
            "Parsed ELM library"
        );
        self.put(artifact, library.clone());
        Ok(library)
    }

    /// Clear all cached libraries
    pub fn clear(&self) {
        let mut order = self.order.lock().unwrap_or_else(PoisonError::into_inner);
        order.clear();
        self.parsed.clear();
        tracing::info!("Cleared library cache");
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            size: self.parsed.len(),
            capacity: self.capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
}
