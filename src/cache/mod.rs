//! Read-through document cache with explicit invalidation.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use parking_lot::Mutex;

use crate::models::{Document, DocumentId};

/// LRU cache sitting in front of document retrieval.
///
/// Nothing invalidates entries automatically: every mutating operation must
/// call `invalidate` for the id it touched, or readers keep seeing the old
/// body until eviction.
pub struct ReadCache {
    entries: Mutex<LruCache<DocumentId, Document>>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ReadCache {
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(cap)),
            capacity: cap.get(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, id: &str) -> Option<Document> {
        let mut entries = self.entries.lock();
        match entries.get(id) {
            Some(doc) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(doc.clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub fn put(&self, id: DocumentId, doc: Document) {
        self.entries.lock().put(id, doc);
    }

    pub fn invalidate(&self, id: &str) {
        self.entries.lock().pop(id);
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len: self.entries.lock().len(),
            capacity: self.capacity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
