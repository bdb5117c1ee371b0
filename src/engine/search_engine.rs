use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::{CacheStats, ReadCache};
use crate::config::IndexSettings;
use crate::error::{CuttleError, Result};
use crate::index::TokenIndex;
use crate::models::{Document, DocumentId};
use crate::persistence::DocStore;
use crate::tokenizer::Tokenizer;

/// Orchestrates the document store, token index and read cache.
///
/// Every mutating operation finishes its index update before returning, so
/// a search issued after the call observes the effect. Writes to the same
/// document serialize through the index's per-document lock; writes to
/// different documents proceed concurrently.
pub struct SearchEngine {
    store: DocStore,
    index: TokenIndex,
    cache: ReadCache,
    tokenizer: Tokenizer,
    total_documents: AtomicU64,
    consistency_warnings: AtomicU64,
}

/// Point-in-time engine counters, exported as metrics gauges
#[derive(Debug, Clone)]
pub struct EngineStats {
    pub total_documents: u64,
    pub indexed_documents: usize,
    pub distinct_tokens: usize,
    pub consistency_warnings: u64,
    pub cache: CacheStats,
}

impl SearchEngine {
    /// Open the engine over `data_dir`, rebuilding the in-memory index from
    /// the document store. The engine only becomes reachable once the
    /// rebuild has finished, so no request ever races it.
    pub fn open(settings: IndexSettings, data_dir: PathBuf) -> Result<Self> {
        let store = DocStore::open(data_dir.join("docstore"))?;
        let index = TokenIndex::new();
        let tokenizer = Tokenizer::new(&settings.tokenizer_config);
        let cache = ReadCache::new(settings.cache_capacity);

        let total = Self::rebuild_index(&store, &index, &tokenizer)?;

        Ok(Self {
            store,
            index,
            cache,
            tokenizer,
            total_documents: AtomicU64::new(total),
            consistency_warnings: AtomicU64::new(0),
        })
    }

    /// Rebuild the token index from storage, single-threaded.
    ///
    /// Only documents that recorded their key field at add time are
    /// re-indexed; everything else stays stored-unindexed. Unreadable
    /// records are skipped, not fatal.
    fn rebuild_index(store: &DocStore, index: &TokenIndex, tokenizer: &Tokenizer) -> Result<u64> {
        let mut total = 0u64;
        let mut indexed = 0u64;
        let mut skipped = 0u64;

        for (id, doc) in store.iter_documents() {
            let doc = match doc {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(doc_id = %id, error = %e, "skipping unreadable document during rebuild");
                    skipped += 1;
                    continue;
                }
            };
            total += 1;

            if let Some(key_field) = doc.indexed_field() {
                if let Some(text) = doc.field_text(key_field) {
                    index.add(&id, tokenizer.unique_terms(&text));
                    indexed += 1;
                }
            }
        }

        info!(total, indexed, skipped, "index rebuilt from document store");
        Ok(total)
    }

    /// Add or overwrite a document, indexing `key_field` when present.
    /// Returns the resolved document id.
    pub fn add_document(&self, mut doc: Document, key_field: &str) -> Result<DocumentId> {
        let id = match doc.id() {
            Some(id) => id.to_string(),
            None => {
                let id = Uuid::new_v4().to_string();
                doc.set_id(id.clone());
                id
            }
        };

        let lock = self.index.doc_lock(&id);
        let _guard = lock.lock();
        self.apply_upsert(&id, doc, key_field)?;
        Ok(id)
    }

    /// Replace the document stored under `id` (full replace, not a merge).
    pub fn update_document(&self, id: &str, mut doc: Document, key_field: &str) -> Result<()> {
        let lock = self.index.doc_lock(id);
        let _guard = lock.lock();

        if !self.store.contains(id)? {
            return Err(CuttleError::DocumentNotFound(id.to_string()));
        }
        doc.set_id(id);
        self.apply_upsert(id, doc, key_field)
    }

    /// Shared add/update body; the caller holds the document's lock.
    fn apply_upsert(&self, id: &str, mut doc: Document, key_field: &str) -> Result<()> {
        if key_field.trim().is_empty() {
            return Err(CuttleError::InvalidDocument(
                "key field name is empty".to_string(),
            ));
        }

        let existed = self.store.contains(id)?;
        // Full replace: stale tokens go before the new set is published.
        self.index.remove(id);

        match doc.field_text(key_field) {
            Some(text) => {
                doc.set_indexed_field(key_field);
                self.store.store(id, &doc)?;
                self.index.add(id, self.tokenizer.unique_terms(&text));
            }
            None => {
                // Key field absent: stored but unindexed, not an error. The
                // metadata is stripped so rebuild never trusts a stale name.
                doc.clear_indexed_field();
                self.store.store(id, &doc)?;
            }
        }

        self.cache.invalidate(id);
        if !existed {
            self.total_documents.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    /// Delete a document from both storage and the index.
    pub fn delete_document(&self, id: &str) -> Result<()> {
        let lock = self.index.doc_lock(id);
        let _guard = lock.lock();

        if !self.store.contains(id)? {
            return Err(CuttleError::DocumentNotFound(id.to_string()));
        }
        self.index.remove(id);
        self.store.delete(id)?;
        self.cache.invalidate(id);
        self.total_documents.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }

    /// Fetch a document, reading through the cache.
    pub fn get_document(&self, id: &str) -> Result<Document> {
        if let Some(doc) = self.cache.get(id) {
            return Ok(doc);
        }
        match self.store.retrieve(id)? {
            Some(doc) => {
                self.cache.put(id.to_string(), doc.clone());
                Ok(doc)
            }
            None => Err(CuttleError::DocumentNotFound(id.to_string())),
        }
    }

    /// Conjunctive search over the indexed key field.
    ///
    /// The query is tokenized with the same tokenizer used at index time;
    /// documents matching every token are resolved and returned.
    pub fn search(&self, query: &str) -> Result<Vec<Document>> {
        let tokens = self.tokenizer.tokenize(query);
        if tokens.is_empty() {
            return Err(CuttleError::InvalidQuery(
                "query contains no searchable tokens".to_string(),
            ));
        }

        let doc_ids = self.index.query(&tokens);
        let mut results = Vec::with_capacity(doc_ids.len());
        for id in doc_ids {
            match self.get_document(&id) {
                Ok(doc) => results.push(doc),
                Err(CuttleError::DocumentNotFound(_)) => {
                    // The index names a document storage no longer has.
                    // Dropped from the results; the next mutation of this id
                    // heals the drift.
                    self.consistency_warnings.fetch_add(1, Ordering::Relaxed);
                    warn!(doc_id = %id, "index references a missing document");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(results)
    }

    pub fn total_documents(&self) -> u64 {
        self.total_documents.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            total_documents: self.total_documents.load(Ordering::SeqCst),
            indexed_documents: self.index.doc_count(),
            distinct_tokens: self.index.token_count(),
            consistency_warnings: self.consistency_warnings.load(Ordering::Relaxed),
            cache: self.cache.stats(),
        }
    }
}
