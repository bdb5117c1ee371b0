use std::collections::HashSet;
use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use parking_lot::Mutex;

use crate::models::DocumentId;

/// In-memory bidirectional token index.
///
/// `inverted` maps a token to the documents containing it; `forward` maps a
/// document to exactly the token set it was last indexed with. The two maps
/// mirror each other: removal walks the document's own forward entry, so its
/// cost is bounded by that document's token count rather than the size of
/// the index.
///
/// Buckets are sharded (`DashMap`), so unrelated tokens and documents are
/// mutated and read concurrently; there is no index-wide lock. Writers to
/// the same document serialize through `doc_lock`.
pub struct TokenIndex {
    inverted: DashMap<String, DashSet<DocumentId>>,
    forward: DashMap<DocumentId, HashSet<String>>,
    doc_locks: DashMap<DocumentId, Arc<Mutex<()>>>,
}

impl TokenIndex {
    pub fn new() -> Self {
        Self {
            inverted: DashMap::new(),
            forward: DashMap::new(),
            doc_locks: DashMap::new(),
        }
    }

    /// Per-document write lock.
    ///
    /// Callers hold this across a remove + add pair so a concurrent query
    /// observes the document's old token set or its new one, never a mix.
    /// Entries are never removed from the table: dropping one while a racing
    /// writer still holds a clone would hand out two locks for the same id.
    pub fn doc_lock(&self, doc_id: &str) -> Arc<Mutex<()>> {
        self.doc_locks
            .entry(doc_id.to_string())
            .or_default()
            .clone()
    }

    /// Index `doc_id` under `tokens`, replacing its forward entry.
    ///
    /// Does not diff against a previous entry; a caller re-adding a document
    /// must `remove` it first.
    pub fn add(&self, doc_id: &str, tokens: HashSet<String>) {
        for token in &tokens {
            self.inverted
                .entry(token.clone())
                .or_default()
                .insert(doc_id.to_string());
        }
        self.forward.insert(doc_id.to_string(), tokens);
    }

    /// Remove a document from the index, touching only the buckets named by
    /// its forward entry. Unknown documents are a no-op.
    pub fn remove(&self, doc_id: &str) {
        let Some((_, tokens)) = self.forward.remove(doc_id) else {
            return;
        };
        for token in &tokens {
            if let Some(bucket) = self.inverted.get(token) {
                bucket.remove(doc_id);
            }
            self.inverted.remove_if(token, |_, bucket| bucket.is_empty());
        }
    }

    /// Conjunctive query: the documents containing every one of `tokens`.
    ///
    /// An empty token list yields an empty result, and any token absent from
    /// the index collapses the whole intersection to empty.
    ///
    /// Never holds two bucket guards at once: with a writer queued on a
    /// shard both tokens hash to, the second read acquisition would
    /// deadlock. The seed bucket is snapshotted, then narrowed one bucket
    /// at a time.
    pub fn query(&self, tokens: &[String]) -> HashSet<DocumentId> {
        if tokens.is_empty() {
            return HashSet::new();
        }

        // Order by bucket size so the smallest seeds the intersection.
        let mut ordered: Vec<(usize, &String)> = Vec::with_capacity(tokens.len());
        for token in tokens {
            match self.inverted.get(token) {
                Some(bucket) => ordered.push((bucket.len(), token)),
                None => return HashSet::new(),
            }
        }
        ordered.sort_by_key(|(len, _)| *len);

        let mut result: HashSet<DocumentId> = match self.inverted.get(ordered[0].1) {
            Some(bucket) => bucket.iter().map(|entry| entry.key().clone()).collect(),
            None => return HashSet::new(),
        };
        for (_, token) in &ordered[1..] {
            match self.inverted.get(*token) {
                Some(bucket) => result.retain(|id| bucket.contains(id)),
                None => return HashSet::new(),
            }
            if result.is_empty() {
                break;
            }
        }
        result
    }

    pub fn contains(&self, doc_id: &str) -> bool {
        self.forward.contains_key(doc_id)
    }

    /// Token set currently attributed to a document
    pub fn tokens_for(&self, doc_id: &str) -> Option<HashSet<String>> {
        self.forward.get(doc_id).map(|entry| entry.value().clone())
    }

    /// Number of indexed documents (forward entries)
    pub fn doc_count(&self) -> usize {
        self.forward.len()
    }

    /// Number of distinct tokens with at least one member
    pub fn token_count(&self) -> usize {
        self.inverted.len()
    }
}

impl Default for TokenIndex {
    fn default() -> Self {
        Self::new()
    }
}
