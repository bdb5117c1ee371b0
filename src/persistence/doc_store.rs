use std::path::PathBuf;

use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};

use crate::error::{CuttleError, Result};
use crate::models::{Document, DocumentId};
use crate::persistence::{BlobLog, BlobPointer};

const DOCPTR_PARTITION: &str = "docptr";

/// Fjall-backed durable document store with an append-only blob log.
///
/// The partition maps document id to a serialized `BlobPointer`; bodies
/// live in the blob log as JSON. Deletion removes the pointer record
/// outright, so a deleted document disappears from `retrieve` and
/// `iter_documents` alike — there is no tombstone state.
pub struct DocStore {
    keyspace: Keyspace,
    docptr: PartitionHandle,
    blob_log: BlobLog,
}

impl DocStore {
    pub fn open(base_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&base_dir)?;

        let keyspace = Config::new(&base_dir)
            .open()
            .map_err(|e| CuttleError::Storage(format!("failed to open doc store: {}", e)))?;
        let docptr = keyspace
            .open_partition(DOCPTR_PARTITION, PartitionCreateOptions::default())
            .map_err(|e| {
                CuttleError::Storage(format!("failed to open docptr partition: {}", e))
            })?;

        let blob_log = BlobLog::open(base_dir.join("doc.blob"))?;

        Ok(Self {
            keyspace,
            docptr,
            blob_log,
        })
    }

    /// Persist a document: append the body to the blob log, then store the
    /// pointer. Idempotently overwrites any previous record for `id`.
    pub fn store(&self, id: &str, doc: &Document) -> Result<()> {
        let payload = serde_json::to_vec(doc)?;
        let ptr = self.blob_log.append(&payload)?;
        let val = bincode::serialize(&ptr)?;
        self.docptr
            .insert(id, val)
            .map_err(|e| CuttleError::Storage(e.to_string()))?;
        self.persist()
    }

    pub fn retrieve(&self, id: &str) -> Result<Option<Document>> {
        let Some(val) = self
            .docptr
            .get(id)
            .map_err(|e| CuttleError::Storage(e.to_string()))?
        else {
            return Ok(None);
        };
        Ok(Some(self.load_pointer(&val)?))
    }

    pub fn contains(&self, id: &str) -> Result<bool> {
        self.docptr
            .contains_key(id)
            .map_err(|e| CuttleError::Storage(e.to_string()))
    }

    /// Physically delete a document record.
    ///
    /// The blob bytes stay behind in the append-only log as unreferenced
    /// garbage; only the pointer record makes a document reachable.
    pub fn delete(&self, id: &str) -> Result<()> {
        if !self.contains(id)? {
            return Err(CuttleError::DocumentNotFound(id.to_string()));
        }
        self.docptr
            .remove(id)
            .map_err(|e| CuttleError::Storage(e.to_string()))?;
        self.persist()
    }

    /// Lazy iterator over every stored document.
    ///
    /// Finite and restartable (each call starts a fresh scan). Unreadable
    /// records surface as item-level errors so bulk consumers can skip them
    /// without aborting the scan.
    pub fn iter_documents(&self) -> impl Iterator<Item = (DocumentId, Result<Document>)> + '_ {
        self.docptr.iter().map(|kv| match kv {
            Ok((key, val)) => {
                let id = String::from_utf8_lossy(&key).into_owned();
                let doc = self.load_pointer(&val);
                (id, doc)
            }
            Err(e) => (String::new(), Err(CuttleError::Storage(e.to_string()))),
        })
    }

    fn load_pointer(&self, val: &[u8]) -> Result<Document> {
        let ptr: BlobPointer = bincode::deserialize(val)?;
        let payload = self.blob_log.read(ptr)?;
        Ok(serde_json::from_slice(&payload)?)
    }

    fn persist(&self) -> Result<()> {
        self.keyspace
            .persist(PersistMode::Buffer)
            .map_err(|e| CuttleError::Storage(e.to_string()))
    }
}
