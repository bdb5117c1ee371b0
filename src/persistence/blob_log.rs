use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::PathBuf;

use crc32fast::Hasher;
use parking_lot::Mutex;

use crate::error::{CuttleError, Result};

/// Pointer to a record inside the blob log.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BlobPointer {
    pub offset: u64,
    pub len: u32,
    pub crc32: u32,
}

impl BlobPointer {
    pub fn new(offset: u64, len: u32, crc32: u32) -> Self {
        Self { offset, len, crc32 }
    }
}

/// Append-only log of serialized document bodies.
///
/// Record format:
/// - u32 payload length (little endian)
/// - u32 crc32 of payload (little endian)
/// - raw payload bytes
///
/// A record only becomes reachable once its pointer is stored by the
/// caller, which happens after the append returns; concurrent readers never
/// observe a partially written record. Checksums catch torn writes left by
/// a hard crash.
pub struct BlobLog {
    file: Mutex<File>,
}

impl BlobLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)?;

        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Append a payload and return its pointer.
    pub fn append(&self, payload: &[u8]) -> Result<BlobPointer> {
        let mut file = self.file.lock();
        let offset = file.seek(SeekFrom::End(0))?;

        let len = payload.len() as u32;
        let mut hasher = Hasher::new();
        hasher.update(payload);
        let crc32 = hasher.finalize();

        file.write_all(&len.to_le_bytes())?;
        file.write_all(&crc32.to_le_bytes())?;
        file.write_all(payload)?;

        Ok(BlobPointer::new(offset, len, crc32))
    }

    /// Read a payload given its pointer, validating the checksum.
    pub fn read(&self, ptr: BlobPointer) -> Result<Vec<u8>> {
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(ptr.offset))?;

        let mut len_buf = [0u8; 4];
        file.read_exact(&mut len_buf)?;
        let len = u32::from_le_bytes(len_buf);

        let mut crc_buf = [0u8; 4];
        file.read_exact(&mut crc_buf)?;
        let stored_crc = u32::from_le_bytes(crc_buf);

        if len != ptr.len {
            return Err(CuttleError::Storage(format!(
                "blob length mismatch at offset {}: expected {}, found {}",
                ptr.offset, ptr.len, len
            )));
        }

        let mut payload = vec![0u8; len as usize];
        file.read_exact(&mut payload)?;

        let mut hasher = Hasher::new();
        hasher.update(&payload);
        let crc = hasher.finalize();
        if crc != stored_crc || crc != ptr.crc32 {
            return Err(CuttleError::Storage(format!(
                "blob checksum mismatch at offset {} (corrupt record)",
                ptr.offset
            )));
        }

        Ok(payload)
    }
}
