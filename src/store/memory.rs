//! In-memory block store

use super::frame;
use super::{BlockStore, StoreStats};
use crate::config::Config;
use crate::model::{Block, ContentId};
use crate::{Error, Result};
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, warn};

/// A stored block
#[derive(Clone, Debug)]
struct Entry {
    frame: Bytes,
    size: u64,
}

/// Index of blocks by identifier
#[derive(Default)]
struct Index {
    entries: HashMap<ContentId, Entry>,
    logical_bytes: u64,
    stored_bytes: u64,
}

/// A content-addressed block store held entirely in memory
///
/// Contents do not survive the process.
pub struct MemoryBlockStore {
    index: RwLock<Index>,
    compression_level: Option<i32>,
    verify_on_read: bool,
}

impl MemoryBlockStore {
    /// Uncompressed store that verifies on read
    pub fn new() -> Self {
        MemoryBlockStore {
            index: RwLock::new(Index::default()),
            compression_level: None,
            verify_on_read: true,
        }
    }

    /// Store using the compression and verification settings of a config
    pub fn from_config(config: &Config) -> Self {
        MemoryBlockStore {
            index: RwLock::new(Index::default()),
            compression_level: config.compression_level,
            verify_on_read: config.verify_on_read,
        }
    }

    /// All stored identifiers, sorted
    pub fn cids(&self) -> Vec<ContentId> {
        let index = self.index.read();
        let mut cids: Vec<ContentId> = index.entries.keys().copied().collect();
        cids.sort();
        cids
    }
}

impl Default for MemoryBlockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockStore for MemoryBlockStore {
    fn put(&self, block: &Block) -> Result<ContentId> {
        let cid = *block.cid();
        if !block.is_valid() {
            return Err(Error::Corrupt(format!(
                "Block bytes do not hash to {}",
                cid
            )));
        }

        // Check if already exists
        if self.index.read().entries.contains_key(&cid) {
            debug!(%cid, "block already stored");
            return Ok(cid);
        }

        // Compress outside the write lock
        let frame = frame::encode(block.data(), self.compression_level)?;
        let size = block.size() as u64;

        let mut index = self.index.write();
        if index.entries.contains_key(&cid) {
            return Ok(cid);
        }
        index.logical_bytes += size;
        index.stored_bytes += frame.len() as u64;
        index.entries.insert(cid, Entry { frame, size });
        debug!(%cid, size, "stored block");

        Ok(cid)
    }

    fn get(&self, cid: &ContentId) -> Result<Block> {
        let entry = {
            let index = self.index.read();
            index.entries.get(cid).cloned()
        };
        let entry = entry.ok_or_else(|| Error::NotFound(cid.to_string()))?;

        let data = frame::decode(&entry.frame)?;
        if self.verify_on_read && !cid.verify(&data) {
            warn!(%cid, "stored block failed verification");
            return Err(Error::Corrupt(format!(
                "Stored bytes do not hash to {}",
                cid
            )));
        }

        Ok(Block::with_cid(*cid, data))
    }

    fn has(&self, cid: &ContentId) -> bool {
        self.index.read().entries.contains_key(cid)
    }

    fn size(&self, cid: &ContentId) -> Result<u64> {
        self.index
            .read()
            .entries
            .get(cid)
            .map(|entry| entry.size)
            .ok_or_else(|| Error::NotFound(cid.to_string()))
    }

    fn delete(&self, cid: &ContentId) -> Result<bool> {
        let mut index = self.index.write();
        match index.entries.remove(cid) {
            Some(entry) => {
                index.logical_bytes -= entry.size;
                index.stored_bytes -= entry.frame.len() as u64;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn stats(&self) -> StoreStats {
        let index = self.index.read();
        StoreStats {
            blocks: index.entries.len(),
            logical_bytes: index.logical_bytes,
            stored_bytes: index.stored_bytes,
        }
    }
}

impl std::fmt::Debug for MemoryBlockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBlockStore")
            .field("block_count", &self.len())
            .field("compression_level", &self.compression_level)
            .finish()
    }
}
