//! High-level Node API
//!
//! This module provides the main entry point: one block store and one pin
//! table, shared by every caller holding a reference to the node.

use crate::chunker::Chunker;
use crate::config::Config;
use crate::dag::{compute_root, Cat, DagBuilder, DagReader, DagStat};
use crate::model::{ContentId, Link};
use crate::pin::PinTable;
use crate::store::{BlockStore, MemoryBlockStore, StoreStats};
use crate::{Error, Result};
use std::io::Read;
use tracing::info;

/// A content-addressed storage node
///
/// Provides:
/// - Ingest of byte payloads, returning a root identifier (implicitly pinned)
/// - Lazy retrieval of pinned payloads
/// - Reference-counted pinning
pub struct Node<S: BlockStore = MemoryBlockStore> {
    config: Config,
    chunker: Chunker,
    store: S,
    pins: PinTable,
}

impl Node<MemoryBlockStore> {
    /// Create a node backed by an in-memory store
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let store = MemoryBlockStore::from_config(&config);
        Self::with_store(config, store)
    }
}

impl<S: BlockStore> Node<S> {
    /// Create a node over an existing store
    pub fn with_store(config: Config, store: S) -> Result<Self> {
        config.validate()?;
        Ok(Node {
            chunker: Chunker::new(config.chunk_size)?,
            config,
            store,
            pins: PinTable::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // === Ingest ===

    /// Chunk, store and pin a payload; returns its root identifier
    pub fn ingest(&self, data: &[u8]) -> Result<ContentId> {
        self.ingest_reader(data)
    }

    /// Like `ingest`, reading the payload one chunk at a time
    pub fn ingest_reader<R: Read>(&self, reader: R) -> Result<ContentId> {
        let mut links = Vec::new();
        let mut size = 0u64;
        for block in self.chunker.chunks(reader) {
            let block = block?;
            let cid = self.store.put(&block)?;
            size += block.size() as u64;
            links.push(Link::new(cid, block.size() as u64));
        }

        let chunks = links.len();
        let root = self.builder()?.build(links)?;
        self.pins.register(root);
        info!(cid = %root, size, chunks, "added content");
        Ok(root)
    }

    /// Compute the root identifier a payload would get, storing nothing
    pub fn hash_only(&self, data: &[u8]) -> Result<ContentId> {
        let mut links = Vec::new();
        for block in self.chunker.chunks(data) {
            let block = block?;
            links.push(Link::new(*block.cid(), block.size() as u64));
        }

        compute_root(links, self.config.max_links)
    }

    // === Retrieval ===

    /// Stream a pinned payload
    ///
    /// Fails with `NotFound` if the identifier is not pinned, even when its
    /// blocks are still stored.
    pub fn fetch(&self, cid: &ContentId) -> Result<Cat<'_, S>> {
        if !self.pins.is_pinned(cid) {
            return Err(Error::NotFound(cid.to_string()));
        }
        Ok(self.cat(cid))
    }

    /// `fetch` keyed by the identifier's string form
    ///
    /// A string that is not a valid identifier cannot name pinned content,
    /// so it fails with `NotFound`, like any other unknown key.
    pub fn fetch_str(&self, cid: &str) -> Result<Cat<'_, S>> {
        self.fetch(&lookup_key(cid)?)
    }

    /// Fetch a pinned payload into one buffer
    pub fn fetch_bytes(&self, cid: &ContentId) -> Result<Vec<u8>> {
        self.fetch(cid)?.read_to_vec()
    }

    /// Stream any stored payload, pinned or not
    pub fn cat(&self, cid: &ContentId) -> Cat<'_, S> {
        DagReader::new(&self.store).cat(*cid)
    }

    /// Size and block count of a stored graph
    pub fn stat(&self, cid: &ContentId) -> Result<DagStat> {
        DagReader::new(&self.store).stat(cid)
    }

    pub fn store_stats(&self) -> StoreStats {
        self.store.stats()
    }

    // === Pinning ===

    /// Add a reference to a stored root. Returns the new count.
    pub fn pin(&self, cid: &ContentId) -> Result<u64> {
        if !self.store.has(cid) {
            return Err(Error::NotFound(cid.to_string()));
        }
        Ok(self.pins.register(*cid))
    }

    /// Drop a reference. Blocks are kept; see [`PinTable`].
    pub fn unpin(&self, cid: &ContentId) -> Result<u64> {
        self.pins.unpin(cid)
    }

    /// `unpin` keyed by the identifier's string form; unparseable is `NotFound`
    pub fn unpin_str(&self, cid: &str) -> Result<u64> {
        self.unpin(&lookup_key(cid)?)
    }

    pub fn is_pinned(&self, cid: &ContentId) -> bool {
        self.pins.is_pinned(cid)
    }

    /// All pinned roots with their reference counts
    pub fn pins(&self) -> Vec<(ContentId, u64)> {
        self.pins.list()
    }

    fn builder(&self) -> Result<DagBuilder<'_, S>> {
        DagBuilder::new(&self.store, self.config.max_links)
    }
}

/// Parse a caller-supplied key, reporting garbage as an unknown identifier
fn lookup_key(cid: &str) -> Result<ContentId> {
    cid.parse().map_err(|_| Error::NotFound(cid.to_string()))
}
