//! Content-addressed block store
//!
//! Blocks are keyed by their content identifier and written at most once.
//! Stored bytes may be zstd-compressed; identity is always over the
//! uncompressed bytes.

mod frame;
mod memory;

pub use frame::Encoding;
pub use memory::MemoryBlockStore;

use crate::model::{Block, ContentId};
use crate::Result;
use serde::Serialize;

/// Storage usage counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Number of distinct blocks
    pub blocks: usize,
    /// Uncompressed bytes across all blocks
    pub logical_bytes: u64,
    /// Bytes actually held, after compression
    pub stored_bytes: u64,
}

/// Content-addressed block storage.
///
/// Implementations must satisfy:
/// - `put` verifies that the block's bytes hash to its identifier.
/// - `put` is idempotent; storage grows only on the first write of an identifier.
/// - `get` of an unknown identifier fails with `NotFound`.
/// - Concurrent calls from multiple threads are safe.
pub trait BlockStore: Send + Sync {
    /// Store a block and return its identifier
    fn put(&self, block: &Block) -> Result<ContentId>;

    /// Retrieve a block by identifier
    fn get(&self, cid: &ContentId) -> Result<Block>;

    /// Check if an identifier is stored
    fn has(&self, cid: &ContentId) -> bool;

    /// Uncompressed size of a stored block, without reading its bytes
    fn size(&self, cid: &ContentId) -> Result<u64>;

    /// Remove a block. Returns `true` if it existed.
    ///
    /// Only meant for collection of unreferenced blocks.
    fn delete(&self, cid: &ContentId) -> Result<bool>;

    /// Usage counters
    fn stats(&self) -> StoreStats;

    /// Number of distinct blocks
    fn len(&self) -> usize {
        self.stats().blocks
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
