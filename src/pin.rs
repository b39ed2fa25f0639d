//! Reference-counted pins on root identifiers
//!
//! Unpinning to zero drops the entry but never deletes blocks. There is no
//! collector: unreferenced blocks stay in the store for the life of the process.

use crate::model::ContentId;
use crate::{Error, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Root identifier -> reference count
#[derive(Debug, Default)]
pub struct PinTable {
    entries: RwLock<HashMap<ContentId, u64>>,
}

impl PinTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one reference, creating the entry if absent. Returns the new count.
    pub fn register(&self, cid: ContentId) -> u64 {
        let mut entries = self.entries.write();
        let count = entries.entry(cid).or_insert(0);
        *count += 1;
        debug!(%cid, count = *count, "pinned");
        *count
    }

    /// Drop one reference. Returns the remaining count.
    ///
    /// Fails with `NotFound` if the identifier has no entry.
    pub fn unpin(&self, cid: &ContentId) -> Result<u64> {
        let mut entries = self.entries.write();
        let count = entries
            .get_mut(cid)
            .ok_or_else(|| Error::NotFound(cid.to_string()))?;

        *count -= 1;
        let remaining = *count;
        if remaining == 0 {
            entries.remove(cid);
        }
        debug!(%cid, remaining, "unpinned");
        Ok(remaining)
    }

    pub fn is_pinned(&self, cid: &ContentId) -> bool {
        self.entries.read().contains_key(cid)
    }

    /// Current reference count (zero if unpinned)
    pub fn count(&self, cid: &ContentId) -> u64 {
        self.entries.read().get(cid).copied().unwrap_or(0)
    }

    /// All pinned identifiers with their counts, sorted by identifier
    pub fn list(&self) -> Vec<(ContentId, u64)> {
        let entries = self.entries.read();
        let mut list: Vec<_> = entries.iter().map(|(k, v)| (*k, *v)).collect();
        list.sort_by_key(|(cid, _)| *cid);
        list
    }

    /// Number of pinned identifiers
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
