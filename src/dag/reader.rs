//! Lazy retrieval of payload bytes from an object graph

use crate::model::{Codec, ContentId, ObjectNode};
use crate::store::BlockStore;
use crate::{Error, Result};
use bytes::Bytes;
use serde::Serialize;

/// Size summary for a graph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DagStat {
    /// Payload bytes reconstructed by `cat`
    pub size: u64,
    /// Blocks in the graph, leaves and nodes
    pub blocks: usize,
}

/// Read-only access to graphs in a block store
pub struct DagReader<'a, S: BlockStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: BlockStore + ?Sized> DagReader<'a, S> {
    pub fn new(store: &'a S) -> Self {
        DagReader { store }
    }

    /// Stream the payload under `root`, leaf by leaf, in original order
    pub fn cat(&self, root: ContentId) -> Cat<'a, S> {
        Cat {
            store: self.store,
            pending: vec![root],
        }
    }

    /// Total size and block count, without reading leaf bytes
    pub fn stat(&self, root: &ContentId) -> Result<DagStat> {
        if root.codec() == Codec::Raw {
            return Ok(DagStat {
                size: self.store.size(root)?,
                blocks: 1,
            });
        }

        let mut size = None;
        let mut blocks = 0;
        let mut pending = vec![*root];
        while let Some(cid) = pending.pop() {
            let node = ObjectNode::from_block(&self.store.get(&cid)?)?;
            size.get_or_insert(node.total_size());
            blocks += 1;

            for link in &node.links {
                match link.cid.codec() {
                    Codec::DagNode => pending.push(link.cid),
                    Codec::Raw => {
                        if !self.store.has(&link.cid) {
                            return Err(Error::NotFound(link.cid.to_string()));
                        }
                        blocks += 1;
                    }
                }
            }
        }

        Ok(DagStat {
            size: size.unwrap_or(0),
            blocks,
        })
    }
}

/// Iterator over the payload chunks of a graph
///
/// Blocks are read from the store only as the iterator advances. A missing
/// or malformed block is yielded as an error, after which iteration ends.
pub struct Cat<'a, S: BlockStore + ?Sized> {
    store: &'a S,
    /// Identifiers still to visit, next on top
    pending: Vec<ContentId>,
}

impl<S: BlockStore + ?Sized> Cat<'_, S> {
    fn fail(&mut self, err: Error) -> Option<Result<Bytes>> {
        self.pending.clear();
        Some(Err(err))
    }

    /// Collect the remaining payload into one buffer
    pub fn read_to_vec(self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for chunk in self {
            out.extend_from_slice(&chunk?);
        }
        Ok(out)
    }
}

impl<S: BlockStore + ?Sized> Iterator for Cat<'_, S> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(cid) = self.pending.pop() {
            let block = match self.store.get(&cid) {
                Ok(block) => block,
                Err(e) => return self.fail(e),
            };

            match cid.codec() {
                Codec::Raw => return Some(Ok(block.into_data())),
                Codec::DagNode => match ObjectNode::from_block(&block) {
                    Ok(node) => self.pending.extend(node.links.iter().rev().map(|l| l.cid)),
                    Err(e) => return self.fail(e),
                },
            }
        }
        None
    }
}
