//! Object nodes - interior vertices of the object graph

use super::{Block, Codec, ContentId};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A reference from a node to one child
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// The child's identifier
    pub cid: ContentId,
    /// Payload bytes reachable through the child
    pub size: u64,
}

impl Link {
    pub fn new(cid: ContentId, size: u64) -> Self {
        Link { cid, size }
    }
}

/// Ordered child links describing how an input was split
///
/// Serialization is bincode over the link list, so the same links always
/// produce the same bytes and therefore the same identifier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectNode {
    pub links: Vec<Link>,
}

impl ObjectNode {
    pub fn new(links: Vec<Link>) -> Self {
        ObjectNode { links }
    }

    /// Total payload bytes under this node
    pub fn total_size(&self) -> u64 {
        self.links.iter().map(|l| l.size).sum()
    }

    /// Encode into a `DagNode` block
    pub fn to_block(&self) -> Result<Block> {
        let data = bincode::serialize(self)?;
        Ok(Block::new(Codec::DagNode, data))
    }

    /// Decode from a `DagNode` block
    pub fn from_block(block: &Block) -> Result<Self> {
        if block.cid().codec() != Codec::DagNode {
            return Err(Error::InvalidInput(format!(
                "Expected DagNode, got {:?}",
                block.cid().codec()
            )));
        }
        let node: ObjectNode = bincode::deserialize(block.data())
            .map_err(|e| Error::InvalidInput(format!("Malformed node {}: {}", block.cid(), e)))?;
        if node.links.is_empty() {
            return Err(Error::InvalidInput(format!(
                "Node {} has no links",
                block.cid()
            )));
        }
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(n: usize) -> Vec<Link> {
        (0..n)
            .map(|i| Link::new(ContentId::compute(Codec::Raw, &[i as u8]), 1))
            .collect()
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let a = ObjectNode::new(links(3)).to_block().unwrap();
        let b = ObjectNode::new(links(3)).to_block().unwrap();
        assert_eq!(a.cid(), b.cid());
        assert_eq!(a.cid().codec(), Codec::DagNode);
    }

    #[test]
    fn test_order_matters() {
        let mut reversed = links(3);
        reversed.reverse();
        let a = ObjectNode::new(links(3)).to_block().unwrap();
        let b = ObjectNode::new(reversed).to_block().unwrap();
        assert_ne!(a.cid(), b.cid());
    }

    #[test]
    fn test_decode_rejects_raw_and_garbage() {
        let raw = Block::raw(&b"not a node"[..]);
        assert!(matches!(
            ObjectNode::from_block(&raw),
            Err(Error::InvalidInput(_))
        ));

        let garbage = Block::new(Codec::DagNode, &b"\xff\xff"[..]);
        assert!(matches!(
            ObjectNode::from_block(&garbage),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_decode_roundtrip_and_size() {
        let node = ObjectNode::new(links(4));
        let block = node.to_block().unwrap();
        let decoded = ObjectNode::from_block(&block).unwrap();
        assert_eq!(decoded, node);
        assert_eq!(decoded.total_size(), 4);
    }
}
