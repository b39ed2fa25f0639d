//! Balanced object graph builder

use crate::model::{Block, ContentId, Link, ObjectNode};
use crate::store::BlockStore;
use crate::{Error, Result};
use tracing::debug;

/// Builds object nodes over already-stored children
pub struct DagBuilder<'a, S: BlockStore + ?Sized> {
    store: &'a S,
    max_links: usize,
}

impl<'a, S: BlockStore + ?Sized> DagBuilder<'a, S> {
    pub fn new(store: &'a S, max_links: usize) -> Result<Self> {
        check_max_links(max_links)?;
        Ok(DagBuilder { store, max_links })
    }

    /// Build the graph over ordered leaf links and return the root identifier
    ///
    /// A single link is its own root. Otherwise links are grouped into nodes
    /// of at most `max_links` children, level by level, until one remains.
    pub fn build(&self, links: Vec<Link>) -> Result<ContentId> {
        let root = layout(links, self.max_links, |block| self.store.put(block))?;
        debug!(%root, "built object graph");
        Ok(root)
    }
}

/// The root `DagBuilder::build` would return, without storing any node
pub fn compute_root(links: Vec<Link>, max_links: usize) -> Result<ContentId> {
    check_max_links(max_links)?;
    layout(links, max_links, |block| Ok(*block.cid()))
}

fn check_max_links(max_links: usize) -> Result<()> {
    if max_links < 2 {
        return Err(Error::InvalidInput(format!(
            "max_links must be at least 2, got {}",
            max_links
        )));
    }
    Ok(())
}

/// Group links into nodes level by level, handing each node block to `put`
fn layout<F>(links: Vec<Link>, max_links: usize, mut put: F) -> Result<ContentId>
where
    F: FnMut(&Block) -> Result<ContentId>,
{
    if links.is_empty() {
        return Err(Error::InvalidInput("Cannot build a graph with no links".into()));
    }

    let mut level = links;
    while level.len() > 1 {
        let mut parents = Vec::with_capacity(level.len().div_ceil(max_links));
        for group in level.chunks(max_links) {
            let node = ObjectNode::new(group.to_vec());
            let cid = put(&node.to_block()?)?;
            parents.push(Link::new(cid, node.total_size()));
        }
        level = parents;
    }

    Ok(level[0].cid)
}
