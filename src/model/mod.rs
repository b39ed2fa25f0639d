//! Core data model types for blockpin

mod block;
mod cid;
mod hash;
mod node;

pub use block::Block;
pub use cid::{Codec, ContentId};
pub use hash::Hash;
pub use node::{Link, ObjectNode};
