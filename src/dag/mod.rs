//! Object graph construction and traversal
//!
//! Inputs larger than one chunk are described by a balanced tree of object
//! nodes. Leaves are raw blocks; every interior node lists its children in
//! payload order.

mod builder;
mod reader;

pub use builder::{compute_root, DagBuilder};
pub use reader::{Cat, DagReader, DagStat};
