//! # blockpin
//!
//! An in-memory content-addressed block store with deduplication and pinning.
//!
//! Payloads are split into fixed-size raw blocks, each addressed by the
//! BLAKE3 digest of its bytes. Multi-block payloads are described by a
//! balanced graph of object nodes that are themselves content-addressed.
//! The root identifier is pinned with a reference count, and retrieval walks
//! the graph lazily, yielding the original bytes chunk by chunk.
//!
//! ## Core Concepts
//!
//! - **Blocks**: immutable bytes stored once per identifier
//! - **Object nodes**: ordered child links, hashed like any other block
//! - **Pins**: reference counts on root identifiers
//!
//! ## Example
//!
//! ```
//! use blockpin::{Config, Node};
//!
//! let node = Node::new(Config::default())?;
//! let cid = node.ingest(b"hello world")?;
//! assert_eq!(node.fetch_bytes(&cid)?, b"hello world");
//! node.unpin(&cid)?;
//! # Ok::<(), blockpin::Error>(())
//! ```

pub mod chunker;
pub mod config;
pub mod dag;
pub mod model;
pub mod pin;
pub mod store;

mod error;
mod node;

pub use chunker::Chunker;
pub use config::Config;
pub use dag::{Cat, DagStat};
pub use error::{Error, Result};
pub use model::{Block, Codec, ContentId, Hash, Link, ObjectNode};
pub use node::Node;
pub use pin::PinTable;
pub use store::{BlockStore, MemoryBlockStore, StoreStats};
