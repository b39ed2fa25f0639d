//! Block type - the unit of content-addressed storage

use super::{Codec, ContentId};
use bytes::Bytes;

/// Raw bytes together with the identifier they hash to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    cid: ContentId,
    data: Bytes,
}

impl Block {
    /// Create a block, computing its identifier
    pub fn new(codec: Codec, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Block {
            cid: ContentId::compute(codec, &data),
            data,
        }
    }

    /// A leaf block carrying payload bytes
    pub fn raw(data: impl Into<Bytes>) -> Self {
        Self::new(Codec::Raw, data)
    }

    /// Pair bytes with an identifier without hashing.
    ///
    /// Stores check the pairing on `put`.
    pub fn with_cid(cid: ContentId, data: impl Into<Bytes>) -> Self {
        Block {
            cid,
            data: data.into(),
        }
    }

    pub fn cid(&self) -> &ContentId {
        &self.cid
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn into_data(self) -> Bytes {
        self.data
    }

    /// Size of the block's bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Whether the bytes hash to the identifier
    pub fn is_valid(&self) -> bool {
        self.cid.verify(&self.data)
    }
}
