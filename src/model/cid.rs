//! Content identifiers
//!
//! A CID is a version byte, a codec tag and a BLAKE3 digest of the block bytes.
//! Binary layout (36 bytes):
//!
//! ```text
//! [version: 1][codec: 1][multihash code 0x1e: 1][digest len 0x20: 1][digest: 32]
//! ```
//!
//! The string form is multibase base16: `f` followed by the lowercase hex of
//! the binary layout.

use super::Hash;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Multihash code for BLAKE3-256
const BLAKE3_CODE: u8 = 0x1e;

/// Multibase prefix for lowercase base16
const BASE16_PREFIX: char = 'f';

/// What kind of block a CID addresses
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Codec {
    /// A leaf carrying payload bytes
    Raw,
    /// An object node listing child links
    DagNode,
}

impl Codec {
    pub fn as_byte(&self) -> u8 {
        match self {
            Codec::Raw => 0x55,
            Codec::DagNode => 0x71,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x55 => Some(Codec::Raw),
            0x71 => Some(Codec::DagNode),
            _ => None,
        }
    }
}

/// An immutable, deterministic identifier for a block's content
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentId {
    version: u8,
    codec: Codec,
    hash: Hash,
}

impl ContentId {
    /// The only identifier version produced
    pub const VERSION: u8 = 1;

    /// Length of the binary form
    pub const ENCODED_LEN: usize = 4 + Hash::LEN;

    /// Compute the identifier for bytes of the given codec
    pub fn compute(codec: Codec, data: &[u8]) -> Self {
        ContentId {
            version: Self::VERSION,
            codec,
            hash: Hash::digest(data),
        }
    }

    pub fn codec(&self) -> Codec {
        self.codec
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn hash(&self) -> &Hash {
        &self.hash
    }

    /// Whether this identifier matches the given bytes
    pub fn verify(&self, data: &[u8]) -> bool {
        Hash::digest(data) == self.hash
    }

    /// Binary form
    pub fn to_bytes(&self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        out[0] = self.version;
        out[1] = self.codec.as_byte();
        out[2] = BLAKE3_CODE;
        out[3] = Hash::LEN as u8;
        out[4..].copy_from_slice(self.hash.as_bytes());
        out
    }

    /// Parse the binary form
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::ENCODED_LEN {
            return Err(Error::InvalidInput(format!(
                "CID must be {} bytes, got {}",
                Self::ENCODED_LEN,
                bytes.len()
            )));
        }
        if bytes[0] != Self::VERSION {
            return Err(Error::InvalidInput(format!(
                "Unsupported CID version: {}",
                bytes[0]
            )));
        }
        let codec = Codec::from_byte(bytes[1])
            .ok_or_else(|| Error::InvalidInput(format!("Unknown codec: {:#04x}", bytes[1])))?;
        if bytes[2] != BLAKE3_CODE || bytes[3] as usize != Hash::LEN {
            return Err(Error::InvalidInput(format!(
                "Unsupported multihash: code {:#04x}, length {}",
                bytes[2], bytes[3]
            )));
        }

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&bytes[4..]);
        Ok(ContentId {
            version: bytes[0],
            codec,
            hash: Hash::from_bytes(digest),
        })
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", BASE16_PREFIX, hex::encode(self.to_bytes()))
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({:?}, {})", self.codec, self.hash.short())
    }
}

impl FromStr for ContentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let body = s
            .strip_prefix(BASE16_PREFIX)
            .ok_or_else(|| Error::InvalidInput(format!("Unsupported multibase in CID: {}", s)))?;
        let bytes = hex::decode(body)
            .map_err(|e| Error::InvalidInput(format!("Invalid CID {}: {}", s, e)))?;
        Self::from_slice(&bytes)
    }
}
