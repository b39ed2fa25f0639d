//! Stored representation of a block's bytes

use crate::{Error, Result};
use bytes::Bytes;

/// How a block's bytes are held in the store
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Plain,
    Zstd,
}

impl Encoding {
    pub fn as_byte(&self) -> u8 {
        match self {
            Encoding::Plain => 0,
            Encoding::Zstd => 1,
        }
    }

    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Encoding::Plain),
            1 => Some(Encoding::Zstd),
            _ => None,
        }
    }
}

/// Encode block bytes: one encoding byte, then the (maybe compressed) payload
pub(crate) fn encode(data: &[u8], compression_level: Option<i32>) -> Result<Bytes> {
    let mut output = Vec::with_capacity(data.len() + 1);
    match compression_level {
        Some(level) => {
            output.push(Encoding::Zstd.as_byte());
            let compressed = zstd::encode_all(data, level)?;
            output.extend(compressed);
        }
        None => {
            output.push(Encoding::Plain.as_byte());
            output.extend_from_slice(data);
        }
    }
    Ok(Bytes::from(output))
}

/// Decode a stored frame back into block bytes
pub(crate) fn decode(frame: &Bytes) -> Result<Bytes> {
    if frame.is_empty() {
        return Err(Error::Corrupt("Empty block frame".into()));
    }

    let encoding = Encoding::from_byte(frame[0])
        .ok_or_else(|| Error::Corrupt(format!("Invalid block encoding: {}", frame[0])))?;

    match encoding {
        // Zero-copy slice of the stored frame
        Encoding::Plain => Ok(frame.slice(1..)),
        Encoding::Zstd => {
            let decompressed = zstd::decode_all(&frame[1..])
                .map_err(|e| Error::Corrupt(format!("Failed to decompress block: {}", e)))?;
            Ok(Bytes::from(decompressed))
        }
    }
}
