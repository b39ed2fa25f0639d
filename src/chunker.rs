//! Fixed-size chunking of input bytes into raw leaf blocks

use crate::model::Block;
use crate::{Error, Result};
use std::io::{ErrorKind, Read};

/// Splits input into fixed-size raw blocks
///
/// Every chunk except the last is exactly `chunk_size` bytes. Empty input
/// yields a single empty block.
#[derive(Clone, Copy, Debug)]
pub struct Chunker {
    chunk_size: usize,
}

impl Chunker {
    pub fn new(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::InvalidInput("chunk_size must be positive".into()));
        }
        Ok(Chunker { chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Chunk an in-memory byte slice
    pub fn chunk(&self, data: &[u8]) -> Vec<Block> {
        if data.is_empty() {
            return vec![Block::raw(Vec::new())];
        }
        data.chunks(self.chunk_size)
            .map(|c| Block::raw(c.to_vec()))
            .collect()
    }

    /// Chunk a reader lazily, one block per call to `next`
    pub fn chunks<R: Read>(&self, reader: R) -> Chunks<R> {
        Chunks {
            reader,
            chunk_size: self.chunk_size,
            emitted: false,
            done: false,
        }
    }
}

/// Iterator over blocks read from a `Read`
pub struct Chunks<R> {
    reader: R,
    chunk_size: usize,
    emitted: bool,
    done: bool,
}

impl<R: Read> Chunks<R> {
    /// Fill a buffer up to `chunk_size`, stopping early only at EOF
    fn read_chunk(&mut self) -> std::io::Result<Vec<u8>> {
        let mut buf = vec![0u8; self.chunk_size];
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        buf.truncate(filled);
        Ok(buf)
    }
}

impl<R: Read> Iterator for Chunks<R> {
    type Item = Result<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let buf = match self.read_chunk() {
            Ok(buf) => buf,
            Err(e) => {
                self.done = true;
                return Some(Err(e.into()));
            }
        };

        if buf.len() < self.chunk_size {
            self.done = true;
            // An empty tail is only a block when nothing came before it
            if buf.is_empty() && self.emitted {
                return None;
            }
        }

        self.emitted = true;
        Some(Ok(Block::raw(buf)))
    }
}
