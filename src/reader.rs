//! Forward-only chunk reader.
//!
//! [`ChunkReader`] walks a PNG byte buffer one chunk at a time.  The
//! signature is validated up front; every frame is bounds-checked before it
//! is sliced and every CRC32 is verified before the chunk is handed out.
//! After the first error the iterator is fused.
//!
//! # Frame layout
//! `length (u32 BE) | type (4 B) | payload (length B) | crc (u32 BE)`

use byteorder::{BigEndian, ByteOrder};
use tracing::{trace, warn};

use crate::chunk::{Chunk, ChunkType, RawChunk};
use crate::crc::chunk_crc;
use crate::error::{ChunkError, Result};
use crate::signature::{check_signature, SIGNATURE_LEN};

/// Length field + type tag.
pub const FRAME_HEADER_LEN: usize = 8;
/// Trailing CRC32.
pub const FRAME_TRAILER_LEN: usize = 4;

pub struct ChunkReader<'a> {
    bytes:  &'a [u8],
    pos:    usize,
    failed: bool,
}

impl<'a> ChunkReader<'a> {
    /// Validate the signature and position the cursor on the first chunk.
    pub fn new(bytes: &'a [u8]) -> Result<Self> {
        check_signature(bytes)?;
        Ok(Self { bytes, pos: SIGNATURE_LEN, failed: false })
    }

    /// Byte offset of the next chunk.
    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn is_finished(&self) -> bool {
        self.failed || self.pos >= self.bytes.len()
    }

    fn ensure(&self, start: usize, needed: usize) -> Result<()> {
        let available = self.bytes.len() - start;
        if needed > available {
            return Err(ChunkError::Truncated { offset: start, needed, available });
        }
        Ok(())
    }

    fn read_next(&mut self) -> Result<RawChunk<'a>> {
        let start = self.pos;
        self.ensure(start, FRAME_HEADER_LEN)?;

        let length = BigEndian::read_u32(&self.bytes[start..start + 4]) as usize;
        let mut tag = [0u8; 4];
        tag.copy_from_slice(&self.bytes[start + 4..start + 8]);
        let chunk_type = ChunkType::from_bytes(tag);

        let data_start = start + FRAME_HEADER_LEN;
        self.ensure(data_start, length.saturating_add(FRAME_TRAILER_LEN))?;
        let data_end = data_start + length;
        let end      = data_end + FRAME_TRAILER_LEN;

        let data   = &self.bytes[data_start..data_end];
        let stored = BigEndian::read_u32(&self.bytes[data_end..end]);
        let computed = chunk_crc(&tag, data);
        if stored != computed {
            warn!(%chunk_type, offset = start, stored, computed, "chunk CRC mismatch");
            return Err(ChunkError::ChecksumMismatch { chunk_type, stored, computed });
        }

        self.pos = end;
        trace!(%chunk_type, offset = start, length, "read chunk");
        Ok(RawChunk::new(
            Chunk::new(chunk_type, data),
            stored,
            start,
            &self.bytes[start..end],
        ))
    }
}

impl<'a> Iterator for ChunkReader<'a> {
    type Item = Result<RawChunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_finished() {
            return None;
        }
        let result = self.read_next();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

impl std::iter::FusedIterator for ChunkReader<'_> {}

/// Read every chunk of `bytes`, failing on the first bad frame.
pub fn read_chunks(bytes: &[u8]) -> Result<Vec<RawChunk<'_>>> {
    ChunkReader::new(bytes)?.collect()
}
