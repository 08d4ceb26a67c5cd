//! Chunk assembler.
//!
//! [`ChunkWriter`] starts by emitting the PNG signature, then appends raw
//! fragments and freshly framed chunks in call order.  `finish` consumes the
//! writer, so nothing can be appended once the output has been handed back.

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::chunk::Chunk;
use crate::error::{ChunkError, Result};
use crate::reader::{FRAME_HEADER_LEN, FRAME_TRAILER_LEN};
use crate::signature::SIGNATURE;

pub struct ChunkWriter<W: Write> {
    writer:        W,
    bytes_written: u64,
    chunks:        usize,
}

impl<W: Write> ChunkWriter<W> {
    /// Create a writer and emit the signature.
    pub fn new(mut writer: W) -> Result<Self> {
        writer.write_all(&SIGNATURE)?;
        Ok(Self {
            writer,
            bytes_written: SIGNATURE.len() as u64,
            chunks:        0,
        })
    }

    /// Append bytes verbatim.  The caller is responsible for their framing.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.bytes_written += bytes.len() as u64;
        Ok(())
    }

    /// Frame `chunk` with a fresh length field and CRC32 and append it.
    pub fn write_chunk(&mut self, chunk: &Chunk<'_>) -> Result<()> {
        let length = u32::try_from(chunk.len())
            .map_err(|_| ChunkError::ChunkTooLarge(chunk.len()))?;
        self.writer.write_u32::<BigEndian>(length)?;
        self.writer.write_all(&chunk.chunk_type.as_bytes())?;
        self.writer.write_all(chunk.data())?;
        self.writer.write_u32::<BigEndian>(chunk.crc())?;
        self.bytes_written += (FRAME_HEADER_LEN + chunk.len() + FRAME_TRAILER_LEN) as u64;
        self.chunks += 1;
        Ok(())
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Number of chunks framed by [`write_chunk`](Self::write_chunk).
    /// Raw fragments are not counted.
    pub fn chunks_written(&self) -> usize {
        self.chunks
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl ChunkWriter<Vec<u8>> {
    /// Writer over a fresh in-memory buffer.
    pub fn in_memory() -> Self {
        let mut buf = Vec::with_capacity(1024);
        buf.extend_from_slice(&SIGNATURE);
        Self {
            writer:        buf,
            bytes_written: SIGNATURE.len() as u64,
            chunks:        0,
        }
    }

    /// Finished buffer.  Writing to a `Vec` cannot fail.
    pub fn into_bytes(self) -> Vec<u8> {
        self.writer
    }
}

/// Serialize a single chunk frame (no signature).
pub fn encode_chunk(chunk: &Chunk<'_>) -> Result<Vec<u8>> {
    let length = u32::try_from(chunk.len()).map_err(|_| ChunkError::ChunkTooLarge(chunk.len()))?;
    let mut out = Vec::with_capacity(FRAME_HEADER_LEN + chunk.len() + FRAME_TRAILER_LEN);
    out.write_u32::<BigEndian>(length)?;
    out.extend_from_slice(&chunk.chunk_type.as_bytes());
    out.extend_from_slice(chunk.data());
    out.write_u32::<BigEndian>(chunk.crc())?;
    Ok(out)
}
