//! Transform engine: read → handler → write, one chunk at a time.
//!
//! For every chunk in the input the handler returns an ordered list of
//! [`Emit`] actions.  The engine applies them before reading the next chunk,
//! so the output is always the signature followed by the concatenation, in
//! input order, of every handler's actions.
//!
//! A chunk for which the handler returns no actions is dropped.
//!
//! # Atomicity
//! Output is built in a buffer owned by the call.  Any error (bad
//! signature, truncation, CRC mismatch, handler failure) discards it; there
//! is no partial result.

use std::borrow::Cow;

use tracing::{debug, trace};

use crate::chunk::{Chunk, RawChunk};
use crate::error::{ChunkError, Result};
use crate::reader::ChunkReader;
use crate::writer::ChunkWriter;

/// One emission decided by a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emit<'a> {
    /// Copy the current chunk's original bytes unchanged.
    PassThrough,
    /// Frame a chunk with a fresh length field and CRC.
    Chunk(Chunk<'a>),
    /// Append bytes verbatim.
    Raw(Cow<'a, [u8]>),
}

impl<'a> Emit<'a> {
    pub fn raw(bytes: impl Into<Cow<'a, [u8]>>) -> Self {
        Emit::Raw(bytes.into())
    }
}

impl<'a> From<Chunk<'a>> for Emit<'a> {
    fn from(chunk: Chunk<'a>) -> Self {
        Emit::Chunk(chunk)
    }
}

/// Counters for one transform run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    pub chunks_read:    usize,
    pub passed_through: usize,
    pub chunks_emitted: usize,
    pub raw_fragments:  usize,
    /// Input chunks for which the handler emitted nothing.
    pub chunks_dropped: usize,
    pub bytes_out:      u64,
}

/// Run `handler` over every chunk of `input` and assemble the result.
///
/// The handler's error type only needs to absorb [`ChunkError`], so callers
/// can abort a transform with their own errors.
pub fn transform<'a, F, E>(input: &'a [u8], handler: F) -> std::result::Result<Vec<u8>, E>
where
    F: FnMut(&RawChunk<'a>) -> std::result::Result<Vec<Emit<'a>>, E>,
    E: From<ChunkError>,
{
    transform_with_stats(input, handler).map(|(out, _)| out)
}

/// [`transform`], also returning per-run counters.
pub fn transform_with_stats<'a, F, E>(
    input:       &'a [u8],
    mut handler: F,
) -> std::result::Result<(Vec<u8>, TransformStats), E>
where
    F: FnMut(&RawChunk<'a>) -> std::result::Result<Vec<Emit<'a>>, E>,
    E: From<ChunkError>,
{
    let reader     = ChunkReader::new(input)?;
    let mut writer = ChunkWriter::in_memory();
    let mut stats  = TransformStats::default();

    for item in reader {
        let raw = item?;
        stats.chunks_read += 1;

        let actions = handler(&raw)?;
        if actions.is_empty() {
            stats.chunks_dropped += 1;
            trace!(chunk_type = %raw.chunk_type(), offset = raw.offset, "chunk dropped");
        }

        for action in actions {
            match action {
                Emit::PassThrough => {
                    writer.write_raw(raw.raw())?;
                    stats.passed_through += 1;
                }
                Emit::Chunk(chunk) => {
                    writer.write_chunk(&chunk)?;
                    stats.chunks_emitted += 1;
                }
                Emit::Raw(bytes) => {
                    writer.write_raw(&bytes)?;
                    stats.raw_fragments += 1;
                }
            }
        }
    }

    stats.bytes_out = writer.bytes_written();
    debug!(
        chunks_read    = stats.chunks_read,
        passed_through = stats.passed_through,
        chunks_emitted = stats.chunks_emitted,
        chunks_dropped = stats.chunks_dropped,
        bytes_out      = stats.bytes_out,
        "transform complete"
    );
    Ok((writer.into_bytes(), stats))
}

/// Identity transform.  Validates every frame and CRC on the way.
pub fn pass_through(input: &[u8]) -> Result<Vec<u8>> {
    transform(input, |_| Ok::<_, ChunkError>(vec![Emit::PassThrough]))
}
