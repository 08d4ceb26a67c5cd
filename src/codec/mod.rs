//! Payload codecs and the tag → codec registry.
//!
//! Each codec is a set of stateless functions over one chunk's payload.
//! Decoders return `Ok(None)` when handed a chunk of a type they do not
//! handle; that is an ordinary "not applicable" outcome, not corruption.
//!
//! [`decode_chunk`] is the registry: a closed match over [`ChunkType`]
//! that routes each known tag to its codec.
//!
//! # Field framing
//! Text and blob payloads use NUL-terminated fields.  A missing terminator
//! is tolerated: the rest of the payload becomes that field and every later
//! field is empty.

pub mod blob;
pub mod header;
pub mod text;

pub use blob::{decode_blob, encode_blob, BlobEntry};
pub use header::{decode_header, encode_header, ColorType, Header};
pub use text::{decode_text, decode_text_with, encode_text, encode_text_with, TextEntry, TextKind};

use crate::chunk::{Chunk, ChunkType};
use miniz_oxide::inflate::TINFLStatus;

use crate::error::{ChunkError, Result};

// ── Decompressor ─────────────────────────────────────────────────────────────

/// zlib-framed deflate, as used by zTXt and compressed iTXt payloads.
pub trait Inflate {
    fn inflate(&self, data: &[u8]) -> Result<Vec<u8>>;
}

/// zlib inflate/deflate backed by `miniz_oxide`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZlibCodec {
    /// Maximum inflated size.  `None` (the default) inflates everything.
    pub limit: Option<usize>,
    /// Deflate level used when encoding (0–10).
    pub level: u8,
}

impl Default for ZlibCodec {
    fn default() -> Self {
        Self { limit: None, level: 6 }
    }
}

impl ZlibCodec {
    pub fn with_limit(limit: usize) -> Self {
        Self { limit: Some(limit), ..Self::default() }
    }

    pub fn unbounded() -> Self {
        Self { limit: None, ..Self::default() }
    }

    pub fn deflate(&self, data: &[u8]) -> Vec<u8> {
        miniz_oxide::deflate::compress_to_vec_zlib(data, self.level.min(10))
    }
}

impl Inflate for ZlibCodec {
    fn inflate(&self, data: &[u8]) -> Result<Vec<u8>> {
        let limit = self.limit.unwrap_or(usize::MAX);
        miniz_oxide::inflate::decompress_to_vec_zlib_with_limit(data, limit).map_err(|e| match e.status {
            TINFLStatus::HasMoreOutput => ChunkError::InflateLimitExceeded(limit),
            status => ChunkError::Decompression(format!("{status:?}")),
        })
    }
}

// ── Registry ─────────────────────────────────────────────────────────────────

/// A chunk payload decoded by whichever codec is registered for its tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Header(Header),
    Text(TextEntry),
    Blob(BlobEntry),
    /// No codec for this tag; the payload stays opaque.
    Opaque,
}

/// Decode `chunk` with the codec registered for its type.
pub fn decode_chunk(chunk: &Chunk<'_>) -> Result<Decoded> {
    decode_chunk_with(chunk, &ZlibCodec::default())
}

pub fn decode_chunk_with(chunk: &Chunk<'_>, inflater: &dyn Inflate) -> Result<Decoded> {
    Ok(match chunk.chunk_type.normalized() {
        ChunkType::Ihdr => header::decode_header(chunk)?.map_or(Decoded::Opaque, Decoded::Header),
        ChunkType::Text | ChunkType::Ztxt | ChunkType::Itxt => {
            text::decode_text_with(chunk, inflater)?.map_or(Decoded::Opaque, Decoded::Text)
        }
        ChunkType::Blob => blob::decode_blob(chunk).map_or(Decoded::Opaque, Decoded::Blob),
        ChunkType::Plte | ChunkType::Idat | ChunkType::Iend | ChunkType::Other(_) => Decoded::Opaque,
    })
}

// ── Field helpers ────────────────────────────────────────────────────────────

/// Split at the first NUL.  Without a NUL the whole input is the field and
/// the rest is empty.
pub(crate) fn split_nul(bytes: &[u8]) -> (&[u8], &[u8]) {
    match bytes.iter().position(|&b| b == 0) {
        Some(i) => (&bytes[..i], &bytes[i + 1..]),
        None    => (bytes, &[]),
    }
}

/// ISO-8859-1: every byte is the code point of the same value.
pub(crate) fn latin1_decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

pub(crate) fn latin1_encode(s: &str) -> Result<Vec<u8>> {
    s.chars()
        .map(|c| u8::try_from(u32::from(c)).map_err(|_| ChunkError::Unencodable(c)))
        .collect()
}

pub(crate) fn check_keyword(key: &str) -> Result<()> {
    if key.as_bytes().contains(&0) {
        return Err(ChunkError::InvalidKeyword);
    }
    Ok(())
}
