//! Chunk model: type tags, owned/borrowed chunks and chunks as read.
//!
//! # Type tags
//! A tag is always exactly 4 bytes.  Known tags map to named variants of
//! [`ChunkType`]; everything else is carried verbatim in
//! [`ChunkType::Other`].  Conversion from raw bytes always normalises, so
//! `ChunkType::from(*b"IHDR") == ChunkType::Ihdr`.  Equality and hashing
//! are defined over the raw bytes, which keeps a hand-built
//! `Other(*b"IHDR")` equal to `Ihdr` as well.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::crc::chunk_crc;
use crate::error::{ChunkError, Result};

// ── Chunk type ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub enum ChunkType {
    /// Image header, always first.
    Ihdr,
    /// Palette.
    Plte,
    /// Image data.
    Idat,
    /// Image trailer, always last.
    Iend,
    /// Uncompressed Latin-1 text.
    Text,
    /// Compressed Latin-1 text.
    Ztxt,
    /// International (UTF-8) text, optionally compressed.
    Itxt,
    /// Application-defined keyed binary payload.
    Blob,
    Other([u8; 4]),
}

impl ChunkType {
    pub const IHDR: [u8; 4] = *b"IHDR";
    pub const PLTE: [u8; 4] = *b"PLTE";
    pub const IDAT: [u8; 4] = *b"IDAT";
    pub const IEND: [u8; 4] = *b"IEND";
    pub const TEXT: [u8; 4] = *b"tEXt";
    pub const ZTXT: [u8; 4] = *b"zTXt";
    pub const ITXT: [u8; 4] = *b"iTXt";
    pub const BLOB: [u8; 4] = *b"blob";

    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        match &bytes {
            b"IHDR" => ChunkType::Ihdr,
            b"PLTE" => ChunkType::Plte,
            b"IDAT" => ChunkType::Idat,
            b"IEND" => ChunkType::Iend,
            b"tEXt" => ChunkType::Text,
            b"zTXt" => ChunkType::Ztxt,
            b"iTXt" => ChunkType::Itxt,
            b"blob" => ChunkType::Blob,
            _       => ChunkType::Other(bytes),
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> [u8; 4] {
        match self {
            ChunkType::Ihdr     => Self::IHDR,
            ChunkType::Plte     => Self::PLTE,
            ChunkType::Idat     => Self::IDAT,
            ChunkType::Iend     => Self::IEND,
            ChunkType::Text     => Self::TEXT,
            ChunkType::Ztxt     => Self::ZTXT,
            ChunkType::Itxt     => Self::ITXT,
            ChunkType::Blob     => Self::BLOB,
            ChunkType::Other(b) => *b,
        }
    }

    /// Critical chunks have an uppercase first letter.
    pub fn is_critical(&self) -> bool {
        self.as_bytes()[0].is_ascii_uppercase()
    }

    /// Public chunks have an uppercase second letter.
    pub fn is_public(&self) -> bool {
        self.as_bytes()[1].is_ascii_uppercase()
    }

    /// Safe-to-copy chunks have a lowercase fourth letter.
    pub fn is_safe_to_copy(&self) -> bool {
        self.as_bytes()[3].is_ascii_lowercase()
    }

    /// True for the three text chunk types.
    pub fn is_text(&self) -> bool {
        matches!(self.normalized(), ChunkType::Text | ChunkType::Ztxt | ChunkType::Itxt)
    }

    /// Map `Other` carrying a known tag back onto its named variant.
    pub fn normalized(self) -> Self {
        Self::from_bytes(self.as_bytes())
    }
}

impl From<[u8; 4]> for ChunkType {
    fn from(bytes: [u8; 4]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl TryFrom<&[u8]> for ChunkType {
    type Error = ChunkError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let tag: [u8; 4] = bytes
            .try_into()
            .map_err(|_| ChunkError::InvalidChunkType(bytes.len()))?;
        Ok(Self::from_bytes(tag))
    }
}

impl FromStr for ChunkType {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::try_from(s.as_bytes())
    }
}

impl PartialEq for ChunkType {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for ChunkType {}

impl Hash for ChunkType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_bytes().hash(state);
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.as_bytes() {
            if b.is_ascii_graphic() {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{b:02x}")?;
            }
        }
        Ok(())
    }
}

impl Serialize for ChunkType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Chunk ────────────────────────────────────────────────────────────────────

/// One typed record.  Chunks read from input borrow their payload; chunks
/// built by codecs own it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub chunk_type: ChunkType,
    pub data:       Cow<'a, [u8]>,
}

impl<'a> Chunk<'a> {
    pub fn new(chunk_type: ChunkType, data: impl Into<Cow<'a, [u8]>>) -> Self {
        Self { chunk_type, data: data.into() }
    }

    /// Build a chunk from a textual tag such as `"tEXt"`.
    pub fn with_tag(tag: &str, data: impl Into<Cow<'a, [u8]>>) -> Result<Self> {
        Ok(Self::new(tag.parse()?, data))
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// CRC32 the chunk would carry on the wire.
    pub fn crc(&self) -> u32 {
        chunk_crc(&self.chunk_type.as_bytes(), &self.data)
    }

    pub fn into_owned(self) -> Chunk<'static> {
        Chunk {
            chunk_type: self.chunk_type,
            data:       Cow::Owned(self.data.into_owned()),
        }
    }
}

// ── RawChunk ─────────────────────────────────────────────────────────────────

/// A chunk exactly as it appeared in the input stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChunk<'a> {
    pub chunk:  Chunk<'a>,
    /// CRC32 stored in the stream (already verified).
    pub crc:    u32,
    /// Byte offset of the length field within the input.
    pub offset: usize,
    raw:        &'a [u8],
}

impl<'a> RawChunk<'a> {
    pub(crate) fn new(chunk: Chunk<'a>, crc: u32, offset: usize, raw: &'a [u8]) -> Self {
        Self { chunk, crc, offset, raw }
    }

    pub fn chunk_type(&self) -> ChunkType {
        self.chunk.chunk_type
    }

    pub fn data(&self) -> &'a [u8] {
        &self.raw[8..self.raw.len() - 4]
    }

    /// The original on-wire bytes: `length ++ type ++ payload ++ crc`.
    pub fn raw(&self) -> &'a [u8] {
        self.raw
    }
}

/// Serializable one-line description of a chunk, for listings.
#[derive(Debug, Clone, Serialize)]
pub struct ChunkSummary {
    pub chunk_type: ChunkType,
    pub offset:     usize,
    pub length:     usize,
    pub crc:        String,
}

impl From<&RawChunk<'_>> for ChunkSummary {
    fn from(raw: &RawChunk<'_>) -> Self {
        Self {
            chunk_type: raw.chunk_type(),
            offset:     raw.offset,
            length:     raw.chunk.len(),
            crc:        hex::encode(raw.crc.to_be_bytes()),
        }
    }
}
