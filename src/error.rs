//! Error kinds shared by the reader, writer, transform engine and codecs.
//!
//! Every variant aborts a transform.  A codec being asked to decode a chunk
//! of a type it does not handle is *not* an error; codecs return `None` for
//! that case.

use std::io;
use thiserror::Error;

use crate::chunk::ChunkType;

#[derive(Error, Debug)]
pub enum ChunkError {
    /// The first 8 bytes are not the PNG signature.
    #[error("Not a valid PNG container: bad signature")]
    InvalidSignature,

    /// Stored CRC32 does not match `CRC32(type ++ payload)`.
    #[error("Invalid CRC for chunk {chunk_type}: stored {stored:08x}, computed {computed:08x}")]
    ChecksumMismatch {
        chunk_type: ChunkType,
        stored:     u32,
        computed:   u32,
    },

    /// A chunk frame extends past the end of the input.
    #[error("Truncated stream at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        offset:    usize,
        needed:    usize,
        available: usize,
    },

    /// A chunk type tag was not exactly 4 bytes long.
    #[error("Invalid chunk type: expected 4 bytes, got {0}")]
    InvalidChunkType(usize),

    /// Payload length does not fit the u32 length field.
    #[error("Chunk payload of {0} bytes exceeds the u32 length field")]
    ChunkTooLarge(usize),

    #[error("IHDR payload is {0} bytes, expected at least 13")]
    InvalidHeaderLength(usize),

    #[error("Decompression error: {0}")]
    Decompression(String),

    /// Inflated output would exceed the configured `ZlibCodec::limit`.
    #[error("Inflated text exceeds the {0}-byte limit")]
    InflateLimitExceeded(usize),

    /// Character outside Latin-1 in a tEXt/zTXt field.
    #[error("Character {0:?} cannot be encoded as Latin-1")]
    Unencodable(char),

    /// Keys are NUL-terminated on the wire and cannot contain NUL.
    #[error("Keyword contains a NUL byte")]
    InvalidKeyword,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T, E = ChunkError> = std::result::Result<T, E>;
