//! Streaming chunk-level transforms for PNG containers.
//!
//! A PNG is an 8-byte signature followed by length-prefixed, CRC32-protected,
//! type-tagged chunks.  This crate reads those chunks one at a time, hands
//! each to a caller-supplied handler, and reassembles a valid container from
//! whatever the handler chooses to emit.
//!
//! ```
//! use pngchunk::{decode_blob, encode_blob, read_chunks, transform, ChunkError, ChunkType, Emit};
//! # use pngchunk::{Chunk, ChunkWriter};
//! # let mut w = ChunkWriter::in_memory();
//! # w.write_chunk(&Chunk::new(ChunkType::Ihdr, vec![0u8, 0, 0, 1, 0, 0, 0, 1, 8, 2, 0, 0, 0]))?;
//! # w.write_chunk(&Chunk::new(ChunkType::Iend, Vec::new()))?;
//! # let png = w.into_bytes();
//!
//! // Inject a keyed blob right after the header.
//! let blob = encode_blob("sampleBlob", b"some bytes")?;
//! let out = transform(&png, |raw| {
//!     let mut emit = vec![Emit::PassThrough];
//!     if raw.chunk_type() == ChunkType::Ihdr {
//!         emit.push(Emit::Chunk(blob.clone()));
//!     }
//!     Ok::<_, ChunkError>(emit)
//! })?;
//!
//! let found = read_chunks(&out)?
//!     .iter()
//!     .find_map(|raw| decode_blob(&raw.chunk))
//!     .unwrap();
//! assert_eq!(found.key, "sampleBlob");
//! # Ok::<(), ChunkError>(())
//! ```
//!
//! Pixel data is never interpreted.

pub mod chunk;
pub mod codec;
pub mod crc;
pub mod error;
pub mod file;
pub mod reader;
pub mod signature;
pub mod transform;
pub mod writer;

pub use chunk::{Chunk, ChunkSummary, ChunkType, RawChunk};
pub use codec::{
    decode_blob, decode_chunk, decode_header, decode_text, encode_blob, encode_header, encode_text,
    BlobEntry, ColorType, Decoded, Header, Inflate, TextEntry, TextKind, ZlibCodec,
};
pub use crc::chunk_crc;
pub use error::{ChunkError, Result};
pub use reader::{read_chunks, ChunkReader};
pub use signature::{check_signature, SIGNATURE};
pub use transform::{pass_through, transform, transform_with_stats, Emit, TransformStats};
pub use writer::{encode_chunk, ChunkWriter};
