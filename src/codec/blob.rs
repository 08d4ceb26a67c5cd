//! Keyed binary records in the application-defined `blob` chunk.
//!
//! Payload: `utf8(key) \0 data`.  `data` is opaque and may contain NULs;
//! only the first NUL separates the key.

use crate::chunk::{Chunk, ChunkType};
use crate::codec::{check_keyword, split_nul};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobEntry {
    pub key:  String,
    pub data: Vec<u8>,
}

/// Build a `blob` chunk.  Fails with `InvalidKeyword` if `key` contains NUL.
pub fn encode_blob(key: &str, data: &[u8]) -> Result<Chunk<'static>> {
    check_keyword(key)?;
    let mut payload = Vec::with_capacity(key.len() + 1 + data.len());
    payload.extend_from_slice(key.as_bytes());
    payload.push(0);
    payload.extend_from_slice(data);
    Ok(Chunk::new(ChunkType::Blob, payload))
}

/// Decode a `blob` chunk; `None` for any other type.
pub fn decode_blob(chunk: &Chunk<'_>) -> Option<BlobEntry> {
    if chunk.chunk_type != ChunkType::Blob {
        return None;
    }
    let (key, data) = split_nul(chunk.data());
    Some(BlobEntry {
        key:  String::from_utf8_lossy(key).into_owned(),
        data: data.to_vec(),
    })
}
