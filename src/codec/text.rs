//! tEXt / zTXt / iTXt codec.
//!
//! | type | layout | encoding |
//! |------|--------|----------|
//! | tEXt | `key \0 text` | Latin-1 |
//! | zTXt | `key \0 method zlib(text)` | Latin-1 |
//! | iTXt | `key \0 flag method lang \0 translated \0 text` | UTF-8, `text` zlib'd when `flag == 1` |
//!
//! Decoding is lenient about framing (see the module docs of
//! [`crate::codec`]).  Invalid UTF-8 in iTXt fields decodes with U+FFFD.
//! The iTXt language tag and translated keyword are read past and dropped.

use serde::Serialize;

use crate::chunk::{Chunk, ChunkType};
use crate::codec::{check_keyword, latin1_decode, latin1_encode, split_nul, Inflate, ZlibCodec};
use crate::error::Result;

/// Compression method byte: zlib deflate.  The only value PNG defines.
pub const COMPRESSION_DEFLATE: u8 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TextEntry {
    pub key:  String,
    pub text: String,
}

impl TextEntry {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self { key: key.into(), text: text.into() }
    }
}

/// Which of the three text chunk layouts to encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKind {
    /// tEXt
    Plain,
    /// zTXt
    Compressed,
    /// iTXt
    International { compressed: bool },
}

impl TextKind {
    pub fn chunk_type(self) -> ChunkType {
        match self {
            TextKind::Plain                => ChunkType::Text,
            TextKind::Compressed           => ChunkType::Ztxt,
            TextKind::International { .. } => ChunkType::Itxt,
        }
    }
}

/// Decode a text chunk, inflating with the default [`ZlibCodec`].
pub fn decode_text(chunk: &Chunk<'_>) -> Result<Option<TextEntry>> {
    decode_text_with(chunk, &ZlibCodec::default())
}

/// Decode a text chunk.  `Ok(None)` for non-text chunk types; inflate
/// failures are returned as errors.
pub fn decode_text_with(chunk: &Chunk<'_>, inflater: &dyn Inflate) -> Result<Option<TextEntry>> {
    let data = chunk.data();
    let entry = match chunk.chunk_type.normalized() {
        ChunkType::Text => {
            let (key, text) = split_nul(data);
            TextEntry { key: latin1_decode(key), text: latin1_decode(text) }
        }
        ChunkType::Ztxt => {
            let (key, rest) = split_nul(data);
            // Skip the compression method byte.
            let compressed = rest.get(1..).unwrap_or_default();
            let text = inflater.inflate(compressed)?;
            TextEntry { key: latin1_decode(key), text: latin1_decode(&text) }
        }
        ChunkType::Itxt => {
            let (key, rest) = split_nul(data);
            let compression_flag = rest.first().copied();
            let rest = rest.get(2..).unwrap_or_default();
            let (_language, rest) = split_nul(rest);
            let (_translated, text) = split_nul(rest);
            let text = if compression_flag == Some(1) {
                String::from_utf8_lossy(&inflater.inflate(text)?).into_owned()
            } else {
                String::from_utf8_lossy(text).into_owned()
            };
            TextEntry { key: String::from_utf8_lossy(key).into_owned(), text }
        }
        _ => return Ok(None),
    };
    Ok(Some(entry))
}

/// Encode `entry` as a text chunk of the given kind.
pub fn encode_text(kind: TextKind, entry: &TextEntry) -> Result<Chunk<'static>> {
    encode_text_with(kind, entry, &ZlibCodec::default())
}

/// Encode `entry`; compressed variants deflate with `codec`.
///
/// tEXt/zTXt fields must be Latin-1.  The iTXt language tag and translated
/// keyword are written empty.
pub fn encode_text_with(kind: TextKind, entry: &TextEntry, codec: &ZlibCodec) -> Result<Chunk<'static>> {
    check_keyword(&entry.key)?;
    let mut data = Vec::with_capacity(entry.key.len() + entry.text.len() + 5);
    match kind {
        TextKind::Plain => {
            data.extend(latin1_encode(&entry.key)?);
            data.push(0);
            data.extend(latin1_encode(&entry.text)?);
        }
        TextKind::Compressed => {
            data.extend(latin1_encode(&entry.key)?);
            data.push(0);
            data.push(COMPRESSION_DEFLATE);
            data.extend(codec.deflate(&latin1_encode(&entry.text)?));
        }
        TextKind::International { compressed } => {
            data.extend_from_slice(entry.key.as_bytes());
            data.push(0);
            data.push(u8::from(compressed));
            data.push(COMPRESSION_DEFLATE);
            data.push(0); // language tag
            data.push(0); // translated keyword
            if compressed {
                data.extend(codec.deflate(entry.text.as_bytes()));
            } else {
                data.extend_from_slice(entry.text.as_bytes());
            }
        }
    }
    Ok(Chunk::new(kind.chunk_type(), data))
}
