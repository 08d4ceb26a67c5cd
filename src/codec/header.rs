//! IHDR codec.
//!
//! # Layout (13 bytes, big-endian)
//! | off | size | field |
//! |----:|-----:|-------|
//! | 0   | 4    | width |
//! | 4   | 4    | height |
//! | 8   | 1    | bit depth |
//! | 9   | 1    | color type |
//! | 10  | 1    | compression method |
//! | 11  | 1    | filter method |
//! | 12  | 1    | interlace method |

use byteorder::{BigEndian, ByteOrder, ReadBytesExt};
use serde::Serialize;

use crate::chunk::{Chunk, ChunkType};
use crate::error::{ChunkError, Result};

pub const HEADER_LEN: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorType {
    Greyscale,
    Truecolor,
    IndexedColor,
    GreyscaleAlpha,
    TruecolorAlpha,
    /// Unassigned value, kept for forward compatibility.
    Other(u8),
}

impl ColorType {
    /// Samples per pixel, if the type is known.
    pub fn channels(self) -> Option<u8> {
        match self {
            ColorType::Greyscale | ColorType::IndexedColor => Some(1),
            ColorType::GreyscaleAlpha                      => Some(2),
            ColorType::Truecolor                           => Some(3),
            ColorType::TruecolorAlpha                      => Some(4),
            ColorType::Other(_)                            => None,
        }
    }
}

impl From<u8> for ColorType {
    fn from(value: u8) -> Self {
        match value {
            0 => ColorType::Greyscale,
            2 => ColorType::Truecolor,
            3 => ColorType::IndexedColor,
            4 => ColorType::GreyscaleAlpha,
            6 => ColorType::TruecolorAlpha,
            v => ColorType::Other(v),
        }
    }
}

impl From<ColorType> for u8 {
    fn from(value: ColorType) -> Self {
        match value {
            ColorType::Greyscale      => 0,
            ColorType::Truecolor      => 2,
            ColorType::IndexedColor   => 3,
            ColorType::GreyscaleAlpha => 4,
            ColorType::TruecolorAlpha => 6,
            ColorType::Other(v)       => v,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Header {
    pub width:              u32,
    pub height:             u32,
    pub bit_depth:          u8,
    pub color_type:         ColorType,
    pub compression_method: u8,
    pub filter_method:      u8,
    pub interlace_method:   u8,
}

impl Header {
    pub fn is_interlaced(&self) -> bool {
        self.interlace_method == 1
    }
}

/// Decode an IHDR chunk.  `Ok(None)` for any other chunk type.
pub fn decode_header(chunk: &Chunk<'_>) -> Result<Option<Header>> {
    if chunk.chunk_type != ChunkType::Ihdr {
        return Ok(None);
    }
    if chunk.len() < HEADER_LEN {
        return Err(ChunkError::InvalidHeaderLength(chunk.len()));
    }
    let mut r = chunk.data();
    Ok(Some(Header {
        width:              r.read_u32::<BigEndian>()?,
        height:             r.read_u32::<BigEndian>()?,
        bit_depth:          r.read_u8()?,
        color_type:         ColorType::from(r.read_u8()?),
        compression_method: r.read_u8()?,
        filter_method:      r.read_u8()?,
        interlace_method:   r.read_u8()?,
    }))
}

/// Exact inverse of [`decode_header`].
pub fn encode_header(h: &Header) -> Chunk<'static> {
    let mut data = [0u8; HEADER_LEN];
    BigEndian::write_u32(&mut data[0..4], h.width);
    BigEndian::write_u32(&mut data[4..8], h.height);
    data[8]  = h.bit_depth;
    data[9]  = h.color_type.into();
    data[10] = h.compression_method;
    data[11] = h.filter_method;
    data[12] = h.interlace_method;
    Chunk::new(ChunkType::Ihdr, data.to_vec())
}
