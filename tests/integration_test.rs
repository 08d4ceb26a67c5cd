use pngchunk::{
    chunk_crc, decode_blob, decode_chunk, decode_header, decode_text, encode_blob, encode_header,
    encode_text, pass_through, read_chunks, transform, Chunk, ChunkError, ChunkType, ChunkWriter,
    ColorType, Decoded, Emit, Header, TextEntry, TextKind, ZlibCodec, SIGNATURE,
};
use proptest::prelude::*;

/// A complete 1×1 truecolor PNG with a plain and a compressed text chunk,
/// shaped like what an image editor exports.
fn gimp_like_png() -> Vec<u8> {
    let zlib = ZlibCodec::default();
    let mut w = ChunkWriter::in_memory();
    w.write_chunk(&encode_header(&Header {
        width:              1,
        height:             1,
        bit_depth:          8,
        color_type:         ColorType::Truecolor,
        compression_method: 0,
        filter_method:      0,
        interlace_method:   0,
    }))
    .unwrap();
    w.write_chunk(&encode_text(TextKind::Plain, &TextEntry::new("Comment", "Created with GIMP")).unwrap())
        .unwrap();
    w.write_chunk(
        &encode_text(
            TextKind::Compressed,
            &TextEntry::new("Raw profile type exif", "\nexif\n      6\n457869660000\n"),
        )
        .unwrap(),
    )
    .unwrap();
    // One scanline: filter byte 0, then one RGB pixel.
    w.write_chunk(&Chunk::new(ChunkType::Idat, zlib.deflate(&[0, 0xFF, 0x00, 0x00])))
        .unwrap();
    w.write_chunk(&Chunk::new(ChunkType::Iend, Vec::new())).unwrap();
    w.into_bytes()
}

fn chunk_types(bytes: &[u8]) -> Vec<ChunkType> {
    read_chunks(bytes).unwrap().iter().map(|c| c.chunk_type()).collect()
}

#[test]
fn test_read_text_entries() {
    let png = gimp_like_png();
    let mut texts = std::collections::HashMap::new();
    let mut header = None;

    let out = transform(&png, |raw| {
        if let Some(h) = decode_header(&raw.chunk)? {
            header = Some(h);
        }
        if let Some(t) = decode_text(&raw.chunk)? {
            texts.insert(t.key, t.text);
        }
        Ok::<_, ChunkError>(vec![Emit::PassThrough])
    })
    .unwrap();

    assert_eq!(out, png);
    assert_eq!(texts["Comment"], "Created with GIMP");
    assert!(texts.contains_key("Raw profile type exif"));
    let header = header.unwrap();
    assert_eq!((header.width, header.height, header.bit_depth), (1, 1, 8));
    assert_eq!(header.color_type, ColorType::Truecolor);
}

#[test]
fn test_pass_through_roundtrip_identity() {
    let png = gimp_like_png();
    assert_eq!(pass_through(&png).unwrap(), png);
}

#[test]
fn test_blob_injection_after_header() {
    let png = gimp_like_png();
    let sample = b"This is some sample blob data.";
    let blob = encode_blob("sampleBlob", sample).unwrap();

    let with_blob = transform(&png, |raw| {
        let mut emit = vec![Emit::PassThrough];
        if raw.chunk_type() == ChunkType::Ihdr {
            emit.push(Emit::Chunk(blob.clone()));
        }
        Ok::<_, ChunkError>(emit)
    })
    .unwrap();

    let mut expected = chunk_types(&png);
    expected.insert(1, ChunkType::Blob);
    assert_eq!(chunk_types(&with_blob), expected);

    let chunks = read_chunks(&with_blob).unwrap();
    let injected = &chunks[1];
    let declared_len = u32::from_be_bytes(injected.raw()[..4].try_into().unwrap());
    assert_eq!(declared_len as usize, injected.chunk.len());
    assert_eq!(injected.crc, chunk_crc(b"blob", injected.data()));

    // Original chunks are byte-identical around the injected one.
    let original = read_chunks(&png).unwrap();
    assert_eq!(chunks[0].raw(), original[0].raw());
    for (a, b) in chunks[2..].iter().zip(&original[1..]) {
        assert_eq!(a.raw(), b.raw());
    }

    let mut found = None;
    transform(&with_blob, |raw| {
        if let Some(entry) = decode_blob(&raw.chunk) {
            if entry.key == "sampleBlob" {
                found = Some(entry.data);
            }
        }
        Ok::<_, ChunkError>(vec![])
    })
    .unwrap();
    assert_eq!(found.as_deref(), Some(&sample[..]));
}

#[test]
fn test_malformed_signature_fails_before_any_chunk() {
    let png = gimp_like_png();
    for i in 0..SIGNATURE.len() {
        let mut bad = png.clone();
        bad[i] = bad[i].wrapping_add(1);
        let mut calls = 0;
        let result = transform(&bad, |_| {
            calls += 1;
            Ok::<_, ChunkError>(vec![Emit::PassThrough])
        });
        assert!(matches!(result, Err(ChunkError::InvalidSignature)), "byte {i}");
        assert_eq!(calls, 0);
    }
}

#[test]
fn test_truncated_stream() {
    let png = gimp_like_png();
    let cut = &png[..png.len() - 2];
    assert!(matches!(pass_through(cut), Err(ChunkError::Truncated { .. })));
}

#[test]
fn test_checksum_error_produces_no_output() {
    let mut png = gimp_like_png();
    let idat_offset = read_chunks(&png).unwrap()[3].offset;
    png[idat_offset + 8] ^= 0x55;

    let mut seen = Vec::new();
    let result = transform(&png, |raw| {
        seen.push(raw.chunk_type());
        Ok::<_, ChunkError>(vec![Emit::PassThrough])
    });
    match result {
        Err(ChunkError::ChecksumMismatch { chunk_type, .. }) => assert_eq!(chunk_type, ChunkType::Idat),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(seen, vec![ChunkType::Ihdr, ChunkType::Text, ChunkType::Ztxt]);
}

#[test]
fn test_corrupt_compressed_text_aborts_transform() {
    let mut w = ChunkWriter::in_memory();
    w.write_chunk(&encode_header(&Header {
        width:              1,
        height:             1,
        bit_depth:          8,
        color_type:         ColorType::Greyscale,
        compression_method: 0,
        filter_method:      0,
        interlace_method:   0,
    }))
    .unwrap();
    // Valid frame and CRC, but the zlib stream is garbage.
    w.write_chunk(&Chunk::new(ChunkType::Ztxt, b"Comment\0\0not zlib".to_vec())).unwrap();
    w.write_chunk(&Chunk::new(ChunkType::Iend, Vec::new())).unwrap();
    let png = w.into_bytes();

    let mut calls = 0;
    let result = transform(&png, |raw| {
        calls += 1;
        decode_text(&raw.chunk)?;
        Ok::<_, ChunkError>(vec![Emit::PassThrough])
    });
    assert!(matches!(result, Err(ChunkError::Decompression(_))));
    assert_eq!(calls, 2);
}

#[test]
fn test_replace_text_chunks() {
    let png = gimp_like_png();
    let out = transform(&png, |raw| {
        Ok::<_, ChunkError>(match decode_text(&raw.chunk)? {
            Some(t) if t.key == "Comment" => vec![Emit::Chunk(encode_text(
                TextKind::International { compressed: true },
                &TextEntry::new("Comment", "Réédité ✓"),
            )?)],
            _ => vec![Emit::PassThrough],
        })
    })
    .unwrap();

    assert_eq!(
        chunk_types(&out),
        vec![ChunkType::Ihdr, ChunkType::Itxt, ChunkType::Ztxt, ChunkType::Idat, ChunkType::Iend]
    );
    let chunks = read_chunks(&out).unwrap();
    assert_eq!(
        decode_chunk(&chunks[1].chunk).unwrap(),
        Decoded::Text(TextEntry::new("Comment", "Réédité ✓"))
    );
}

#[test]
fn test_raw_emission_of_precomputed_chunk() {
    let png = gimp_like_png();
    let precomputed = pngchunk::encode_chunk(&Chunk::new(ChunkType::from(*b"prVt"), b"x".to_vec())).unwrap();
    let out = transform(&png, |raw| {
        Ok::<_, ChunkError>(if raw.chunk_type() == ChunkType::Iend {
            vec![Emit::raw(&precomputed[..]), Emit::PassThrough]
        } else {
            vec![Emit::PassThrough]
        })
    })
    .unwrap();
    let types = chunk_types(&out);
    assert_eq!(types[types.len() - 2], ChunkType::Other(*b"prVt"));
}

#[test]
fn test_international_text_title_hello() {
    let chunk = Chunk::new(ChunkType::Itxt, b"Title\0\x00\x00\0\0Hello".to_vec());
    assert_eq!(decode_text(&chunk).unwrap(), Some(TextEntry::new("Title", "Hello")));
}

proptest! {
    #[test]
    fn prop_crc_flip_is_detected(pos in 0usize..64, bit in 0u8..8, payload in proptest::collection::vec(any::<u8>(), 1..64)) {
        let mut w = ChunkWriter::in_memory();
        w.write_chunk(&Chunk::new(ChunkType::Idat, payload.clone())).unwrap();
        let mut bytes = w.into_bytes();

        let recomputed = chunk_crc(b"IDAT", &payload);
        prop_assert_eq!(read_chunks(&bytes).unwrap()[0].crc, recomputed);

        let idx = SIGNATURE.len() + 8 + pos % payload.len();
        bytes[idx] ^= 1 << bit;
        let is_checksum_error = matches!(read_chunks(&bytes), Err(ChunkError::ChecksumMismatch { .. }));
        prop_assert!(is_checksum_error);
    }

    #[test]
    fn prop_blob_roundtrip(key in "[^\\x00]{0,24}", data in proptest::collection::vec(any::<u8>(), 0..256)) {
        let chunk = encode_blob(&key, &data).unwrap();
        let entry = decode_blob(&chunk).unwrap();
        prop_assert_eq!(entry.key, key);
        prop_assert_eq!(entry.data, data);
    }

    #[test]
    fn prop_pass_through_identity(payloads in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..48), 0..8)) {
        let mut w = ChunkWriter::in_memory();
        for p in &payloads {
            w.write_chunk(&Chunk::new(ChunkType::from(*b"tEST"), p.clone())).unwrap();
        }
        let bytes = w.into_bytes();
        prop_assert_eq!(pass_through(&bytes).unwrap(), bytes);
    }
}
