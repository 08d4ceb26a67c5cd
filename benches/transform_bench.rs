use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pngchunk::codec::ZlibCodec;
use pngchunk::{
    decode_text, encode_blob, pass_through, transform, Chunk, ChunkError, ChunkType, ChunkWriter, Emit,
};

fn sample_png(idat_chunks: usize, idat_len: usize) -> Vec<u8> {
    let mut w = ChunkWriter::in_memory();
    w.write_chunk(&Chunk::new(ChunkType::Ihdr, vec![0u8, 0, 4, 0, 0, 0, 4, 0, 8, 6, 0, 0, 0])).unwrap();
    w.write_chunk(&Chunk::new(ChunkType::Text, b"Comment\0bench".to_vec())).unwrap();
    for _ in 0..idat_chunks {
        w.write_chunk(&Chunk::new(ChunkType::Idat, vec![42u8; idat_len])).unwrap();
    }
    w.write_chunk(&Chunk::new(ChunkType::Iend, Vec::new())).unwrap();
    w.into_bytes()
}

fn bench_pass_through(c: &mut Criterion) {
    let one_big   = sample_png(1, 1024 * 1024);
    let many_tiny = sample_png(4096, 256);

    c.bench_function("pass_through_1mb_single_idat", |b| b.iter(|| pass_through(black_box(&one_big)).unwrap()));
    c.bench_function("pass_through_4096_idat", |b| b.iter(|| pass_through(black_box(&many_tiny)).unwrap()));
}

fn bench_inject_blob(c: &mut Criterion) {
    let png  = sample_png(16, 64 * 1024);
    let blob = encode_blob("bench", &vec![7u8; 64 * 1024]).unwrap();

    c.bench_function("inject_64k_blob_after_ihdr", |b| {
        b.iter(|| {
            transform(black_box(&png), |raw| {
                let mut emit = vec![Emit::PassThrough];
                if raw.chunk_type() == ChunkType::Ihdr {
                    emit.push(Emit::Chunk(blob.clone()));
                }
                Ok::<_, ChunkError>(emit)
            })
            .unwrap()
        })
    });
}

fn bench_text_decode(c: &mut Criterion) {
    let text = "lorem ipsum ".repeat(4096);
    let zlib = ZlibCodec::default();
    let mut payload = b"Description\0\0".to_vec();
    payload.extend(zlib.deflate(text.as_bytes()));
    let chunk = Chunk::new(ChunkType::Ztxt, payload);

    c.bench_function("decode_ztxt_48k", |b| b.iter(|| decode_text(black_box(&chunk)).unwrap()));
}

criterion_group!(benches, bench_pass_through, bench_inject_blob, bench_text_decode);
criterion_main!(benches);
