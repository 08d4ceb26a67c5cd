//! CRC32 over chunk type + payload.

use crc32fast::Hasher;

/// Standard CRC-32 (IEEE) of `chunk_type ++ data`, as stored after every chunk.
pub fn chunk_crc(chunk_type: &[u8; 4], data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    hasher.finalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iend_crc_matches_known_value() {
        // Every PNG ends with 00000000 49454E44 AE426082.
        assert_eq!(chunk_crc(b"IEND", &[]), 0xAE42_6082);
    }

    #[test]
    fn crc_covers_type_and_payload() {
        let a = chunk_crc(b"tEXt", b"a");
        assert_ne!(a, chunk_crc(b"zTXt", b"a"));
        assert_ne!(a, chunk_crc(b"tEXt", b"b"));
        let mut hasher = Hasher::new();
        hasher.update(b"tEXta");
        assert_eq!(a, hasher.finalize());
    }
}
