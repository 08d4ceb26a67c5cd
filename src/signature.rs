use crate::error::{ChunkError, Result};

/// The fixed 8-byte PNG magic.
pub const SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
pub const SIGNATURE_LEN: usize = SIGNATURE.len();

/// True if `bytes` starts with [`SIGNATURE`].
pub fn has_signature(bytes: &[u8]) -> bool {
    bytes.len() >= SIGNATURE_LEN && bytes[..SIGNATURE_LEN] == SIGNATURE
}

/// Fails with [`ChunkError::InvalidSignature`] unless `bytes` starts with the
/// PNG signature.
pub fn check_signature(bytes: &[u8]) -> Result<()> {
    if has_signature(bytes) {
        Ok(())
    } else {
        Err(ChunkError::InvalidSignature)
    }
}
