//! Path-level convenience API over the in-memory transform engine.
//!
//! ```no_run
//! use pngchunk::file::{PngFile, RewriteOptions};
//! use pngchunk::{encode_blob, ChunkError, ChunkType, Emit};
//!
//! let png = PngFile::open("in.png")?;
//! for entry in png.texts()? {
//!     println!("{}: {}", entry.key, entry.text);
//! }
//!
//! let blob = encode_blob("thumbnail-hash", b"\x01\x02\x03")?;
//! png.rewrite_to("out.png", RewriteOptions::default(), |raw| {
//!     let mut out = vec![Emit::PassThrough];
//!     if raw.chunk_type() == ChunkType::Ihdr {
//!         out.push(Emit::Chunk(blob.clone()));
//!     }
//!     Ok::<_, ChunkError>(out)
//! })?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::chunk::{ChunkSummary, RawChunk};
use crate::codec::{decode_blob, decode_header, decode_text_with, BlobEntry, Header, TextEntry, ZlibCodec};
use crate::error::{ChunkError, Result};
use crate::reader::{read_chunks, ChunkReader};
use crate::signature::check_signature;
use crate::transform::{transform_with_stats, Emit, TransformStats};

// ── RewriteOptions ───────────────────────────────────────────────────────────

/// Configuration for [`PngFile::rewrite_to`].
#[derive(Debug, Clone, Copy)]
pub struct RewriteOptions {
    /// Replace `dst` if it already exists.
    pub overwrite: bool,
    /// fsync the temporary file before renaming it into place.
    pub sync:      bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self { overwrite: true, sync: true }
    }
}

// ── PngFile ──────────────────────────────────────────────────────────────────

/// A PNG loaded into memory.  The signature is checked on open; chunk
/// frames and CRCs are checked whenever chunks are walked.
pub struct PngFile {
    path:  PathBuf,
    bytes: Vec<u8>,
    zlib:  ZlibCodec,
}

impl PngFile {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path  = path.as_ref().to_owned();
        let bytes = fs::read(&path)?;
        check_signature(&bytes)?;
        debug!(path = %path.display(), len = bytes.len(), "opened png");
        Ok(Self { path, bytes, zlib: ZlibCodec::default() })
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        check_signature(&bytes)?;
        Ok(Self { path: PathBuf::new(), bytes, zlib: ZlibCodec::default() })
    }

    pub fn with_zlib(mut self, zlib: ZlibCodec) -> Self {
        self.zlib = zlib;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn chunks(&self) -> Result<Vec<RawChunk<'_>>> {
        read_chunks(&self.bytes)
    }

    pub fn summaries(&self) -> Result<Vec<ChunkSummary>> {
        ChunkReader::new(&self.bytes)?
            .map(|raw| raw.map(|r| ChunkSummary::from(&r)))
            .collect()
    }

    /// The first IHDR, if any.
    pub fn header(&self) -> Result<Option<Header>> {
        for raw in ChunkReader::new(&self.bytes)? {
            if let Some(header) = decode_header(&raw?.chunk)? {
                return Ok(Some(header));
            }
        }
        Ok(None)
    }

    /// Every text entry, in stream order.
    pub fn texts(&self) -> Result<Vec<TextEntry>> {
        let mut out = Vec::new();
        for raw in ChunkReader::new(&self.bytes)? {
            if let Some(entry) = decode_text_with(&raw?.chunk, &self.zlib)? {
                out.push(entry);
            }
        }
        Ok(out)
    }

    /// Every blob entry, in stream order.
    pub fn blobs(&self) -> Result<Vec<BlobEntry>> {
        let mut out = Vec::new();
        for raw in ChunkReader::new(&self.bytes)? {
            out.extend(decode_blob(&raw?.chunk));
        }
        Ok(out)
    }

    /// First blob with the given key.
    pub fn blob(&self, key: &str) -> Result<Option<BlobEntry>> {
        Ok(self.blobs()?.into_iter().find(|b| b.key == key))
    }

    /// Transform this file's chunks and write the result to `dst`.
    ///
    /// The output is written to a temporary file next to `dst` and renamed
    /// into place, so `dst` is either fully replaced or left untouched.
    pub fn rewrite_to<'a, P, F, E>(
        &'a self,
        dst:     P,
        options: RewriteOptions,
        handler: F,
    ) -> std::result::Result<TransformStats, E>
    where
        P: AsRef<Path>,
        F: FnMut(&RawChunk<'a>) -> std::result::Result<Vec<Emit<'a>>, E>,
        E: From<ChunkError>,
    {
        let dst = dst.as_ref();
        let (out, stats) = transform_with_stats(&self.bytes, handler)?;
        write_atomic(dst, &out, options).map_err(ChunkError::from)?;
        info!(
            src = %self.path.display(),
            dst = %dst.display(),
            bytes = out.len(),
            "rewrote png"
        );
        Ok(stats)
    }
}

fn write_atomic(dst: &Path, bytes: &[u8], options: RewriteOptions) -> io::Result<()> {
    let dir = match dst.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    if options.sync {
        tmp.as_file().sync_all()?;
    }
    // Without overwrite the rename itself must refuse an existing `dst`.
    if options.overwrite {
        tmp.persist(dst)?;
    } else {
        tmp.persist_noclobber(dst)?;
    }
    Ok(())
}

/// Read `src`, transform it, write `dst` atomically.
pub fn rewrite_file<S, D, F, E>(src: S, dst: D, handler: F) -> std::result::Result<TransformStats, E>
where
    S: AsRef<Path>,
    D: AsRef<Path>,
    F: for<'a> FnMut(&RawChunk<'a>) -> std::result::Result<Vec<Emit<'a>>, E>,
    E: From<ChunkError>,
{
    let png = PngFile::open(src)?;
    png.rewrite_to(dst, RewriteOptions::default(), handler)
}
