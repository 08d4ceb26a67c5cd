use clap::{Parser, Subcommand, ValueEnum};
use pngchunk::file::{PngFile, RewriteOptions};
use pngchunk::{
    decode_blob, encode_blob, encode_text, ChunkError, ChunkType, Emit, TextEntry, TextKind,
    TransformStats,
};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pngchunk", about = "Inspect and rewrite PNG chunks")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).  RUST_LOG wins.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every chunk with its offset, length and CRC
    List {
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Show the IHDR fields
    Header {
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print every tEXt / zTXt / iTXt entry
    Text {
        input: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Check every chunk frame and CRC
    Verify {
        input: PathBuf,
    },
    /// Embed a file as a keyed blob chunk right after IHDR
    Embed {
        input:  PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        key:    String,
        /// File whose bytes become the blob payload
        #[arg(short, long)]
        data:   PathBuf,
    },
    /// Write the payload of the blob with the given key
    Extract {
        input:  PathBuf,
        #[arg(short, long)]
        key:    String,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Add a text entry just before IEND
    AddText {
        input:  PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        key:    String,
        #[arg(short, long)]
        text:   String,
        #[arg(long, value_enum, default_value = "plain")]
        kind:   KindArg,
    },
    /// Drop every text chunk
    StripText {
        input:  PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Plain,
    Compressed,
    International,
    InternationalCompressed,
}

impl From<KindArg> for TextKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Plain                   => TextKind::Plain,
            KindArg::Compressed              => TextKind::Compressed,
            KindArg::International           => TextKind::International { compressed: false },
            KindArg::InternationalCompressed => TextKind::International { compressed: true },
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {

        // ── List ─────────────────────────────────────────────────────────────
        Commands::List { input, json } => {
            let png = PngFile::open(&input)?;
            let chunks = png.summaries()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&chunks)?);
            } else {
                println!("{:<6} {:>10} {:>10}  CRC", "Type", "Offset", "Length");
                for c in &chunks {
                    println!("{:<6} {:>10} {:>10}  {}", c.chunk_type.to_string(), c.offset, c.length, c.crc);
                }
            }
        }

        // ── Header ───────────────────────────────────────────────────────────
        Commands::Header { input, json } => {
            let png = PngFile::open(&input)?;
            let header = png.header()?.ok_or("no IHDR chunk")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&header)?);
            } else {
                println!("  Size           {} x {}", header.width, header.height);
                println!("  Bit depth      {}", header.bit_depth);
                println!("  Color type     {:?}", header.color_type);
                println!("  Compression    {}", header.compression_method);
                println!("  Filter         {}", header.filter_method);
                println!("  Interlace      {}", header.interlace_method);
            }
        }

        // ── Text ─────────────────────────────────────────────────────────────
        Commands::Text { input, json } => {
            let texts = PngFile::open(&input)?.texts()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&texts)?);
            } else {
                for t in &texts {
                    println!("{}: {}", t.key, t.text);
                }
            }
        }

        // ── Verify ───────────────────────────────────────────────────────────
        Commands::Verify { input } => {
            let png = PngFile::open(&input)?;
            let chunks = png.chunks()?;
            println!("OK: {} chunk(s), {} bytes", chunks.len(), png.bytes().len());
        }

        // ── Embed ────────────────────────────────────────────────────────────
        Commands::Embed { input, output, key, data } => {
            let payload = std::fs::read(&data)?;
            let blob = encode_blob(&key, &payload)?;
            let png = PngFile::open(&input)?;
            let stats = png.rewrite_to(&output, RewriteOptions::default(), |raw| {
                // Replace any earlier blob with the same key.
                if decode_blob(&raw.chunk).is_some_and(|b| b.key == key) {
                    return Ok::<_, ChunkError>(vec![]);
                }
                let mut emit = vec![Emit::PassThrough];
                if raw.chunk_type() == ChunkType::Ihdr {
                    emit.push(Emit::Chunk(blob.clone()));
                }
                Ok(emit)
            })?;
            report(&output, &stats);
        }

        // ── Extract ──────────────────────────────────────────────────────────
        Commands::Extract { input, key, output } => {
            let blob = PngFile::open(&input)?
                .blob(&key)?
                .ok_or_else(|| format!("no blob with key '{key}'"))?;
            std::fs::write(&output, &blob.data)?;
            println!("Extracted {} bytes ({}…) → {}",
                blob.data.len(),
                hex::encode(&blob.data[..blob.data.len().min(8)]),
                output.display());
        }

        // ── AddText ──────────────────────────────────────────────────────────
        Commands::AddText { input, output, key, text, kind } => {
            let chunk = encode_text(kind.into(), &TextEntry::new(key, text))?;
            let png = PngFile::open(&input)?;
            let stats = png.rewrite_to(&output, RewriteOptions::default(), |raw| {
                Ok::<_, ChunkError>(if raw.chunk_type() == ChunkType::Iend {
                    vec![Emit::Chunk(chunk.clone()), Emit::PassThrough]
                } else {
                    vec![Emit::PassThrough]
                })
            })?;
            report(&output, &stats);
        }

        // ── StripText ────────────────────────────────────────────────────────
        Commands::StripText { input, output } => {
            let png = PngFile::open(&input)?;
            let stats = png.rewrite_to(&output, RewriteOptions::default(), |raw| {
                Ok::<_, ChunkError>(if raw.chunk_type().is_text() {
                    vec![]
                } else {
                    vec![Emit::PassThrough]
                })
            })?;
            report(&output, &stats);
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn report(output: &Path, stats: &TransformStats) {
    println!(
        "Wrote {} ({} chunk(s) read, {} dropped, {} new, {} bytes)",
        output.display(),
        stats.chunks_read,
        stats.chunks_dropped,
        stats.chunks_emitted,
        stats.bytes_out,
    );
}
