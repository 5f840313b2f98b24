//! Output sinks with optional compression.
//!
//! Output is plain NDJSON unless a compression is requested explicitly
//! (`--compress gzip|zstd`). The file name never selects a codec.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Capacity of the file-level write buffer.
pub const WRITE_BUFFER_CAPACITY: usize = 128 * 1024;

/// Compression applied to the output stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Compression {
    #[default]
    None,
    Gzip,
    Zstd,
}

/// A created output file, possibly wrapped in an encoder.
pub enum Sink {
    Plain(BufWriter<File>),
    Gzip(flate2::write::GzEncoder<BufWriter<File>>),
    Zstd(zstd::Encoder<'static, BufWriter<File>>),
}

impl Sink {
    /// Create (or truncate) `path` and wrap it in the requested encoder.
    pub fn create(path: &Path, compression: Compression) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create output file: {}", path.display()))?;
        let inner = BufWriter::with_capacity(WRITE_BUFFER_CAPACITY, file);
        Ok(match compression {
            Compression::None => Sink::Plain(inner),
            Compression::Gzip => {
                Sink::Gzip(flate2::write::GzEncoder::new(inner, flate2::Compression::default()))
            }
            Compression::Zstd => Sink::Zstd(
                zstd::Encoder::new(inner, zstd::DEFAULT_COMPRESSION_LEVEL).with_context(|| {
                    format!("failed to initialize zstd encoder for: {}", path.display())
                })?,
            ),
        })
    }

    pub fn compression(&self) -> Compression {
        match self {
            Sink::Plain(_) => Compression::None,
            Sink::Gzip(_) => Compression::Gzip,
            Sink::Zstd(_) => Compression::Zstd,
        }
    }

    /// Write any encoder trailer and flush everything down to the file.
    pub fn finish(self) -> io::Result<()> {
        let mut inner = match self {
            Sink::Plain(w) => w,
            Sink::Gzip(enc) => enc.finish()?,
            Sink::Zstd(enc) => enc.finish()?,
        };
        inner.flush()
    }
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Sink::Plain(w) => w.write(buf),
            Sink::Gzip(w) => w.write(buf),
            Sink::Zstd(w) => w.write(buf),
        }
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Sink::Plain(w) => w.write_all(buf),
            Sink::Gzip(w) => w.write_all(buf),
            Sink::Zstd(w) => w.write_all(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Plain(w) => w.flush(),
            Sink::Gzip(w) => w.flush(),
            Sink::Zstd(w) => w.flush(),
        }
    }
}
