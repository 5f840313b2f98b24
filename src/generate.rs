//! The generation loop: draw a record, encode it, write it, repeat.

use anyhow::{Context, Result};
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::compress::{Compression, Sink};
use crate::output::LineEncoder;
use crate::record::Record;

pub const DEFAULT_COUNT: u64 = 1_000_000;
pub const DEFAULT_MAX_KEYS: usize = 10;

/// What to generate and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Destination file; created or truncated.
    pub outfile: PathBuf,
    /// Number of lines to write.
    pub count: u64,
    /// Upper bound (inclusive) on auxiliary keys per record.
    pub max_keys: usize,
    /// Encoder wrapped around the file; plain NDJSON by default.
    pub compression: Compression,
}

impl GeneratorConfig {
    pub fn new(outfile: impl Into<PathBuf>) -> Self {
        Self {
            outfile: outfile.into(),
            count: DEFAULT_COUNT,
            max_keys: DEFAULT_MAX_KEYS,
            compression: Compression::None,
        }
    }
}

/// Records and bytes written for one `"type"` value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub records: u64,
    pub bytes: u64,
}

/// Aggregate of a finished run. Byte counts are uncompressed NDJSON bytes,
/// newlines included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub records: u64,
    pub bytes: u64,
    pub by_type: BTreeMap<&'static str, Tally>,
}

/// The per-type byte summary a log summarizer prints for a file, so a fixture
/// can be compared against it directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonSummary {
    /// Total uncompressed size in bytes
    pub total_size: u64,
    /// Aggregate bytes per `type`
    pub type_size: BTreeMap<String, u64>,
    /// Lines written
    pub total_records: u64,
}

impl GenerationReport {
    pub fn json_summary(&self) -> JsonSummary {
        JsonSummary {
            total_size: self.bytes,
            type_size: self
                .by_type
                .iter()
                .map(|(kind, tally)| (kind.to_string(), tally.bytes))
                .collect(),
            total_records: self.records,
        }
    }

    /// Pretty-printed [`JsonSummary`].
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.json_summary())
    }

    fn accumulate(&mut self, kind: &'static str, bytes: usize) {
        let bytes = bytes as u64;
        self.records += 1;
        self.bytes += bytes;
        let tally = self.by_type.entry(kind).or_default();
        tally.records += 1;
        tally.bytes += bytes;
    }
}

/// Wall-clock split of a run, for `--debug-timing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Timing {
    pub generate: Duration,
    pub finish: Duration,
}

impl Timing {
    pub fn total(&self) -> Duration {
        self.generate + self.finish
    }
}

/// Write `count` random records to `out` as NDJSON.
pub fn write_records<W, R>(
    out: &mut W,
    count: u64,
    max_keys: usize,
    rng: &mut R,
) -> Result<GenerationReport>
where
    W: Write + ?Sized,
    R: Rng + ?Sized,
{
    let mut encoder = LineEncoder::new();
    let mut report = GenerationReport::default();
    for i in 0..count {
        let record = Record::random(rng, max_keys);
        let written = encoder
            .write_line(out, &record)
            .with_context(|| format!("failed to write record {i}"))?;
        report.accumulate(record.kind(), written);
    }
    Ok(report)
}

/// Generate the file described by `config` using `rng`.
pub fn generate_with_rng<R: Rng + ?Sized>(
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<(GenerationReport, Timing)> {
    let path = &config.outfile;
    let mut sink = Sink::create(path, config.compression)?;
    tracing::debug!(
        path = %path.display(),
        compression = ?sink.compression(),
        count = config.count,
        max_keys = config.max_keys,
        "output opened"
    );

    let t0 = Instant::now();
    let report = write_records(&mut sink, config.count, config.max_keys, rng)
        .with_context(|| format!("failed to write {}", path.display()))?;
    let generate = t0.elapsed();

    let t1 = Instant::now();
    sink.finish()
        .with_context(|| format!("failed to finish writing {}", path.display()))?;
    let finish = t1.elapsed();

    tracing::info!(
        path = %path.display(),
        records = report.records,
        bytes = report.bytes,
        types = report.by_type.len(),
        "generation complete"
    );
    for (kind, tally) in &report.by_type {
        tracing::debug!(kind, records = tally.records, bytes = tally.bytes, "type tally");
    }

    Ok((report, Timing { generate, finish }))
}

/// Generate the file described by `config` with an OS-seeded RNG.
pub fn generate(config: &GeneratorConfig) -> Result<(GenerationReport, Timing)> {
    generate_with_rng(config, &mut rand::rng())
}
