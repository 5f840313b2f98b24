use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use ndgen::compress::Compression;
use ndgen::generate::{DEFAULT_COUNT, DEFAULT_MAX_KEYS, GenerationReport, GeneratorConfig, Timing};

#[derive(Parser)]
#[command(name = "ndgen", about = "Generate random NDJSON benchmark data", version)]
struct Cli {
    /// Output file
    outfile: PathBuf,

    /// Number of lines
    #[arg(long, default_value_t = DEFAULT_COUNT)]
    n: u64,

    /// Max random keys
    #[arg(long, default_value_t = DEFAULT_MAX_KEYS)]
    p: usize,

    /// Compress the output stream (plain NDJSON by default)
    #[arg(long, value_enum, default_value_t = Compression::None)]
    compress: Compression,

    /// Print a JSON summary (total and per-type bytes) to stdout when done
    #[arg(long)]
    summary: bool,

    /// Print timing breakdown to stderr (for profiling)
    #[arg(long = "debug-timing", hide = true)]
    debug_timing: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = GeneratorConfig {
        outfile: cli.outfile,
        count: cli.n,
        max_keys: cli.p,
        compression: cli.compress,
    };

    println!("Generating data in {}...", config.outfile.display());
    let (report, timing) = ndgen::generate(&config)?;

    if cli.summary {
        println!("{}", report.to_json()?);
    }
    if cli.debug_timing {
        print_timing(&config, &report, &timing);
    }
    Ok(())
}

fn print_timing(config: &GeneratorConfig, report: &GenerationReport, timing: &Timing) {
    let total = timing.total().as_secs_f64();
    let mb = report.bytes as f64 / (1024.0 * 1024.0);
    let pct = |secs: f64| if total > 0.0 { secs / total * 100.0 } else { 0.0 };
    eprintln!(
        "--- debug-timing: {} ({} records, {mb:.1} MB) ---",
        config.outfile.display(),
        report.records
    );
    eprintln!(
        "  generate: {:>8.2}ms  ({:.0}%)",
        timing.generate.as_secs_f64() * 1000.0,
        pct(timing.generate.as_secs_f64())
    );
    eprintln!(
        "  finish:   {:>8.2}ms  ({:.0}%)",
        timing.finish.as_secs_f64() * 1000.0,
        pct(timing.finish.as_secs_f64())
    );
    eprintln!(
        "  total:    {:>8.2}ms  ({:.0} MB/s)",
        total * 1000.0,
        if total > 0.0 { mb / total } else { 0.0 }
    );
}
