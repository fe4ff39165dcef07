//! Report how timestamp files compress with tsdelta.
//!
//! Each input is a text file with one i64 nanosecond timestamp per line, or an
//! encoded block when `--encoded` is given. Set `RUST_LOG=tsdelta=debug` to see
//! the encoder's strategy decisions.

use clap::Parser;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tsdelta::{decode, inspect, Encoder};

#[derive(Parser)]
#[command(name = "tsd-analyze")]
#[command(about = "Report tsdelta compression for timestamp files")]
struct Args {
    /// Input files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Inputs are encoded blocks rather than text
    #[arg(long)]
    encoded: bool,

    /// Highest divisor exponent to try (supported: 0, 3, 6, 9, 12, 15)
    #[arg(long, default_value = "9")]
    max_exp: u8,
}

/// Read one timestamp per line; `#` starts a comment, blank lines are skipped
fn read_text(path: &Path) -> Result<Vec<i64>, String> {
    let file = File::open(path).map_err(|e| format!("Failed to open {}: {e}", path.display()))?;
    let reader = BufReader::new(file);
    let mut ts = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let t: i64 = trimmed
            .parse()
            .map_err(|e| format!("Line {}: invalid timestamp '{}': {}", line_num + 1, trimmed, e))?;
        ts.push(t);
    }

    Ok(ts)
}

/// Encode with a given divisor ceiling
macro_rules! encode_with {
    ($max_exp:expr, $ts:expr) => {{
        let enc: Encoder<$max_exp> = $ts.iter().copied().collect();
        enc.finalize().map_err(|e| e.to_string())
    }};
}

fn encode_text(ts: &[i64], max_exp: u8) -> Result<Vec<u8>, String> {
    // Match on supported ceilings (const generics require compile-time values)
    match max_exp {
        0 => encode_with!(0, ts),
        3 => encode_with!(3, ts),
        6 => encode_with!(6, ts),
        9 => encode_with!(9, ts),
        12 => encode_with!(12, ts),
        15 => encode_with!(15, ts),
        other => Err(format!("Unsupported max exponent {other}. Supported values: 0, 3, 6, 9, 12, 15")),
    }
}

fn analyze(path: &Path, args: &Args) -> Result<(), String> {
    let start = Instant::now();
    let (ts, bytes) = if args.encoded {
        let bytes = fs::read(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
        let ts = decode(&bytes).map_err(|e| format!("{}: {e}", path.display()))?;
        (ts, bytes)
    } else {
        let ts = read_text(path)?;
        let bytes = encode_text(&ts, args.max_exp)?;
        let decoded = decode(&bytes).map_err(|e| format!("{}: {e}", path.display()))?;
        if decoded != ts {
            return Err(format!("{}: roundtrip mismatch", path.display()));
        }
        (ts, bytes)
    };
    let elapsed = start.elapsed();

    let Some(block) = inspect(&bytes).map_err(|e| e.to_string())? else {
        warn!(path = %path.display(), "no timestamps");
        return Ok(());
    };

    let raw_size = ts.len() * 8;
    info!(path = %path.display(), count = ts.len(), ?elapsed, "analyzed");
    println!("{}", path.display());
    println!("  Timestamps:  {}", block.count);
    println!("  Encoding:    {}", block.encoding);
    println!("  Divisor:     10^{} ({})", block.exponent, block.divisor());
    println!("  Raw size:    {raw_size} bytes");
    println!("  Encoded:     {} bytes ({:.2} bytes/timestamp)", bytes.len(), bytes.len() as f64 / ts.len() as f64);
    println!("  Compression: {:.1}x", raw_size as f64 / bytes.len() as f64);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut failed = false;
    for path in &args.inputs {
        if let Err(e) = analyze(path, &args) {
            eprintln!("Error: {e}");
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
}
