//! Generate sample nanosecond timestamp sequences.

use clap::{Parser, ValueEnum};
use rand::Rng;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Pattern {
    /// Evenly spaced timestamps
    Regular,
    /// Evenly spaced with random jitter of up to ±10% of the step
    Jittered,
    /// Regular, newest first
    Reversed,
    /// Regular with occasional duplicates and out-of-order writes
    Shuffled,
    /// Uniformly random over the whole i64 range
    Random,
}

#[derive(Parser)]
#[command(name = "tsd-gen")]
#[command(about = "Generate sample nanosecond timestamp sequences")]
#[command(after_help = "OUTPUT FORMAT:\n  \
    One decimal i64 (nanoseconds since the Unix epoch) per line.\n  \
    With --encoded, the tsdelta block is written instead.")]
struct Args {
    /// Output file path
    output: PathBuf,

    /// Number of timestamps to generate
    #[arg(short, long, default_value = "1000")]
    count: usize,

    /// Shape of the sequence
    #[arg(short, long, value_enum, default_value = "jittered")]
    pattern: Pattern,

    /// Step between timestamps in nanoseconds (default: 10s)
    #[arg(long, default_value = "10000000000")]
    step_ns: i64,

    /// First timestamp in nanoseconds (default: 2025-10-21T00:00:00Z)
    #[arg(long, default_value = "1761004800000000000")]
    start: i64,

    /// Write the encoded block instead of text
    #[arg(long)]
    encoded: bool,
}

/// Generate timestamps based on args
fn generate(args: &Args) -> Vec<i64> {
    let mut rng = rand::rng();
    let step = args.step_ns.max(1);
    let nominal = |i: usize| args.start.wrapping_add((i as i64).wrapping_mul(step));

    match args.pattern {
        Pattern::Regular => (0..args.count).map(nominal).collect(),
        Pattern::Jittered => {
            let spread = (step / 10).max(1);
            (0..args.count)
                .map(|i| nominal(i).wrapping_add(rng.random_range(-spread..=spread)))
                .collect()
        }
        Pattern::Reversed => (0..args.count).rev().map(nominal).collect(),
        Pattern::Shuffled => {
            let mut ts: Vec<i64> = (0..args.count).map(nominal).collect();
            for i in 1..ts.len() {
                // Roughly 5% duplicates, 5% swaps with the previous timestamp
                match rng.random_range(0..100) {
                    0..=4 => ts[i] = ts[i - 1],
                    5..=9 => ts.swap(i - 1, i),
                    _ => {}
                }
            }
            ts
        }
        Pattern::Random => (0..args.count).map(|_| rng.random::<i64>()).collect(),
    }
}

fn write_output(args: &Args, ts: &[i64]) -> Result<usize, String> {
    let file = File::create(&args.output).map_err(|e| format!("Failed to create output file: {e}"))?;
    let mut out = BufWriter::new(file);

    let written = if args.encoded {
        let bytes = tsdelta::encode(ts).map_err(|e| format!("Failed to encode: {e}"))?;
        out.write_all(&bytes).map_err(|e| format!("Failed to write data: {e}"))?;
        bytes.len()
    } else {
        let mut n = 0;
        for t in ts {
            let line = format!("{t}\n");
            out.write_all(line.as_bytes()).map_err(|e| format!("Failed to write data: {e}"))?;
            n += line.len();
        }
        n
    };

    out.flush().map_err(|e| format!("Failed to write data: {e}"))?;
    Ok(written)
}

fn main() {
    let args = Args::parse();

    let ts = generate(&args);
    match write_output(&args, &ts) {
        Ok(bytes) => {
            println!("Generated {} timestamps ({:?})", ts.len(), args.pattern);
            println!("Output: {} ({} bytes)", args.output.display(), bytes);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
