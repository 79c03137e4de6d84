//! Command-line interface for byteread
//!
//! # Usage Examples
//!
//! ```bash
//! # Whole file
//! byteread cat ./notes.txt
//!
//! # Chunk outcomes for a 25 byte file read 10 bytes at a time
//! byteread --chunk-size 10 chunks ./25-bytes.bin
//! # n=10 status=more
//! # n=10 status=more
//! # n=5 status=end
//!
//! # Lines from standard input
//! cat notes.txt | byteread scan - --split lines
//!
//! # Comma separated fields of an HTTP body
//! byteread scan https://example.com/data.csv --delimiter ,
//!
//! # Last 8 bytes of a file
//! byteread seek ./data.bin --offset -8 --whence end
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`.

use byteread::{commands, OriginArgs, ReadOpts, ScanArgs, SeekArgs};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "byteread")]
#[command(about = "Read files, standard input, or HTTP bodies in chunks, by token, or from an offset")]
#[command(long_about = None)]
struct Cli {
    #[command(flatten)]
    opts: ReadOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the whole origin and write it to stdout
    Cat(OriginArgs),

    /// Print the byte count and completion status of every read
    Chunks(OriginArgs),

    /// Split the origin into tokens and print one per line
    Scan(ScanArgs),

    /// Seek within a file and print the bytes that follow
    Seek(SeekArgs),
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Cat(args) => commands::cat::run(&args, &cli.opts, &mut out),
        Commands::Chunks(args) => commands::chunks::run(&args, &cli.opts, &mut out),
        Commands::Scan(args) => commands::scan::run(&args, &cli.opts, &mut out),
        Commands::Seek(args) => commands::seek::run(&args, &cli.opts, &mut out),
    }
}
