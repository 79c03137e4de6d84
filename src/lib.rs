//! byteread library
//!
//! Command-line options and command handlers for the `byteread` binary, a
//! thin driver over the `byteread-source` crate.
//!
//! # CLI Usage
//!
//! ```bash
//! # Print a whole file, read in 4KB chunks
//! byteread --chunk-size 4096 cat ./data.bin
//!
//! # Show how standard input arrives, one line per read
//! printf 'hello world' | byteread --chunk-size 4 chunks -
//!
//! # Print the words of an HTTP body, one per line
//! byteread --http-timeout 30s scan https://example.com/book.txt --split words
//!
//! # Print 16 bytes starting 32 bytes before the end of a file
//! byteread seek ./data.bin --offset -32 --whence end --length 16
//! ```

use anyhow::Context;
use clap::{Args, Parser, ValueEnum};
use std::io::SeekFrom;

pub mod commands;
pub mod config;

// Re-export the source crate for convenience
pub use byteread_source as source;

use source::{HttpOptions, SplitPolicy, DEFAULT_CHUNK_SIZE, DEFAULT_MAX_TOKEN_SIZE};

/// Options shared by every command
#[derive(Parser, Clone, Debug)]
pub struct ReadOpts {
    /// Capacity of the reusable chunk buffer in bytes
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE, env = "BYTEREAD_CHUNK_SIZE")]
    pub chunk_size: usize,

    /// Timeout for HTTP origins (e.g. "500ms", "30s", "2m")
    #[arg(long, env = "BYTEREAD_HTTP_TIMEOUT")]
    pub http_timeout: Option<String>,
}

impl ReadOpts {
    /// Build the HTTP options for opening URL origins
    pub fn http_options(&self) -> anyhow::Result<HttpOptions> {
        let timeout = self
            .http_timeout
            .as_deref()
            .map(config::parse_duration)
            .transpose()
            .with_context(|| {
                format!(
                    "Invalid HTTP timeout: {}",
                    self.http_timeout.as_deref().unwrap_or_default()
                )
            })?;
        Ok(HttpOptions { timeout })
    }
}

/// An origin to read from
#[derive(Args, Clone, Debug)]
pub struct OriginArgs {
    /// File path, `-` for standard input, or an http(s) URL
    pub origin: String,
}

/// Splitting policy selectable on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SplitArg {
    Bytes,
    Lines,
    Words,
    Runes,
}

#[derive(Args, Clone, Debug)]
pub struct ScanArgs {
    /// File path, `-` for standard input, or an http(s) URL
    pub origin: String,

    /// How bytes are grouped into tokens
    #[arg(long, value_enum, default_value = "lines")]
    pub split: SplitArg,

    /// Split on this ASCII character instead (overrides --split)
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Largest token accepted, delimiter excluded
    #[arg(long, default_value_t = DEFAULT_MAX_TOKEN_SIZE)]
    pub max_token_size: usize,
}

impl ScanArgs {
    pub fn policy(&self) -> anyhow::Result<SplitPolicy> {
        if let Some(delimiter) = self.delimiter {
            if !delimiter.is_ascii() {
                anyhow::bail!("Delimiter must be a single ASCII character, got '{delimiter}'");
            }
            return Ok(SplitPolicy::delimiter(delimiter as u8));
        }

        Ok(match self.split {
            SplitArg::Bytes => SplitPolicy::Bytes,
            SplitArg::Lines => SplitPolicy::Lines,
            SplitArg::Words => SplitPolicy::Words,
            SplitArg::Runes => SplitPolicy::Runes,
        })
    }
}

/// Reference point for a seek
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Whence {
    Start,
    Current,
    End,
}

#[derive(Args, Clone, Debug)]
pub struct SeekArgs {
    /// File path (seeking needs a random-access origin)
    pub origin: String,

    /// Signed byte offset from the reference point
    #[arg(long, allow_hyphen_values = true)]
    pub offset: i64,

    /// Reference point the offset is measured from
    #[arg(long, value_enum, default_value = "start")]
    pub whence: Whence,

    /// Number of bytes to print (everything up to the end when omitted)
    #[arg(long)]
    pub length: Option<u64>,
}

impl SeekArgs {
    pub fn seek_from(&self) -> anyhow::Result<SeekFrom> {
        Ok(match self.whence {
            Whence::Start => {
                let offset = u64::try_from(self.offset).with_context(|| {
                    format!("Offset from start must not be negative: {}", self.offset)
                })?;
                SeekFrom::Start(offset)
            }
            Whence::Current => SeekFrom::Current(self.offset),
            Whence::End => SeekFrom::End(self.offset),
        })
    }
}
