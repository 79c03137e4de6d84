//! Command handlers.
//!
//! Each handler opens its origin, drives one of the byte source operations
//! and writes the result to the given writer:
//!
//! - `cat`: whole content via `read_all`
//! - `chunks`: one status line per `read`
//! - `scan`: one token per line via `read_delimited`
//! - `seek`: a byte range via `seek` followed by bounded reads

pub mod cat;
pub mod chunks;
pub mod scan;
pub mod seek;

use anyhow::Context;
use byteread_source::{ByteSource, Origin};

use crate::ReadOpts;

/// Parse and open an origin string with the shared options
fn open_origin(
    origin: &str,
    opts: &ReadOpts,
) -> anyhow::Result<(Origin, Box<dyn ByteSource + Send>)> {
    let origin = Origin::parse(origin)?;
    let http = opts.http_options()?;
    let source = origin
        .open(&http)
        .with_context(|| format!("Failed to open {}", origin.display_name()))?;
    Ok((origin, source))
}
