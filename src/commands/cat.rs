//! `cat`: read a whole origin and write it out.

use anyhow::Context;
use byteread_source::{with_source, ByteSource, Origin};
use std::io::Write;

use crate::{OriginArgs, ReadOpts};

pub fn run(args: &OriginArgs, opts: &ReadOpts, out: &mut impl Write) -> anyhow::Result<()> {
    let origin = Origin::parse(&args.origin)?;
    let http = opts.http_options()?;

    let contents = with_source(
        || origin.open(&http),
        |source| source.read_all(opts.chunk_size),
    )
    .with_context(|| format!("Failed to read {}", origin.display_name()))?;

    out.write_all(&contents)?;
    out.flush()?;

    tracing::info!(
        "Copied {} bytes from: {}",
        contents.len(),
        origin.display_name()
    );
    Ok(())
}
