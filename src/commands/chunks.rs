//! `chunks`: report the outcome of every read.

use anyhow::Context;
use byteread_source::ByteSource;
use std::io::Write;

use super::open_origin;
use crate::{OriginArgs, ReadOpts};

pub fn run(args: &OriginArgs, opts: &ReadOpts, out: &mut impl Write) -> anyhow::Result<()> {
    let (origin, mut source) = open_origin(&args.origin, opts)?;
    let mut buf = vec![0u8; opts.chunk_size];
    let mut reads = 0usize;
    let mut total = 0usize;

    loop {
        let outcome = source
            .read(&mut buf)
            .with_context(|| format!("Failed to read {}", origin.display_name()))?;
        reads += 1;
        total += outcome.size;
        writeln!(out, "n={} status={}", outcome.size, outcome.status)?;

        if outcome.is_end() {
            break;
        }
    }

    source.close()?;
    out.flush()?;

    tracing::info!(
        "{} reads, {} bytes from: {}",
        reads,
        total,
        origin.display_name()
    );
    Ok(())
}
