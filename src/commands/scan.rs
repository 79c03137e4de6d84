//! `scan`: split an origin into tokens and print one per line.

use anyhow::Context;
use byteread_source::ByteSource;
use std::io::Write;

use super::open_origin;
use crate::{ReadOpts, ScanArgs};

pub fn run(args: &ScanArgs, opts: &ReadOpts, out: &mut impl Write) -> anyhow::Result<()> {
    let policy = args.policy()?;
    let (origin, source) = open_origin(&args.origin, opts)?;
    tracing::debug!("Scanning {} with {:?}", origin.display_name(), policy);

    let mut scanner = source
        .read_delimited(policy)
        .with_chunk_size(opts.chunk_size)
        .with_max_token_size(args.max_token_size);

    let mut tokens = 0usize;
    for token in scanner.by_ref() {
        let token = token.with_context(|| {
            format!(
                "Failed to scan {} after {} tokens",
                origin.display_name(),
                tokens
            )
        })?;
        out.write_all(&token)?;
        out.write_all(b"\n")?;
        tokens += 1;
    }

    scanner.into_inner().close()?;
    out.flush()?;

    tracing::info!("Scanned {} tokens from: {}", tokens, origin.display_name());
    Ok(())
}
