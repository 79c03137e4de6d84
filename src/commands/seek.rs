//! `seek`: print a byte range of a random-access origin.

use anyhow::Context;
use byteread_source::ByteSource;
use std::io::Write;

use super::open_origin;
use crate::{ReadOpts, SeekArgs};

pub fn run(args: &SeekArgs, opts: &ReadOpts, out: &mut impl Write) -> anyhow::Result<()> {
    let target = args.seek_from()?;
    let (origin, mut source) = open_origin(&args.origin, opts)?;

    let position = source
        .seek(target)
        .with_context(|| format!("Failed to seek {}", origin.display_name()))?;
    tracing::debug!("Seeked {} to {}", origin.display_name(), position);

    let mut buf = vec![0u8; opts.chunk_size];
    let mut remaining = args.length;
    loop {
        let want = match remaining {
            Some(0) => break,
            Some(left) => usize::try_from(left).unwrap_or(usize::MAX).min(buf.len()),
            None => buf.len(),
        };

        let outcome = source
            .read(&mut buf[..want])
            .with_context(|| format!("Failed to read {}", origin.display_name()))?;
        out.write_all(&buf[..outcome.size])?;

        if let Some(left) = remaining.as_mut() {
            *left -= outcome.size as u64;
        }
        if outcome.is_end() {
            break;
        }
    }

    source.close()?;
    out.flush()?;
    Ok(())
}
