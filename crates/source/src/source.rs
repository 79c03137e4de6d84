//! The byte source capability and the operations derived from it

use crate::error::{Result, SourceError};
use crate::scanner::{Scanner, SplitPolicy};
use crate::MAX_EMPTY_READS;
use std::fmt;
use std::io::SeekFrom;

/// Whether an origin may still produce bytes after a read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// More bytes may follow; call `read` again
    More,
    /// The origin is exhausted; no further bytes will ever be produced
    End,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::More => write!(f, "more"),
            Status::End => write!(f, "end"),
        }
    }
}

/// Result of a single successful `read`
///
/// Only `buf[..size]` holds valid data. A final positive `size` may be paired
/// with [`Status::End`], so callers consume the bytes before stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOutcome {
    pub size: usize,
    pub status: Status,
}

impl ReadOutcome {
    pub fn more(size: usize) -> Self {
        Self {
            size,
            status: Status::More,
        }
    }

    pub fn end(size: usize) -> Self {
        Self {
            size,
            status: Status::End,
        }
    }

    pub fn is_end(&self) -> bool {
        self.status == Status::End
    }
}

/// A sequential origin of bytes: file, stdin, memory or a network body.
///
/// Implementors provide `read`, `label` and `close`. Random-access origins
/// also override `seek` and `is_seekable`; everything else is derived.
pub trait ByteSource {
    /// Fill the start of `buf` with the next available bytes.
    ///
    /// # Errors
    ///
    /// - [`SourceError::InvalidChunkSize`] for an empty buffer
    /// - [`SourceError::Released`] after [`close`](ByteSource::close)
    /// - [`SourceError::Io`] when the underlying read fails
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome>;

    /// Name of the origin, for logging and error messages
    fn label(&self) -> &str;

    /// Release the underlying handle. Closing twice is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Move the read position and return the new absolute position.
    ///
    /// Pure streams cannot seek and fail with [`SourceError::Unsupported`].
    fn seek(&mut self, target: SeekFrom) -> Result<u64> {
        let _ = target;
        Err(SourceError::Unsupported {
            origin: self.label().to_string(),
            operation: "seek",
        })
    }

    fn is_seekable(&self) -> bool {
        false
    }

    /// Read everything up to end-of-stream using a reusable chunk buffer.
    ///
    /// A failure aborts the loop; bytes accumulated so far are dropped so a
    /// truncated result is never mistaken for the full content.
    fn read_all(&mut self, chunk_size: usize) -> Result<Vec<u8>> {
        if chunk_size == 0 {
            return Err(SourceError::InvalidChunkSize);
        }

        let mut chunk = vec![0u8; chunk_size];
        let mut contents = Vec::new();
        let mut empty_reads = 0;

        loop {
            let outcome = self.read(&mut chunk)?;
            contents.extend_from_slice(&chunk[..outcome.size]);
            tracing::trace!(
                "Read chunk of {} bytes from {} ({:?})",
                outcome.size,
                self.label(),
                outcome.status
            );

            if outcome.is_end() {
                break;
            }

            if outcome.size == 0 {
                empty_reads += 1;
                if empty_reads >= MAX_EMPTY_READS {
                    return Err(SourceError::NoProgress {
                        attempts: empty_reads,
                    });
                }
            } else {
                empty_reads = 0;
            }
        }

        tracing::debug!("Read {} bytes from: {}", contents.len(), self.label());

        Ok(contents)
    }

    /// Lazily yield the valid prefix of every fill, in read order.
    fn chunks(self, chunk_size: usize) -> Result<Chunks<Self>>
    where
        Self: Sized,
    {
        if chunk_size == 0 {
            return Err(SourceError::InvalidChunkSize);
        }
        Ok(Chunks {
            source: self,
            buf: vec![0u8; chunk_size],
            finished: false,
            empty_reads: 0,
        })
    }

    /// Group the bytes of this source into tokens according to `policy`.
    fn read_delimited(self, policy: SplitPolicy) -> Scanner<Self>
    where
        Self: Sized,
    {
        Scanner::new(self, policy)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome> {
        (**self).read(buf)
    }

    fn label(&self) -> &str {
        (**self).label()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn seek(&mut self, target: SeekFrom) -> Result<u64> {
        (**self).seek(target)
    }

    fn is_seekable(&self) -> bool {
        (**self).is_seekable()
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome> {
        (**self).read(buf)
    }

    fn label(&self) -> &str {
        (**self).label()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn seek(&mut self, target: SeekFrom) -> Result<u64> {
        (**self).seek(target)
    }

    fn is_seekable(&self) -> bool {
        (**self).is_seekable()
    }
}

/// Iterator over the chunks of a byte source, see [`ByteSource::chunks`]
pub struct Chunks<S> {
    source: S,
    buf: Vec<u8>,
    finished: bool,
    empty_reads: usize,
}

impl<S> Chunks<S> {
    /// Recover the source, e.g. to close it explicitly
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: ByteSource> Iterator for Chunks<S> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let outcome = match self.source.read(&mut self.buf) {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            };

            if outcome.is_end() {
                self.finished = true;
            }

            if outcome.size > 0 {
                self.empty_reads = 0;
                return Some(Ok(self.buf[..outcome.size].to_vec()));
            }

            if !self.finished {
                self.empty_reads += 1;
                if self.empty_reads >= MAX_EMPTY_READS {
                    self.finished = true;
                    return Some(Err(SourceError::NoProgress {
                        attempts: self.empty_reads,
                    }));
                }
            }
        }
        None
    }
}

/// Acquire a source, run `body` against it and release it on every exit path.
///
/// When both `body` and the release fail, the error from `body` is returned.
pub fn with_source<S, T, O, F>(open: O, body: F) -> Result<T>
where
    S: ByteSource,
    O: FnOnce() -> Result<S>,
    F: FnOnce(&mut S) -> Result<T>,
{
    let mut source = open()?;
    let result = body(&mut source);
    let closed = source.close();
    let value = result?;
    closed?;
    Ok(value)
}
