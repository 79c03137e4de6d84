//! Pure stream origins: standard input, network bodies and arbitrary readers

use crate::error::{Result, SourceError};
use crate::source::{ByteSource, ReadOutcome};
use std::io::{ErrorKind, Read, Stdin};

/// A byte source over any `Read` without random access.
///
/// A stream cannot tell it is exhausted until a read returns no bytes, so
/// end-of-stream is always reported with a zero count.
pub struct StreamSource<R> {
    inner: Option<R>,
    label: String,
    ended: bool,
}

impl StreamSource<Stdin> {
    /// Standard input of the current process
    pub fn stdin() -> Self {
        Self::from_reader("stdin", std::io::stdin())
    }
}

impl<R: Read> StreamSource<R> {
    pub fn from_reader(label: impl Into<String>, reader: R) -> Self {
        Self {
            inner: Some(reader),
            label: label.into(),
            ended: false,
        }
    }
}

impl<R: Read> ByteSource for StreamSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome> {
        if buf.is_empty() {
            return Err(SourceError::InvalidChunkSize);
        }
        let Some(inner) = self.inner.as_mut() else {
            return Err(SourceError::released(&self.label));
        };
        if self.ended {
            return Ok(ReadOutcome::end(0));
        }

        loop {
            match inner.read(buf) {
                Ok(0) => {
                    self.ended = true;
                    return Ok(ReadOutcome::end(0));
                }
                Ok(n) => return Ok(ReadOutcome::more(n)),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(SourceError::io(&self.label, e)),
            }
        }
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn close(&mut self) -> Result<()> {
        if self.inner.take().is_some() {
            tracing::debug!("Released: {}", self.label);
        }
        Ok(())
    }
}
