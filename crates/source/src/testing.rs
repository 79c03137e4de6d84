//! Test helpers

use crate::error::{Result, SourceError};
use crate::source::{ByteSource, ReadOutcome};
use std::collections::VecDeque;
use std::io::ErrorKind;

/// A source that replays a fixed script of outcomes.
///
/// Bytes written for each outcome are taken from `data` in order (zeros once
/// it runs out). An exhausted script reports end-of-stream.
pub(crate) struct ScriptedSource {
    data: Vec<u8>,
    pos: usize,
    script: VecDeque<std::result::Result<ReadOutcome, ErrorKind>>,
    closed: bool,
}

impl ScriptedSource {
    pub(crate) fn new(script: Vec<std::result::Result<ReadOutcome, ErrorKind>>) -> Self {
        Self::with_data(&[], script)
    }

    pub(crate) fn with_data(
        data: &[u8],
        script: Vec<std::result::Result<ReadOutcome, ErrorKind>>,
    ) -> Self {
        Self {
            data: data.to_vec(),
            pos: 0,
            script: script.into(),
            closed: false,
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed
    }
}

impl ByteSource for ScriptedSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<ReadOutcome> {
        if self.closed {
            return Err(SourceError::released("scripted"));
        }
        if buf.is_empty() {
            return Err(SourceError::InvalidChunkSize);
        }

        match self.script.pop_front() {
            Some(Ok(outcome)) => {
                let size = outcome.size.min(buf.len());
                for (i, slot) in buf[..size].iter_mut().enumerate() {
                    *slot = self.data.get(self.pos + i).copied().unwrap_or(0);
                }
                self.pos += size;
                Ok(ReadOutcome {
                    size,
                    status: outcome.status,
                })
            }
            Some(Err(kind)) => Err(SourceError::io("scripted", kind.into())),
            None => Ok(ReadOutcome::end(0)),
        }
    }

    fn label(&self) -> &str {
        "scripted"
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}
