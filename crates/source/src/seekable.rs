//! Random-access origins: local files and in-memory bytes

use crate::error::{Result, SourceError};
use crate::source::{ByteSource, ReadOutcome};
use std::fs::File;
use std::io::{Cursor, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

/// A byte source over any `Read + Seek` origin.
///
/// The origin length is tracked so the read that reaches the end reports
/// [`Status::End`](crate::Status::End) together with its final bytes.
pub struct SeekableSource<R> {
    inner: Option<R>,
    label: String,
    len: u64,
    pos: u64,
    ended: bool,
}

impl SeekableSource<File> {
    /// Open a local file for reading
    ///
    /// # Example
    /// ```ignore
    /// let mut source = SeekableSource::open_file("data.bin")?;
    /// let contents = source.read_all(DEFAULT_CHUNK_SIZE)?;
    /// ```
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let label = path.display().to_string();
        let file = File::open(path).map_err(|e| SourceError::io(&label, e))?;
        tracing::debug!("Opened file: {label}");
        Self::new(label, file)
    }
}

impl SeekableSource<Cursor<Vec<u8>>> {
    /// Wrap bytes already in memory
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        Self {
            len: bytes.len() as u64,
            inner: Some(Cursor::new(bytes)),
            label: "memory".to_string(),
            pos: 0,
            ended: false,
        }
    }
}

impl<R: Read + Seek> SeekableSource<R> {
    /// Wrap an already opened origin, starting at its current position
    pub fn new(label: impl Into<String>, mut inner: R) -> Result<Self> {
        let label = label.into();
        let pos = inner
            .stream_position()
            .map_err(|e| SourceError::io(&label, e))?;
        let len = measure(&mut inner, pos).map_err(|e| SourceError::io(&label, e))?;

        Ok(Self {
            inner: Some(inner),
            label,
            len,
            pos,
            ended: false,
        })
    }

    /// Current absolute read position
    pub fn position(&self) -> u64 {
        self.pos
    }
}

/// Length of the origin, leaving the cursor at `pos`
fn measure<R: Seek>(inner: &mut R, pos: u64) -> std::io::Result<u64> {
    let len = inner.seek(SeekFrom::End(0))?;
    inner.seek(SeekFrom::Start(pos))?;
    Ok(len)
}

impl<R: Read + Seek> ByteSource for SeekableSource<R> {
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

        let mut filled = 0;
        let mut hit_eof = false;
        while filled < buf.len() {
            match inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    hit_eof = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(SourceError::io(&self.label, e)),
            }
        }
        self.pos += filled as u64;

        // The file may have grown since the length was last taken
        if !hit_eof && self.pos >= self.len {
            self.len = measure(inner, self.pos).map_err(|e| SourceError::io(&self.label, e))?;
        }

        if hit_eof || self.pos >= self.len {
            self.ended = true;
            self.len = self.len.max(self.pos);
            Ok(ReadOutcome::end(filled))
        } else {
            Ok(ReadOutcome::more(filled))
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

    fn seek(&mut self, target: SeekFrom) -> Result<u64> {
        let Some(inner) = self.inner.as_mut() else {
            return Err(SourceError::released(&self.label));
        };

        let len = measure(inner, self.pos).map_err(|e| SourceError::io(&self.label, e))?;
        self.len = len;

        let absolute = match target {
            SeekFrom::Start(offset) => i128::from(offset),
            SeekFrom::Current(offset) => i128::from(self.pos) + i128::from(offset),
            SeekFrom::End(offset) => i128::from(len) + i128::from(offset),
        };
        if absolute < 0 || absolute > i128::from(len) {
            return Err(SourceError::InvalidSeek {
                origin: self.label.clone(),
                target,
                len,
            });
        }

        let position = absolute as u64;
        inner
            .seek(SeekFrom::Start(position))
            .map_err(|e| SourceError::io(&self.label, e))?;
        self.pos = position;
        self.ended = false;

        Ok(position)
    }

    fn is_seekable(&self) -> bool {
        true
    }
}
