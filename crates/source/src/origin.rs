//! Origin locators: turn a user supplied string into an open byte source

use crate::error::{Result, SourceError};
use crate::http::{HttpOptions, HttpSource};
use crate::seekable::SeekableSource;
use crate::source::ByteSource;
use crate::stream::StreamSource;
use std::path::PathBuf;

/// Where bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Standard input of the current process
    Stdin,
    /// Local filesystem path
    Local(PathBuf),
    /// HTTP/HTTPS URL
    Http(String),
    /// Bytes already in memory
    Memory(Vec<u8>),
}

impl Origin {
    /// Parse a string into an Origin, auto-detecting the kind
    ///
    /// - `-` -> Stdin
    /// - `http://` or `https://` -> Http
    /// - Everything else -> Local
    pub fn parse(uri: &str) -> Result<Self> {
        if uri.is_empty() {
            return Err(SourceError::InvalidOrigin(
                "origin must not be empty".to_string(),
            ));
        }

        if uri == "-" {
            Ok(Origin::Stdin)
        } else if uri.starts_with("http://") || uri.starts_with("https://") {
            Ok(Origin::Http(uri.to_string()))
        } else {
            Ok(Origin::Local(PathBuf::from(uri)))
        }
    }

    /// Whether the opened source will support `seek`
    pub fn is_seekable(&self) -> bool {
        matches!(self, Origin::Local(_) | Origin::Memory(_))
    }

    /// Open this origin for reading
    pub fn open(&self, http: &HttpOptions) -> Result<Box<dyn ByteSource + Send>> {
        tracing::debug!("Opening origin: {}", self.display_name());

        let source: Box<dyn ByteSource + Send> = match self {
            Origin::Stdin => Box::new(StreamSource::stdin()),
            Origin::Local(path) => Box::new(SeekableSource::open_file(path)?),
            Origin::Http(url) => Box::new(HttpSource::open(url, http)?),
            Origin::Memory(bytes) => Box::new(SeekableSource::from_bytes(bytes.clone())),
        };
        Ok(source)
    }

    /// Get a display name for logging
    pub fn display_name(&self) -> String {
        match self {
            Origin::Stdin => "stdin".to_string(),
            Origin::Local(path) => path.display().to_string(),
            Origin::Http(url) => url.clone(),
            Origin::Memory(bytes) => format!("memory ({} bytes)", bytes.len()),
        }
    }
}

impl std::str::FromStr for Origin {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self> {
        Origin::parse(s)
    }
}
