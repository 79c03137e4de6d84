//! Error types for byteread-source.
//!
//! End-of-stream is not represented here: it is a normal [`Status`](crate::Status)
//! returned alongside the byte count.

use std::io::SeekFrom;
use thiserror::Error;

/// Failures a byte source can report.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("read failed on {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid seek on {origin}: {target:?} is outside 0..={len}")]
    InvalidSeek {
        origin: String,
        target: SeekFrom,
        len: u64,
    },

    #[error("{operation} is not supported by {origin}")]
    Unsupported {
        origin: String,
        operation: &'static str,
    },

    #[error("{origin} was used after it was released")]
    Released { origin: String },

    #[error("chunk buffer must have a capacity greater than zero")]
    InvalidChunkSize,

    #[error("token exceeds the maximum size of {limit} bytes")]
    TokenTooLong { limit: usize },

    #[error("no progress after {attempts} consecutive empty reads")]
    NoProgress { attempts: usize },

    #[error("token is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("HTTP request failed with status {status} for URL: {url}")]
    Http {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to fetch URL {url}: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid origin: {0}")]
    InvalidOrigin(String),
}

impl SourceError {
    pub(crate) fn io(origin: &str, source: std::io::Error) -> Self {
        SourceError::Io {
            origin: origin.to_string(),
            source,
        }
    }

    pub(crate) fn released(origin: &str) -> Self {
        SourceError::Released {
            origin: origin.to_string(),
        }
    }

    /// True for a use-after-release failure.
    pub fn is_released(&self) -> bool {
        matches!(self, SourceError::Released { .. })
    }
}

/// Result type alias for byte source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
