//! Byte source abstraction for reading from local files, standard input,
//! memory, or HTTP/HTTPS response bodies
//!
//! This crate provides one capability, [`ByteSource::read`], which fills a
//! caller supplied buffer with the next bytes of an origin and reports
//! whether the origin is exhausted. Everything else is derived from it:
//!
//! - [`ByteSource::read_all`]: accumulate the whole content
//! - [`ByteSource::chunks`]: iterate over fixed-size fills
//! - [`ByteSource::read_delimited`]: scan lines, words, runes, bytes, or
//!   custom-delimited tokens
//! - [`ByteSource::seek`]: reposition random-access origins
//!
//! # Source Types
//!
//! - **Local**: files, random access ([`SeekableSource`])
//! - **Memory**: in-memory bytes, random access ([`SeekableSource`])
//! - **Stdin**: standard input, stream only ([`StreamSource`])
//! - **HTTP/HTTPS**: response bodies, stream only ([`HttpSource`])
//!
//! # End of Stream
//!
//! Random-access sources know their length and report [`Status::End`]
//! together with the final bytes. Streams only learn they are exhausted from
//! an empty read and report `End` with a zero count. Consumers must handle
//! both shapes: always take `size` bytes first, then stop on `End`.
//!
//! # Example
//!
//! ```ignore
//! use byteread_source::{ByteSource, HttpOptions, Origin, SplitPolicy};
//!
//! let origin = Origin::parse("/var/log/app.log")?;
//! let source = origin.open(&HttpOptions::default())?;
//! for line in source.read_delimited(SplitPolicy::Lines).into_strings() {
//!     println!("{}", line?);
//! }
//! ```

mod error;
mod http;
mod origin;
mod scanner;
mod seekable;
mod source;
mod stream;

#[cfg(test)]
mod testing;

pub use error::{Result, SourceError};
pub use http::{HttpOptions, HttpSource};
pub use origin::Origin;
pub use scanner::{Scanner, SplitPolicy, Strings};
pub use seekable::SeekableSource;
pub use source::{with_source, ByteSource, Chunks, ReadOutcome, Status};
pub use stream::StreamSource;

/// Default chunk size for read loops (32KB)
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

/// Default limit for a single scanned token (64KB)
pub const DEFAULT_MAX_TOKEN_SIZE: usize = 64 * 1024;

/// Consecutive empty, non-final reads tolerated before giving up
pub(crate) const MAX_EMPTY_READS: usize = 100;
