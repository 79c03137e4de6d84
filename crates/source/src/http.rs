//! HTTP/HTTPS response body origin

use crate::error::{Result, SourceError};
use crate::stream::StreamSource;
use reqwest::blocking::{Client, Response};
use std::time::Duration;

/// Options applied when fetching a URL
#[derive(Debug, Clone, Default)]
pub struct HttpOptions {
    /// Whole-request timeout; the client default applies when unset
    pub timeout: Option<Duration>,
}

/// Opens the body of an HTTP/HTTPS GET as a stream source
pub struct HttpSource;

impl HttpSource {
    /// Fetch `url` and return its body as a byte source
    ///
    /// The body is streamed: nothing beyond the response head is read until
    /// the caller reads from the returned source.
    ///
    /// # Example
    /// ```ignore
    /// let mut source = HttpSource::open("https://example.com/data.csv", &HttpOptions::default())?;
    /// let body = source.read_all(DEFAULT_CHUNK_SIZE)?;
    /// ```
    pub fn open(url: &str, options: &HttpOptions) -> Result<StreamSource<Response>> {
        let mut builder = Client::builder();
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| SourceError::Request {
            url: url.to_string(),
            source,
        })?;

        let response = client
            .get(url)
            .send()
            .map_err(|source| SourceError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Http {
                url: url.to_string(),
                status,
            });
        }

        tracing::debug!(
            "Opened HTTP body from: {} (content length: {:?})",
            url,
            response.content_length()
        );

        Ok(StreamSource::from_reader(url, response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_is_a_request_error() {
        let result = HttpSource::open("http://", &HttpOptions::default());
        assert!(matches!(result, Err(SourceError::Request { .. })));
    }

    // Fetching real bodies is covered by tests/http_source.rs
}
