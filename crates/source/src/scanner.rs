//! Token scanning over a byte source
//!
//! A [`Scanner`] pulls chunks from a [`ByteSource`] and groups the bytes into
//! tokens according to a [`SplitPolicy`]:
//!
//! - **Bytes**: every byte is a token
//! - **Lines**: split on `\n`, dropping one trailing `\r` from each line
//! - **Words**: runs of non-whitespace, whitespace never yielded
//! - **Runes**: every UTF-8 code point; invalid bytes become U+FFFD
//! - **Custom**: split on every byte matching a predicate
//!
//! A final token without a trailing delimiter is still yielded once. A token
//! longer than `max_token_size` bytes fails with `TokenTooLong`, whatever the
//! origin kind.

use crate::error::{Result, SourceError};
use crate::source::ByteSource;
use crate::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_TOKEN_SIZE, MAX_EMPTY_READS};
use std::fmt;
use std::sync::Arc;

const REPLACEMENT: &[u8] = "\u{FFFD}".as_bytes();

/// Pending bytes tolerated past the token limit: a `\r` dropped from a line
/// or the leading bytes of a multi-byte whitespace delimiter
const DELIMITER_SLACK: usize = 4;

/// Rule for grouping raw bytes into tokens
#[derive(Clone)]
pub enum SplitPolicy {
    Bytes,
    Lines,
    Words,
    Runes,
    /// Tokens separated by any byte for which the predicate holds
    Custom(Arc<dyn Fn(u8) -> bool + Send + Sync>),
}

impl SplitPolicy {
    pub fn custom(predicate: impl Fn(u8) -> bool + Send + Sync + 'static) -> Self {
        SplitPolicy::Custom(Arc::new(predicate))
    }

    /// Split on a single delimiter byte
    pub fn delimiter(delimiter: u8) -> Self {
        Self::custom(move |b| b == delimiter)
    }

    fn split(&self, data: &[u8], at_eof: bool) -> Step {
        match self {
            SplitPolicy::Bytes => match data.first() {
                Some(&b) => Step::Token {
                    advance: 1,
                    token: vec![b],
                },
                None => Step::NeedMore,
            },
            SplitPolicy::Lines => split_on(data, at_eof, |b| b == b'\n', true),
            SplitPolicy::Words => split_words(data, at_eof),
            SplitPolicy::Runes => split_runes(data, at_eof),
            SplitPolicy::Custom(predicate) => split_on(data, at_eof, |b| predicate(b), false),
        }
    }
}

impl fmt::Debug for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitPolicy::Bytes => write!(f, "Bytes"),
            SplitPolicy::Lines => write!(f, "Lines"),
            SplitPolicy::Words => write!(f, "Words"),
            SplitPolicy::Runes => write!(f, "Runes"),
            SplitPolicy::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// What a split function decided about the pending bytes
#[derive(Debug, PartialEq, Eq)]
enum Step {
    /// Yield `token` and consume `advance` bytes
    Token { advance: usize, token: Vec<u8> },
    /// Consume bytes that belong to no token; always non-zero
    Skip(usize),
    /// No complete token yet
    NeedMore,
}

fn split_on(data: &[u8], at_eof: bool, is_delimiter: impl Fn(u8) -> bool, drop_cr: bool) -> Step {
    let token = |end: usize| {
        let mut line = &data[..end];
        if drop_cr {
            if let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }
        }
        line.to_vec()
    };

    if let Some(i) = data.iter().position(|&b| is_delimiter(b)) {
        return Step::Token {
            advance: i + 1,
            token: token(i),
        };
    }
    if at_eof && !data.is_empty() {
        return Step::Token {
            advance: data.len(),
            token: token(data.len()),
        };
    }
    Step::NeedMore
}

fn split_words(data: &[u8], at_eof: bool) -> Step {
    let mut start = 0;
    while start < data.len() {
        match decode_first(&data[start..]) {
            Decoded::Char(c, width) if c.is_whitespace() => start += width,
            Decoded::Incomplete if !at_eof => return skip_or_wait(start),
            _ => break,
        }
    }

    let mut end = start;
    while end < data.len() {
        match decode_first(&data[end..]) {
            Decoded::Char(c, width) if c.is_whitespace() => {
                return Step::Token {
                    advance: end + width,
                    token: data[start..end].to_vec(),
                }
            }
            Decoded::Char(_, width) => end += width,
            Decoded::Incomplete if !at_eof => break,
            // Undecodable bytes are part of the word
            _ => end += 1,
        }
    }

    if at_eof && end > start {
        return Step::Token {
            advance: end,
            token: data[start..end].to_vec(),
        };
    }
    skip_or_wait(start)
}

fn skip_or_wait(consumed: usize) -> Step {
    if consumed > 0 {
        Step::Skip(consumed)
    } else {
        Step::NeedMore
    }
}

fn split_runes(data: &[u8], at_eof: bool) -> Step {
    if data.is_empty() {
        return Step::NeedMore;
    }
    match decode_first(data) {
        Decoded::Char(_, width) => Step::Token {
            advance: width,
            token: data[..width].to_vec(),
        },
        Decoded::Incomplete if !at_eof => Step::NeedMore,
        _ => Step::Token {
            advance: 1,
            token: REPLACEMENT.to_vec(),
        },
    }
}

enum Decoded {
    Char(char, usize),
    /// A valid prefix of a multi-byte sequence that needs more bytes
    Incomplete,
    Invalid,
}

fn decode_first(data: &[u8]) -> Decoded {
    let head = &data[..data.len().min(4)];
    let valid = match std::str::from_utf8(head) {
        Ok(s) => s,
        Err(e) if e.valid_up_to() > 0 => {
            std::str::from_utf8(&head[..e.valid_up_to()]).unwrap_or_default()
        }
        Err(e) if e.error_len().is_none() => return Decoded::Incomplete,
        Err(_) => return Decoded::Invalid,
    };
    match valid.chars().next() {
        Some(c) => Decoded::Char(c, c.len_utf8()),
        None => Decoded::Incomplete,
    }
}

/// Lazy token sequence over a byte source, see [`ByteSource::read_delimited`]
///
/// The sequence is not restartable: once consumed, the origin has to be
/// opened again. After a failure the scanner yields nothing more.
pub struct Scanner<S> {
    source: S,
    policy: SplitPolicy,
    buf: Vec<u8>,
    start: usize,
    chunk: Vec<u8>,
    max_token_size: usize,
    at_eof: bool,
    finished: bool,
    empty_reads: usize,
}

impl<S: ByteSource> Scanner<S> {
    pub fn new(source: S, policy: SplitPolicy) -> Self {
        Self {
            source,
            policy,
            buf: Vec::new(),
            start: 0,
            chunk: vec![0u8; DEFAULT_CHUNK_SIZE],
            max_token_size: DEFAULT_MAX_TOKEN_SIZE,
            at_eof: false,
            finished: false,
            empty_reads: 0,
        }
    }

    /// Size of each read from the source (default [`DEFAULT_CHUNK_SIZE`])
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk = vec![0u8; chunk_size];
        self
    }

    /// Largest token accepted, delimiter excluded (default [`DEFAULT_MAX_TOKEN_SIZE`])
    pub fn with_max_token_size(mut self, max_token_size: usize) -> Self {
        self.max_token_size = max_token_size;
        self
    }

    /// Yield tokens as UTF-8 strings
    pub fn into_strings(self) -> Strings<S> {
        Strings { scanner: self }
    }

    /// Recover the source, e.g. to close it explicitly
    pub fn into_inner(self) -> S {
        self.source
    }

    fn too_long(&mut self) -> SourceError {
        self.finished = true;
        SourceError::TokenTooLong {
            limit: self.max_token_size,
        }
    }

    fn fill(&mut self) -> Result<()> {
        if self.start > 0 {
            self.buf.drain(..self.start);
            self.start = 0;
        }

        loop {
            let outcome = self.source.read(&mut self.chunk)?;
            self.buf.extend_from_slice(&self.chunk[..outcome.size]);

            if outcome.is_end() {
                self.at_eof = true;
                tracing::trace!("Reached end of {}", self.source.label());
                return Ok(());
            }
            if outcome.size > 0 {
                self.empty_reads = 0;
                return Ok(());
            }

            self.empty_reads += 1;
            if self.empty_reads >= MAX_EMPTY_READS {
                return Err(SourceError::NoProgress {
                    attempts: self.empty_reads,
                });
            }
        }
    }
}

impl<S: ByteSource> Iterator for Scanner<S> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            match self.policy.split(&self.buf[self.start..], self.at_eof) {
                Step::Token { advance, token } => {
                    self.start += advance;
                    if token.len() > self.max_token_size {
                        return Some(Err(self.too_long()));
                    }
                    return Some(Ok(token));
                }
                Step::Skip(advance) => self.start += advance,
                Step::NeedMore if self.at_eof => self.finished = true,
                Step::NeedMore => {
                    // The unfinished token can no longer fit
                    let pending = self.buf.len() - self.start;
                    if pending > self.max_token_size.saturating_add(DELIMITER_SLACK) {
                        return Some(Err(self.too_long()));
                    }
                    if let Err(e) = self.fill() {
                        self.finished = true;
                        return Some(Err(e));
                    }
                }
            }
        }
        None
    }
}

/// String view of a [`Scanner`], see [`Scanner::into_strings`]
pub struct Strings<S> {
    scanner: Scanner<S>,
}

impl<S: ByteSource> Iterator for Strings<S> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.scanner.next()?;
        Some(token.and_then(|bytes| String::from_utf8(bytes).map_err(SourceError::from)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ReadOutcome;
    use crate::testing::ScriptedSource;
    use crate::{SeekableSource, StreamSource};

    fn tokens(content: &str, policy: SplitPolicy) -> Vec<String> {
        SeekableSource::from_bytes(content.as_bytes().to_vec())
            .read_delimited(policy)
            .into_strings()
            .collect::<Result<_>>()
            .unwrap()
    }

    fn tokens_chunked(content: &[u8], policy: SplitPolicy, chunk_size: usize) -> Vec<Vec<u8>> {
        StreamSource::from_reader("slice", content)
            .read_delimited(policy)
            .with_chunk_size(chunk_size)
            .collect::<Result<_>>()
            .unwrap()
    }

    #[test]
    fn test_lines_with_and_without_trailing_newline() {
        assert_eq!(tokens("a\nb\nc", SplitPolicy::Lines), vec!["a", "b", "c"]);
        assert_eq!(tokens("a\nb\n", SplitPolicy::Lines), vec!["a", "b"]);
        assert_eq!(tokens("a\nb", SplitPolicy::Lines), vec!["a", "b"]);
    }

    #[test]
    fn test_lines_keep_empty_lines_and_drop_carriage_returns() {
        assert_eq!(
            tokens("a\r\n\r\nb\n\nc\r", SplitPolicy::Lines),
            vec!["a", "", "b", "", "c"]
        );
        assert!(tokens("", SplitPolicy::Lines).is_empty());
        assert_eq!(tokens("\n", SplitPolicy::Lines), vec![""]);
    }

    #[test]
    fn test_words_skip_all_whitespace() {
        assert_eq!(
            tokens("  alpha\tbeta\n\n gamma  ", SplitPolicy::Words),
            vec!["alpha", "beta", "gamma"]
        );
        assert_eq!(
            tokens("ideo\u{3000}graphic\u{a0}space", SplitPolicy::Words),
            vec!["ideo", "graphic", "space"]
        );
        assert!(tokens(" \n\t ", SplitPolicy::Words).is_empty());
    }

    #[test]
    fn test_runes_yield_code_points() {
        assert_eq!(
            tokens("añ€😀", SplitPolicy::Runes),
            vec!["a", "ñ", "€", "😀"]
        );
    }

    #[test]
    fn test_runes_replace_invalid_bytes() {
        let content = [b'a', 0xff, 0xe2, 0x82, b'b'];
        let runes = tokens_chunked(&content, SplitPolicy::Runes, 2);
        assert_eq!(
            runes,
            vec![
                b"a".to_vec(),
                REPLACEMENT.to_vec(),
                REPLACEMENT.to_vec(),
                REPLACEMENT.to_vec(),
                b"b".to_vec()
            ]
        );

        // Truncated sequence at the end of the origin
        let runes = tokens_chunked(&[b'x', 0xf0, 0x9f], SplitPolicy::Runes, 8);
        assert_eq!(
            runes,
            vec![b"x".to_vec(), REPLACEMENT.to_vec(), REPLACEMENT.to_vec()]
        );
    }

    #[test]
    fn test_bytes_yield_each_byte() {
        let bytes = tokens_chunked(b"xyz", SplitPolicy::Bytes, 2);
        assert_eq!(bytes, vec![b"x".to_vec(), b"y".to_vec(), b"z".to_vec()]);
    }

    #[test]
    fn test_custom_delimiter_keeps_empty_fields() {
        assert_eq!(
            tokens("a,,b,c,", SplitPolicy::delimiter(b',')),
            vec!["a", "", "b", "c"]
        );
        assert_eq!(
            tokens("1;2|3", SplitPolicy::custom(|b| b == b';' || b == b'|')),
            vec!["1", "2", "3"]
        );
    }

    #[test]
    fn test_tokens_do_not_depend_on_chunk_size() {
        let content = "first line\nsecond   line ñ€\r\n\nlast 😀 word".as_bytes();
        for policy in [
            SplitPolicy::Bytes,
            SplitPolicy::Lines,
            SplitPolicy::Words,
            SplitPolicy::Runes,
            SplitPolicy::delimiter(b' '),
        ] {
            let expected = tokens_chunked(content, policy.clone(), content.len() + 1);
            for chunk_size in 1..content.len() {
                assert_eq!(
                    tokens_chunked(content, policy.clone(), chunk_size),
                    expected,
                    "{policy:?} with chunk size {chunk_size}"
                );
            }
        }
    }

    #[test]
    fn test_final_bytes_paired_with_end_are_scanned() {
        let source = SeekableSource::from_bytes(b"one\ntwo".to_vec());
        let lines: Vec<Vec<u8>> = source
            .read_delimited(SplitPolicy::Lines)
            .with_chunk_size(5)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(lines, vec![b"one".to_vec(), b"two".to_vec()]);
    }

    #[test]
    fn test_token_too_long() {
        let source = SeekableSource::from_bytes(b"short\nwaytoolongline\n".to_vec());
        let mut scanner = source
            .read_delimited(SplitPolicy::Lines)
            .with_chunk_size(4)
            .with_max_token_size(8);

        assert_eq!(scanner.next().unwrap().unwrap(), b"short");
        assert!(matches!(
            scanner.next(),
            Some(Err(SourceError::TokenTooLong { limit: 8 }))
        ));
        assert!(scanner.next().is_none());
    }

    fn limited_lines<S: ByteSource>(source: S) -> Vec<Result<Vec<u8>>> {
        source
            .read_delimited(SplitPolicy::Lines)
            .with_chunk_size(4)
            .with_max_token_size(8)
            .collect()
    }

    #[test]
    fn test_token_at_limit_is_accepted_for_every_origin_kind() {
        for content in [&b"12345678"[..], b"12345678\n", b"12345678\r\n"] {
            let seekable = limited_lines(SeekableSource::from_bytes(content.to_vec()));
            let stream = limited_lines(StreamSource::from_reader("slice", content));

            for results in [seekable, stream] {
                assert_eq!(results.len(), 1, "{content:?}");
                assert_eq!(results[0].as_ref().unwrap(), b"12345678");
            }
        }
    }

    #[test]
    fn test_token_over_limit_is_rejected_for_every_origin_kind() {
        for content in [&b"123456789"[..], b"123456789\n", b"ab\n123456789\ncd"] {
            let seekable = limited_lines(SeekableSource::from_bytes(content.to_vec()));
            let stream = limited_lines(StreamSource::from_reader("slice", content));

            for results in [seekable, stream] {
                assert!(
                    matches!(
                        results.last(),
                        Some(Err(SourceError::TokenTooLong { limit: 8 }))
                    ),
                    "{content:?}"
                );
                assert!(results[..results.len() - 1].iter().all(|r| r.is_ok()));
            }
        }
    }

    #[test]
    fn test_read_failure_ends_scanning() {
        let source = ScriptedSource::with_data(
            b"ab\ncd",
            vec![
                Ok(ReadOutcome::more(3)),
                Err(std::io::ErrorKind::ConnectionAborted),
            ],
        );
        let mut scanner = source.read_delimited(SplitPolicy::Lines);
        assert_eq!(scanner.next().unwrap().unwrap(), b"ab");
        assert!(matches!(scanner.next(), Some(Err(SourceError::Io { .. }))));
        assert!(scanner.next().is_none());
    }

    #[test]
    fn test_empty_reads_without_progress() {
        let script = (0..MAX_EMPTY_READS).map(|_| Ok(ReadOutcome::more(0))).collect();
        let mut scanner = ScriptedSource::new(script).read_delimited(SplitPolicy::Bytes);
        assert!(matches!(
            scanner.next(),
            Some(Err(SourceError::NoProgress { .. }))
        ));
    }

    #[test]
    fn test_zero_chunk_size_is_rejected() {
        let mut scanner = SeekableSource::from_bytes(b"abc".to_vec())
            .read_delimited(SplitPolicy::Bytes)
            .with_chunk_size(0);
        assert!(matches!(
            scanner.next(),
            Some(Err(SourceError::InvalidChunkSize))
        ));
    }

    #[test]
    fn test_into_strings_reports_invalid_utf8() {
        let mut strings = StreamSource::from_reader("slice", &[b'o', b'k', b'\n', 0xff][..])
            .read_delimited(SplitPolicy::Lines)
            .into_strings();
        assert_eq!(strings.next().unwrap().unwrap(), "ok");
        assert!(matches!(strings.next(), Some(Err(SourceError::Utf8(_)))));
    }

    #[test]
    fn test_scanner_is_not_restartable() {
        let mut scanner =
            SeekableSource::from_bytes(b"x\ny".to_vec()).read_delimited(SplitPolicy::Lines);
        assert_eq!(scanner.by_ref().count(), 2);
        assert!(scanner.next().is_none());
    }
}
