use std::io::{ErrorKind, Read};

use crate::{RecordError, Result};

/// Outcome of matching a keyword at the head of the stream.
#[derive(Debug)]
pub(crate) enum KeywordMatch {
    /// The stream ended cleanly before the first byte of the keyword.
    StreamEnd,
    /// The keyword was present; carries the byte just after it.
    Found(Option<u8>),
}

/// Forward-only byte source shared by every decoder.
///
/// Yields one byte at a time with `None` as the end-of-stream signal. There
/// is no peeking and no unget; decoders carry their own one-byte look-ahead.
pub(crate) struct Scanner<R> {
    inner: R,
}

impl<R: Read> Scanner<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Read one byte, yielding `None` at end of stream.
    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Fill as much of `out` as the stream allows, returning the byte count.
    pub fn read_block(&mut self, out: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < out.len() {
            match self.inner.read(&mut out[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Ok(filled)
    }

    /// Match `keyword` literally at the head of the stream.
    ///
    /// A stream that ends before the keyword's first byte is a clean end; a
    /// mismatch anywhere inside the keyword is a framing error.
    pub fn expect_keyword(&mut self, keyword: &'static str) -> Result<KeywordMatch> {
        let mut cursor = self.read_byte()?;
        if cursor.is_none() {
            return Ok(KeywordMatch::StreamEnd);
        }
        for expected in keyword.bytes() {
            if cursor != Some(expected) {
                return Err(RecordError::MissingKeyword {
                    keyword,
                    found: cursor,
                });
            }
            cursor = self.read_byte()?;
        }
        Ok(KeywordMatch::Found(cursor))
    }

    /// Parse an unsigned decimal, threading the caller's one-byte cursor.
    ///
    /// With `reuse_cursor` the current cursor byte is the first candidate
    /// digit; otherwise a fresh byte is read into the cursor first. Returns
    /// `None` when the candidate byte is not a digit. On success the first
    /// non-digit byte is left in the cursor.
    pub fn read_u64(&mut self, cursor: &mut Option<u8>, reuse_cursor: bool) -> Result<Option<u64>> {
        if !reuse_cursor {
            *cursor = self.read_byte()?;
        }
        match *cursor {
            Some(byte) if byte.is_ascii_digit() => {}
            _ => return Ok(None),
        }
        let mut value: u64 = 0;
        while let Some(byte) = *cursor {
            if !byte.is_ascii_digit() {
                break;
            }
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u64::from(byte - b'0')))
                .ok_or(RecordError::IntegerOverflow)?;
            *cursor = self.read_byte()?;
        }
        Ok(Some(value))
    }
}
