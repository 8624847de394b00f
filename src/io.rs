//! Byte sources and the streaming parser contract shared by all decoders.
//!
//! A [`ByteSource`] is a pull-based byte stream with one byte of look-ahead
//! and a hint of how many bytes can be read without blocking. Byte slices and
//! any [`BufReader`] implement it, so decoders work the same over memory and
//! over sockets or files.

use crate::{Error, Result, Variant};
use std::io::{BufRead, BufReader, ErrorKind, Read};

/// Deepest container nesting any decoder accepts before failing with
/// [`Error::NestingTooDeep`].
pub const MAX_NESTING_DEPTH: usize = 128;

/// A pull-based byte stream with single-byte look-ahead.
pub trait ByteSource {
    /// Reads one byte, or `None` at end of stream.
    fn read_byte(&mut self) -> Result<Option<u8>>;

    /// Returns the next byte without consuming it.
    fn peek_byte(&mut self) -> Result<Option<u8>>;

    /// Number of bytes that can be read without blocking.
    ///
    /// Zero at end of stream.
    fn available(&mut self) -> Result<usize>;

    /// Reads exactly `len` bytes, failing with [`Error::UnexpectedEof`] if
    /// the stream ends first.
    fn read_exact_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(len.min(64 * 1024));
        for _ in 0..len {
            match self.read_byte()? {
                Some(b) => buf.push(b),
                None => return Err(Error::unexpected_eof(&format!("{} more bytes", len - buf.len()))),
            }
        }
        Ok(buf)
    }

    /// Reads one byte, treating end of stream as an error.
    fn require_byte(&mut self, expected: &str) -> Result<u8> {
        self.read_byte()?.ok_or_else(|| Error::unexpected_eof(expected))
    }
}

impl ByteSource for &[u8] {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        match self.split_first() {
            Some((&b, rest)) => {
                *self = rest;
                Ok(Some(b))
            }
            None => Ok(None),
        }
    }

    fn peek_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.first().copied())
    }

    fn available(&mut self) -> Result<usize> {
        Ok(self.len())
    }

    fn read_exact_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        if self.len() < len {
            return Err(Error::unexpected_eof(&format!("{} more bytes", len - self.len())));
        }
        let (head, rest) = self.split_at(len);
        *self = rest;
        Ok(head.to_vec())
    }
}

impl<R: Read> ByteSource for BufReader<R> {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let b = self.peek_byte()?;
        if b.is_some() {
            self.consume(1);
        }
        Ok(b)
    }

    fn peek_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.fill_buf()?.first().copied())
    }

    /// Reports the buffered byte count, refilling an empty buffer first.
    ///
    /// A refill that fails with [`ErrorKind::WouldBlock`] reports zero, so a
    /// non-blocking reader can be polled. A blocking reader with an empty
    /// buffer blocks here until data arrives or the stream ends.
    fn available(&mut self) -> Result<usize> {
        if self.buffer().is_empty() {
            return match self.fill_buf() {
                Ok(buf) => Ok(buf.len()),
                Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(0),
                Err(e) => Err(e.into()),
            };
        }
        Ok(self.buffer().len())
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }

    fn peek_byte(&mut self) -> Result<Option<u8>> {
        (**self).peek_byte()
    }

    fn available(&mut self) -> Result<usize> {
        (**self).available()
    }

    fn read_exact_vec(&mut self, len: usize) -> Result<Vec<u8>> {
        (**self).read_exact_vec(len)
    }
}

/// A streaming decoder yielding one top-level variant per call.
pub trait Parser {
    /// Decodes the next top-level value.
    ///
    /// With `wait == false` and nothing buffered in the source, returns
    /// `Ok(None)` without consuming input. With `wait == true` the call
    /// blocks until a full value arrives; an exhausted stream is an
    /// [`Error::UnexpectedEof`].
    fn next(&mut self, wait: bool) -> Result<Option<Variant>>;
}

/// Shared non-blocking gate for [`Parser::next`] implementations.
pub(crate) fn nothing_ready<S: ByteSource>(source: &mut S, wait: bool) -> Result<bool> {
    if !wait && source.available()? == 0 {
        tracing::debug!("no input available, returning without a value");
        return Ok(true);
    }
    Ok(false)
}
