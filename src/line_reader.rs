//! Bounded line reading from an untrusted byte stream.
//!
//! Lines are collected into a [`LineBuffer`] that grows by a fixed increment
//! up to [`MAX_LINE_LENGTH`]. The buffer tracks its fill level as an index,
//! so nothing refers to the old allocation after a reallocation.

use std::io::{self, BufRead, ErrorKind};
use thiserror::Error;

/// Number of bytes the line buffer grows by each time it runs full.
pub const INPUT_INCREMENT: usize = 10;

/// Longest accepted line in bytes, trailing newline excluded.
pub const MAX_LINE_LENGTH: usize = 256;

/// Errors that can occur while reading a line.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The line exceeds the configured maximum. The rest of it was discarded.
    #[error("line is longer than {max} bytes")]
    LineTooLong { max: usize },
    /// The buffer could not be grown.
    #[error("out of memory while growing the line buffer")]
    OutOfMemory,
    /// The line is not valid UTF-8.
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
    /// The underlying stream failed.
    #[error("read error: {0}")]
    Io(#[from] io::Error),
}

impl ReadError {
    /// Whether the loop can carry on with the next line after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ReadError::Io(_))
    }
}

/// Owned byte buffer with explicit, fixed-step growth.
#[derive(Debug)]
pub struct LineBuffer {
    bytes: Vec<u8>,
    capacity: usize,
    increment: usize,
    max_len: usize,
}

impl LineBuffer {
    pub fn new(increment: usize, max_len: usize) -> Self {
        Self {
            bytes: Vec::new(),
            capacity: 0,
            increment: increment.max(1),
            max_len,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes that can still be stored before the next [`grow`](Self::grow).
    pub fn remaining(&self) -> usize {
        self.capacity - self.bytes.len()
    }

    /// Logical capacity, always a multiple of the increment (capped at the
    /// maximum length).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Extend the capacity by one increment, keeping every stored byte.
    pub fn grow(&mut self) -> Result<(), ReadError> {
        if self.capacity >= self.max_len {
            return Err(ReadError::LineTooLong { max: self.max_len });
        }
        let target = (self.capacity + self.increment).min(self.max_len);
        self.bytes
            .try_reserve_exact(target - self.bytes.len())
            .map_err(|_| ReadError::OutOfMemory)?;
        self.capacity = target;
        Ok(())
    }

    /// Append as much of `data` as fits, growing as needed.
    fn push(&mut self, mut data: &[u8]) -> Result<(), ReadError> {
        while !data.is_empty() {
            if self.remaining() == 0 {
                self.grow()?;
            }
            let n = self.remaining().min(data.len());
            self.bytes.extend_from_slice(&data[..n]);
            data = &data[n..];
        }
        Ok(())
    }

    fn into_string(self) -> Result<String, ReadError> {
        String::from_utf8(self.bytes).map_err(|_| ReadError::InvalidUtf8)
    }
}

/// Reads newline-terminated lines from a buffered stream.
pub struct LineReader<R> {
    inner: R,
    increment: usize,
    max_len: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self::with_limits(inner, INPUT_INCREMENT, MAX_LINE_LENGTH)
    }

    pub fn with_limits(inner: R, increment: usize, max_len: usize) -> Self {
        Self {
            inner,
            increment,
            max_len,
        }
    }

    /// Read the next line without its trailing newline.
    ///
    /// Returns `Ok(None)` once the stream is exhausted and no byte of a new
    /// line has been read. A final line without a newline is returned as is.
    pub fn read_line(&mut self) -> Result<Option<String>, ReadError> {
        let mut buffer = LineBuffer::new(self.increment, self.max_len);
        let mut seen_any = false;

        loop {
            let available = match self.inner.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if available.is_empty() {
                break;
            }
            seen_any = true;

            let newline = available.iter().position(|&b| b == b'\n');
            let chunk = &available[..newline.unwrap_or(available.len())];
            let pushed = buffer.push(chunk);
            let consumed = newline.map_or(available.len(), |pos| pos + 1);
            self.inner.consume(consumed);

            if let Err(err) = pushed {
                if newline.is_none() {
                    self.discard_rest_of_line()?;
                }
                return Err(err);
            }
            if newline.is_some() {
                break;
            }
        }

        if !seen_any {
            return Ok(None);
        }
        buffer.into_string().map(Some)
    }

    /// Skip input up to and including the next newline (or end of input).
    fn discard_rest_of_line(&mut self) -> Result<(), ReadError> {
        let mut skipped = Vec::new();
        loop {
            match self.inner.read_until(b'\n', &mut skipped) {
                Ok(_) => return Ok(()),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
