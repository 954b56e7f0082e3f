//! Fixed-capacity response buffer handed to command handlers.

use core::fmt;

use crate::Error;

/// A borrowed, bounded text buffer a handler writes its reply into.
///
/// Appends are all-or-nothing: text that does not fit is rejected whole and
/// the buffer is marked truncated, so a reply is never cut mid-line by
/// [`push_str`](Self::push_str). [`set`](Self::set) is the exception and
/// keeps as much of the text as fits.
#[derive(Debug)]
pub struct Response<'a> {
    buf: &'a mut [u8],
    len: usize,
    truncated: bool,
}

impl<'a> Response<'a> {
    /// Wrap `buf`. Its length is the response capacity.
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            len: 0,
            truncated: false,
        }
    }

    /// Total capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes still free.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.len
    }

    /// Returns `true` if some text was rejected or cut for lack of space.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Discard the contents.
    pub fn clear(&mut self) {
        self.len = 0;
        self.truncated = false;
    }

    /// Append `text` if it fits entirely.
    pub fn push_str(&mut self, text: &str) -> Result<(), Error> {
        if text.len() > self.remaining() {
            self.truncated = true;
            return Err(Error::BufferOverflow);
        }
        self.buf[self.len..self.len + text.len()].copy_from_slice(text.as_bytes());
        self.len += text.len();
        Ok(())
    }

    /// Replace the contents with `text`, truncating at a character boundary
    /// if it does not fit.
    pub fn set(&mut self, text: &str) {
        self.clear();
        let mut end = text.len().min(self.capacity());
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        self.buf[..end].copy_from_slice(&text.as_bytes()[..end]);
        self.len = end;
        self.truncated = end < text.len();
    }

    /// The written text.
    pub fn as_str(&self) -> &str {
        // Only whole `&str` values or char-boundary prefixes are ever copied in.
        core::str::from_utf8(self.as_bytes()).unwrap_or("")
    }

    /// The written bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl fmt::Write for Response<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_str(s).map_err(|_| fmt::Error)
    }
}
