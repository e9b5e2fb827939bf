//! Backward cursors over random-access sources.
//!
//! [`RevByteCursor`] yields bytes from an exclusive upper offset down to
//! offset 0, so the same matching code can scan a stream from its end.
//! [`RevRuneCursor`] decodes UTF-8 code points on top of it.

use log::trace;

use crate::cursor::{ByteCursor, Direction};
use crate::error::{Error, Result};
use crate::source::ReadAt;

/// Bytes fetched from the source per refill.
const CHUNK: usize = 4 << 10;

/// Maximum width of a UTF-8 encoded code point.
const UTF8_MAX: usize = 4;

/// Buffered cursor reading a [`ReadAt`] source toward offset 0.
pub struct RevByteCursor<S> {
    source: S,
    /// Start of the buffered chunk; bytes below it are still in the source.
    offset: u64,
    buf: Box<[u8]>,
    /// Length of the buffered chunk.
    filled: usize,
    /// Undelivered bytes are `buf[..pos]`; the next one is `buf[pos - 1]`.
    pos: usize,
    can_unread: bool,
}

impl<S: ReadAt> RevByteCursor<S> {
    /// Create a cursor whose first byte is the one just below `end`.
    pub fn new(source: S, end: u64) -> Self {
        Self {
            source,
            offset: end,
            buf: vec![0; CHUNK].into_boxed_slice(),
            filled: 0,
            pos: 0,
            can_unread: false,
        }
    }

    /// Exclusive upper offset of the bytes not yet read.
    pub fn position(&self) -> u64 {
        self.offset + self.pos as u64
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    fn refill(&mut self) -> Result<bool> {
        if self.offset == 0 {
            return Ok(false);
        }
        let len = self.offset.min(CHUNK as u64) as usize;
        let start = self.offset - len as u64;
        trace!("refilling {len} bytes at offset {start}");
        self.source.read_at(&mut self.buf[..len], start)?;
        self.offset = start;
        self.filled = len;
        self.pos = len;
        Ok(true)
    }
}

impl<S: ReadAt> ByteCursor for RevByteCursor<S> {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        if self.pos == 0 && !self.refill()? {
            return Ok(None);
        }
        self.pos -= 1;
        self.can_unread = true;
        Ok(Some(self.buf[self.pos]))
    }

    fn unread_byte(&mut self) -> Result<()> {
        if !self.can_unread || self.pos >= self.filled {
            return Err(Error::InvalidCursorUse);
        }
        self.pos += 1;
        self.can_unread = false;
        Ok(())
    }

    fn direction(&self) -> Direction {
        Direction::Backward
    }
}

/// Cursor decoding UTF-8 code points backward.
pub struct RevRuneCursor<S> {
    bytes: RevByteCursor<S>,
    /// Last delivered rune, while it may still be unread.
    last: Option<char>,
    pending: bool,
}

impl<S: ReadAt> RevRuneCursor<S> {
    pub fn new(source: S, end: u64) -> Self {
        Self {
            bytes: RevByteCursor::new(source, end),
            last: None,
            pending: false,
        }
    }

    /// Read the code point ending at the cursor, with its encoded width.
    ///
    /// Returns `None` at the start of the source. A truncated or malformed
    /// encoding yields [`Error::InvalidRune`].
    pub fn read_rune(&mut self) -> Result<Option<(char, usize)>> {
        if self.pending {
            self.pending = false;
            if let Some(ch) = self.last {
                return Ok(Some((ch, ch.len_utf8())));
            }
        }
        let mut buf = [0u8; UTF8_MAX];
        for i in (0..UTF8_MAX).rev() {
            let b = match self.bytes.read_byte() {
                Ok(Some(b)) => b,
                Ok(None) if i == UTF8_MAX - 1 => return Ok(None),
                Ok(None) => {
                    self.last = None;
                    return Err(Error::InvalidRune);
                }
                Err(err) => {
                    self.last = None;
                    return Err(err);
                }
            };
            buf[i] = b;
            match std::str::from_utf8(&buf[i..]) {
                Ok(s) => {
                    if let Some(ch) = s.chars().next() {
                        self.last = Some(ch);
                        return Ok(Some((ch, UTF8_MAX - i)));
                    }
                }
                // A complete shorter rune followed by stray bytes.
                Err(err) if err.valid_up_to() > 0 => break,
                Err(_) => {}
            }
        }
        self.last = None;
        Err(Error::InvalidRune)
    }

    pub fn unread_rune(&mut self) -> Result<()> {
        if self.pending || self.last.is_none() {
            return Err(Error::InvalidCursorUse);
        }
        self.pending = true;
        Ok(())
    }

    pub fn into_inner(self) -> S {
        self.bytes.into_inner()
    }
}
