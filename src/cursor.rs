//! Byte cursors with one step of pushback.

use std::io::{self, BufRead};

use crate::error::{Error, Result};

/// The order in which a cursor delivers the bytes of its underlying text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Ascending offsets; bytes arrive in natural text order.
    Forward,
    /// Descending offsets; bytes arrive in reverse text order.
    Backward,
}

/// A source of bytes that can take back the byte it last delivered.
pub trait ByteCursor {
    /// Read the next byte, or `None` at end of stream.
    fn read_byte(&mut self) -> Result<Option<u8>>;

    /// Reinstate the byte returned by the last successful `read_byte`.
    ///
    /// Fails with [`Error::InvalidCursorUse`] if there was no such read, or if
    /// it has already been unread.
    fn unread_byte(&mut self) -> Result<()>;

    fn direction(&self) -> Direction {
        Direction::Forward
    }
}

impl<C: ByteCursor + ?Sized> ByteCursor for &mut C {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }

    fn unread_byte(&mut self) -> Result<()> {
        (**self).unread_byte()
    }

    fn direction(&self) -> Direction {
        (**self).direction()
    }
}

/// Forward cursor over any buffered reader.
pub struct ByteReader<R> {
    inner: R,
    /// Last delivered byte, while it may still be unread.
    last: Option<u8>,
    /// Byte to redeliver on the next read.
    pending: Option<u8>,
}

impl<R: BufRead> ByteReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            last: None,
            pending: None,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<'a> ByteReader<io::Cursor<&'a [u8]>> {
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self::new(io::Cursor::new(bytes))
    }
}

impl<R: BufRead> ByteCursor for ByteReader<R> {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        if let Some(b) = self.pending.take() {
            self.last = Some(b);
            return Ok(Some(b));
        }
        let b = loop {
            match self.inner.fill_buf() {
                Ok([]) => return Ok(None),
                Ok(buf) => break buf[0],
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        };
        self.inner.consume(1);
        self.last = Some(b);
        Ok(Some(b))
    }

    fn unread_byte(&mut self) -> Result<()> {
        match self.last.take() {
            Some(b) => {
                self.pending = Some(b);
                Ok(())
            }
            None => Err(Error::InvalidCursorUse),
        }
    }
}
