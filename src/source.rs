//! Random-access byte sources and the length queries used to start backward cursors.

use std::fs::File;
use std::io::{self, Seek, SeekFrom};

/// A byte source readable at absolute offsets.
pub trait ReadAt {
    /// Fill `buf` exactly with the bytes starting at `offset`.
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()>;
}

impl<T: ReadAt + ?Sized> ReadAt for &T {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        (**self).read_at(buf, offset)
    }
}

impl ReadAt for [u8] {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        let range = usize::try_from(offset)
            .ok()
            .and_then(|start| Some(start..start.checked_add(buf.len())?))
            .filter(|range| range.end <= self.len());
        match range {
            Some(range) => {
                buf.copy_from_slice(&self[range]);
                Ok(())
            }
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("read of {} bytes at offset {offset} is out of range", buf.len()),
            )),
        }
    }
}

impl ReadAt for Vec<u8> {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        self.as_slice().read_at(buf, offset)
    }
}

impl ReadAt for str {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        self.as_bytes().read_at(buf, offset)
    }
}

impl ReadAt for String {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        self.as_bytes().read_at(buf, offset)
    }
}

#[cfg(unix)]
impl ReadAt for File {
    fn read_at(&self, buf: &mut [u8], offset: u64) -> io::Result<()> {
        std::os::unix::fs::FileExt::read_exact_at(self, buf, offset)
    }
}

#[cfg(windows)]
impl ReadAt for File {
    fn read_at(&self, mut buf: &mut [u8], mut offset: u64) -> io::Result<()> {
        use std::os::windows::fs::FileExt;
        while !buf.is_empty() {
            match self.seek_read(buf, offset) {
                Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
                Ok(n) => {
                    let rest = buf;
                    buf = &mut rest[n..];
                    offset += n as u64;
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }
}

/// Total length of a seekable stream.
///
/// The current position is restored before returning.
pub fn stream_len<S: Seek + ?Sized>(s: &mut S) -> io::Result<u64> {
    let here = s.stream_position()?;
    let len = s.seek(SeekFrom::End(0))?;
    if here != len {
        s.seek(SeekFrom::Start(here))?;
    }
    Ok(len)
}

/// Length of a file, from its metadata when it is a regular file.
///
/// Anything else is measured with [`stream_len`].
pub fn file_len(file: &mut File) -> io::Result<u64> {
    match file.metadata() {
        Ok(meta) if meta.is_file() => Ok(meta.len()),
        _ => stream_len(file),
    }
}
