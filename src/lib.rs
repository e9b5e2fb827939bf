//! Non-greedy, class-based byte matching over forward or backward cursors.
//!
//! # Example
//!
//! ```rust
//! use revmatch::{ByteReader, RevByteCursor, match_bytes};
//!
//! // Forward: pull the parenthesised field out of a line.
//! let mut s = ByteReader::from_bytes(b"abc\t(def) \nghi");
//! let mut p = ByteReader::from_bytes(b"abc\x00(\x01)\x00ghi");
//! let mut m = [String::new()];
//! assert!(match_bytes(&mut s, &mut p, &mut m).unwrap().is_complete());
//! assert_eq!(m[0], "def");
//!
//! // Backward: the same code scans from the end of the text, and captures
//! // still read left to right.
//! let text = "abc\tdef \nghi jkl";
//! let pat = b"\x00def\x00\x01\x00jkl";
//! let mut s = RevByteCursor::new(text, text.len() as u64);
//! let mut p = RevByteCursor::new(&pat[..], pat.len() as u64);
//! assert!(match_bytes(&mut s, &mut p, &mut m).unwrap().is_complete());
//! assert_eq!(m[0], "ghi");
//! ```

pub mod cursor;
mod error;
pub mod pattern;
pub mod rev;
pub mod source;

pub use cursor::{ByteCursor, ByteReader, Direction};
pub use error::{Error, Result};
pub use pattern::{Class, Marker, Match, MatchEnd, MatchError, PatternError, match_bytes, parse};
pub use rev::{RevByteCursor, RevRuneCursor};
pub use source::{ReadAt, file_len, stream_len};
