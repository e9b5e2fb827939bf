//! Class-based, non-greedy byte pattern matching.
//!
//! A pattern is a byte string. Printable ASCII bytes match themselves; a
//! handful of reserved bytes stand for character class groups.
//!
//! # Pattern bytes
//!
//! | Byte   | Escape | Group                               |
//! |--------|--------|-------------------------------------|
//! | `0x00` | `\s`   | ASCII whitespace (not captured)     |
//! | `0x01` | `\S`   | non-whitespace printable ASCII      |
//! | `0xd0` | `\d`   | decimal digits                      |
//! | `0xd3` | `\w`   | base-36 digits (letters and digits) |
//! | `0xd6` | `\x`   | hexadecimal digits                  |
//! | `0xd8` | `\o`   | octal digits                        |
//! | `0xfe` | `\p`   | printable ASCII, whitespace included|
//! | `0xff` | `\*`   | any byte                            |
//!
//! Groups are non-greedy and may match nothing. Use of other non-printable
//! or non-ASCII pattern bytes is undefined, though never unsafe.

pub mod char_class;
pub mod matcher;
pub mod parser;

pub use char_class::{Class, Marker};
pub use matcher::{Match, MatchEnd, MatchError, match_bytes};
pub use parser::{PatternError, parse};
