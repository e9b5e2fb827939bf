//! Errors raised by cursors and the matcher.

use std::io;

/// Errors raised while reading cursors or matching.
///
/// End of stream is not an error; cursors report it as `Ok(None)`.
#[derive(Debug)]
pub enum Error {
    /// A literal pattern byte differed from the next subject byte.
    ByteMismatch { expected: u8, found: u8 },
    /// No valid, exactly sized UTF-8 encoding ends at the cursor.
    InvalidRune,
    /// Unread without an immediately preceding successful read.
    InvalidCursorUse,
    /// The underlying source failed.
    Io(io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ByteMismatch { expected, found } => write!(
                f,
                "byte mismatch: expected '{}', found '{}'",
                expected.escape_ascii(),
                found.escape_ascii()
            ),
            Self::InvalidRune => write!(f, "invalid rune"),
            Self::InvalidCursorUse => write!(f, "invalid use of unread"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
