//! Printable notation for patterns.
//!
//! Marker bytes are awkward to type, so patterns may be written with
//! backslash escapes and compiled to the raw bytes [`match_bytes`] expects.
//!
//! [`match_bytes`]: super::matcher::match_bytes

use phf::{Map, phf_map};

use super::char_class::Marker;

/// Errors that can occur while compiling a pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternError {
    UnknownEscape(char),
    TrailingBackslash,
    NonAscii(char),
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownEscape(c) => write!(f, "Unknown escape in pattern: \\{c}"),
            Self::TrailingBackslash => write!(f, "Pattern ends with a lone backslash"),
            Self::NonAscii(c) => write!(f, "Non-ASCII character in pattern: {c:?}"),
        }
    }
}

impl std::error::Error for PatternError {}

const ESCAPES: Map<char, u8> = phf_map! {
    's' => Marker::WHITESPACE.byte(),
    'S' => Marker::NON_WHITESPACE.byte(),
    'd' => Marker::DECIMAL.byte(),
    'w' => Marker::BASE36.byte(),
    'x' => Marker::HEX.byte(),
    'o' => Marker::OCTAL.byte(),
    'p' => Marker::PRINTABLE.byte(),
    '*' => Marker::ANY.byte(),
    '\\' => b'\\',
    't' => b'\t',
    'n' => b'\n',
    'r' => b'\r',
    'f' => 0x0c,
    'v' => 0x0b,
};

/// Compile a pattern written in escape notation.
///
/// | Escape | Meaning                      |
/// |--------|------------------------------|
/// | `\s`   | whitespace group             |
/// | `\S`   | non-whitespace group         |
/// | `\d`   | decimal digit group          |
/// | `\w`   | base-36 digit group          |
/// | `\x`   | hexadecimal digit group      |
/// | `\o`   | octal digit group            |
/// | `\p`   | printable group              |
/// | `\*`   | any byte group               |
/// | `\\`   | literal backslash            |
/// | `\t` `\n` `\r` `\f` `\v` | literal control byte |
///
/// Any other ASCII character is a literal.
pub fn parse(input: &str) -> Result<Vec<u8>, PatternError> {
    let mut out = Vec::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        if !c.is_ascii() {
            return Err(PatternError::NonAscii(c));
        }
        if c != '\\' {
            out.push(c as u8);
            continue;
        }
        let esc = chars.next().ok_or(PatternError::TrailingBackslash)?;
        let byte = ESCAPES
            .get(&esc)
            .copied()
            .ok_or(PatternError::UnknownEscape(esc))?;
        out.push(byte);
    }
    Ok(out)
}
