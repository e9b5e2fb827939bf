//! Byte classification table and pattern marker bytes.

const MARKER: u8 = 1 << 0;
const WS: u8 = 1 << 1;
const PUNCT: u8 = 1 << 2;
const LOWER: u8 = 1 << 3;
const UPPER: u8 = 1 << 4;
const OCT: u8 = 1 << 5;
const DEC: u8 = 1 << 6;
const HEX: u8 = 1 << 7;

const ALPHA: u8 = LOWER | UPPER;
const BASE36: u8 = ALPHA | DEC;
const NON_WS: u8 = BASE36 | PUNCT;
const PRINT: u8 = NON_WS | WS;

static TABLE: [u8; 256] = build_table();

const fn build_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < table.len() {
        table[i] = classify(i as u8);
        i += 1;
    }
    let mut j = 0;
    while j < MARKERS.len() {
        let (marker, bits) = MARKERS[j];
        table[marker.0 as usize] = bits;
        j += 1;
    }
    table
}

const MARKERS: [(Marker, u8); 8] = [
    (Marker::WHITESPACE, MARKER | WS),
    (Marker::NON_WHITESPACE, MARKER | NON_WS),
    (Marker::DECIMAL, MARKER | DEC),
    (Marker::BASE36, MARKER | BASE36),
    (Marker::HEX, MARKER | HEX),
    (Marker::OCTAL, MARKER | OCT),
    (Marker::PRINTABLE, MARKER | PRINT),
    (Marker::ANY, 0xff),
];

const fn classify(b: u8) -> u8 {
    match b {
        b' ' | b'\n' | b'\t' | b'\r' | 0x0c | 0x0b => WS,
        b'0'..=b'7' => OCT | DEC | HEX,
        b'8' | b'9' => DEC | HEX,
        b'a'..=b'f' => LOWER | HEX,
        b'g'..=b'z' => LOWER,
        b'A'..=b'F' => UPPER | HEX,
        b'G'..=b'Z' => UPPER,
        b'!'..=b'~' => PUNCT,
        _ => 0,
    }
}

/// A set of byte classes. Classes overlap: `'7'` is octal, decimal and hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Class(u8);

impl Class {
    pub const NONE: Class = Class(0);
    pub const WHITESPACE: Class = Class(WS);
    pub const PUNCT: Class = Class(PUNCT);
    pub const LOWER: Class = Class(LOWER);
    pub const UPPER: Class = Class(UPPER);
    pub const OCTAL: Class = Class(OCT);
    pub const DECIMAL: Class = Class(DEC);
    pub const HEX: Class = Class(HEX);
    pub const BASE36: Class = Class(BASE36);
    pub const NON_WHITESPACE: Class = Class(NON_WS);
    pub const PRINTABLE: Class = Class(PRINT);
    /// Every byte, including those outside ASCII.
    pub const ANY: Class = Class(!MARKER);

    /// Classes of a subject byte. Marker bytes belong to none.
    pub fn of(byte: u8) -> Class {
        let bits = TABLE[byte as usize];
        if bits & MARKER != 0 {
            Class::NONE
        } else {
            Class(bits)
        }
    }

    pub fn contains(self, byte: u8) -> bool {
        self == Class::ANY || Class::of(byte).0 & self.0 != 0
    }

    pub fn is_any(self) -> bool {
        self == Class::ANY
    }
}

/// A pattern byte standing for a character class group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker(u8);

impl Marker {
    pub const WHITESPACE: Marker = Marker(0x00);
    pub const NON_WHITESPACE: Marker = Marker(0x01);
    pub const DECIMAL: Marker = Marker(0xd0);
    pub const BASE36: Marker = Marker(0xd3);
    pub const HEX: Marker = Marker(0xd6);
    pub const OCTAL: Marker = Marker(0xd8);
    pub const PRINTABLE: Marker = Marker(0xfe);
    pub const ANY: Marker = Marker(0xff);

    /// Returns the marker for a pattern byte, or `None` for a literal.
    pub fn from_byte(byte: u8) -> Option<Marker> {
        if TABLE[byte as usize] & MARKER != 0 {
            Some(Marker(byte))
        } else {
            None
        }
    }

    pub const fn byte(self) -> u8 {
        self.0
    }

    pub fn class(self) -> Class {
        Class(TABLE[self.0 as usize] & !MARKER)
    }

    /// Every group but whitespace stores what it consumes.
    pub fn captures(self) -> bool {
        self != Marker::WHITESPACE
    }
}
