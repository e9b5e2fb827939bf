//! Sequential non-greedy matcher over byte cursors.
//!
//! The pattern is itself read from a cursor. Literal bytes must equal the
//! next subject byte; marker bytes open a group that consumes subject bytes
//! until the following pattern step could begin. Either cursor may run
//! backward, in which case the structure is matched from the end of the text.

use log::{trace, warn};

use crate::cursor::{ByteCursor, Direction};
use crate::error::Error;

use super::char_class::{Class, Marker};

/// How a match that did not fail came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEnd {
    /// Every pattern byte was consumed.
    Pattern,
    /// The subject ran out first.
    Subject,
}

/// Progress of a match that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Subject bytes consumed.
    pub consumed: usize,
    /// Pattern bytes consumed.
    pub pattern_consumed: usize,
    /// Capture slots written, from the start of the slice.
    pub captured: usize,
    pub end: MatchEnd,
}

impl Match {
    /// True when the whole pattern was matched.
    pub fn is_complete(&self) -> bool {
        self.end == MatchEnd::Pattern
    }
}

/// A failed match, with the position reached.
#[derive(Debug)]
pub struct MatchError {
    pub kind: Error,
    pub consumed: usize,
    pub pattern_consumed: usize,
}

impl std::fmt::Display for MatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (subject byte {}, pattern byte {})",
            self.kind, self.consumed, self.pattern_consumed
        )
    }
}

impl std::error::Error for MatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// What ends a group.
#[derive(Debug, Clone, Copy)]
enum Boundary {
    /// The pattern ends after the group.
    End,
    Literal(u8),
    Class(Class),
}

impl Boundary {
    fn stops_at(self, byte: u8) -> bool {
        match self {
            Boundary::End => false,
            Boundary::Literal(b) => b == byte,
            Boundary::Class(class) => !class.is_any() && class.contains(byte),
        }
    }
}

/// Why a group stopped consuming.
enum Stop {
    /// A subject byte belongs to the next step; it must be pushed back.
    Byte,
    End,
    Failed(Error),
}

struct Progress {
    n: usize,
    o: usize,
    slot: usize,
}

impl Progress {
    fn fail(&self, kind: impl Into<Error>) -> MatchError {
        MatchError {
            kind: kind.into(),
            consumed: self.n,
            pattern_consumed: self.o,
        }
    }

    fn done(&self, end: MatchEnd) -> Match {
        Match {
            consumed: self.n,
            pattern_consumed: self.o,
            captured: self.slot,
            end,
        }
    }
}

/// Match `pattern` against `subject`, storing group text in `captures`.
///
/// Printable bytes in the pattern match themselves. These bytes open a
/// non-greedy group matching zero or more subject bytes:
///
/// | Byte   | Group                  |
/// |--------|------------------------|
/// | `0x00` | ASCII whitespace       |
/// | `0x01` | non-whitespace ASCII   |
/// | `0xd0` | decimal digits         |
/// | `0xd3` | base-36 digits         |
/// | `0xd6` | hexadecimal digits     |
/// | `0xd8` | octal digits           |
/// | `0xfe` | printable ASCII        |
/// | `0xff` | any byte               |
///
/// A group stops at the first subject byte that could start the next
/// pattern step, or that falls outside its own class. That byte is pushed
/// back onto `subject`. Every group except whitespace fills the next capture
/// slot; captures beyond `captures.len()` are dropped.
///
/// Running out of pattern is success. Running out of subject is reported as
/// [`MatchEnd::Subject`] so that the caller can decide whether a trailing
/// group was allowed to reach the end.
pub fn match_bytes<S, P>(
    subject: &mut S,
    pattern: &mut P,
    captures: &mut [String],
) -> Result<Match, MatchError>
where
    S: ByteCursor + ?Sized,
    P: ByteCursor + ?Sized,
{
    let mut p = Progress { n: 0, o: 0, slot: 0 };
    let mut buf = Vec::new();

    loop {
        let Some(a) = pattern.read_byte().map_err(|e| p.fail(e))? else {
            return Ok(p.done(MatchEnd::Pattern));
        };
        p.o += 1;

        let Some(marker) = Marker::from_byte(a) else {
            let Some(c) = subject.read_byte().map_err(|e| p.fail(e))? else {
                return Ok(p.done(MatchEnd::Subject));
            };
            p.n += 1;
            if c == a {
                continue;
            }
            subject.unread_byte().map_err(|e| p.fail(e))?;
            p.n -= 1;
            return Err(p.fail(Error::ByteMismatch {
                expected: a,
                found: c,
            }));
        };

        let boundary = match pattern.read_byte().map_err(|e| p.fail(e))? {
            None => Boundary::End,
            Some(b) => {
                pattern.unread_byte().map_err(|e| p.fail(e))?;
                match Marker::from_byte(b) {
                    Some(next) => Boundary::Class(next.class()),
                    None => Boundary::Literal(b),
                }
            }
        };

        let class = marker.class();
        let keep = marker.captures();
        let stop = loop {
            let c = match subject.read_byte() {
                Ok(Some(c)) => c,
                Ok(None) => break Stop::End,
                Err(err) => break Stop::Failed(err),
            };
            p.n += 1;
            if boundary.stops_at(c) || !class.contains(c) {
                break Stop::Byte;
            }
            if keep {
                buf.push(c);
            }
        };
        if let Stop::Byte = stop {
            subject.unread_byte().map_err(|e| p.fail(e))?;
            p.n -= 1;
        }

        if keep {
            if subject.direction() == Direction::Backward {
                buf.reverse();
            }
            trace!(
                "group {:#04x} closed after {} bytes at subject byte {}",
                marker.byte(),
                buf.len(),
                p.n
            );
            match captures.get_mut(p.slot) {
                Some(slot) => *slot = String::from_utf8_lossy(&buf).into_owned(),
                None => warn!(
                    "capture {} dropped: only {} slots supplied",
                    p.slot,
                    captures.len()
                ),
            }
            p.slot += 1;
            buf.clear();
        }

        // A read error still leaves the partial capture in its slot.
        match stop {
            Stop::Byte => {}
            Stop::End => return Ok(p.done(MatchEnd::Subject)),
            Stop::Failed(err) => return Err(p.fail(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, BufReader, Read};

    use super::*;
    use crate::cursor::ByteReader;
    use crate::rev::RevByteCursor;

    /// A reader whose every read fails.
    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "source gone"))
        }
    }

    /// Subject cursor yielding `data` and then failing.
    fn failing_after(
        data: &'static [u8],
    ) -> ByteReader<BufReader<io::Chain<&'static [u8], Broken>>> {
        ByteReader::new(BufReader::new(data.chain(Broken)))
    }

    fn assert_broken_pipe(err: &MatchError) {
        match &err.kind {
            Error::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn fwd(subject: &str, pattern: &[u8], slots: usize) -> (Result<Match, MatchError>, Vec<String>) {
        let mut s = ByteReader::from_bytes(subject.as_bytes());
        let mut p = ByteReader::from_bytes(pattern);
        let mut m = vec![String::new(); slots];
        let res = match_bytes(&mut s, &mut p, &mut m);
        (res, m)
    }

    fn rev(subject: &str, pattern: &[u8], slots: usize) -> (Result<Match, MatchError>, Vec<String>) {
        let mut s = RevByteCursor::new(subject, subject.len() as u64);
        let mut p = RevByteCursor::new(pattern, pattern.len() as u64);
        let mut m = vec![String::new(); slots];
        let res = match_bytes(&mut s, &mut p, &mut m);
        (res, m)
    }

    // --- Literals ---

    #[test]
    fn literal_pattern_matches_exactly() {
        let (res, m) = fwd("hello world", b"hello", 1);
        let res = res.unwrap();
        assert!(res.is_complete());
        assert_eq!(res.consumed, 5);
        assert_eq!(res.pattern_consumed, 5);
        assert_eq!(res.captured, 0);
        assert_eq!(m, vec![String::new()]);
    }

    #[test]
    fn literal_mismatch_reports_position_and_pushes_back() {
        let mut s = ByteReader::from_bytes(b"help");
        let mut p = ByteReader::from_bytes(b"hello");
        let err = match_bytes(&mut s, &mut p, &mut []).unwrap_err();
        assert!(matches!(
            err.kind,
            Error::ByteMismatch {
                expected: b'l',
                found: b'p'
            }
        ));
        assert_eq!(err.consumed, 3);
        assert_eq!(err.pattern_consumed, 4);
        assert_eq!(s.read_byte().unwrap(), Some(b'p'));
    }

    #[test]
    fn literal_runs_out_of_subject() {
        let (res, _) = fwd("hel", b"hello", 0);
        let res = res.unwrap();
        assert_eq!(res.end, MatchEnd::Subject);
        assert_eq!(res.consumed, 3);
        assert_eq!(res.pattern_consumed, 4);
    }

    #[test]
    fn empty_pattern_consumes_nothing() {
        let (res, _) = fwd("abc", b"", 0);
        assert_eq!(res.unwrap().consumed, 0);
    }

    // --- Groups ---

    #[test]
    fn whitespace_only_pattern_skips_leading_whitespace() {
        let mut s = ByteReader::from_bytes(b" \t\n\r\x0b\x0cword");
        let mut p = ByteReader::from_bytes(b"\x00");
        let mut m = [String::from("untouched")];
        let res = match_bytes(&mut s, &mut p, &mut m).unwrap();
        assert!(res.is_complete());
        assert_eq!(res.consumed, 6);
        assert_eq!(res.captured, 0);
        assert_eq!(m[0], "untouched");
        assert_eq!(s.read_byte().unwrap(), Some(b'w'));
    }

    #[test]
    fn captures_between_delimiters() {
        let (res, m) = fwd("abc\t(def) \nghi", b"abc\x00(\x01)\x00ghi", 1);
        let res = res.unwrap();
        assert!(res.is_complete());
        assert_eq!(res.consumed, 14);
        assert_eq!(res.captured, 1);
        assert_eq!(m, vec!["def"]);
    }

    #[test]
    fn groups_are_non_greedy() {
        // The first group stops at the first '-'; the trailing group has no
        // boundary and runs to the end of its class.
        let (res, m) = fwd("a-b-c", b"\x01-\x01", 2);
        assert_eq!(res.unwrap().end, MatchEnd::Subject);
        assert_eq!(m, vec!["a", "b-c"]);
    }

    #[test]
    fn group_may_be_empty() {
        let (res, m) = fwd("()", b"(\xfe)", 1);
        assert!(res.unwrap().is_complete());
        assert_eq!(m, vec![""]);
    }

    #[test]
    fn trailing_group_runs_to_end_of_subject() {
        let (res, m) = fwd("key=value", b"key=\x01", 1);
        let res = res.unwrap();
        assert_eq!(res.end, MatchEnd::Subject);
        assert_eq!(res.consumed, 9);
        assert_eq!(m, vec!["value"]);
    }

    #[test]
    fn trailing_group_stops_outside_its_class() {
        let mut s = ByteReader::from_bytes(b"1234 rest");
        let mut p = ByteReader::from_bytes(b"\xd0");
        let mut m = [String::new()];
        let res = match_bytes(&mut s, &mut p, &mut m).unwrap();
        assert!(res.is_complete());
        assert_eq!(res.consumed, 4);
        assert_eq!(m[0], "1234");
        assert_eq!(s.read_byte().unwrap(), Some(b' '));
    }

    #[test]
    fn group_stops_outside_class_before_literal() {
        let (res, m) = fwd("12ax", b"\xd0x", 1);
        let err = res.unwrap_err();
        assert!(matches!(
            err.kind,
            Error::ByteMismatch {
                expected: b'x',
                found: b'a'
            }
        ));
        assert_eq!(err.consumed, 2);
        assert_eq!(m, vec!["12"]);
    }

    #[test]
    fn numeric_groups_split_on_class_boundaries() {
        let (res, m) = fwd("zQFf837", b"\xd3\xd6\xd0\xd8", 4);
        assert_eq!(res.unwrap().end, MatchEnd::Subject);
        assert_eq!(m, vec!["zQ", "Ff", "8", "37"]);
    }

    #[test]
    fn any_group_takes_non_ascii() {
        let (res, m) = fwd("<héllo>", b"<\xff>", 1);
        assert!(res.unwrap().is_complete());
        assert_eq!(m, vec!["héllo"]);
    }

    #[test]
    fn extra_captures_are_dropped() {
        let (res, m) = fwd("a b c", b"\x01 \x01 \x01", 2);
        let res = res.unwrap();
        assert_eq!(res.captured, 3);
        assert_eq!(m, vec!["a", "b"]);
    }

    #[test]
    fn adjacent_any_markers_do_not_panic() {
        let (res, _) = fwd("abc", b"\xff\xff", 2);
        let res = res.unwrap();
        assert!(res.consumed <= 3);
    }

    #[test]
    fn mixed_structure() {
        let sc = "abc \t\ndef !@#\x0c(ghi) jkl";
        let pc = b"\x00abc\x00\x01\x00\x01\x0c(ghi) \x01\x00";
        let (res, m) = fwd(sc, pc, 3);
        let res = res.unwrap();
        assert_eq!(res.end, MatchEnd::Subject);
        assert_eq!(res.consumed, sc.len());
        assert_eq!(m, vec!["def", "!@#", "jkl"]);
    }

    #[test]
    fn repeated_matches_walk_records() {
        let mut s = ByteReader::from_bytes(b"a=1;b=22;c=333;");
        let mut fields = Vec::new();
        loop {
            let mut p = ByteReader::from_bytes(b"\x01=\xd0;");
            let mut m = [String::new(), String::new()];
            let res = match_bytes(&mut s, &mut p, &mut m).unwrap();
            if !res.is_complete() {
                break;
            }
            fields.push((m[0].clone(), m[1].clone()));
        }
        assert_eq!(
            fields,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "22".to_string()),
                ("c".to_string(), "333".to_string()),
            ]
        );
    }

    // --- Source errors ---

    #[test]
    fn io_error_during_literal_reaches_caller() {
        let mut s = failing_after(b"ab");
        let mut p = ByteReader::from_bytes(b"abc");
        let err = match_bytes(&mut s, &mut p, &mut []).unwrap_err();
        assert_broken_pipe(&err);
        assert_eq!(err.consumed, 2);
        assert_eq!(err.pattern_consumed, 3);
    }

    #[test]
    fn io_error_inside_group_keeps_partial_capture() {
        let mut s = failing_after(b"ab=12");
        let mut p = ByteReader::from_bytes(b"ab=\xd0;");
        let mut m = [String::new()];
        let err = match_bytes(&mut s, &mut p, &mut m).unwrap_err();
        assert_broken_pipe(&err);
        assert_eq!(err.consumed, 5);
        assert_eq!(err.pattern_consumed, 4);
        assert_eq!(m[0], "12");
    }

    #[test]
    fn io_error_from_backward_source_reaches_caller() {
        // The source is shorter than the claimed end, so the first refill fails.
        let mut s = RevByteCursor::new("abc", 10);
        let mut p = ByteReader::from_bytes(b"\x01");
        let mut m = [String::from("untouched")];
        let err = match_bytes(&mut s, &mut p, &mut m).unwrap_err();
        match &err.kind {
            Error::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.consumed, 0);
        assert_eq!(err.pattern_consumed, 1);
        assert_eq!(m[0], "");
    }

    // --- Backward ---

    #[test]
    fn reverse_mixed_structure_captures_read_left_to_right() {
        let sc = "abc \t\ndef !@#\x0c(ghi) jkl";
        let pc = b"\x00abc\x00\x01\x00\x01\x0c(ghi) \x01\x00";
        let (res, m) = rev(sc, pc, 3);
        let res = res.unwrap();
        assert_eq!(res.end, MatchEnd::Subject);
        assert_eq!(res.consumed, sc.len());
        assert_eq!(m, vec!["jkl", "!@#", "def"]);
    }

    #[test]
    fn reverse_finds_last_field() {
        let (res, m) = rev("abc\tdef \nghi jkl", b"\x00def\x00\x01\x00jkl", 1);
        assert!(res.unwrap().is_complete());
        assert_eq!(m, vec!["ghi"]);
    }

    #[test]
    fn reverse_capture_keeps_multibyte_text_intact() {
        let (res, m) = rev("name: café", b": \xff", 1);
        assert!(res.unwrap().is_complete());
        assert_eq!(m, vec!["café"]);
    }
}
