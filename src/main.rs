use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;

use revmatch::{
    ByteCursor, ByteReader, Marker, Match, MatchEnd, RevByteCursor, file_len, match_bytes, parse,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Pattern; groups are written \s \S \d \w \x \o \p \*
    #[arg(value_name = "PATTERN")]
    pattern: String,

    /// Input file (standard input if absent)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Match from the end of the input
    #[arg(short = 'r', long)]
    reverse: bool,

    /// Match successive records until the pattern no longer fits
    #[arg(short = 'n', long)]
    repeat: bool,

    /// Use the pattern bytes as given, without escapes
    #[arg(long)]
    raw: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(0) => std::process::exit(1),
        Ok(_) => {}
        Err(err) => {
            eprintln!("revmatch: {err:#}");
            std::process::exit(2);
        }
    }
}

/// Returns the number of records matched.
fn run(args: &Args) -> Result<usize> {
    let pattern = if args.raw {
        args.pattern.clone().into_bytes()
    } else {
        parse(&args.pattern)?
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let count = match (&args.file, args.reverse) {
        (Some(path), true) => {
            let mut file =
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            let len = file_len(&mut file)
                .with_context(|| format!("Failed to size {}", path.display()))?;
            scan(&mut RevByteCursor::new(file, len), &pattern, args, &mut out)?
        }
        (Some(path), false) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            scan(&mut ByteReader::new(BufReader::new(file)), &pattern, args, &mut out)?
        }
        (None, true) => {
            let mut input = Vec::new();
            io::stdin()
                .read_to_end(&mut input)
                .context("Failed to read stdin")?;
            let len = input.len() as u64;
            scan(&mut RevByteCursor::new(input, len), &pattern, args, &mut out)?
        }
        (None, false) => scan(&mut ByteReader::new(io::stdin().lock()), &pattern, args, &mut out)?,
    };
    out.flush()?;
    Ok(count)
}

fn scan(
    subject: &mut dyn ByteCursor,
    pattern: &[u8],
    args: &Args,
    out: &mut impl Write,
) -> Result<usize> {
    let slots = pattern
        .iter()
        .filter_map(|&b| Marker::from_byte(b))
        .filter(|m| m.captures())
        .count();
    let mut captures = vec![String::new(); slots];
    let mut count = 0;

    loop {
        let mut p: Box<dyn ByteCursor + '_> = if args.reverse {
            Box::new(RevByteCursor::new(pattern, pattern.len() as u64))
        } else {
            Box::new(ByteReader::from_bytes(pattern))
        };
        let m = match_bytes(&mut *subject, &mut *p, &mut captures)?;
        if !fits(&m, pattern, args.reverse) || (m.consumed == 0 && count > 0) {
            break;
        }
        writeln!(out, "{}", captures[..m.captured.min(slots)].iter().join("\t"))?;
        count += 1;
        // A record that consumed nothing would repeat forever.
        if !args.repeat || m.end == MatchEnd::Subject || m.consumed == 0 {
            break;
        }
    }
    Ok(count)
}

/// A record fits if the pattern completed, or if only its final group
/// was cut short by the end of the input.
fn fits(m: &Match, pattern: &[u8], reverse: bool) -> bool {
    if m.is_complete() {
        return true;
    }
    let last = if reverse { pattern.first() } else { pattern.last() };
    m.end == MatchEnd::Subject
        && m.pattern_consumed == pattern.len()
        && last.is_some_and(|&b| Marker::from_byte(b).is_some())
}
