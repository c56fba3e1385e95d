//! Parsing of hexadecimal Unicode codepoints and codepoint ranges.
//!
//! A codepoint list looks like `a1-ac,ae-ff,2603`: comma-separated tokens, each either a single
//! hexadecimal codepoint or two of them joined by a hyphen (an inclusive range).

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::{Error, RangeProblem, Result};

/// The largest Unicode codepoint.
pub const MAX_CODEPOINT: u32 = 0x10ffff;

/// Parse a single hexadecimal codepoint in `0..=0x10ffff`.
///
/// Surrounding whitespace, a leading `+` and a `0x`/`0X` prefix are accepted, so `" 0xae"` is
/// `0xae`.
pub fn parse_codepoint(hex: &str) -> Result<u32> {
    let invalid = || Error::InvalidCodepoint(hex.to_owned());

    let trimmed = hex.trim_matches(|c: char| c.is_ascii_whitespace());
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
        .unwrap_or(unsigned);
    // `from_str_radix` would take a second `+`.
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    match u32::from_str_radix(digits, 16) {
        Ok(codepoint) if codepoint <= MAX_CODEPOINT => Ok(codepoint),
        _ => Err(invalid()),
    }
}

/// Parse a codepoint (`"41"`) or an inclusive codepoint range (`"a1-ac"`).
pub fn parse_codepoint_range(token: &str) -> Result<RangeInclusive<u32>> {
    let invalid = |problem| Error::InvalidRange {
        token: token.to_owned(),
        problem,
    };

    if token.is_empty() {
        return Err(invalid(RangeProblem::Empty));
    }
    let parts = token.split('-').collect::<Vec<_>>();
    match parts[..] {
        [single] => {
            let codepoint = parse_codepoint(single)?;
            Ok(codepoint..=codepoint)
        }
        [first, last] => {
            let first = parse_codepoint(first)?;
            let last = parse_codepoint(last)?;
            if first > last {
                Err(invalid(RangeProblem::Reversed { first, last }))
            } else {
                Ok(first..=last)
            }
        }
        _ => Err(invalid(RangeProblem::TooManyHyphens)),
    }
}

/// Parse a comma-separated list of codepoints and ranges into the characters they cover.
///
/// Surrogates (`d800-dfff`) aren't Unicode scalar values and are skipped, so a list can parse
/// successfully and still cover no characters at all.
pub fn parse_codepoint_list(list: &str) -> Result<BTreeSet<char>> {
    let mut chars = BTreeSet::new();
    for token in list.split(',') {
        let range = parse_codepoint_range(token)?;
        chars.extend(range.filter_map(char::from_u32));
    }
    Ok(chars)
}
