//! Token classification for numeric-looking text.
//!
//! The classifier walks the text left to right. A maximal stretch of digits
//! and numeric punctuation (`.`, `-`, `+`, `:`, `e`, `E`, `T`, `Z`) is a
//! numeric run and is classified as a unit:
//!
//! - a run that is a single float, once leading and trailing punctuation is
//!   trimmed, is a [`PlainFloat`](TokenCategory::PlainFloat)
//! - otherwise the protected matchers are tried inside the run, and the part
//!   after a protected token is classified again as a shorter run
//!
//! URLs are matched outside runs. The order in [`MATCHERS`] is what keeps
//! lookalikes out of the rounding path: a semantic version such as `1.2.3`
//! is never a float, and a URL swallows every number in its path.
//!
//! Because a float always covers its whole run, rewriting it with another
//! float leaves the run boundaries where they were.
//!
//! ```
//! use layered_snap::{classify, TokenCategory};
//!
//! let tokens = classify("v1.2.3 took 0.25s");
//! let categories: Vec<_> = tokens.iter().map(|t| t.category).collect();
//! assert_eq!(categories, vec![TokenCategory::SemVer, TokenCategory::PlainFloat]);
//! ```

use crate::token::{Token, TokenCategory};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

/// Matches at the start of `rest`, returning the byte length of the match
/// and its category.
pub type MatchFn = fn(rest: &str) -> Option<(usize, TokenCategory)>;

/// Where a matcher may claim text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchScope {
    /// Outside numeric runs.
    Text,
    /// At a numeric boundary inside a run. The match may extend past it.
    InRun,
    /// Only a whole run, after trimming its leading and trailing punctuation.
    WholeRun,
}

/// One entry of the ordered matcher list.
#[derive(Clone, Copy)]
pub struct Matcher {
    /// Short name, used in debug output and tests.
    pub name: &'static str,
    pub scope: MatchScope,
    pub find: MatchFn,
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("name", &self.name)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Matchers in priority order: URL > SemVer > IPv4 > Date/Timestamp > PlainFloat.
pub const MATCHERS: [Matcher; 5] = [
    Matcher {
        name: "url",
        scope: MatchScope::Text,
        find: match_url,
    },
    Matcher {
        name: "semver",
        scope: MatchScope::InRun,
        find: match_semver,
    },
    Matcher {
        name: "ipv4",
        scope: MatchScope::InRun,
        find: match_ipv4,
    },
    Matcher {
        name: "datetime",
        scope: MatchScope::InRun,
        find: match_datetime,
    },
    Matcher {
        name: "float",
        scope: MatchScope::WholeRun,
        find: match_float,
    },
];

static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^https?://\S+").expect("Invalid URL regex"));

static SEMVER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+\.[0-9]+\.[0-9]+)(?:-[0-9A-Za-z.\-]+)?(?:\+[0-9A-Za-z.\-]+)?")
        .expect("Invalid semver regex")
});

static IPV4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})").expect("Invalid IPv4 regex")
});

// Time part is group 1; when it is absent the token is a bare date.
static DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}(T[0-9]{2}:[0-9]{2}(?::[0-9]{2}(?:\.[0-9]+)?)?(?:Z|[+-][0-9]{2}:?[0-9]{2})?)?")
        .expect("Invalid date regex")
});

static TIME_OF_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]+)?").expect("Invalid time regex"));

static FLOAT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[0-9]+\.[0-9]+(?:[eE][+-]?[0-9]+)?").expect("Invalid float regex"));

/// Classify every numeric-looking substring of `text`.
///
/// Returned tokens are ordered by start offset and never overlap.
///
/// Inside a run, protected matchers do not start directly after an ASCII
/// digit, nor after a `.` that follows a digit, so the tail of a longer
/// numeric run (the `.4` of an unrecognized `1.2.3.4.5`) is never reported
/// on its own.
pub fn classify(text: &str) -> Vec<Token<'_>> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if is_run_byte(bytes[pos]) {
            pos = classify_run(text, pos, &mut tokens);
            continue;
        }

        // URLs start with an ASCII `h`, which is always a char boundary.
        let matched = if bytes[pos] == b'h' {
            first_match(text, pos, MatchScope::Text)
        } else {
            None
        };
        match matched {
            Some((end, category)) => {
                tokens.push(Token::new(text, pos..end, category));
                pos = end;
            }
            None => pos += 1,
        }
    }

    tokens
}

/// Classify the run starting at `start` and return where scanning resumes.
fn classify_run<'a>(text: &'a str, start: usize, tokens: &mut Vec<Token<'a>>) -> usize {
    let bytes = text.as_bytes();
    let end = start + bytes[start..].iter().take_while(|&&b| is_run_byte(b)).count();
    let mut segment = start;

    while segment < end {
        let core = trim_run(bytes, segment..end);
        if let Some(category) = whole_run_match(&text[core.clone()]) {
            tokens.push(Token::new(text, core, category));
            return end;
        }

        let claimed = (segment..end)
            .filter(|&pos| {
                (bytes[pos].is_ascii_digit() || bytes[pos] == b'-') && at_numeric_boundary(bytes, pos)
            })
            .find_map(|pos| first_match(text, pos, MatchScope::InRun).map(|m| (pos, m)));

        match claimed {
            Some((pos, (token_end, category))) => {
                tokens.push(Token::new(text, pos..token_end, category));
                if token_end >= end {
                    return token_end;
                }
                segment = token_end;
            }
            None => return end,
        }
    }

    end
}

fn first_match(text: &str, pos: usize, scope: MatchScope) -> Option<(usize, TokenCategory)> {
    let rest = &text[pos..];
    MATCHERS
        .iter()
        .filter(|matcher| matcher.scope == scope)
        .find_map(|matcher| (matcher.find)(rest))
        .map(|(len, category)| (pos + len, category))
}

fn whole_run_match(core: &str) -> Option<TokenCategory> {
    if core.is_empty() {
        return None;
    }
    MATCHERS
        .iter()
        .filter(|matcher| matcher.scope == MatchScope::WholeRun)
        .find_map(|matcher| match (matcher.find)(core) {
            Some((len, category)) if len == core.len() => Some(category),
            _ => None,
        })
}

fn is_run_byte(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b':' | b'e' | b'E' | b'T' | b'Z')
}

/// Drop punctuation around the digits of a run. A `-` directly before a
/// digit is kept as a sign.
fn trim_run(bytes: &[u8], run: Range<usize>) -> Range<usize> {
    let mut start = run.start;
    while start < run.end {
        let b = bytes[start];
        let is_sign = b == b'-' && start + 1 < run.end && bytes[start + 1].is_ascii_digit();
        if b.is_ascii_digit() || is_sign {
            break;
        }
        start += 1;
    }

    let mut end = run.end;
    while end > start && !bytes[end - 1].is_ascii_digit() {
        end -= 1;
    }
    start..end
}

fn at_numeric_boundary(bytes: &[u8], pos: usize) -> bool {
    match pos.checked_sub(1).map(|prev| bytes[prev]) {
        None => true,
        Some(b) if b.is_ascii_digit() => false,
        Some(b'.') => !(pos >= 2 && bytes[pos - 2].is_ascii_digit()),
        Some(_) => true,
    }
}

fn followed_by_digit(rest: &str, end: usize) -> bool {
    rest.as_bytes().get(end).map_or(false, u8::is_ascii_digit)
}

fn followed_by_dotted_digit(rest: &str, end: usize) -> bool {
    let bytes = rest.as_bytes();
    bytes.get(end) == Some(&b'.') && bytes.get(end + 1).map_or(false, u8::is_ascii_digit)
}

/// `http://` or `https://` followed by at least one non-whitespace character.
pub fn match_url(rest: &str) -> Option<(usize, TokenCategory)> {
    URL.find(rest).map(|m| (m.end(), TokenCategory::Url))
}

/// `MAJOR.MINOR.PATCH` with optional `-pre` and `+build` suffixes.
///
/// A fourth numeric component means this is not a version (it may still be
/// an IPv4 address).
pub fn match_semver(rest: &str) -> Option<(usize, TokenCategory)> {
    let caps = SEMVER.captures(rest)?;
    let core_end = caps.get(1)?.end();
    if followed_by_dotted_digit(rest, core_end) {
        return None;
    }

    // Sentence punctuation after a suffix is not part of the version.
    let bytes = rest.as_bytes();
    let mut end = caps.get(0)?.end();
    while end > core_end && matches!(bytes[end - 1], b'.' | b'-' | b'+') {
        end -= 1;
    }

    Some((end, TokenCategory::SemVer))
}

/// Four octets in `0..=255`.
pub fn match_ipv4(rest: &str) -> Option<(usize, TokenCategory)> {
    let caps = IPV4.captures(rest)?;
    let all_octets_valid = (1..=4).all(|group| {
        caps.get(group)
            .and_then(|octet| octet.as_str().parse::<u16>().ok())
            .map_or(false, |value| value <= 255)
    });
    if !all_octets_valid {
        return None;
    }

    let end = caps.get(0)?.end();
    if followed_by_digit(rest, end) || followed_by_dotted_digit(rest, end) {
        return None;
    }
    Some((end, TokenCategory::Ipv4))
}

/// ISO-8601-like dates and timestamps, plus bare `HH:MM:SS[.fff]` times.
pub fn match_datetime(rest: &str) -> Option<(usize, TokenCategory)> {
    if let Some(caps) = DATE.captures(rest) {
        let end = caps.get(0)?.end();
        if !followed_by_digit(rest, end) {
            let category = if caps.get(1).is_some() {
                TokenCategory::Timestamp
            } else {
                TokenCategory::Date
            };
            return Some((end, category));
        }
    }

    let m = TIME_OF_DAY.find(rest)?;
    if followed_by_digit(rest, m.end()) {
        return None;
    }
    Some((m.end(), TokenCategory::Timestamp))
}

/// `-?\d+\.\d+` with an optional exponent. Integers never match.
pub fn match_float(rest: &str) -> Option<(usize, TokenCategory)> {
    let m = FLOAT.find(rest)?;
    if followed_by_dotted_digit(rest, m.end()) {
        return None;
    }
    Some((m.end(), TokenCategory::PlainFloat))
}
