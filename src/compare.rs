//! First-mismatch line comparison.
//!
//! Both sides are split on `\n` and nothing else. A final `\n` does not add
//! an empty line, and a `\r` is an ordinary character, so `a\r\n` and `a\n`
//! differ. The walk stops at the first differing line; later lines are not
//! inspected.

/// Outcome of comparing stored text against current text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonResult {
    Match,
    Mismatch(Mismatch),
}

impl ComparisonResult {
    pub fn matches(&self) -> bool {
        matches!(self, ComparisonResult::Match)
    }

    pub fn mismatch(&self) -> Option<&Mismatch> {
        match self {
            ComparisonResult::Match => None,
            ComparisonResult::Mismatch(mismatch) => Some(mismatch),
        }
    }
}

/// The first line at which stored and current text diverge.
///
/// `None` on either side means the text ended before this line. At least
/// one side is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// 1-based line number.
    pub line_number: usize,
    pub expected: Option<String>,
    pub actual: Option<String>,
    /// Lines after the mismatch were not checked. Always `true`.
    pub truncated: bool,
}

/// How the mismatching line differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    /// Both sides have a line here, with different content.
    Changed,
    /// The current text ended before the stored one.
    Shorter,
    /// The current text continues past the end of the stored one.
    Longer,
}

impl Mismatch {
    pub fn kind(&self) -> MismatchKind {
        match (&self.expected, &self.actual) {
            (Some(_), None) => MismatchKind::Shorter,
            (None, Some(_)) => MismatchKind::Longer,
            _ => MismatchKind::Changed,
        }
    }
}

/// Compare `expected` and `actual` line by line and report the first
/// divergence.
///
/// ```
/// use layered_snap::{compare, MismatchKind};
///
/// let result = compare("a\nb\nc", "a\nX\nc");
/// let mismatch = result.mismatch().unwrap();
/// assert_eq!(mismatch.line_number, 2);
/// assert_eq!(mismatch.kind(), MismatchKind::Changed);
/// ```
pub fn compare(expected: &str, actual: &str) -> ComparisonResult {
    let mut expected_lines = split_lines(expected);
    let mut actual_lines = split_lines(actual);
    let mut index = 0;

    loop {
        match (expected_lines.next(), actual_lines.next()) {
            (None, None) => return ComparisonResult::Match,
            (Some(e), Some(a)) if e == a => {}
            (e, a) => {
                return ComparisonResult::Mismatch(Mismatch {
                    line_number: index + 1,
                    expected: e.map(str::to_string),
                    actual: a.map(str::to_string),
                    truncated: true,
                })
            }
        }
        index += 1;
    }
}

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive('\n')
        .map(|line| line.strip_suffix('\n').unwrap_or(line))
}
