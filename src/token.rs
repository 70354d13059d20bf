use std::fmt;
use std::ops::Range;

/// What a classified token looks like.
///
/// Only [`TokenCategory::PlainFloat`] is ever rewritten by the normalizer.
/// Every other category is protected and copied through byte for byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    /// A decimal number such as `3.14` or `6.022e23`.
    PlainFloat,
    /// A date with a time of day (`2024-01-05T10:00:00Z`) or a bare time
    /// of day (`12:34:56.789`).
    Timestamp,
    /// A calendar date without a time (`2024-01-05`).
    Date,
    /// Four dot-separated octets (`192.168.0.1`).
    Ipv4,
    /// Three dot-separated numbers with optional pre-release and build
    /// metadata (`1.2.3-rc.1+build5`).
    SemVer,
    /// An `http://` or `https://` URL up to the next whitespace.
    Url,
}

impl TokenCategory {
    /// Whether the normalizer may round tokens of this category.
    pub fn is_round_eligible(self) -> bool {
        matches!(self, TokenCategory::PlainFloat)
    }
}

impl fmt::Display for TokenCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenCategory::PlainFloat => "PlainFloat",
            TokenCategory::Timestamp => "Timestamp",
            TokenCategory::Date => "Date",
            TokenCategory::Ipv4 => "Ipv4",
            TokenCategory::SemVer => "SemVer",
            TokenCategory::Url => "Url",
        };
        f.write_str(name)
    }
}

/// A maximal substring claimed by one matcher.
///
/// `span` holds byte offsets into the classified text and `text` borrows
/// that exact slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub span: Range<usize>,
    pub category: TokenCategory,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    pub(crate) fn new(source: &'a str, span: Range<usize>, category: TokenCategory) -> Self {
        Token {
            text: &source[span.clone()],
            span,
            category,
        }
    }
}
