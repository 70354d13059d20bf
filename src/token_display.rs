use crate::classify::classify;
use crate::round::format_significant;
use crate::token::{Token, TokenCategory};
use std::fmt::{self, Write};
use unicode_width::UnicodeWidthStr;

/// Renders classifier output underneath the text it came from.
///
/// ```text
/// v1.2.3 took 0.256s
///  ╰───╯ SemVer
///             ╰───╯ PlainFloat → 0.26
/// ```
///
/// Newlines, tabs and carriage returns are drawn as single-column glyphs so
/// the markers stay aligned.
pub struct TokenDisplay<'a> {
    text: &'a str,
    tokens: Vec<Token<'a>>,
    include_categories: Vec<TokenCategory>,
    digits: Option<u32>,
}

impl<'a> TokenDisplay<'a> {
    pub fn new(text: &'a str) -> Self {
        TokenDisplay {
            text,
            tokens: classify(text),
            include_categories: Vec::new(),
            digits: None,
        }
    }

    /// Only show tokens of `category`. May be called repeatedly; with no
    /// calls every token is shown.
    pub fn include(&mut self, category: TokenCategory) {
        if !self.include_categories.contains(&category) {
            self.include_categories.push(category);
        }
    }

    /// Takes self
    pub fn with(mut self, category: TokenCategory) -> Self {
        self.include(category);
        self
    }

    /// Append the rounded rendering to every plain float.
    pub fn with_rounding(mut self, digits: u32) -> Self {
        self.digits = Some(digits);
        self
    }

    fn is_included(&self, token: &Token<'_>) -> bool {
        self.include_categories.is_empty() || self.include_categories.contains(&token.category)
    }

    fn column_of(&self, byte_offset: usize) -> usize {
        UnicodeWidthStr::width(visible(&self.text[..byte_offset]).as_str())
    }
}

fn visible(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' => '⏎',
            '\r' => '␍',
            '\t' => '→',
            other => other,
        })
        .collect()
}

impl<'a> fmt::Display for TokenDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&visible(self.text))?;

        for token in self.tokens.iter().filter(|token| self.is_included(token)) {
            f.write_char('\n')?;

            let start_col = self.column_of(token.span.start);
            let end_col = self.column_of(token.span.end);
            for _ in 0..start_col {
                f.write_char(' ')?;
            }

            f.write_char('╰')?;
            for _ in (start_col + 1)..end_col.saturating_sub(1) {
                f.write_char('─')?;
            }
            if end_col - start_col > 1 {
                f.write_char('╯')?;
            }

            write!(f, " {}", token.category)?;

            if let (Some(digits), true) = (self.digits, token.category.is_round_eligible()) {
                let rounded = token
                    .text
                    .parse::<f64>()
                    .ok()
                    .and_then(|value| format_significant(value, digits));
                match rounded {
                    Some(rounded) => write!(f, " → {}", rounded)?,
                    None => f.write_str(" (kept)")?,
                }
            }
        }

        Ok(())
    }
}
