//! Significant-digit rounding of plain floats embedded in text.

use crate::classify::classify;
use std::fmt::Write;

/// Most significant digits an `f64` can carry. Larger requests are capped.
pub const MAX_SIGNIFICANT_DIGITS: u32 = 17;

/// Round every plain float in `text` to `digits` significant digits.
///
/// `None` and `Some(0)` leave the text untouched. Tokens the classifier
/// protects (timestamps, dates, IPv4 addresses, versions, URLs) and all
/// text between tokens are copied through unchanged and in order.
///
/// A float that cannot be rendered (for example `1.0e999`, which overflows
/// to infinity) is copied through as written.
///
/// ```
/// use layered_snap::round_floats;
///
/// assert_eq!(round_floats("pi=3.14159!", Some(3)), "pi=3.14!");
/// assert_eq!(round_floats("IP: 192.168.0.1", Some(2)), "IP: 192.168.0.1");
/// assert_eq!(round_floats("pi=3.14159!", None), "pi=3.14159!");
/// ```
pub fn round_floats(text: &str, digits: Option<u32>) -> String {
    let digits = match digits {
        Some(digits) if digits > 0 => digits,
        _ => return text.to_string(),
    };

    let mut output = String::with_capacity(text.len());
    let mut copied_up_to = 0;

    for token in classify(text) {
        if !token.category.is_round_eligible() {
            continue;
        }

        output.push_str(&text[copied_up_to..token.span.start]);
        match round_token(token.text, digits) {
            Some(rounded) => output.push_str(&rounded),
            None => output.push_str(token.text),
        }
        copied_up_to = token.span.end;
    }

    output.push_str(&text[copied_up_to..]);
    output
}

fn round_token(token: &str, digits: u32) -> Option<String> {
    let value: f64 = token.parse().ok()?;
    format_significant(value, digits)
}

/// Render `value` with `digits` significant digits, like C's `%.{digits}g`.
///
/// Fixed notation is used when the decimal exponent `x` of the rounded value
/// satisfies `-4 <= x < digits`, scientific notation (`6.022e+23`) otherwise.
/// Trailing fractional zeros are removed, and zero never carries a sign.
/// Returns `None` for infinities and NaN. `digits` is capped at
/// [`MAX_SIGNIFICANT_DIGITS`].
///
/// Rounding is correctly rounded from the `f64` value with ties to even, and
/// a carry moves into the exponent: `9.9996` at three digits renders as `10`.
pub fn format_significant(value: f64, digits: u32) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    if value == 0.0 {
        return Some("0".to_string());
    }

    let precision = digits.clamp(1, MAX_SIGNIFICANT_DIGITS) as usize;

    // `{:e}` yields e.g. "-1.23e4": one leading digit, then `precision - 1`.
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = scientific.split_once('e')?;
    let exponent: i32 = exponent.parse().ok()?;
    let significand: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    let mut output = String::new();
    if value.is_sign_negative() {
        output.push('-');
    }

    if exponent < -4 || exponent >= precision as i32 {
        let (lead, tail) = significand.split_at(1);
        output.push_str(lead);
        push_fraction(&mut output, tail);
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(output, "e{}{:02}", sign, exponent.abs()).ok()?;
    } else if exponent < 0 {
        output.push_str("0.");
        for _ in 0..(-exponent - 1) {
            output.push('0');
        }
        output.push_str(significand.trim_end_matches('0'));
    } else {
        let (integer, fraction) = significand.split_at(exponent as usize + 1);
        output.push_str(integer);
        push_fraction(&mut output, fraction);
    }

    Some(output)
}

fn push_fraction(output: &mut String, fraction: &str) {
    let fraction = fraction.trim_end_matches('0');
    if !fraction.is_empty() {
        output.push('.');
        output.push_str(fraction);
    }
}
