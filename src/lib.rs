#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Pure building blocks for snapshot testing.
//!
//! A snapshot test stores generated text once and asserts on later runs that
//! the text did not change. This crate holds the parts of that workflow that
//! never touch the filesystem:
//!
//! - [`classify`] - finds numeric-looking tokens and tells plain floats apart
//!   from timestamps, dates, IPv4 addresses, semantic versions and URLs
//! - [`round`] - rounds plain floats to a number of significant digits
//! - [`compare`] - line-oriented comparison that stops at the first mismatch
//! - [`report`] - renders a mismatch into the diagnostic shown on failure
//! - [`token_display`] - debug rendering of classifier output
//!
//! ```
//! use layered_snap::{compare, round_floats};
//!
//! let stored = "pi=3.14!";
//! let current = round_floats("pi=3.14159!", Some(3));
//! assert!(compare(stored, &current).matches());
//! ```
//!
//! Storage, naming and update mode live in `layered-snap-harness`.

pub mod classify;
pub mod compare;
pub mod report;
pub mod round;
mod token;
pub mod token_display;

pub use classify::{classify, MatchScope, Matcher, MATCHERS};
pub use compare::{compare, ComparisonResult, Mismatch, MismatchKind};
pub use report::{format_mismatch, format_report, UPDATE_HINT};
pub use round::{format_significant, round_floats, MAX_SIGNIFICANT_DIGITS};
pub use token::{Token, TokenCategory};
pub use token_display::TokenDisplay;
