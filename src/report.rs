//! Mismatch report rendering.

use crate::compare::{ComparisonResult, Mismatch, MismatchKind};
use std::fmt::Write;
use std::path::Path;

/// Guidance printed at the end of every mismatch report.
pub const UPDATE_HINT: &str = "To update this snapshot, run: SNAP_UPDATE=1 cargo test";

const END_OF_CONTENT: &str = "<end of content>";

/// Render the diagnostic for a failed snapshot comparison.
///
/// The output depends only on the arguments, so it can be asserted on
/// verbatim.
pub fn format_mismatch(display_name: &str, path: &Path, mismatch: &Mismatch) -> String {
    let mut output = String::new();

    writeln!(output, "Snapshot mismatch for {}", display_name).unwrap();
    writeln!(output, "Snapshot file: {}", path.display()).unwrap();
    writeln!(output).unwrap();

    let headline = match mismatch.kind() {
        MismatchKind::Changed => "there is a mismatch between the snapshot and the current result",
        MismatchKind::Shorter => "the current result is shorter than the snapshot",
        MismatchKind::Longer => "the current result is longer than the snapshot",
    };
    writeln!(output, "In line {} {}:", mismatch.line_number, headline).unwrap();
    writeln!(output, "expected: {}", quote_line(mismatch.expected.as_deref())).unwrap();
    writeln!(output, "current:  {}", quote_line(mismatch.actual.as_deref())).unwrap();
    if mismatch.truncated {
        writeln!(output, "Subsequent lines were not checked.").unwrap();
    }

    writeln!(output).unwrap();
    write!(output, "{}", UPDATE_HINT).unwrap();

    output
}

/// Render the report for `result`, or `None` when it is a match.
pub fn format_report(display_name: &str, path: &Path, result: &ComparisonResult) -> Option<String> {
    result
        .mismatch()
        .map(|mismatch| format_mismatch(display_name, path, mismatch))
}

fn quote_line(line: Option<&str>) -> String {
    match line {
        Some(line) => format!("{:?}", line),
        None => END_OF_CONTENT.to_string(),
    }
}
