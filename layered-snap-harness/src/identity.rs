//! Snapshot naming.
//!
//! A snapshot is named after the test that produced it:
//! `{test_file_stem}__{test_function_name}_{call_index}{extension}`, for
//! example `render__test_html_output_0.html`.

use crate::errors::{SnapError, SnapResult};
use std::fmt;
use std::path::{Path, PathBuf};

/// Key of one snapshot artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotIdentity {
    pub test_file_stem: String,
    pub test_function_name: String,
    /// Zero-based position of the assertion within its test invocation.
    pub call_index: usize,
    /// Includes the leading `.`, e.g. `.json`.
    pub extension: String,
}

impl SnapshotIdentity {
    /// Build an identity from a test source path (as given by `file!()`),
    /// the test function name, a call index and an extension.
    pub fn new(
        test_file: &str,
        test_function_name: &str,
        call_index: usize,
        extension: &str,
    ) -> SnapResult<Self> {
        let test_file_stem = Path::new(test_file)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("");
        if test_file_stem.is_empty() {
            return Err(invalid(format!("no file stem in {:?}", test_file)));
        }
        if test_function_name.is_empty() {
            return Err(invalid("test function name is empty"));
        }
        if test_function_name.contains(is_separator) {
            return Err(invalid(format!(
                "test function name {:?} contains a path separator",
                test_function_name
            )));
        }
        if !extension.starts_with('.') || extension.len() < 2 || extension.contains(is_separator) {
            return Err(invalid(format!(
                "extension {:?} must start with '.' and name a file type",
                extension
            )));
        }

        Ok(SnapshotIdentity {
            test_file_stem: test_file_stem.to_string(),
            test_function_name: test_function_name.to_string(),
            call_index,
            extension: extension.to_string(),
        })
    }

    /// `{test_file_stem}__{test_function_name}`, shared by every snapshot of
    /// one test.
    pub fn test_key(&self) -> String {
        format!("{}__{}", self.test_file_stem, self.test_function_name)
    }

    pub fn file_name(&self) -> String {
        format!("{}_{}{}", self.test_key(), self.call_index, self.extension)
    }
}

impl fmt::Display for SnapshotIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

fn invalid(message: impl Into<String>) -> SnapError {
    SnapError::InvalidIdentity {
        message: message.into(),
    }
}

/// Extract the test function name from the type name of a function item
/// declared inside it (`my_crate::tests::test_render::f` → `test_render`).
///
/// Closure segments, as produced inside async tests, are skipped.
pub fn test_name_from_type_name(type_name: &str) -> &str {
    let mut name = type_name.strip_suffix("::f").unwrap_or(type_name);
    while let Some(stripped) = name.strip_suffix("::{{closure}}") {
        name = stripped;
    }
    name.rsplit("::").next().unwrap_or(name)
}

/// Directory containing the test source file.
///
/// `file!()` is relative to the workspace root while tests run from the
/// crate root, so each ancestor of `manifest_dir` is tried in turn. Falls
/// back to `manifest_dir` when the file cannot be found.
pub fn resolve_source_dir(manifest_dir: &Path, source_file: &str) -> PathBuf {
    let source = Path::new(source_file);
    let found = if source.is_absolute() {
        Some(source.to_path_buf())
    } else {
        manifest_dir
            .ancestors()
            .map(|base| base.join(source))
            .find(|candidate| candidate.is_file())
    };

    found
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest_dir.to_path_buf())
}
