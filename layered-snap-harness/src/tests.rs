use crate::{MemoryStore, SnapContext, SnapError, SnapOutcome, SnapshotStore, UpdateMode};
use layered_snap::MismatchKind;
use std::io;
use std::path::{Path, PathBuf};

const SNAPSHOT_DIR: &str = "tests/__snapshots__";

fn context(function_name: &str, update: UpdateMode, store: MemoryStore) -> SnapContext<MemoryStore> {
    SnapContext::with_store(
        "tests/test_dummy.rs",
        function_name,
        SNAPSHOT_DIR,
        update,
        store,
    )
}

fn snapshot_path(file_name: &str) -> PathBuf {
    Path::new(SNAPSHOT_DIR).join(file_name)
}

// ============================================================================
// Capture and compare
// ============================================================================

#[test]
fn test_first_run_captures() {
    let mut ctx = context("test_html_output", UpdateMode::Off, MemoryStore::new());

    let outcome = ctx.check(".html", "<p>hi</p>\n", None).unwrap();
    assert_eq!(
        outcome,
        SnapOutcome::Created {
            path: snapshot_path("test_dummy__test_html_output_0.html")
        }
    );
    assert!(outcome.is_success());

    let store = ctx.into_store();
    assert_eq!(
        store.get(&snapshot_path("test_dummy__test_html_output_0.html")),
        Some("<p>hi</p>\n")
    );
}

#[test]
fn test_capture_is_idempotent() {
    let mut first = context("test_stats", UpdateMode::Off, MemoryStore::new());
    assert!(first.snap(".txt", "mean 0.256\nmax 12.3456", Some(2)));
    let store = first.into_store();

    let mut second = context("test_stats", UpdateMode::Off, store);
    let outcome = second.check(".txt", "mean 0.256\nmax 12.3456", Some(2)).unwrap();
    assert!(matches!(outcome, SnapOutcome::Matched { .. }));
}

#[test]
fn test_capture_stores_rounded_content() {
    let mut ctx = context("test_timing", UpdateMode::Off, MemoryStore::new());
    ctx.snap(".txt", "took 0.256s", Some(2));

    let path = snapshot_path("test_dummy__test_timing_0.txt");
    assert_eq!(ctx.store().get(&path), Some("took 0.26s"));

    // Noise below the rounding precision still matches.
    let mut rerun = context("test_timing", UpdateMode::Off, ctx.into_store());
    assert!(rerun.snap(".txt", "took 0.2561s", Some(2)));
}

#[test]
fn test_protected_tokens_are_stored_verbatim() {
    let line = "v1.2.3 at 2024-01-05T10:00:00Z from 192.168.1.1 see http://x.io/3.14159";
    let mut ctx = context("test_protected", UpdateMode::Off, MemoryStore::new());
    ctx.snap(".txt", line, Some(2));

    let path = snapshot_path("test_dummy__test_protected_0.txt");
    assert_eq!(ctx.store().get(&path), Some(line));
}

#[test]
fn test_mismatch_is_reported() {
    let store = MemoryStore::new().with_file(
        snapshot_path("test_dummy__test_report_0.txt"),
        "a\nb\nc",
    );
    let mut ctx = context("test_report", UpdateMode::Off, store);

    let outcome = ctx.check(".txt", "a\nX\nc", None).unwrap();
    assert!(!outcome.is_success());

    match &outcome {
        SnapOutcome::Mismatch { mismatch, report, .. } => {
            assert_eq!(mismatch.line_number, 2);
            assert_eq!(mismatch.kind(), MismatchKind::Changed);
            assert!(report.contains("Snapshot mismatch for test_dummy__test_report_0.txt"));
            assert!(report.contains("expected: \"b\""));
            assert!(report.contains("current:  \"X\""));
            assert!(report.ends_with("To update this snapshot, run: SNAP_UPDATE=1 cargo test"));
        }
        other => panic!("expected a mismatch, got {:?}", other),
    }
    assert!(outcome.report().unwrap().contains("In line 2"));

    // The stored snapshot is left alone.
    assert_eq!(
        ctx.store().get(&snapshot_path("test_dummy__test_report_0.txt")),
        Some("a\nb\nc")
    );
}

#[test]
fn test_length_mismatch_is_reported() {
    let store = MemoryStore::new().with_file(
        snapshot_path("test_dummy__test_lengths_0.txt"),
        "a\nb",
    );
    let mut ctx = context("test_lengths", UpdateMode::Off, store);

    let outcome = ctx.check(".txt", "a\nb\nc", None).unwrap();
    let report = outcome.report().unwrap();
    assert!(report.contains("In line 3 the current result is longer than the snapshot:"));
    assert!(report.contains("expected: <end of content>"));
}

#[test]
fn test_shorter_report() {
    let store = MemoryStore::new().with_file(
        snapshot_path("test_dummy__test_short_0.txt"),
        "a\nb\nc\n",
    );
    let mut ctx = context("test_short", UpdateMode::Off, store);

    let outcome = ctx.check(".txt", "a\n", None).unwrap();
    insta::assert_snapshot!(outcome.report().unwrap(), @r###"
    Snapshot mismatch for test_dummy__test_short_0.txt
    Snapshot file: tests/__snapshots__/test_dummy__test_short_0.txt

    In line 2 the current result is shorter than the snapshot:
    expected: "b"
    current:  <end of content>
    Subsequent lines were not checked.

    To update this snapshot, run: SNAP_UPDATE=1 cargo test
    "###);
}

#[test]
#[should_panic(expected = "there is a mismatch between the snapshot and the current result")]
fn test_snap_panics_on_mismatch() {
    let store = MemoryStore::new().with_file(
        snapshot_path("test_dummy__test_panics_0.txt"),
        "old",
    );
    let mut ctx = context("test_panics", UpdateMode::Off, store);
    ctx.snap(".txt", "new", None);
}

// ============================================================================
// Update mode
// ============================================================================

#[test]
fn test_update_mode_overwrites() {
    let path = snapshot_path("test_dummy__test_update_0.txt");
    let store = MemoryStore::new().with_file(&path, "old");
    let mut ctx = context("test_update", UpdateMode::On, store);

    let outcome = ctx.check(".txt", "new 1.23456", Some(3)).unwrap();
    assert_eq!(
        outcome,
        SnapOutcome::Updated {
            path: path.clone(),
            changed: true
        }
    );
    assert_eq!(ctx.store().get(&path), Some("new 1.23"));

    // With update mode off the new content now matches.
    let mut rerun = context("test_update", UpdateMode::Off, ctx.into_store());
    assert!(rerun.snap(".txt", "new 1.23456", Some(3)));
}

#[test]
fn test_update_mode_unchanged() {
    let path = snapshot_path("test_dummy__test_same_0.txt");
    let store = MemoryStore::new().with_file(&path, "same");
    let mut ctx = context("test_same", UpdateMode::On, store);

    let outcome = ctx.check(".txt", "same", None).unwrap();
    assert_eq!(outcome, SnapOutcome::Updated { path, changed: false });
}

#[test]
fn test_update_mode_captures_missing() {
    let mut ctx = context("test_fresh", UpdateMode::On, MemoryStore::new());
    let outcome = ctx.check(".txt", "fresh", None).unwrap();
    assert!(matches!(outcome, SnapOutcome::Created { .. }));
}

// ============================================================================
// Naming
// ============================================================================

#[test]
fn test_call_index_stability() {
    let mut ctx = context("test_dummy", UpdateMode::Off, MemoryStore::new());
    assert_eq!(ctx.call_index(), 0);

    ctx.snap(".txt", "first", None);
    ctx.snap(".json", "{}", None);
    assert_eq!(ctx.call_index(), 2);

    assert_eq!(
        ctx.store().file_names(),
        vec!["test_dummy__test_dummy_0.txt", "test_dummy__test_dummy_1.json"]
    );
}

#[test]
fn test_call_index_advances_on_mismatch() {
    let store = MemoryStore::new().with_file(
        snapshot_path("test_dummy__test_counts_0.txt"),
        "expected",
    );
    let mut ctx = context("test_counts", UpdateMode::Off, store);

    let first = ctx.check(".txt", "different", None).unwrap();
    assert!(!first.is_success());

    let second = ctx.check(".txt", "anything", None).unwrap();
    assert_eq!(
        second.path(),
        snapshot_path("test_dummy__test_counts_1.txt").as_path()
    );
}

#[test]
fn test_two_tests_in_one_file() {
    let mut first = context("test_alpha", UpdateMode::Off, MemoryStore::new());
    first.snap(".txt", "alpha", None);

    let mut second = context("test_beta", UpdateMode::Off, first.into_store());
    second.snap(".txt", "beta", None);

    assert_eq!(
        second.store().file_names(),
        vec!["test_dummy__test_alpha_0.txt", "test_dummy__test_beta_0.txt"]
    );
}

#[test]
fn test_same_test_name_in_two_files() {
    let mut ctx = SnapContext::with_store(
        "tests/render.rs",
        "test_output",
        SNAPSHOT_DIR,
        UpdateMode::Off,
        MemoryStore::new(),
    );
    ctx.snap(".txt", "render", None);

    let mut other = SnapContext::with_store(
        "tests/parse.rs",
        "test_output",
        SNAPSHOT_DIR,
        UpdateMode::Off,
        ctx.into_store(),
    );
    other.snap(".txt", "parse", None);

    assert_eq!(
        other.store().file_names(),
        vec!["parse__test_output_0.txt", "render__test_output_0.txt"]
    );
}

#[test]
fn test_invalid_extension() {
    let mut ctx = context("test_ext", UpdateMode::Off, MemoryStore::new());
    let err = ctx.check("txt", "content", None).unwrap_err();
    assert!(matches!(err, SnapError::InvalidIdentity { .. }));
    assert_eq!(ctx.call_index(), 1);
    assert!(ctx.store().is_empty());
}

// ============================================================================
// Storage failures
// ============================================================================

/// A store whose reads and writes always fail.
struct BrokenStore {
    exists: bool,
}

impl SnapshotStore for BrokenStore {
    fn exists(&self, _path: &Path) -> bool {
        self.exists
    }

    fn read(&self, _path: &Path) -> io::Result<String> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "read denied"))
    }

    fn write(&mut self, _path: &Path, _contents: &str) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "write denied"))
    }
}

fn broken_context(exists: bool, update: UpdateMode) -> SnapContext<BrokenStore> {
    SnapContext::with_store(
        "tests/test_dummy.rs",
        "test_broken",
        SNAPSHOT_DIR,
        update,
        BrokenStore { exists },
    )
}

#[test]
fn test_capture_error_propagates() {
    let err = broken_context(false, UpdateMode::Off)
        .check(".txt", "content", None)
        .unwrap_err();

    match err {
        SnapError::CaptureIo { path, source } => {
            assert_eq!(path, snapshot_path("test_dummy__test_broken_0.txt"));
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
        other => panic!("expected a capture error, got {:?}", other),
    }
}

#[test]
fn test_read_error_propagates() {
    let err = broken_context(true, UpdateMode::Off)
        .check(".txt", "content", None)
        .unwrap_err();
    assert!(matches!(err, SnapError::ReadIo { .. }));
    assert!(err.to_string().contains("read denied"));
}

#[test]
#[should_panic(expected = "failed to read snapshot")]
fn test_snap_panics_on_error() {
    broken_context(true, UpdateMode::Off).snap(".txt", "content", None);
}

/// A store that holds files it cannot read back.
#[derive(Default)]
struct UnreadableStore {
    inner: MemoryStore,
}

impl SnapshotStore for UnreadableStore {
    fn exists(&self, _path: &Path) -> bool {
        true
    }

    fn read(&self, _path: &Path) -> io::Result<String> {
        Err(io::Error::new(io::ErrorKind::InvalidData, "stream did not contain valid UTF-8"))
    }

    fn write(&mut self, path: &Path, contents: &str) -> io::Result<()> {
        self.inner.write(path, contents)
    }
}

#[test]
fn test_update_mode_replaces_unreadable_snapshot() {
    let mut ctx = SnapContext::with_store(
        "tests/test_dummy.rs",
        "test_corrupt",
        SNAPSHOT_DIR,
        UpdateMode::On,
        UnreadableStore::default(),
    );

    let path = snapshot_path("test_dummy__test_corrupt_0.txt");
    let outcome = ctx.check(".txt", "fresh 2.71828", Some(2)).unwrap();
    assert_eq!(
        outcome,
        SnapOutcome::Updated {
            path: path.clone(),
            changed: true
        }
    );
    assert_eq!(ctx.store().inner.get(&path), Some("fresh 2.7"));
}

#[test]
fn test_unreadable_snapshot_still_fails_without_update() {
    let mut ctx = SnapContext::with_store(
        "tests/test_dummy.rs",
        "test_corrupt",
        SNAPSHOT_DIR,
        UpdateMode::Off,
        UnreadableStore::default(),
    );

    let err = ctx.check(".txt", "fresh", None).unwrap_err();
    assert!(matches!(err, SnapError::ReadIo { .. }));
    assert!(ctx.store().inner.is_empty());
}
