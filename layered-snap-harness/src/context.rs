//! Per-test snapshot context: naming, capture, comparison and update.

use crate::config::{SnapConfig, UpdateMode};
use crate::errors::{SnapError, SnapResult};
use crate::identity::{resolve_source_dir, SnapshotIdentity};
use crate::storage::{FsStore, SnapshotStore};
use layered_snap::{compare, format_mismatch, round_floats, ComparisonResult, Mismatch};
use std::path::{Path, PathBuf};

/// Result of one snapshot assertion that reached storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapOutcome {
    /// No snapshot existed; the current output was stored.
    Created { path: PathBuf },
    /// The stored snapshot matches the current output.
    Matched { path: PathBuf },
    /// Update mode overwrote the stored snapshot. `changed` is false when
    /// the stored text already matched.
    Updated { path: PathBuf, changed: bool },
    /// The stored snapshot differs; `report` is the rendered diagnostic.
    Mismatch {
        path: PathBuf,
        mismatch: Mismatch,
        report: String,
    },
}

impl SnapOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, SnapOutcome::Mismatch { .. })
    }

    pub fn path(&self) -> &Path {
        match self {
            SnapOutcome::Created { path }
            | SnapOutcome::Matched { path }
            | SnapOutcome::Updated { path, .. }
            | SnapOutcome::Mismatch { path, .. } => path,
        }
    }

    /// The mismatch report, if this outcome is a failure.
    pub fn report(&self) -> Option<&str> {
        match self {
            SnapOutcome::Mismatch { report, .. } => Some(report),
            _ => None,
        }
    }
}

/// Snapshot state for one test invocation.
///
/// Create one per test function, usually with [`snap_context!`]. The
/// context owns the call counter, so every assertion in the test gets the
/// next index (0, 1, 2, ...) no matter what other tests run concurrently.
///
/// [`snap_context!`]: crate::snap_context
#[derive(Debug)]
pub struct SnapContext<S = FsStore> {
    test_file: String,
    test_function_name: String,
    snapshot_dir: PathBuf,
    update: UpdateMode,
    store: S,
    call_index: usize,
}

impl SnapContext<FsStore> {
    /// Context for a test in the crate rooted at `manifest_dir`, with
    /// snapshots next to the test source file and `snap.toml` applied.
    pub fn for_test(
        manifest_dir: &str,
        test_file: &str,
        test_function_name: &str,
    ) -> SnapResult<Self> {
        let manifest_dir = Path::new(manifest_dir);
        let config = SnapConfig::for_manifest_dir(manifest_dir)?;
        let source_dir = resolve_source_dir(manifest_dir, test_file);

        Ok(Self::with_store(
            test_file,
            test_function_name,
            source_dir.join(&config.snapshot_dir),
            config.update,
            FsStore::new(),
        ))
    }
}

impl<S: SnapshotStore> SnapContext<S> {
    pub fn with_store(
        test_file: &str,
        test_function_name: &str,
        snapshot_dir: impl Into<PathBuf>,
        update: UpdateMode,
        store: S,
    ) -> Self {
        SnapContext {
            test_file: test_file.to_string(),
            test_function_name: test_function_name.to_string(),
            snapshot_dir: snapshot_dir.into(),
            update,
            store,
            call_index: 0,
        }
    }

    pub fn test_function_name(&self) -> &str {
        &self.test_function_name
    }

    pub fn snapshot_dir(&self) -> &Path {
        &self.snapshot_dir
    }

    pub fn update_mode(&self) -> UpdateMode {
        self.update
    }

    /// Index the next assertion will use.
    pub fn call_index(&self) -> usize {
        self.call_index
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Claim the next call index and derive the snapshot identity for it.
    ///
    /// The counter advances even when the identity is invalid.
    pub fn next_identity(&mut self, extension: &str) -> SnapResult<SnapshotIdentity> {
        let call_index = self.call_index;
        self.call_index += 1;
        SnapshotIdentity::new(
            &self.test_file,
            &self.test_function_name,
            call_index,
            extension,
        )
    }

    /// Capture, compare or update the snapshot for `content`.
    ///
    /// Plain floats in `content` are rounded to `digits` significant digits
    /// before anything is stored or compared. A mismatch is a regular
    /// outcome; only storage failures are errors. In update mode the stored
    /// snapshot is overwritten without having to be readable.
    pub fn check(
        &mut self,
        extension: &str,
        content: &str,
        digits: Option<u32>,
    ) -> SnapResult<SnapOutcome> {
        let identity = self.next_identity(extension)?;
        let path = self.snapshot_dir.join(identity.file_name());
        let content = round_floats(content, digits);

        if !self.store.exists(&path) {
            log::debug!("capturing new snapshot {}", path.display());
            self.write(&path, &content)?;
            return Ok(SnapOutcome::Created { path });
        }

        if self.update.is_on() {
            // An unreadable snapshot is replaced too.
            let changed = match self.store.read(&path) {
                Ok(expected) => expected != content,
                Err(err) => {
                    log::warn!("replacing unreadable snapshot {}: {}", path.display(), err);
                    true
                }
            };
            if changed {
                log::warn!("updating snapshot {}", path.display());
            } else {
                log::debug!("rewriting unchanged snapshot {}", path.display());
            }
            self.write(&path, &content)?;
            return Ok(SnapOutcome::Updated { path, changed });
        }

        let expected = self.store.read(&path).map_err(|source| SnapError::ReadIo {
            path: path.clone(),
            source,
        })?;

        match compare(&expected, &content) {
            ComparisonResult::Match => {
                log::debug!("snapshot {} matches", path.display());
                Ok(SnapOutcome::Matched { path })
            }
            ComparisonResult::Mismatch(mismatch) => {
                log::debug!(
                    "snapshot {} differs at line {}",
                    path.display(),
                    mismatch.line_number
                );
                let report = format_mismatch(&identity.file_name(), &path, &mismatch);
                Ok(SnapOutcome::Mismatch {
                    path,
                    mismatch,
                    report,
                })
            }
        }
    }

    /// Assert on a snapshot the way a test expects: `true` on success.
    ///
    /// Panics with the mismatch report when the snapshot differs, and with
    /// the error when storage fails.
    pub fn snap(&mut self, extension: &str, content: &str, digits: Option<u32>) -> bool {
        match self.check(extension, content, digits) {
            Ok(SnapOutcome::Mismatch { report, .. }) => panic!("{}", report),
            Ok(_) => true,
            Err(err) => panic!("{}", err),
        }
    }

    fn write(&mut self, path: &Path, content: &str) -> SnapResult<()> {
        self.store
            .write(path, content)
            .map_err(|source| SnapError::CaptureIo {
                path: path.to_path_buf(),
                source,
            })
    }
}
