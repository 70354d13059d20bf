#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! File-backed snapshot assertions built on `layered-snap`.
//!
//! A test creates a [`SnapContext`] with [`snap_context!`] and calls
//! [`SnapContext::snap`] once per output it wants to pin down. The first run
//! stores the output (with plain floats rounded to the requested number of
//! significant digits); later runs compare against it line by line and fail
//! with a report on the first differing line. Set `SNAP_UPDATE=1` to
//! overwrite stored snapshots instead.
//!
//! ## Modules
//!
//! - [`context`] - Per-test context: call counter, capture, compare, update
//! - [`identity`] - Snapshot naming
//! - [`storage`] - Filesystem and in-memory snapshot stores
//! - [`config`] - `snap.toml` and update mode
//! - [`errors`] - Error types

pub mod config;
pub mod context;
pub mod errors;
pub mod identity;
mod macros;
pub mod storage;

pub use config::{SnapConfig, UpdateMode, UPDATE_ENV_VAR};
pub use context::{SnapContext, SnapOutcome};
pub use errors::{SnapError, SnapResult};
pub use identity::{resolve_source_dir, test_name_from_type_name, SnapshotIdentity};
pub use storage::{FsStore, MemoryStore, SnapshotStore};

#[cfg(test)]
mod tests;
