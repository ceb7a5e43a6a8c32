//! Snapshot sources for the dashboard.
//!
//! The dashboard and the simulator share no memory: the simulator writes
//! one CSV snapshot per page and the dashboard re-reads the active page's
//! file every frame. This module holds the file format ([`snapshot`]) and
//! a trait-based abstraction over where snapshots come from.

mod file;
mod snapshot;

pub use file::{module_snapshot_name, DirSource, SnapshotDir, MAIN_SNAPSHOT};
pub use snapshot::{
    parse_snapshot, read_snapshot, try_read_snapshot, write_snapshot, Snapshot, HEADER,
};

use std::fmt::Debug;

/// Trait for reading the current telemetry of each page.
///
/// Implementations must not block for long and must never fail: an
/// unavailable page yields an empty snapshot, with the reason exposed via
/// [`SnapshotSource::error`].
///
/// # Example
///
/// ```
/// use battery_dash::{DirSource, SnapshotDir, SnapshotSource};
///
/// let mut source = DirSource::new(SnapshotDir::new("/nonexistent"));
/// let pack = source.pack();
/// assert!(pack.is_empty());
/// assert!(source.error().is_some());
/// ```
pub trait SnapshotSource: Send + Debug {
    /// Read the pack-level snapshot.
    fn pack(&mut self) -> Snapshot;

    /// Read a module snapshot (1-based module number).
    fn module(&mut self, module: usize) -> Snapshot;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// The reason the last read came back empty, if it failed.
    fn error(&self) -> Option<&str>;
}
