//! Directory-based snapshot source.
//!
//! Reads the per-page CSV files the simulator (or real hardware bridge)
//! keeps up to date in a data directory.

use std::path::{Path, PathBuf};

use tracing::warn;

use super::snapshot::try_read_snapshot;
use super::{Snapshot, SnapshotSource};

/// File name of the pack-level snapshot.
pub const MAIN_SNAPSHOT: &str = "main_page.csv";

/// File name of a module snapshot (1-based module number).
pub fn module_snapshot_name(module: usize) -> String {
    format!("module_{}_data.csv", module)
}

/// Locations of the snapshot files inside a data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotDir {
    root: PathBuf,
}

impl SnapshotDir {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the pack-level snapshot.
    pub fn main_path(&self) -> PathBuf {
        self.root.join(MAIN_SNAPSHOT)
    }

    /// Path of a module snapshot.
    pub fn module_path(&self, module: usize) -> PathBuf {
        self.root.join(module_snapshot_name(module))
    }
}

/// A snapshot source that reads CSV files from a directory.
///
/// Every call reads the file again; nothing is cached between frames.
/// Missing or unreadable files yield an empty snapshot and the reason is
/// kept for the status bar.
#[derive(Debug)]
pub struct DirSource {
    dir: SnapshotDir,
    description: String,
    last_error: Option<String>,
}

impl DirSource {
    pub fn new(dir: SnapshotDir) -> Self {
        let description = format!("dir: {}", dir.root().display());
        Self {
            dir,
            description,
            last_error: None,
        }
    }

    pub fn dir(&self) -> &SnapshotDir {
        &self.dir
    }

    fn read(&mut self, path: &Path) -> Snapshot {
        match try_read_snapshot(path) {
            Ok(snapshot) => {
                self.last_error = None;
                snapshot
            }
            Err(e) => {
                let message = e.to_string();
                // Only log transitions, the frame loop polls many times a second
                if self.last_error.as_deref() != Some(message.as_str()) {
                    warn!(error = %e, "snapshot unavailable, showing defaults");
                }
                self.last_error = Some(message);
                Snapshot::new()
            }
        }
    }
}

impl SnapshotSource for DirSource {
    fn pack(&mut self) -> Snapshot {
        let path = self.dir.main_path();
        self.read(&path)
    }

    fn module(&mut self, module: usize) -> Snapshot {
        let path = self.dir.module_path(module);
        self.read(&path)
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::write_snapshot;
    use tempfile::TempDir;

    #[test]
    fn test_paths() {
        let dir = SnapshotDir::new("/data");
        assert_eq!(dir.main_path(), Path::new("/data/main_page.csv"));
        assert_eq!(dir.module_path(12), Path::new("/data/module_12_data.csv"));
    }

    #[test]
    fn test_dir_source_reads_pages() {
        let tmp = TempDir::new().unwrap();
        let dir = SnapshotDir::new(tmp.path());
        write_snapshot(&dir.main_path(), [("current", 5.5)]).unwrap();
        write_snapshot(&dir.module_path(3), [("Temp_1", 33.0)]).unwrap();

        let mut source = DirSource::new(dir);
        assert_eq!(source.pack().get("current"), Some(&5.5));
        assert_eq!(source.module(3).get("Temp_1"), Some(&33.0));
        assert!(source.error().is_none());
        assert!(source.description().starts_with("dir: "));
    }

    #[test]
    fn test_dir_source_missing_file() {
        let tmp = TempDir::new().unwrap();
        let mut source = DirSource::new(SnapshotDir::new(tmp.path()));

        assert!(source.module(7).is_empty());
        let err = source.error().unwrap();
        assert!(err.contains("module_7_data.csv"));
        assert!(err.contains("not found"));
    }

    #[test]
    fn test_dir_source_error_clears_on_success() {
        let tmp = TempDir::new().unwrap();
        let dir = SnapshotDir::new(tmp.path());
        let mut source = DirSource::new(dir.clone());

        assert!(source.pack().is_empty());
        assert!(source.error().is_some());

        write_snapshot(&dir.main_path(), [("soc", 50.0)]).unwrap();
        assert_eq!(source.pack().len(), 1);
        assert!(source.error().is_none());
    }
}
