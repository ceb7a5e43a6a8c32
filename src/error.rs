//! Error types for telemetry file access.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while reading or writing telemetry CSV files.
///
/// None of these are fatal to the dashboard or the simulator: callers
/// degrade to empty data and surface the message as a diagnostic.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The file does not exist.
    #[error("{} not found", path.display())]
    Missing { path: PathBuf },

    /// Any other I/O failure (permissions, full disk, failed rename).
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file could not be parsed as CSV.
    #[error("Parse error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl TelemetryError {
    /// Classify an I/O error, splitting out the not-found case.
    pub fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            TelemetryError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            TelemetryError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn csv(path: &Path, source: csv::Error) -> Self {
        TelemetryError::Csv {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns true if the error means the file simply isn't there yet.
    pub fn is_missing(&self) -> bool {
        matches!(self, TelemetryError::Missing { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_missing() {
        let err = TelemetryError::io(
            Path::new("main_page.csv"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.is_missing());
        assert_eq!(err.to_string(), "main_page.csv not found");
    }

    #[test]
    fn test_other_io_errors_keep_source() {
        let err = TelemetryError::io(
            Path::new("module_1_data.csv"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_missing());
        assert!(err.to_string().contains("denied"));
    }
}
