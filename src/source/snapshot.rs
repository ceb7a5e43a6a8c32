//! Snapshot CSV format.
//!
//! Each page's telemetry lives in a two-column CSV file with a
//! `Name,Data` header and one `name,value` row per metric. Writers
//! replace the whole file; readers take whatever numeric rows they find.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::TelemetryError;

/// A complete name→value mapping for one page.
pub type Snapshot = BTreeMap<String, f64>;

/// Header row written at the top of every snapshot file.
pub const HEADER: [&str; 2] = ["Name", "Data"];

/// Parse snapshot CSV content.
///
/// Rows without a name, rows that are not valid UTF-8, and rows whose
/// value is not a finite number are dropped. Only I/O failures are errors.
pub fn parse_snapshot<R: io::Read>(reader: R) -> Result<Snapshot, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut snapshot = Snapshot::new();
    for record in reader.byte_records() {
        let record = match csv::StringRecord::from_byte_record(record?) {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "dropping snapshot row that is not valid UTF-8");
                continue;
            }
        };
        let Some(name) = record.get(0).filter(|n| !n.is_empty()) else {
            continue;
        };
        match record.get(1).map(str::parse::<f64>) {
            Some(Ok(value)) if value.is_finite() => {
                snapshot.insert(name.to_string(), value);
            }
            _ => debug!(name, "dropping non-numeric snapshot row"),
        }
    }
    Ok(snapshot)
}

/// Read a snapshot file, reporting why it could not be read.
pub fn try_read_snapshot(path: &Path) -> Result<Snapshot, TelemetryError> {
    let file = fs::File::open(path).map_err(|e| TelemetryError::io(path, e))?;
    parse_snapshot(file).map_err(|e| TelemetryError::csv(path, e))
}

/// Read a snapshot file, degrading to an empty snapshot on any error.
pub fn read_snapshot(path: &Path) -> Snapshot {
    match try_read_snapshot(path) {
        Ok(snapshot) => snapshot,
        Err(e) if e.is_missing() => {
            debug!(path = %path.display(), "snapshot file not found");
            Snapshot::new()
        }
        Err(e) => {
            warn!(error = %e, "unreadable snapshot, using empty data");
            Snapshot::new()
        }
    }
}

/// Replace a snapshot file with the given entries, in iteration order.
///
/// The content goes to a temporary file in the same directory which is
/// then renamed over the target, so readers never see a half-written file
/// where rename is atomic.
pub fn write_snapshot<I, K>(path: &Path, entries: I) -> Result<(), TelemetryError>
where
    I: IntoIterator<Item = (K, f64)>,
    K: AsRef<str>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| TelemetryError::io(path, e))?;
    {
        let mut writer = csv::Writer::from_writer(tmp.as_file_mut());
        writer.write_record(HEADER).map_err(|e| TelemetryError::csv(path, e))?;
        for (name, value) in entries {
            let value = value.to_string();
            writer
                .write_record([name.as_ref(), value.as_str()])
                .map_err(|e| TelemetryError::csv(path, e))?;
        }
        writer.flush().map_err(|e| TelemetryError::io(path, e))?;
    }
    tmp.persist(path).map_err(|e| TelemetryError::io(path, e.error))?;
    Ok(())
}
