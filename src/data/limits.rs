//! Limits table: per-metric severity thresholds loaded from CSV.
//!
//! The file has one header row followed by rows of
//! `metric_name,upper_red,upper_orange,lower_red,lower_orange`.
//! Trailing blank fields are ignored.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use super::severity::{classify, MetricLimits, Severity};
use crate::error::TelemetryError;

/// Metric names the dashboard looks up in the limits table.
pub mod metric {
    pub const CURRENT: &str = "Current";
    pub const TOTAL_VOLTAGE: &str = "Total_Voltage";
    pub const MODULE_SOC: &str = "Module_SOC";
    pub const CELL_VOLTAGE: &str = "Cell_Voltage";
    pub const CELL_TEMP: &str = "Cell_Temp";
}

/// Severity thresholds keyed by metric name.
///
/// Read-only after load. Each metric keeps every numeric field found for
/// it, in file order; only the first four are used for classification.
#[derive(Debug, Clone, Default)]
pub struct LimitsTable {
    entries: BTreeMap<String, Vec<f64>>,
}

impl LimitsTable {
    /// Create an empty table. Every metric classifies as `Normal`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table from a CSV file.
    pub fn try_load(path: &Path) -> Result<Self, TelemetryError> {
        let file = fs::File::open(path).map_err(|e| TelemetryError::io(path, e))?;
        Self::parse(file).map_err(|e| TelemetryError::csv(path, e))
    }

    /// Load the table, falling back to an empty one on any error.
    ///
    /// The failure is logged; the dashboard then renders every metric in
    /// the neutral color.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(table) => {
                debug!(path = %path.display(), metrics = table.len(), "loaded limits table");
                table
            }
            Err(e) => {
                warn!(error = %e, "limits table unavailable, rendering without thresholds");
                Self::new()
            }
        }
    }

    /// Parse limits CSV content.
    ///
    /// Rows that are not valid UTF-8, or whose threshold fields are not
    /// finite numbers, are skipped with a warning. Repeated metric names
    /// append to the existing entry.
    pub fn parse<R: io::Read>(reader: R) -> Result<Self, csv::Error> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut table = Self::new();
        for record in reader.byte_records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let record = match csv::StringRecord::from_byte_record(record) {
                Ok(record) => record,
                Err(e) => {
                    warn!(line, error = %e, "skipping limits row that is not valid UTF-8");
                    continue;
                }
            };
            let Some(name) = record.get(0).filter(|n| !n.is_empty()) else {
                continue;
            };

            let fields: Result<Vec<f64>, String> = record
                .iter()
                .skip(1)
                .filter(|field| !field.is_empty())
                .map(|field| match field.parse::<f64>() {
                    Ok(value) if value.is_finite() => Ok(value),
                    _ => Err(format!("{:?} is not a finite number", field)),
                })
                .collect();

            match fields {
                Ok(values) => table.entries.entry(name.to_string()).or_default().extend(values),
                Err(e) => {
                    warn!(metric = name, line, error = %e, "skipping limits row with non-numeric threshold");
                }
            }
        }

        for (name, limits) in table.iter() {
            if !limits.is_well_ordered() {
                warn!(
                    metric = name,
                    ?limits,
                    "limits are not ordered upper_red >= upper_orange >= lower_orange >= lower_red"
                );
            }
        }

        Ok(table)
    }

    /// Set the limits for a metric, replacing any existing entry.
    pub fn insert(&mut self, metric: &str, limits: MetricLimits) {
        self.entries.insert(
            metric.to_string(),
            vec![limits.upper_red, limits.upper_orange, limits.lower_red, limits.lower_orange],
        );
    }

    /// Raw numeric fields recorded for a metric.
    pub fn fields(&self, metric: &str) -> Option<&[f64]> {
        self.entries.get(metric).map(Vec::as_slice)
    }

    /// Limits for a metric, or `None` if it is absent or has fewer than
    /// four thresholds.
    pub fn get(&self, metric: &str) -> Option<MetricLimits> {
        self.fields(metric).and_then(MetricLimits::from_fields)
    }

    /// Classify a value against a metric's limits.
    pub fn classify(&self, metric: &str, value: f64) -> Severity {
        classify(value, self.get(metric).as_ref())
    }

    /// Iterate over every metric with usable limits.
    pub fn iter(&self) -> impl Iterator<Item = (&str, MetricLimits)> {
        self.entries
            .iter()
            .filter_map(|(name, fields)| Some((name.as_str(), MetricLimits::from_fields(fields)?)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_csv() -> &'static str {
        "Metric,Upper_Red_Limit,Upper_Orange_Limit,Lower_Red_Limit,Lower_Orange_Limit\n\
         Current,200,150,-200,-150\n\
         Total_Voltage,400,390,300,310,\n\
         Module_SOC,100,95,5,10,,\n\
         Cell_Voltage,4.2,4.15,3.0,3.2\n\
         Cell_Temp,60,45,0,10\n"
    }

    #[test]
    fn test_parse_rows() {
        let table = LimitsTable::parse(sample_csv().as_bytes()).unwrap();
        assert_eq!(table.len(), 5);
        assert_eq!(
            table.get(metric::CURRENT),
            Some(MetricLimits::new(200.0, 150.0, -200.0, -150.0))
        );
        assert_eq!(table.fields(metric::MODULE_SOC), Some(&[100.0, 95.0, 5.0, 10.0][..]));
        assert_eq!(table.get(metric::CELL_VOLTAGE).unwrap().upper_orange, 4.15);
    }

    #[test]
    fn test_current_warning_scenario() {
        let table = LimitsTable::parse("Metric,a,b,c,d\nCurrent,200,150,-200,-150\n".as_bytes())
            .unwrap();
        assert_eq!(table.classify(metric::CURRENT, 160.0), Severity::Warning);
        assert_eq!(table.classify(metric::CURRENT, 201.0), Severity::Critical);
        assert_eq!(table.classify(metric::CURRENT, 10.0), Severity::Normal);
    }

    #[test]
    fn test_missing_metric_is_normal() {
        let table = LimitsTable::parse(sample_csv().as_bytes()).unwrap();
        assert!(table.get("Pack_Voltage").is_none());
        assert_eq!(table.classify("Pack_Voltage", 1_000.0), Severity::Normal);
    }

    #[test]
    fn test_short_row_has_no_limits() {
        let table = LimitsTable::parse("Metric,a,b,c,d\nCell_Temp,60,45\n".as_bytes()).unwrap();
        assert_eq!(table.fields(metric::CELL_TEMP), Some(&[60.0, 45.0][..]));
        assert!(table.get(metric::CELL_TEMP).is_none());
        assert_eq!(table.classify(metric::CELL_TEMP, 99.0), Severity::Normal);
    }

    #[test]
    fn test_non_numeric_row_is_skipped() {
        let csv = "Metric,a,b,c,d\nCurrent,high,150,-200,-150\nCell_Temp,60,45,0,10\n";
        let table = LimitsTable::parse(csv.as_bytes()).unwrap();
        assert!(table.fields(metric::CURRENT).is_none());
        assert!(table.get(metric::CELL_TEMP).is_some());
    }

    #[test]
    fn test_duplicate_rows_append() {
        let csv = "Metric,a,b,c,d\nCurrent,200,150\nCurrent,-200,-150\n";
        let table = LimitsTable::parse(csv.as_bytes()).unwrap();
        assert_eq!(
            table.get(metric::CURRENT),
            Some(MetricLimits::new(200.0, 150.0, -200.0, -150.0))
        );
    }

    #[test]
    fn test_blank_lines_ignored() {
        let csv = "Metric,a,b,c,d\n\nCurrent,200,150,-200,-150\n\n";
        let table = LimitsTable::parse(csv.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_try_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", sample_csv()).unwrap();
        file.flush().unwrap();

        let table = LimitsTable::try_load(file.path()).unwrap();
        assert!(table.get(metric::TOTAL_VOLTAGE).is_some());
    }

    #[test]
    fn test_missing_file() {
        let path = Path::new("/nonexistent/battery_limits.csv");
        let err = LimitsTable::try_load(path).unwrap_err();
        assert!(err.is_missing());

        let table = LimitsTable::load_or_empty(path);
        assert!(table.is_empty());
        assert_eq!(table.classify(metric::CURRENT, 500.0), Severity::Normal);
    }

    #[test]
    fn test_parse_skips_invalid_utf8_row() {
        let mut csv = b"Metric,a,b,c,d\nCurrent,200,150,-200,-150\n".to_vec();
        csv.extend_from_slice(b"Cell_Temp,\xff\xfe,1,2,3\nCell_Voltage,4.2,4.15,3.0,3.2\n");

        let table = LimitsTable::parse(csv.as_slice()).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.fields(metric::CELL_TEMP).is_none());
        assert!(table.get(metric::CURRENT).is_some());
        assert!(table.get(metric::CELL_VOLTAGE).is_some());
    }

    #[test]
    fn test_non_finite_threshold_skips_row() {
        let csv = "Metric,a,b,c,d\nCurrent,NaN,150,-200,-150\nCell_Temp,inf,45,0,10\n";
        let table = LimitsTable::parse(csv.as_bytes()).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_load_or_empty_keeps_good_rows_of_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Metric,a,b,c,d\nCurrent,200,150,-200,-150\n").unwrap();
        file.write_all(b"\xff\xff,\x80\nModule_SOC,x,95,5,10\n").unwrap();
        file.flush().unwrap();

        let table = LimitsTable::load_or_empty(file.path());
        assert_eq!(table.len(), 1);
        assert_eq!(table.classify(metric::CURRENT, 160.0), Severity::Warning);
    }

    #[test]
    fn test_insert_overrides() {
        let mut table = LimitsTable::new();
        table.insert(metric::MODULE_SOC, MetricLimits::new(100.0, 95.0, 5.0, 10.0));
        assert_eq!(table.classify(metric::MODULE_SOC, 7.0), Severity::Warning);
        assert_eq!(table.iter().count(), 1);
    }
}
