//! Page view models: snapshot values paired with labels, units and severity.
//!
//! Built fresh from a snapshot on every frame. Missing keys read as `0.0`
//! so an absent or empty snapshot renders as zeros instead of failing.

use serde::Serialize;

use super::limits::{metric, LimitsTable};
use super::severity::Severity;
use super::telemetry::{
    cell_voltage_key, module_keys, pack_keys, temp_key, ModuleStatus, CELLS_PER_MODULE,
    TEMPS_PER_MODULE,
};
use crate::source::Snapshot;

/// One labeled value on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    pub label: String,
    pub key: String,
    pub value: f64,
    pub unit: &'static str,
    #[serde(skip)]
    pub precision: usize,
    /// `None` for metrics rendered in the neutral color.
    pub severity: Option<Severity>,
}

impl MetricRow {
    fn read(
        snapshot: &Snapshot,
        label: impl Into<String>,
        key: impl Into<String>,
        unit: &'static str,
        precision: usize,
        classify_as: Option<(&str, &LimitsTable)>,
    ) -> Self {
        let key = key.into();
        let value = snapshot.get(&key).copied().unwrap_or(0.0);
        let severity = classify_as.map(|(metric, limits)| limits.classify(metric, value));
        Self {
            label: label.into(),
            key,
            value,
            unit,
            precision,
            severity,
        }
    }

    /// Value with its unit, e.g. `"3.71V"`.
    pub fn formatted(&self) -> String {
        format!("{:.*}{}", self.precision, self.value, self.unit)
    }
}

/// Counts of classified rows by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityTally {
    pub normal: usize,
    pub warning: usize,
    pub critical: usize,
}

impl SeverityTally {
    fn from_rows<'a>(rows: impl Iterator<Item = &'a MetricRow>) -> Self {
        let mut tally = Self::default();
        for severity in rows.filter_map(|r| r.severity) {
            match severity {
                Severity::Normal => tally.normal += 1,
                Severity::Warning => tally.warning += 1,
                Severity::Critical => tally.critical += 1,
            }
        }
        tally
    }

    /// The worst severity counted, `Normal` when nothing is classified.
    pub fn worst(&self) -> Severity {
        if self.critical > 0 {
            Severity::Critical
        } else if self.warning > 0 {
            Severity::Warning
        } else {
            Severity::Normal
        }
    }
}

/// Row layout: label, snapshot key, unit, decimals, limits metric (if classified).
type RowSpec = (&'static str, &'static str, &'static str, usize, Option<&'static str>);

const PACK_ROWS: [RowSpec; 7] = [
    ("Current", pack_keys::CURRENT, "A", 2, Some(metric::CURRENT)),
    ("Avg Temp", pack_keys::AVG_TEMP, "°C", 2, None),
    ("Max Temp", pack_keys::MAX_TEMP, "°C", 2, None),
    ("Max Cell Voltage", pack_keys::MAX_CELL_VOLTAGE, "V", 2, None),
    ("Min Cell Voltage", pack_keys::MIN_CELL_VOLTAGE, "V", 2, None),
    ("Total Voltage", pack_keys::TOTAL_VOLTAGE, "V", 2, Some(metric::TOTAL_VOLTAGE)),
    ("SOC", pack_keys::SOC, "%", 2, Some(metric::MODULE_SOC)),
];

const MODULE_STATS: [RowSpec; 5] = [
    ("State of Charge", module_keys::SOC, "%", 1, Some(metric::MODULE_SOC)),
    ("Max Voltage", module_keys::MAX_VOLTAGE, "V", 2, None),
    ("Min Voltage", module_keys::MIN_VOLTAGE, "V", 2, None),
    ("Max Temp", module_keys::MAX_TEMP, "°C", 2, None),
    ("Avg Temp", module_keys::AVG_TEMP, "°C", 2, None),
];

/// The summary (pack-level) page.
#[derive(Debug, Clone, PartialEq)]
pub struct PackPage {
    pub rows: Vec<MetricRow>,
}

impl PackPage {
    pub fn from_snapshot(snapshot: &Snapshot, limits: &LimitsTable) -> Self {
        let rows = PACK_ROWS
            .iter()
            .map(|&(label, key, unit, precision, limit)| {
                MetricRow::read(snapshot, label, key, unit, precision, limit.map(|m| (m, limits)))
            })
            .collect();
        Self { rows }
    }
}

/// A module page: cell voltages, temperatures and derived stats.
#[derive(Debug, Clone, PartialEq)]
pub struct ModulePage {
    /// 1-based module number.
    pub index: usize,
    pub cells: Vec<MetricRow>,
    pub temps: Vec<MetricRow>,
    pub stats: Vec<MetricRow>,
    /// Decoded `Module_Status`, if the snapshot carries one.
    pub status: Option<ModuleStatus>,
}

impl ModulePage {
    pub fn from_snapshot(index: usize, snapshot: &Snapshot, limits: &LimitsTable) -> Self {
        let cells = (1..=CELLS_PER_MODULE)
            .map(|i| {
                MetricRow::read(
                    snapshot,
                    format!("Voltage {}", i),
                    cell_voltage_key(i),
                    "V",
                    2,
                    Some((metric::CELL_VOLTAGE, limits)),
                )
            })
            .collect();

        let temps = (1..=TEMPS_PER_MODULE)
            .map(|i| {
                MetricRow::read(
                    snapshot,
                    format!("Temp {}", i),
                    temp_key(i),
                    "°C",
                    2,
                    Some((metric::CELL_TEMP, limits)),
                )
            })
            .collect();

        let stats = MODULE_STATS
            .iter()
            .map(|&(label, key, unit, precision, limit)| {
                MetricRow::read(snapshot, label, key, unit, precision, limit.map(|m| (m, limits)))
            })
            .collect();

        let status = snapshot.get(module_keys::STATUS).copied().map(ModuleStatus::from_value);

        Self {
            index,
            cells,
            temps,
            stats,
            status,
        }
    }
}

/// The processed data for whichever page is on screen.
#[derive(Debug, Clone, PartialEq)]
pub enum PageData {
    Pack(PackPage),
    Module(ModulePage),
}

impl PageData {
    /// All rows on the page, in display order.
    pub fn rows(&self) -> Box<dyn Iterator<Item = &MetricRow> + '_> {
        match self {
            PageData::Pack(page) => Box::new(page.rows.iter()),
            PageData::Module(page) => {
                Box::new(page.cells.iter().chain(page.temps.iter()).chain(page.stats.iter()))
            }
        }
    }

    pub fn tally(&self) -> SeverityTally {
        SeverityTally::from_rows(self.rows())
    }
}
