//! Pack-level telemetry state and its random walk.

use rand::Rng;

use super::module::ModuleState;
use super::Bounds;
use crate::data::telemetry::pack_keys;
use crate::source::Snapshot;

pub const CURRENT_BOUNDS: Bounds = Bounds::new(-150.0, 150.0);
pub const TOTAL_VOLTAGE_BOUNDS: Bounds = Bounds::new(300.0, 400.0);
pub const SOC_BOUNDS: Bounds = Bounds::new(0.0, 100.0);

/// Largest per-cycle change in current (A).
const CURRENT_STEP: f64 = 5.0;
/// Below this magnitude the pack counts as idle (A).
pub const MIN_ACTIVE_CURRENT: f64 = 0.5;
/// Largest current picked when restarting an idle pack (A).
pub const MAX_RESTART_CURRENT: f64 = 5.0;
const VOLTAGE_NOISE: f64 = 0.2;
const SOC_NOISE: f64 = 0.05;

/// Pack-level values written to the main snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PackState {
    pub current: f64,
    pub voltage: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
    pub max_cell_voltage: f64,
    pub min_cell_voltage: f64,
    pub total_voltage: f64,
    pub soc: f64,
}

impl PackState {
    /// Values used when no snapshot exists yet: everything zero.
    pub fn seed() -> Self {
        Self::default()
    }

    /// Rebuild state from a snapshot, taking seed values for missing keys.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let seed = Self::seed();
        let get = |key: &str, default: f64| snapshot.get(key).copied().unwrap_or(default);
        Self {
            current: get(pack_keys::CURRENT, seed.current),
            voltage: get(pack_keys::VOLTAGE, seed.voltage),
            max_temp: get(pack_keys::MAX_TEMP, seed.max_temp),
            avg_temp: get(pack_keys::AVG_TEMP, seed.avg_temp),
            max_cell_voltage: get(pack_keys::MAX_CELL_VOLTAGE, seed.max_cell_voltage),
            min_cell_voltage: get(pack_keys::MIN_CELL_VOLTAGE, seed.min_cell_voltage),
            total_voltage: get(pack_keys::TOTAL_VOLTAGE, seed.total_voltage),
            soc: get(pack_keys::SOC, seed.soc),
        }
    }

    /// Snapshot entries in file order.
    pub fn entries(&self) -> [(&'static str, f64); 8] {
        [
            (pack_keys::CURRENT, self.current),
            (pack_keys::VOLTAGE, self.voltage),
            (pack_keys::MAX_TEMP, self.max_temp),
            (pack_keys::AVG_TEMP, self.avg_temp),
            (pack_keys::MAX_CELL_VOLTAGE, self.max_cell_voltage),
            (pack_keys::MIN_CELL_VOLTAGE, self.min_cell_voltage),
            (pack_keys::TOTAL_VOLTAGE, self.total_voltage),
            (pack_keys::SOC, self.soc),
        ]
    }

    /// Apply one cycle of random drift.
    ///
    /// Positive current is discharge: it pulls total voltage and SOC down
    /// before independent noise is added.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) {
        let current = self.current + rng.gen_range(-CURRENT_STEP..=CURRENT_STEP);
        self.current = CURRENT_BOUNDS.clamp(keep_current_flowing(current, rng));

        let voltage_drift = -0.05 * (self.current / 100.0);
        self.total_voltage = TOTAL_VOLTAGE_BOUNDS
            .clamp(self.total_voltage + voltage_drift + rng.gen_range(-VOLTAGE_NOISE..=VOLTAGE_NOISE));
        self.voltage = self.total_voltage;

        let soc_drift = -0.01 * (self.current / 10.0);
        self.soc = SOC_BOUNDS.clamp(self.soc + soc_drift + rng.gen_range(-SOC_NOISE..=SOC_NOISE));
    }

    /// Derive the pack temperature and cell voltage extremes from the
    /// modules updated in the same cycle.
    pub fn roll_up(&mut self, modules: &[ModuleState]) {
        if modules.is_empty() {
            return;
        }
        self.max_temp = modules.iter().map(|m| m.max_temp).fold(f64::MIN, f64::max);
        self.avg_temp = modules.iter().map(|m| m.avg_temp).sum::<f64>() / modules.len() as f64;
        self.max_cell_voltage = modules.iter().map(|m| m.max_voltage).fold(f64::MIN, f64::max);
        self.min_cell_voltage = modules.iter().map(|m| m.min_voltage).fold(f64::MAX, f64::min);
    }
}

/// Keep the simulated pack from idling at ~0 A.
///
/// If `current` is below [`MIN_ACTIVE_CURRENT`] in magnitude it is
/// replaced by a random magnitude in `[0.5, 5]` A with a random sign.
pub fn keep_current_flowing<R: Rng>(current: f64, rng: &mut R) -> f64 {
    if current.abs() >= MIN_ACTIVE_CURRENT {
        return current;
    }
    let sign = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    sign * rng.gen_range(MIN_ACTIVE_CURRENT..=MAX_RESTART_CURRENT)
}
