//! Module-level telemetry state: cells, temperatures and derived stats.

use rand::Rng;

use super::pack::SOC_BOUNDS;
use super::Bounds;
use crate::data::telemetry::{
    cell_voltage_key, module_keys, temp_key, ModuleStatus, CELLS_PER_MODULE, TEMPS_PER_MODULE,
};
use crate::source::Snapshot;

pub const CELL_VOLTAGE_BOUNDS: Bounds = Bounds::new(3.0, 4.2);
pub const TEMP_BOUNDS: Bounds = Bounds::new(20.0, 60.0);

const CELL_VOLTAGE_STEP: f64 = 0.002;
const TEMP_STEP: f64 = 0.1;

/// Status flag thresholds. Fixed, unlike the dashboard's limits table.
pub const HIGH_VOLTAGE_THRESHOLD: f64 = 4.15;
pub const LOW_VOLTAGE_THRESHOLD: f64 = 3.2;
pub const HIGH_TEMP_THRESHOLD: f64 = 45.0;

const SEED_CELL_VOLTAGE: f64 = 3.0;
const SEED_TEMP: f64 = 60.0;
const SEED_STATUS: u8 = 13;

/// One module's primitives and the aggregates derived from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModuleState {
    pub cells: [f64; CELLS_PER_MODULE],
    pub temps: [f64; TEMPS_PER_MODULE],
    pub soc: f64,
    pub max_voltage: f64,
    pub min_voltage: f64,
    pub max_temp: f64,
    pub avg_temp: f64,
    pub status: ModuleStatus,
}

impl ModuleState {
    /// Values used when a module has no snapshot yet.
    pub fn seed() -> Self {
        Self {
            cells: [SEED_CELL_VOLTAGE; CELLS_PER_MODULE],
            temps: [SEED_TEMP; TEMPS_PER_MODULE],
            soc: 0.0,
            max_voltage: SEED_CELL_VOLTAGE,
            min_voltage: SEED_CELL_VOLTAGE,
            max_temp: SEED_TEMP,
            avg_temp: SEED_TEMP,
            status: ModuleStatus::from_bits(SEED_STATUS),
        }
    }

    /// Rebuild state from a snapshot, taking seed values for missing keys.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let mut state = Self::seed();
        for (i, cell) in state.cells.iter_mut().enumerate() {
            if let Some(v) = snapshot.get(&cell_voltage_key(i + 1)) {
                *cell = *v;
            }
        }
        for (i, temp) in state.temps.iter_mut().enumerate() {
            if let Some(v) = snapshot.get(&temp_key(i + 1)) {
                *temp = *v;
            }
        }

        let get = |key: &str, default: f64| snapshot.get(key).copied().unwrap_or(default);
        state.soc = get(module_keys::SOC, state.soc);
        state.max_voltage = get(module_keys::MAX_VOLTAGE, state.max_voltage);
        state.min_voltage = get(module_keys::MIN_VOLTAGE, state.min_voltage);
        state.max_temp = get(module_keys::MAX_TEMP, state.max_temp);
        state.avg_temp = get(module_keys::AVG_TEMP, state.avg_temp);
        if let Some(v) = snapshot.get(module_keys::STATUS) {
            state.status = ModuleStatus::from_value(*v);
        }
        state
    }

    /// Snapshot entries in file order: cells, temperatures, then stats.
    pub fn entries(&self) -> Vec<(String, f64)> {
        let cells = self.cells.iter().enumerate().map(|(i, v)| (cell_voltage_key(i + 1), *v));
        let temps = self.temps.iter().enumerate().map(|(i, v)| (temp_key(i + 1), *v));
        let stats = [
            (module_keys::SOC, self.soc),
            (module_keys::MAX_VOLTAGE, self.max_voltage),
            (module_keys::MIN_VOLTAGE, self.min_voltage),
            (module_keys::MAX_TEMP, self.max_temp),
            (module_keys::AVG_TEMP, self.avg_temp),
            (module_keys::STATUS, self.status.bits() as f64),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v));

        cells.chain(temps).chain(stats).collect()
    }

    /// Apply one cycle of drift to cells and temperatures, then
    /// recompute the aggregates.
    pub fn advance<R: Rng>(&mut self, rng: &mut R) {
        for cell in &mut self.cells {
            *cell = CELL_VOLTAGE_BOUNDS
                .clamp(*cell + rng.gen_range(-CELL_VOLTAGE_STEP..=CELL_VOLTAGE_STEP));
        }
        for temp in &mut self.temps {
            *temp = TEMP_BOUNDS.clamp(*temp + rng.gen_range(-TEMP_STEP..=TEMP_STEP));
        }
        self.recompute();
    }

    /// Derive max/min voltage, max/avg temperature, SOC and status from
    /// the current cells and temperatures.
    pub fn recompute(&mut self) {
        self.max_voltage = self.cells.iter().copied().fold(f64::MIN, f64::max);
        self.min_voltage = self.cells.iter().copied().fold(f64::MAX, f64::min);
        self.max_temp = self.temps.iter().copied().fold(f64::MIN, f64::max);
        self.avg_temp = self.temps.iter().sum::<f64>() / TEMPS_PER_MODULE as f64;

        let avg_voltage = self.cells.iter().sum::<f64>() / CELLS_PER_MODULE as f64;
        let span = CELL_VOLTAGE_BOUNDS.max - CELL_VOLTAGE_BOUNDS.min;
        self.soc = SOC_BOUNDS.clamp((avg_voltage - CELL_VOLTAGE_BOUNDS.min) / span * 100.0);

        self.status = derive_status(self.max_voltage, self.min_voltage, self.max_temp);
    }
}

/// Status flags for a module's extremes. `OK` is always set.
pub fn derive_status(max_voltage: f64, min_voltage: f64, max_temp: f64) -> ModuleStatus {
    let mut status = ModuleStatus::from_bits(ModuleStatus::OK);
    if max_voltage > HIGH_VOLTAGE_THRESHOLD {
        status.insert(ModuleStatus::HIGH_VOLTAGE);
    }
    if min_voltage < LOW_VOLTAGE_THRESHOLD {
        status.insert(ModuleStatus::LOW_VOLTAGE);
    }
    if max_temp > HIGH_TEMP_THRESHOLD {
        status.insert(ModuleStatus::HIGH_TEMP);
    }
    status
}
