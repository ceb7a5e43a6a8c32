//! Telemetry simulator.
//!
//! Synthesizes plausible battery data into the same CSV snapshots the
//! dashboard reads, for development without real hardware. Each cycle
//! reads every snapshot back, perturbs the primitive values with bounded
//! random deltas, recomputes derived fields and rewrites the files.
//!
//! ```text
//! module_{1..12}_data.csv ──read──▶ ModuleState::advance ──write──▶ module_k_data.csv
//!                                          │
//!                                          ▼ roll_up
//! main_page.csv ───────────read──▶ PackState::advance ────write──▶ main_page.csv
//! ```

pub mod module;
pub mod pack;

pub use module::ModuleState;
pub use pack::PackState;

use std::path::PathBuf;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::data::MODULE_COUNT;
use crate::source::{read_snapshot, write_snapshot, SnapshotDir};

/// Shown when the simulator starts alongside the dashboard.
pub const STARTED_MESSAGE: &str = "Battery simulator started";

/// Inclusive physical range of a simulated value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Outcome of one simulator cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Pack values as written (or as they would have been, on failure).
    pub pack: PackState,
    /// Number of snapshot files written successfully.
    pub written: usize,
    /// Files that could not be written, with the reason.
    pub failures: Vec<(PathBuf, String)>,
}

impl CycleReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives the random walk over every snapshot in a data directory.
#[derive(Debug)]
pub struct Simulator<R = StdRng> {
    dir: SnapshotDir,
    rng: R,
}

impl Simulator<StdRng> {
    /// Simulator seeded from OS entropy.
    pub fn from_entropy(dir: SnapshotDir) -> Self {
        Self::with_rng(dir, StdRng::from_entropy())
    }

    /// Simulator with a fixed seed, for reproducible runs.
    pub fn seeded(dir: SnapshotDir, seed: u64) -> Self {
        Self::with_rng(dir, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Simulator<R> {
    pub fn with_rng(dir: SnapshotDir, rng: R) -> Self {
        Self { dir, rng }
    }

    pub fn dir(&self) -> &SnapshotDir {
        &self.dir
    }

    /// Run one update cycle over all modules, then the pack.
    ///
    /// Write failures are logged and collected; the remaining files are
    /// still processed.
    pub fn step(&mut self) -> CycleReport {
        let mut report = CycleReport {
            pack: PackState::seed(),
            written: 0,
            failures: Vec::new(),
        };

        let mut modules = Vec::with_capacity(MODULE_COUNT);
        for module in 1..=MODULE_COUNT {
            let path = self.dir.module_path(module);
            let snapshot = read_snapshot(&path);
            if snapshot.is_empty() {
                debug!(module, "seeding module snapshot");
            }

            let mut state = ModuleState::from_snapshot(&snapshot);
            state.advance(&mut self.rng);
            match write_snapshot(&path, state.entries()) {
                Ok(()) => report.written += 1,
                Err(e) => {
                    warn!(module, error = %e, "failed to write module snapshot");
                    report.failures.push((path, e.to_string()));
                }
            }
            modules.push(state);
        }

        let path = self.dir.main_path();
        let mut pack = PackState::from_snapshot(&read_snapshot(&path));
        pack.advance(&mut self.rng);
        pack.roll_up(&modules);
        match write_snapshot(&path, pack.entries()) {
            Ok(()) => report.written += 1,
            Err(e) => {
                warn!(error = %e, "failed to write pack snapshot");
                report.failures.push((path, e.to_string()));
            }
        }
        report.pack = pack;

        report
    }

    /// Run cycles on a fixed period, forever or until `cycles` have run.
    ///
    /// Each cycle logs a status line with the pack voltage, current and SOC.
    pub async fn run_for(&mut self, period: Duration, cycles: Option<u64>) {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut completed = 0u64;
        while cycles.map_or(true, |limit| completed < limit) {
            ticker.tick().await;
            let report = self.step();
            completed += 1;
            info!(
                written = report.written,
                failed = report.failures.len(),
                "Updated data - Voltage: {:.1}V, Current: {:.1}A, SOC: {:.1}%",
                report.pack.total_voltage,
                report.pack.current,
                report.pack.soc
            );
        }
    }
}

impl<R: Rng + Send> Simulator<R> {
    /// Run forever. Intended to be spawned as a background task and
    /// stopped by aborting it.
    pub async fn run(mut self, period: Duration) {
        self.run_for(period, None).await
    }
}
