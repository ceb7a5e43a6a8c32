//! # battery-dash
//!
//! A terminal dashboard and telemetry simulator for a battery pack of
//! twelve modules.
//!
//! Telemetry is exchanged through small `Name,Data` CSV snapshots in a data
//! directory: one for the pack (`main_page.csv`) and one per module
//! (`module_{k}_data.csv`). The dashboard re-reads the snapshot of the page
//! on screen every frame and colors each value against the thresholds in
//! `battery_limits.csv`. The simulator random-walks the same files.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                        Application                         │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│Terminal│  │
//! │  │ (pages) │    │ (limits) │    │(render) │    │        │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └────────┘  │
//! │       │                                                    │
//! │       ▼                                                    │
//! │  ┌─────────┐        CSV snapshots        ┌─────────┐       │
//! │  │ source  │◀────────────────────────────│   sim   │       │
//! │  └─────────┘                             └─────────┘       │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state and the 13-page navigator
//! - **[`source`]**: Snapshot CSV reading and atomic writing, behind the
//!   [`SnapshotSource`] trait
//! - **[`data`]**: Limits table, severity classification and page view models
//! - **[`sim`]**: The random-walk simulator
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ```bash
//! # Dashboard over the current directory, asking whether to simulate
//! battery-dash
//!
//! # Dashboard with the simulator running in the background
//! battery-dash --data-dir /tmp/pack --simulate
//!
//! # Standalone simulator, reproducible
//! battery-sim --data-dir /tmp/pack --seed 7
//! ```
//!
//! ### Classifying a value
//!
//! ```
//! use battery_dash::{LimitsTable, Severity};
//!
//! let csv = "metric,upper_red,upper_orange,lower_red,lower_orange\n\
//!            Current,200,150,-200,-150\n";
//! let limits = LimitsTable::parse(csv.as_bytes()).unwrap();
//!
//! assert_eq!(limits.classify("Current", 160.0), Severity::Warning);
//! assert_eq!(limits.classify("Current", -250.0), Severity::Critical);
//! assert_eq!(limits.classify("Cell_Temp", 99.0), Severity::Normal);
//! ```
//!
//! ### Building the dashboard state
//!
//! ```no_run
//! use battery_dash::{App, DirSource, LimitsTable, Settings, SnapshotDir};
//!
//! let settings = Settings::load(None).unwrap();
//! let limits = LimitsTable::load_or_empty(&settings.limits_path());
//! let source = DirSource::new(SnapshotDir::new(&settings.data_dir));
//! let mut app = App::new(Box::new(source), limits);
//! app.reload_data();
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod export;
pub mod logging;
pub mod sim;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, Page, TOTAL_PAGES};
pub use config::Settings;
pub use data::{
    classify, LimitsTable, MetricLimits, MetricRow, ModulePage, ModuleStatus, PackPage, PageData,
    Severity, SeverityTally,
};
pub use error::TelemetryError;
pub use sim::{CycleReport, ModuleState, PackState, Simulator};
pub use source::{
    read_snapshot, try_read_snapshot, write_snapshot, DirSource, Snapshot, SnapshotDir,
    SnapshotSource,
};
