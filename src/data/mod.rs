//! Data models and processing for battery telemetry.
//!
//! This module turns raw name→value snapshots into labeled,
//! severity-annotated page data suitable for display.
//!
//! ## Submodules
//!
//! - [`limits`]: Per-metric thresholds loaded from the limits CSV ([`LimitsTable`])
//! - [`severity`]: The classifier mapping a value and its limits to a [`Severity`]
//! - [`telemetry`]: Snapshot key names, pack layout and [`ModuleStatus`] flags
//! - [`pages`]: View models for the summary page and the module pages
//!
//! ## Data Flow
//!
//! ```text
//! Snapshot (name -> f64)          LimitsTable
//!        │                             │
//!        ▼                             ▼
//! PackPage / ModulePage::from_snapshot()
//!        │
//!        └──▶ MetricRow { value, unit, severity }
//! ```

pub mod limits;
pub mod pages;
pub mod severity;
pub mod telemetry;

pub use limits::{metric, LimitsTable};
pub use pages::{MetricRow, ModulePage, PackPage, PageData, SeverityTally};
pub use severity::{classify, MetricLimits, Severity};
pub use telemetry::{ModuleStatus, CELLS_PER_MODULE, MODULE_COUNT, TEMPS_PER_MODULE};
