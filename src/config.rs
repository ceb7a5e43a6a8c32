//! Layered settings: defaults, optional TOML file, then environment.
//!
//! ```toml
//! data_dir = "/var/lib/battery"
//! limits_file = "battery_limits.csv"
//! frame_ms = 100
//! sim_interval_ms = 1000
//! log_file = "battery_dash.log"
//! log_level = "info"
//! ```
//!
//! Every key can also be set through a `BATTERY_DASH_` environment
//! variable, e.g. `BATTERY_DASH_DATA_DIR=/tmp/pack`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Config file read from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "battery_dash.toml";
/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "BATTERY_DASH";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the snapshot CSV files.
    pub data_dir: PathBuf,
    /// Limits table; relative paths resolve against `data_dir`.
    pub limits_file: PathBuf,
    /// Dashboard redraw and poll interval.
    pub frame_ms: u64,
    /// Simulator update period.
    pub sim_interval_ms: u64,
    /// Where the dashboard writes its log. Unset means no log output.
    pub log_file: Option<PathBuf>,
    /// Default filter directive when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            limits_file: PathBuf::from("battery_limits.csv"),
            frame_ms: 100,
            sim_interval_ms: 1000,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings.
    ///
    /// An explicit `path` must exist; otherwise [`DEFAULT_CONFIG_FILE`] is
    /// used if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        let config = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("failed to read configuration")?;

        config.try_deserialize().context("invalid configuration")
    }

    /// Resolved path of the limits table.
    pub fn limits_path(&self) -> PathBuf {
        if self.limits_file.is_absolute() {
            self.limits_file.clone()
        } else {
            self.data_dir.join(&self.limits_file)
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms.max(1))
    }

    pub fn sim_interval(&self) -> Duration {
        Duration::from_millis(self.sim_interval_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.limits_path(), Path::new("./battery_limits.csv"));
        assert_eq!(settings.sim_interval(), Duration::from_secs(1));
        assert_eq!(settings.frame_interval(), Duration::from_millis(100));
        assert!(settings.log_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "data_dir = \"/srv/pack\"").unwrap();
        writeln!(file, "frame_ms = 50").unwrap();
        writeln!(file, "log_file = \"dash.log\"").unwrap();
        file.flush().unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.data_dir, Path::new("/srv/pack"));
        assert_eq!(settings.frame_ms, 50);
        assert_eq!(settings.log_file.as_deref(), Some(Path::new("dash.log")));
        // Unset keys keep their defaults
        assert_eq!(settings.sim_interval_ms, 1000);
        assert_eq!(settings.limits_path(), Path::new("/srv/pack/battery_limits.csv"));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        assert!(Settings::load(Some(Path::new("/nonexistent/battery_dash.toml"))).is_err());
    }

    #[test]
    fn test_absolute_limits_path() {
        let settings = Settings {
            limits_file: PathBuf::from("/etc/battery/limits.csv"),
            ..Settings::default()
        };
        assert_eq!(settings.limits_path(), Path::new("/etc/battery/limits.csv"));
    }

    #[test]
    fn test_zero_intervals_are_raised() {
        let settings = Settings {
            frame_ms: 0,
            sim_interval_ms: 0,
            ..Settings::default()
        };
        assert_eq!(settings.frame_interval(), Duration::from_millis(1));
        assert_eq!(settings.sim_interval(), Duration::from_millis(1));
    }
}
