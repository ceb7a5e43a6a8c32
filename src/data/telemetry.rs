//! Snapshot key names and pack layout constants.
//!
//! These names are the contract between the simulator, the snapshot
//! files and the dashboard.

/// Number of battery modules in the pack.
pub const MODULE_COUNT: usize = 12;
/// Cells per module.
pub const CELLS_PER_MODULE: usize = 11;
/// Temperature sensors per module.
pub const TEMPS_PER_MODULE: usize = 8;

/// Keys in the main (pack-level) snapshot.
pub mod pack_keys {
    pub const CURRENT: &str = "current";
    pub const VOLTAGE: &str = "voltage";
    pub const MAX_TEMP: &str = "max_temp";
    pub const AVG_TEMP: &str = "avg_temp";
    pub const MAX_CELL_VOLTAGE: &str = "max_cell_voltage";
    pub const MIN_CELL_VOLTAGE: &str = "min_cell_voltage";
    pub const TOTAL_VOLTAGE: &str = "total_voltage";
    pub const SOC: &str = "soc";
}

/// Aggregate keys in a module snapshot.
pub mod module_keys {
    pub const SOC: &str = "Module_SOC";
    pub const MAX_VOLTAGE: &str = "Module_Max_Voltage";
    pub const MIN_VOLTAGE: &str = "Module_Min_Voltage";
    pub const MAX_TEMP: &str = "Module_Max_Temp";
    pub const AVG_TEMP: &str = "Module_Avg_Temp";
    pub const STATUS: &str = "Module_Status";
}

/// Key for a cell voltage (1-based cell number).
pub fn cell_voltage_key(cell: usize) -> String {
    format!("Cell_{}_Voltage", cell)
}

/// Key for a temperature sensor (1-based sensor number).
pub fn temp_key(sensor: usize) -> String {
    format!("Temp_{}", sensor)
}

/// Per-module status flags, stored in the snapshot as an integer.
///
/// Computed by the simulator from fixed constants, independent of the
/// configurable limits table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModuleStatus(u8);

impl ModuleStatus {
    pub const OK: u8 = 1;
    pub const HIGH_VOLTAGE: u8 = 2;
    pub const LOW_VOLTAGE: u8 = 4;
    pub const HIGH_TEMP: u8 = 8;

    const ALL: u8 = Self::OK | Self::HIGH_VOLTAGE | Self::LOW_VOLTAGE | Self::HIGH_TEMP;

    pub fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL)
    }

    /// Decode the float stored in a snapshot. Out-of-range values are
    /// saturated, unknown bits dropped.
    pub fn from_value(value: f64) -> Self {
        Self::from_bits(value.round().clamp(0.0, u8::MAX as f64) as u8)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, flag: u8) -> bool {
        self.0 & flag == flag
    }

    pub fn insert(&mut self, flag: u8) {
        self.0 |= flag & Self::ALL;
    }

    /// True when any warning flag is set.
    pub fn has_warnings(self) -> bool {
        self.0 & (Self::HIGH_VOLTAGE | Self::LOW_VOLTAGE | Self::HIGH_TEMP) != 0
    }

    /// Short labels for each set flag, in bit order.
    pub fn labels(self) -> Vec<&'static str> {
        [
            (Self::OK, "OK"),
            (Self::HIGH_VOLTAGE, "HV"),
            (Self::LOW_VOLTAGE, "LV"),
            (Self::HIGH_TEMP, "HT"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, label)| label)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!(cell_voltage_key(1), "Cell_1_Voltage");
        assert_eq!(cell_voltage_key(11), "Cell_11_Voltage");
        assert_eq!(temp_key(8), "Temp_8");
    }

    #[test]
    fn test_status_decoding() {
        let status = ModuleStatus::from_value(13.0);
        assert!(status.contains(ModuleStatus::OK));
        assert!(!status.contains(ModuleStatus::HIGH_VOLTAGE));
        assert!(status.contains(ModuleStatus::LOW_VOLTAGE));
        assert!(status.contains(ModuleStatus::HIGH_TEMP));
        assert!(status.has_warnings());
        assert_eq!(status.labels(), vec!["OK", "LV", "HT"]);
    }

    #[test]
    fn test_status_from_odd_values() {
        assert_eq!(ModuleStatus::from_value(-3.0).bits(), 0);
        assert_eq!(ModuleStatus::from_value(f64::NAN).bits(), 0);
        assert_eq!(ModuleStatus::from_value(1.2).bits(), 1);
        assert_eq!(ModuleStatus::from_value(255.0).bits(), 15);
    }
}
