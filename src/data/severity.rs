//! Severity classification of telemetry values against limit bands.

use serde::Serialize;

/// Severity of a single telemetry reading.
///
/// Ordered so that `max()` over a set of readings yields the worst one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Warning,
    Critical,
}

impl Severity {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Normal => "OK",
            Severity::Warning => "WARN",
            Severity::Critical => "CRIT",
        }
    }
}

/// The four boundaries that split a metric's range into severity bands.
///
/// The intended ordering is `upper_red >= upper_orange >= lower_orange >= lower_red`.
/// It is not enforced; a table that violates it still loads, it just
/// colors values in surprising ways.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricLimits {
    pub upper_red: f64,
    pub upper_orange: f64,
    pub lower_red: f64,
    pub lower_orange: f64,
}

impl MetricLimits {
    pub fn new(upper_red: f64, upper_orange: f64, lower_red: f64, lower_orange: f64) -> Self {
        Self {
            upper_red,
            upper_orange,
            lower_red,
            lower_orange,
        }
    }

    /// Build limits from the numeric fields of a limits table row.
    ///
    /// Fields are taken in file order (upper red, upper orange, lower red,
    /// lower orange). Returns `None` if fewer than four are present.
    pub fn from_fields(fields: &[f64]) -> Option<Self> {
        match fields {
            [upper_red, upper_orange, lower_red, lower_orange, ..] => Some(Self::new(
                *upper_red,
                *upper_orange,
                *lower_red,
                *lower_orange,
            )),
            _ => None,
        }
    }

    /// Whether the bands nest the way the table format intends.
    pub fn is_well_ordered(&self) -> bool {
        self.upper_red >= self.upper_orange
            && self.upper_orange >= self.lower_orange
            && self.lower_orange >= self.lower_red
    }

    /// Classify a value. The first matching rule wins:
    /// above upper red, above upper orange, below lower red, below lower orange.
    pub fn classify(&self, value: f64) -> Severity {
        if value > self.upper_red {
            Severity::Critical
        } else if value > self.upper_orange {
            Severity::Warning
        } else if value < self.lower_red {
            Severity::Critical
        } else if value < self.lower_orange {
            Severity::Warning
        } else {
            Severity::Normal
        }
    }
}

/// Classify a value against optional limits.
///
/// A metric with no configured limits is always `Normal`.
pub fn classify(value: f64, limits: Option<&MetricLimits>) -> Severity {
    limits.map_or(Severity::Normal, |l| l.classify(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current_limits() -> MetricLimits {
        MetricLimits::new(200.0, 150.0, -200.0, -150.0)
    }

    #[test]
    fn test_classify_bands() {
        let limits = current_limits();
        assert_eq!(limits.classify(0.0), Severity::Normal);
        assert_eq!(limits.classify(160.0), Severity::Warning);
        assert_eq!(limits.classify(250.0), Severity::Critical);
        assert_eq!(limits.classify(-160.0), Severity::Warning);
        assert_eq!(limits.classify(-250.0), Severity::Critical);
    }

    #[test]
    fn test_classify_boundaries_are_exclusive() {
        let limits = current_limits();
        assert_eq!(limits.classify(150.0), Severity::Normal);
        assert_eq!(limits.classify(200.0), Severity::Warning);
        assert_eq!(limits.classify(-150.0), Severity::Normal);
        assert_eq!(limits.classify(-200.0), Severity::Warning);
    }

    #[test]
    fn test_classify_matches_band_definition() {
        let limits = MetricLimits::new(4.2, 4.1, 3.0, 3.2);
        let mut v = 2.5;
        while v < 4.7 {
            let expected = if v > 4.2 || v < 3.0 {
                Severity::Critical
            } else if v > 4.1 || v < 3.2 {
                Severity::Warning
            } else {
                Severity::Normal
            };
            assert_eq!(limits.classify(v), expected, "value {}", v);
            v += 0.01;
        }
    }

    #[test]
    fn test_classify_without_limits_is_normal() {
        assert_eq!(classify(1e9, None), Severity::Normal);
        assert_eq!(classify(-1e9, None), Severity::Normal);
        assert_eq!(classify(f64::NAN, None), Severity::Normal);
    }

    #[test]
    fn test_from_fields_needs_four_values() {
        assert!(MetricLimits::from_fields(&[]).is_none());
        assert!(MetricLimits::from_fields(&[1.0, 2.0, 3.0]).is_none());

        let limits = MetricLimits::from_fields(&[100.0, 90.0, 5.0, 10.0, 42.0]).unwrap();
        assert_eq!(limits, MetricLimits::new(100.0, 90.0, 5.0, 10.0));
    }

    #[test]
    fn test_well_ordered() {
        assert!(current_limits().is_well_ordered());
        assert!(!MetricLimits::new(100.0, 110.0, 0.0, 10.0).is_well_ordered());
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Critical > Severity::Warning);
        assert!(Severity::Warning > Severity::Normal);
    }
}
