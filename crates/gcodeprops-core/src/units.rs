//! Unit conversion utilities
//!
//! Internal lengths are always millimetres. Display values are produced in
//! either Metric (mm, 3 decimals) or Imperial (inch, 4 decimals).

use crate::constants::MM_PER_INCH;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Measurement system used for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    #[default]
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl MeasurementSystem {
    /// Factor applied to an internal millimetre length to obtain a display value
    pub fn scale_factor(self) -> f64 {
        match self {
            Self::Metric => 1.0,
            Self::Imperial => 1.0 / MM_PER_INCH,
        }
    }

    /// Number of decimals used when formatting lengths
    pub fn decimals(self) -> usize {
        match self {
            Self::Metric => 3,
            Self::Imperial => 4,
        }
    }

    /// Unit label ("mm" or "in")
    pub fn label(self) -> &'static str {
        match self {
            Self::Metric => "mm",
            Self::Imperial => "in",
        }
    }

    /// Convert an internal millimetre length to display units
    pub fn to_display(self, value_mm: f64) -> f64 {
        match self {
            Self::Metric => value_mm,
            Self::Imperial => value_mm / MM_PER_INCH,
        }
    }

    /// Convert a display length back to internal millimetres
    pub fn from_display(self, value: f64) -> f64 {
        match self {
            Self::Metric => value,
            Self::Imperial => value * MM_PER_INCH,
        }
    }

    /// Format a value that is already in display units
    pub fn format_value(self, value: f64) -> String {
        format!("{:.*}", self.decimals(), value)
    }

    /// Format an internal millimetre length for display, without label
    pub fn format_length(self, value_mm: f64) -> String {
        self.format_value(self.to_display(value_mm))
    }

    /// Format an internal millimetre length for display, with label
    pub fn format_length_with_units(self, value_mm: f64) -> String {
        format!("{} {}", self.format_length(value_mm), self.label())
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

impl FromStr for MeasurementSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "metric" | "mm" => Ok(Self::Metric),
            "imperial" | "inch" | "in" => Ok(Self::Imperial),
            _ => Err(format!("Unknown measurement system: {}", s)),
        }
    }
}

/// Format a duration in seconds as `HH:MM:SS`, rounded to the nearest second.
///
/// Negative and non-finite durations render as `00:00:00`.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_metric_formatting() {
        let system = MeasurementSystem::Metric;
        assert_eq!(system.format_length(10.5), "10.500");
        assert_eq!(system.format_length_with_units(20.0), "20.000 mm");
        assert_eq!(system.scale_factor(), 1.0);
    }

    #[test]
    fn test_imperial_formatting() {
        let system = MeasurementSystem::Imperial;
        assert_eq!(system.format_length(25.4), "1.0000");
        assert_eq!(system.format_length(12.7), "0.5000");
        assert_eq!(system.format_length_with_units(50.8), "2.0000 in");
    }

    #[test]
    fn test_unit_labels() {
        assert_eq!(MeasurementSystem::Metric.label(), "mm");
        assert_eq!(MeasurementSystem::Imperial.label(), "in");
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "mm".parse::<MeasurementSystem>().unwrap(),
            MeasurementSystem::Metric
        );
        assert_eq!(
            " Imperial ".parse::<MeasurementSystem>().unwrap(),
            MeasurementSystem::Imperial
        );
        assert!("furlong".parse::<MeasurementSystem>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&MeasurementSystem::Imperial).unwrap();
        assert_eq!(json, "\"imperial\"");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "00:00:00");
        assert_eq!(format_duration(2.5), "00:00:03");
        assert_eq!(format_duration(3723.2), "01:02:03");
        assert_eq!(format_duration(-4.0), "00:00:00");
        assert_eq!(format_duration(f64::NAN), "00:00:00");
    }

    proptest! {
        #[test]
        fn imperial_round_trip(value in -1.0e6f64..1.0e6) {
            let system = MeasurementSystem::Imperial;
            let back = system.from_display(system.to_display(value));
            prop_assert!((back - value).abs() <= 1e-9 * value.abs().max(1.0));
        }

        #[test]
        fn metric_is_identity(value in -1.0e6f64..1.0e6) {
            let system = MeasurementSystem::Metric;
            prop_assert_eq!(system.to_display(value), value);
            prop_assert_eq!(system.from_display(value), value);
        }
    }
}
