//! Length units and inch/millimeter conversion

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Millimeters per inch, exact by definition.
pub const MM_PER_INCH: f64 = 25.4;

/// Length unit accepted for dimensional updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Inches
    #[default]
    In,
    /// Millimeters
    Mm,
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Unit::In => write!(f, "in"),
            Unit::Mm => write!(f, "mm"),
        }
    }
}

impl std::str::FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" | "inch" | "inches" => Ok(Unit::In),
            "mm" | "millimeter" | "millimeters" => Ok(Unit::Mm),
            _ => Err(format!("Invalid unit: '{}'. Use 'in' or 'mm'", s)),
        }
    }
}

/// Convert inches to millimeters. No rounding; display formatting is a
/// presentation concern.
pub fn to_millimeters(inches: f64) -> f64 {
    inches * MM_PER_INCH
}

/// Convert millimeters to inches.
pub fn to_inches(millimeters: f64) -> f64 {
    millimeters / MM_PER_INCH
}

impl Unit {
    /// Convert a magnitude from this unit into `target`.
    pub fn convert(self, value: f64, target: Unit) -> f64 {
        match (self, target) {
            (Unit::In, Unit::Mm) => to_millimeters(value),
            (Unit::Mm, Unit::In) => to_inches(value),
            _ => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inch_to_mm() {
        assert_eq!(to_millimeters(1.0), 25.4);
        assert_eq!(to_millimeters(65.25), 65.25 * 25.4);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        for x in [0.001, 1.0, 4.0, 65.25, 82.98, 10_000.0] {
            assert!((to_inches(to_millimeters(x)) - x).abs() < 1e-9 * x.max(1.0));
        }
    }

    #[test]
    fn test_convert_is_identity_for_same_unit() {
        assert_eq!(Unit::In.convert(65.25, Unit::In), 65.25);
        assert_eq!(Unit::Mm.convert(120.0, Unit::Mm), 120.0);
    }

    #[test]
    fn test_unit_parse_and_display() {
        assert_eq!("in".parse::<Unit>().unwrap(), Unit::In);
        assert_eq!("Inch".parse::<Unit>().unwrap(), Unit::In);
        assert_eq!("MM".parse::<Unit>().unwrap(), Unit::Mm);
        assert!("cm".parse::<Unit>().is_err());
        assert_eq!(Unit::In.to_string(), "in");
        assert_eq!(Unit::Mm.to_string(), "mm");
    }
}
