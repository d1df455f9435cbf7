//! Speed unit conversion
//!
//! The wind group is always reported in knots; stations that measure in
//! other units are converted before encoding.

use std::fmt;
use std::str::FromStr;

use crate::types::WindObservation;

/// Unit conversion error
#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    #[error("Unknown speed unit: {0}")]
    UnknownSpeedUnit(String),
}

/// Unit of a raw speed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SpeedUnit {
    #[default]
    Knots,
    MetersPerSecond,
    KilometersPerHour,
    MilesPerHour,
}

impl SpeedUnit {
    /// Knots per one unit
    fn knots_factor(self) -> f64 {
        match self {
            SpeedUnit::Knots => 1.0,
            SpeedUnit::MetersPerSecond => 1.943_844_5,
            SpeedUnit::KilometersPerHour => 0.539_956_8,
            SpeedUnit::MilesPerHour => 0.868_976_2,
        }
    }
}

impl FromStr for SpeedUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kt" | "knots" => Ok(SpeedUnit::Knots),
            "mps" | "m/s" => Ok(SpeedUnit::MetersPerSecond),
            "kph" | "km/h" => Ok(SpeedUnit::KilometersPerHour),
            "mph" => Ok(SpeedUnit::MilesPerHour),
            other => Err(UnitError::UnknownSpeedUnit(other.to_string())),
        }
    }
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpeedUnit::Knots => "knots",
            SpeedUnit::MetersPerSecond => "mps",
            SpeedUnit::KilometersPerHour => "kph",
            SpeedUnit::MilesPerHour => "mph",
        };
        f.write_str(name)
    }
}

/// Convert a speed to knots
pub fn to_knots(value: f64, unit: SpeedUnit) -> f64 {
    if unit == SpeedUnit::Knots {
        return value;
    }
    value * unit.knots_factor()
}

impl WindObservation {
    /// Copy of this observation with both speeds expressed in knots
    pub fn to_knots(&self, unit: SpeedUnit) -> WindObservation {
        WindObservation {
            average_speed: self.average_speed.map(|v| to_knots(v, unit)),
            max_speed: self.max_speed.map(|v| to_knots(v, unit)),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_conversion() {
        // 10 m/s ~ 19.44 kt
        let result = to_knots(10.0, SpeedUnit::MetersPerSecond);
        assert!((result - 19.438).abs() < 0.01);

        // 100 km/h ~ 54.0 kt
        let result = to_knots(100.0, SpeedUnit::KilometersPerHour);
        assert!((result - 53.996).abs() < 0.01);

        // 23 mph ~ 20 kt
        let result = to_knots(23.0, SpeedUnit::MilesPerHour);
        assert!((result - 19.986).abs() < 0.01);
    }

    #[test]
    fn test_same_unit_conversion() {
        assert_eq!(to_knots(25.0, SpeedUnit::Knots), 25.0);
    }

    #[test]
    fn test_unit_parsing() {
        assert_eq!("kt".parse::<SpeedUnit>().unwrap(), SpeedUnit::Knots);
        assert_eq!(" M/S ".parse::<SpeedUnit>().unwrap(), SpeedUnit::MetersPerSecond);
        assert_eq!("km/h".parse::<SpeedUnit>().unwrap(), SpeedUnit::KilometersPerHour);
        assert_eq!("mph".parse::<SpeedUnit>().unwrap(), SpeedUnit::MilesPerHour);
        assert!("furlongs".parse::<SpeedUnit>().is_err());
        assert_eq!(SpeedUnit::MetersPerSecond.to_string(), "mps");
    }

    #[test]
    fn test_observation_conversion_keeps_directions() {
        let obs = WindObservation {
            average_direction: Some(210.0),
            average_speed: Some(5.0),
            min_direction: Some(180.0),
            max_direction: None,
            max_speed: None,
        };
        let knots = obs.to_knots(SpeedUnit::MetersPerSecond);

        assert_eq!(knots.average_direction, Some(210.0));
        assert_eq!(knots.min_direction, Some(180.0));
        assert_eq!(knots.max_direction, None);
        assert_eq!(knots.max_speed, None);
        assert!((knots.average_speed.unwrap() - 9.719).abs() < 0.01);
    }
}
