//! Core data types for wind observations and encoded wind groups

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tokens::{CALM_WINDS, DEFAULT_GROUP, GUST, KNOT, MISSING_DIRECTION, VARIABLE};

/// One ten-minute wind observation
///
/// Every field is optional: `None` means "not measured" and is rendered as a
/// missing-value token, never as zero.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WindObservation {
    /// Mean direction over the window (degrees true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_direction: Option<f64>,

    /// Mean speed over the window (knots)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_speed: Option<f64>,

    /// Extreme directions seen during the window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_direction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_direction: Option<f64>,

    /// Highest speed seen during the window (knots), the gust candidate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>,
}

/// Spread between the extreme directions of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionVariation {
    Computed(u32),
    /// One of the extremes is missing or negative
    Undefined,
}

impl DirectionVariation {
    /// True for a computed variation in `[low, high)`
    pub fn is_within(self, low: u32, high: u32) -> bool {
        matches!(self, DirectionVariation::Computed(v) if v >= low && v < high)
    }

    pub fn is_at_least(self, threshold: u32) -> bool {
        matches!(self, DirectionVariation::Computed(v) if v >= threshold)
    }
}

/// Speed classification used by the variation rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedCategory {
    /// More than 3 knots, including `P99`
    AboveThreeKnots,
    /// 0 to 3 knots inclusive
    AtMostThreeKnots,
    /// Missing, empty or negative
    Invalid,
}

/// Outcome of direction-component selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionKind {
    Calm,
    Missing,
    Variable,
    Directional,
}

/// Extreme directions reported after the `KT` unit, e.g. `180V270`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariationRange {
    pub min: String,
    pub max: String,
}

impl fmt::Display for VariationRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}V{}", self.min, self.max)
    }
}

/// An encoded surface-wind group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindGroup {
    /// No observation at all: `/////KT`
    Missing,
    /// Average speed of one knot or less: `00000KT`
    Calm,
    Reported {
        /// `ddd`, `VRB` or `///`
        direction: String,
        /// `ff`, `P99` or `//`
        speed: String,
        /// Gust speed without the `G` marker
        gust: Option<String>,
        variation: Option<VariationRange>,
    },
}

impl WindGroup {
    pub fn direction_kind(&self) -> DirectionKind {
        match self {
            WindGroup::Calm => DirectionKind::Calm,
            WindGroup::Missing => DirectionKind::Missing,
            WindGroup::Reported { direction, .. } => match direction.as_str() {
                VARIABLE => DirectionKind::Variable,
                MISSING_DIRECTION => DirectionKind::Missing,
                _ => DirectionKind::Directional,
            },
        }
    }
}

impl fmt::Display for WindGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindGroup::Missing => f.write_str(DEFAULT_GROUP),
            WindGroup::Calm => f.write_str(CALM_WINDS),
            WindGroup::Reported {
                direction,
                speed,
                gust,
                variation,
            } => {
                write!(f, "{direction}{speed}")?;
                if let Some(gust) = gust {
                    write!(f, "{GUST}{gust}")?;
                }
                f.write_str(KNOT)?;
                if let Some(range) = variation {
                    write!(f, " {range}")?;
                }
                Ok(())
            }
        }
    }
}
