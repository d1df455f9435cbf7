//! Wind-group assembly
//!
//! Rules are evaluated in a fixed order: no data, calm, direction and speed
//! tokens, gust, variation suffix, low-speed `VRB`, wide-variation `VRB`.
//! Later rules read the classifications of earlier ones, so the order must
//! not change.

use std::sync::Arc;

use crate::normalizer::{Normalizer, StandardNormalizer};
use crate::report::{Reporter, TracingReporter};
use crate::tokens::{GUST, HUNDRED_AND_OVER, MISSING_DIRECTION, MISSING_SPEED, VARIABLE};
use crate::types::{DirectionVariation, SpeedCategory, VariationRange, WindGroup, WindObservation};
use crate::WindResult;

/// Smallest direction spread that is reported at all
pub const MIN_REPORTED_VARIATION: u32 = 60;

/// Spread from which the direction is always `VRB`
pub const VARIABLE_VARIATION: u32 = 180;

/// Gust is reported when the peak beats the mean by at least this much
pub const GUST_MARGIN_KNOTS: i64 = 10;

/// Speeds up to this many knots report a varying direction as `VRB`
pub const LOW_SPEED_KNOTS: i64 = 3;

/// Builds wind groups from observations
///
/// Stateless apart from its collaborators; share one instance across threads.
pub struct WindEncoder<N = StandardNormalizer> {
    normalizer: N,
    reporter: Arc<dyn Reporter>,
}

impl WindEncoder<StandardNormalizer> {
    /// Standard normalizer and encoder sharing one reporter
    pub fn with_reporter(reporter: Arc<dyn Reporter>) -> Self {
        Self::new(StandardNormalizer::new(Arc::clone(&reporter)), reporter)
    }
}

impl Default for WindEncoder<StandardNormalizer> {
    fn default() -> Self {
        Self::with_reporter(Arc::new(TracingReporter))
    }
}

impl<N: Normalizer> WindEncoder<N> {
    pub fn new(normalizer: N, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            normalizer,
            reporter,
        }
    }

    /// Encode one observation into its wind-group token
    pub fn encode(&self, observation: Option<&WindObservation>) -> WindResult<String> {
        self.encode_group(observation).map(|group| group.to_string())
    }

    pub fn encode_group(&self, observation: Option<&WindObservation>) -> WindResult<WindGroup> {
        let Some(obs) = observation else {
            self.reporter
                .report("encode", "no wind observation supplied", None);
            return Ok(WindGroup::Missing);
        };

        // A calm report never carries gust or variation
        if self.normalizer.is_calm(obs) {
            return Ok(WindGroup::Calm);
        }

        let n = &self.normalizer;
        let ddd = n.format_direction(obs.average_direction);
        let rounded = n
            .round_speed_to_knot(obs.average_speed)
            .map(|s| s.to_string());
        let ff = n.format_speed_token(rounded.as_deref())?;
        let min = n.format_direction(obs.min_direction);
        let max = n.format_direction(obs.max_direction);

        let gust = self.gust_speed(obs.average_speed, obs.max_speed)?;
        let variation = self.variation_range(Some(&min), Some(&max), Some(&ff))?;

        let fallback = if self.is_low_speed_variable(Some(&min), Some(&max), Some(&ff))? {
            VARIABLE.to_string()
        } else {
            ddd
        };
        let direction = self.direction_component(Some(&min), Some(&max), &fallback)?;

        let group = WindGroup::Reported {
            direction,
            speed: ff,
            gust,
            variation,
        };
        tracing::debug!(group = %group, "encoded wind group");
        Ok(group)
    }

    /// Spread between two formatted direction tokens
    ///
    /// Missing (`///`), blank and negative tokens give
    /// [`DirectionVariation::Undefined`], never a zero spread.
    pub fn variation(
        &self,
        min_direction: Option<&str>,
        max_direction: Option<&str>,
    ) -> WindResult<DirectionVariation> {
        let (Some(min), Some(max)) = (present_direction(min_direction), present_direction(max_direction))
        else {
            return Ok(DirectionVariation::Undefined);
        };

        let min = self.normalizer.parse_token(min, "min_direction")?;
        let max = self.normalizer.parse_token(max, "max_direction")?;
        if min < 0 || max < 0 {
            return Ok(DirectionVariation::Undefined);
        }

        let spread = u32::try_from(max.abs_diff(min)).unwrap_or(u32::MAX);
        Ok(DirectionVariation::Computed(spread))
    }

    /// Classify a formatted speed token for the variation rules
    pub fn classify_speed(&self, ff: Option<&str>) -> WindResult<SpeedCategory> {
        let ff = match ff {
            Some(ff) if !ff.trim().is_empty() && ff != MISSING_SPEED => ff,
            _ => return Ok(SpeedCategory::Invalid),
        };
        if ff == HUNDRED_AND_OVER {
            return Ok(SpeedCategory::AboveThreeKnots);
        }

        let category = match self.normalizer.parse_token(ff, "ff")? {
            s if s > LOW_SPEED_KNOTS => SpeedCategory::AboveThreeKnots,
            s if s >= 0 => SpeedCategory::AtMostThreeKnots,
            _ => SpeedCategory::Invalid,
        };
        Ok(category)
    }

    /// Gust speed token (without `G`) when the peak is at least
    /// [`GUST_MARGIN_KNOTS`] above the mean after rounding
    pub fn gust_speed(
        &self,
        average_speed: Option<f64>,
        max_speed: Option<f64>,
    ) -> WindResult<Option<String>> {
        let n = &self.normalizer;
        let (Some(average), Some(max)) = (
            n.round_speed_to_knot(average_speed),
            n.round_speed_to_knot(max_speed),
        ) else {
            return Ok(None);
        };

        // Saturating: readings far outside i64 clamp to its bounds
        if max.saturating_sub(average) < GUST_MARGIN_KNOTS {
            return Ok(None);
        }
        n.format_speed_token(Some(&max.to_string())).map(Some)
    }

    /// `G{ff}` or an empty string
    pub fn gust_token(&self, average_speed: Option<f64>, max_speed: Option<f64>) -> WindResult<String> {
        Ok(self
            .gust_speed(average_speed, max_speed)?
            .map(|gust| format!("{GUST}{gust}"))
            .unwrap_or_default())
    }

    /// Extreme directions to append after `KT`: spread in `[60, 180)` and
    /// a speed above three knots
    pub fn variation_range(
        &self,
        min_direction: Option<&str>,
        max_direction: Option<&str>,
        ff: Option<&str>,
    ) -> WindResult<Option<VariationRange>> {
        if self.classify_speed(ff)? != SpeedCategory::AboveThreeKnots {
            return Ok(None);
        }
        let variation = self.variation(min_direction, max_direction)?;
        if !variation.is_within(MIN_REPORTED_VARIATION, VARIABLE_VARIATION) {
            return Ok(None);
        }

        // Only reachable when both tokens are present
        Ok(min_direction.zip(max_direction).map(|(min, max)| VariationRange {
            min: min.to_string(),
            max: max.to_string(),
        }))
    }

    /// ` {min}V{max}` or an empty string
    pub fn variation_suffix(
        &self,
        min_direction: Option<&str>,
        max_direction: Option<&str>,
        ff: Option<&str>,
    ) -> WindResult<String> {
        Ok(self
            .variation_range(min_direction, max_direction, ff)?
            .map(|range| format!(" {range}"))
            .unwrap_or_default())
    }

    /// Spread in `[60, 180)` at three knots or less
    pub fn is_low_speed_variable(
        &self,
        min_direction: Option<&str>,
        max_direction: Option<&str>,
        ff: Option<&str>,
    ) -> WindResult<bool> {
        if self.classify_speed(ff)? != SpeedCategory::AtMostThreeKnots {
            return Ok(false);
        }
        let variation = self.variation(min_direction, max_direction)?;
        Ok(variation.is_within(MIN_REPORTED_VARIATION, VARIABLE_VARIATION))
    }

    /// `VRB` or an empty string
    pub fn low_speed_variable_direction(
        &self,
        min_direction: Option<&str>,
        max_direction: Option<&str>,
        ff: Option<&str>,
    ) -> WindResult<String> {
        let token = if self.is_low_speed_variable(min_direction, max_direction, ff)? {
            VARIABLE
        } else {
            ""
        };
        Ok(token.to_string())
    }

    /// `VRB` when the spread is 180 degrees or more, otherwise `fallback`
    pub fn direction_component(
        &self,
        min_direction: Option<&str>,
        max_direction: Option<&str>,
        fallback: &str,
    ) -> WindResult<String> {
        let variation = self.variation(min_direction, max_direction)?;
        if variation.is_at_least(VARIABLE_VARIATION) {
            return Ok(VARIABLE.to_string());
        }
        Ok(fallback.to_string())
    }
}

fn present_direction(token: Option<&str>) -> Option<&str> {
    token.filter(|t| !t.trim().is_empty() && *t != MISSING_DIRECTION)
}
