//! Field normalization: rounding, range checks and token formatting
//!
//! Speeds round half away from zero; directions round to the nearest ten
//! with a units digit of 5 rounding *down*. The two rules are deliberately
//! different and must stay that way.

use std::sync::Arc;

use crate::report::{Reporter, TracingReporter};
use crate::tokens::{HUNDRED_AND_OVER, MISSING_DIRECTION, MISSING_SPEED};
use crate::types::WindObservation;
use crate::{WindError, WindResult};

/// Lowest and highest reportable direction
pub const MIN_REPORTED_DIRECTION: i64 = 10;
pub const MAX_REPORTED_DIRECTION: i64 = 360;

/// Calm threshold on the raw average speed (knots, inclusive)
pub const CALM_THRESHOLD_KNOTS: f64 = 1.0;

/// Non-finite readings count as not measured
pub fn measured(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Round a speed to whole knots, half away from zero
pub fn round_speed_to_knot(speed: f64) -> i64 {
    speed.round() as i64
}

/// Round a direction to the nearest ten degrees, ties (units digit 5) down
pub fn round_direction_to_ten(direction: f64) -> i64 {
    let units = (direction % 10.0).trunc();
    if units <= 5.0 {
        (direction - units) as i64
    } else {
        ((direction / 10.0).round() * 10.0) as i64
    }
}

/// 010 to 360 inclusive; 000 is never a legal heading
pub fn is_direction_in_range(direction: Option<i64>) -> bool {
    direction.is_some_and(|d| (MIN_REPORTED_DIRECTION..=MAX_REPORTED_DIRECTION).contains(&d))
}

pub fn is_speed_above_one(speed: Option<i64>) -> bool {
    speed.is_some_and(|s| s >= 1)
}

/// Converts raw observation fields into canonical tokens
pub trait Normalizer: Send + Sync {
    /// Rounded knots, `None` when the speed was not measured
    fn round_speed_to_knot(&self, speed: Option<f64>) -> Option<i64>;

    /// Rounded degrees, `None` when the direction was not measured
    fn round_direction_to_ten(&self, direction: Option<f64>) -> Option<i64>;

    /// Three-digit direction token, or `///` when missing or out of range
    fn format_direction(&self, direction: Option<f64>) -> String;

    /// Classify an already-rounded speed token into `ff`, `P99`, `00` or `//`
    ///
    /// Absent, empty and `//` input short-circuit to `//`. Any other
    /// non-numeric input is a [`WindError::Parse`].
    fn format_speed_token(&self, ff: Option<&str>) -> WindResult<String>;

    /// Strict integer parse of a token that must already be numeric
    fn parse_token(&self, value: &str, parameter: &str) -> WindResult<i64>;

    fn is_calm(&self, observation: &WindObservation) -> bool;
}

/// The standard normalizer, reporting malformed tokens to a [`Reporter`]
#[derive(Clone)]
pub struct StandardNormalizer {
    reporter: Arc<dyn Reporter>,
}

impl StandardNormalizer {
    pub fn new(reporter: Arc<dyn Reporter>) -> Self {
        Self { reporter }
    }
}

impl Default for StandardNormalizer {
    fn default() -> Self {
        Self::new(Arc::new(TracingReporter))
    }
}

impl std::fmt::Debug for StandardNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StandardNormalizer").finish_non_exhaustive()
    }
}

impl Normalizer for StandardNormalizer {
    fn round_speed_to_knot(&self, speed: Option<f64>) -> Option<i64> {
        measured(speed).map(round_speed_to_knot)
    }

    fn round_direction_to_ten(&self, direction: Option<f64>) -> Option<i64> {
        measured(direction).map(round_direction_to_ten)
    }

    fn format_direction(&self, direction: Option<f64>) -> String {
        match self.round_direction_to_ten(direction) {
            Some(rounded) if is_direction_in_range(Some(rounded)) => format!("{rounded:03}"),
            _ => MISSING_DIRECTION.to_string(),
        }
    }

    fn format_speed_token(&self, ff: Option<&str>) -> WindResult<String> {
        let ff = match ff {
            Some(ff) if !ff.is_empty() && ff != MISSING_SPEED => ff,
            _ => return Ok(MISSING_SPEED.to_string()),
        };

        let token = match self.parse_token(ff, "ff")? {
            n if n >= 100 => HUNDRED_AND_OVER.to_string(),
            n if n >= 1 => format!("{n:02}"),
            0 => "00".to_string(),
            _ => MISSING_SPEED.to_string(),
        };
        Ok(token)
    }

    fn parse_token(&self, value: &str, parameter: &str) -> WindResult<i64> {
        value.parse::<i64>().map_err(|_| {
            let fault = WindError::Parse {
                parameter: parameter.to_string(),
                value: value.to_string(),
            };
            self.reporter
                .report("parse_token", &fault.to_string(), Some(&fault));
            fault
        })
    }

    fn is_calm(&self, observation: &WindObservation) -> bool {
        measured(observation.average_speed).is_some_and(|s| s <= CALM_THRESHOLD_KNOTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::testing::RecordingReporter;

    fn normalizer() -> (StandardNormalizer, Arc<RecordingReporter>) {
        let reporter = Arc::new(RecordingReporter::default());
        (StandardNormalizer::new(reporter.clone()), reporter)
    }

    #[test]
    fn test_speed_rounding() {
        let (n, _) = normalizer();
        assert_eq!(n.round_speed_to_knot(None), None);
        assert_eq!(n.round_speed_to_knot(Some(0.0)), Some(0));
        assert_eq!(n.round_speed_to_knot(Some(0.4)), Some(0));
        assert_eq!(n.round_speed_to_knot(Some(0.5)), Some(1));
        assert_eq!(n.round_speed_to_knot(Some(0.9)), Some(1));
        assert_eq!(n.round_speed_to_knot(Some(1.4)), Some(1));
        assert_eq!(n.round_speed_to_knot(Some(2.5)), Some(3));
        assert_eq!(n.round_speed_to_knot(Some(f64::NAN)), None);
    }

    #[test]
    fn test_direction_rounding() {
        let (n, _) = normalizer();
        assert_eq!(n.round_direction_to_ten(None), None);
        assert_eq!(n.round_direction_to_ten(Some(0.0)), Some(0));
        assert_eq!(n.round_direction_to_ten(Some(5.0)), Some(0));
        assert_eq!(n.round_direction_to_ten(Some(15.0)), Some(10));
        assert_eq!(n.round_direction_to_ten(Some(16.0)), Some(20));
        assert_eq!(n.round_direction_to_ten(Some(20.0)), Some(20));
        assert_eq!(n.round_direction_to_ten(Some(15.7)), Some(10));
        assert_eq!(n.round_direction_to_ten(Some(356.0)), Some(360));
    }

    #[test]
    fn test_direction_rounding_is_idempotent() {
        for tenths in 0..=3_600 {
            let direction = f64::from(tenths) / 10.0;
            let once = round_direction_to_ten(direction);
            assert_eq!(once % 10, 0, "{direction} rounded to {once}");
            assert_eq!(round_direction_to_ten(once as f64), once);
        }
    }

    #[test]
    fn test_direction_range() {
        assert!(!is_direction_in_range(Some(5)));
        assert!(is_direction_in_range(Some(10)));
        assert!(is_direction_in_range(Some(100)));
        assert!(is_direction_in_range(Some(360)));
        assert!(!is_direction_in_range(Some(365)));
        assert!(!is_direction_in_range(Some(370)));
        assert!(!is_direction_in_range(Some(0)));
        assert!(!is_direction_in_range(None));
    }

    #[test]
    fn test_speed_above_one() {
        assert!(is_speed_above_one(Some(5)));
        assert!(is_speed_above_one(Some(1)));
        assert!(!is_speed_above_one(Some(-5)));
        assert!(!is_speed_above_one(Some(0)));
        assert!(!is_speed_above_one(None));
    }

    #[test]
    fn test_format_direction() {
        let (n, reporter) = normalizer();
        assert_eq!(n.format_direction(None), "///");
        assert_eq!(n.format_direction(Some(0.0)), "///");
        assert_eq!(n.format_direction(Some(4.0)), "///");
        assert_eq!(n.format_direction(Some(10.0)), "010");
        assert_eq!(n.format_direction(Some(15.0)), "010");
        assert_eq!(n.format_direction(Some(94.0)), "090");
        assert_eq!(n.format_direction(Some(357.0)), "360");
        assert_eq!(n.format_direction(Some(366.0)), "///");
        // Missing directions are not faults
        assert_eq!(reporter.count(), 0);
    }

    #[test]
    fn test_format_speed_token() {
        let (n, reporter) = normalizer();
        let cases = [
            (Some("05"), "05"),
            (Some("01"), "01"),
            (Some("99"), "99"),
            (Some("-05"), "//"),
            (Some("00"), "00"),
            (Some("100"), "P99"),
            (Some("101"), "P99"),
            (Some("//"), "//"),
            (Some(""), "//"),
            (None, "//"),
        ];
        for (input, expected) in cases {
            assert_eq!(n.format_speed_token(input).unwrap(), expected, "{input:?}");
        }
        assert_eq!(reporter.count(), 0);
    }

    #[test]
    fn test_malformed_speed_token_is_a_fault() {
        let (n, reporter) = normalizer();
        let err = n.format_speed_token(Some("abc")).unwrap_err();

        assert_eq!(
            err,
            WindError::Parse {
                parameter: "ff".into(),
                value: "abc".into()
            }
        );
        assert_eq!(err.to_string(), "Failed to parse 'ff' as an integer. Value: abc");
        assert_eq!(reporter.operations(), vec!["parse_token".to_string()]);
    }

    #[test]
    fn test_parse_token() {
        let (n, reporter) = normalizer();
        assert_eq!(n.parse_token("123", "testParameter").unwrap(), 123);
        assert_eq!(reporter.count(), 0);

        let err = n.parse_token("abc", "testParameter").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to parse 'testParameter' as an integer. Value: abc"
        );
        assert_eq!(reporter.count(), 1);
    }

    #[test]
    fn test_is_calm() {
        let (n, _) = normalizer();
        let with_speed = |speed| WindObservation {
            average_speed: speed,
            ..WindObservation::default()
        };
        assert!(!n.is_calm(&with_speed(None)));
        assert!(n.is_calm(&with_speed(Some(0.0))));
        assert!(n.is_calm(&with_speed(Some(1.0))));
        assert!(!n.is_calm(&with_speed(Some(1.01))));
        assert!(!n.is_calm(&with_speed(Some(f64::NAN))));
    }
}
