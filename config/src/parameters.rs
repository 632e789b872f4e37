//! Resolved capture parameters with defaults applied.

use std::num::NonZeroU32;
use std::time::Duration;

use lattice_core::{DEFAULT_MAX_POINTS, DEFAULT_MIN_POINTS, ShapePolicy};

use crate::{CaptureConfig, LatticeConfig, ShapeConfig};

pub const DEFAULT_DELAY_BETWEEN_CAPTURE: Duration = Duration::from_millis(1000);
pub const DEFAULT_INVALID_VIBRATE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureParameters {
    pub delay_between_capture: Duration,
    pub vibrate_on_invalid: bool,
    pub invalid_vibrate: Duration,
    pub max_confirmation_attempts: Option<NonZeroU32>,
    pub shape: ShapePolicy,
}

impl Default for CaptureParameters {
    fn default() -> Self {
        Self {
            delay_between_capture: DEFAULT_DELAY_BETWEEN_CAPTURE,
            vibrate_on_invalid: true,
            invalid_vibrate: DEFAULT_INVALID_VIBRATE,
            max_confirmation_attempts: None,
            shape: ShapePolicy::default(),
        }
    }
}

impl CaptureParameters {
    #[must_use]
    pub fn from_config(config: Option<&LatticeConfig>) -> Self {
        let default_capture = CaptureConfig::default();
        let default_shape = ShapeConfig::default();
        let capture = config
            .and_then(|cfg| cfg.capture.as_ref())
            .unwrap_or(&default_capture);
        let shape = config
            .and_then(|cfg| cfg.shape.as_ref())
            .unwrap_or(&default_shape);

        let max_confirmation_attempts = match capture.max_confirmation_attempts {
            Some(0) => {
                tracing::warn!("capture.max_confirmation_attempts must be at least 1; ignoring");
                None
            }
            Some(n) => NonZeroU32::new(n),
            None => None,
        };

        Self {
            delay_between_capture: capture
                .delay_between_capture_ms
                .map_or(DEFAULT_DELAY_BETWEEN_CAPTURE, Duration::from_millis),
            vibrate_on_invalid: capture.vibrate_on_invalid,
            invalid_vibrate: capture
                .invalid_vibrate_ms
                .map_or(DEFAULT_INVALID_VIBRATE, Duration::from_millis),
            max_confirmation_attempts,
            shape: shape_policy(shape),
        }
    }
}

fn shape_policy(shape: &ShapeConfig) -> ShapePolicy {
    let min_points = match shape.min_points {
        Some(n) if (1..=DEFAULT_MAX_POINTS).contains(&n) => n,
        Some(n) => {
            tracing::warn!(
                "shape.min_points = {n} is outside 1..={DEFAULT_MAX_POINTS}; using {DEFAULT_MIN_POINTS}"
            );
            DEFAULT_MIN_POINTS
        }
        None => DEFAULT_MIN_POINTS,
    };
    let max_points = match shape.max_points {
        Some(n) if (min_points..=DEFAULT_MAX_POINTS).contains(&n) => n,
        Some(n) => {
            tracing::warn!(
                "shape.max_points = {n} is outside {min_points}..={DEFAULT_MAX_POINTS}; using {DEFAULT_MAX_POINTS}"
            );
            DEFAULT_MAX_POINTS
        }
        None => DEFAULT_MAX_POINTS,
    };
    ShapePolicy::new(min_points, max_points, shape.reject_weak)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_yields_defaults() {
        let params = CaptureParameters::from_config(None);
        assert_eq!(params, CaptureParameters::default());
        assert_eq!(params.delay_between_capture, Duration::from_secs(1));
        assert_eq!(params.shape.min_points(), 4);
    }

    #[test]
    fn configured_values_are_applied() {
        let config = LatticeConfig::parse(
            r"
[capture]
delay_between_capture_ms = 300
vibrate_on_invalid = false
invalid_vibrate_ms = 80
max_confirmation_attempts = 2

[shape]
min_points = 3
max_points = 6
reject_weak = false
",
        )
        .unwrap();
        let params = CaptureParameters::from_config(Some(&config));
        assert_eq!(params.delay_between_capture, Duration::from_millis(300));
        assert!(!params.vibrate_on_invalid);
        assert_eq!(params.invalid_vibrate, Duration::from_millis(80));
        assert_eq!(params.max_confirmation_attempts, NonZeroU32::new(2));
        assert_eq!(params.shape, ShapePolicy::new(3, 6, false));
    }

    #[test]
    fn out_of_range_shape_limits_fall_back() {
        let config = LatticeConfig::parse("[shape]\nmin_points = 0\nmax_points = 12\n")
            .unwrap();
        let params = CaptureParameters::from_config(Some(&config));
        assert_eq!(params.shape.min_points(), DEFAULT_MIN_POINTS);
        assert_eq!(params.shape.max_points(), DEFAULT_MAX_POINTS);
    }

    #[test]
    fn max_below_min_falls_back() {
        let config = LatticeConfig::parse("[shape]\nmin_points = 6\nmax_points = 5\n")
            .unwrap();
        let params = CaptureParameters::from_config(Some(&config));
        assert_eq!(params.shape.min_points(), 6);
        assert_eq!(params.shape.max_points(), DEFAULT_MAX_POINTS);
    }

    #[test]
    fn zero_confirmation_attempts_means_unlimited() {
        let config = LatticeConfig::parse("[capture]\nmax_confirmation_attempts = 0\n")
            .unwrap();
        let params = CaptureParameters::from_config(Some(&config));
        assert_eq!(params.max_confirmation_attempts, None);
    }
}
