//! Controller configuration.
//!
//! Every field has a default, so a JSON file only needs the values it overrides:
//!
//! ```
//! use phototaxis_rust::simulation::controller::{ControllerConfig, FollowHeading};
//!
//! let config = ControllerConfig::from_json(r#"{ "follow_heading": "bearing" }"#).unwrap();
//! assert_eq!(config.follow_heading, FollowHeading::Bearing);
//! assert!((config.safety_distance - 0.7).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::simulation::error::{ControllerError, Result};
use crate::simulation::params::{
    CRUISE_SPEED, FINAL_TURN_RATE, GOAL_CENTER_LUMINANCE, GOAL_RADIUS, GOAL_SIDE_LUMINANCE,
    REPULSION_GAIN, ROTATION_GAIN, SAFETY_DISTANCE, SAMPLE_EVERY, SCAN_RATE, TRANSLATION_GAIN,
    TURN_DEADBAND,
};

/// How the Forward state decides that the light has been reached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoalPolicy {
    /// Tight, centered illumination: bright center, dim sides.
    Luminance { center_min: f64, side_max: f64 },
    /// Within `radius` of a known goal coordinate.
    Position { x: f64, y: f64, z: f64, radius: f64 },
}

impl Default for GoalPolicy {
    fn default() -> Self {
        Self::Luminance {
            center_min: GOAL_CENTER_LUMINANCE,
            side_max: GOAL_SIDE_LUMINANCE,
        }
    }
}

impl GoalPolicy {
    /// Position goal with the default arrival radius.
    #[must_use]
    pub const fn at(x: f64, y: f64, z: f64) -> Self {
        Self::Position {
            x,
            y,
            z,
            radius: GOAL_RADIUS,
        }
    }
}

/// How the Orientation state decides it is facing the light.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlignmentPolicy {
    /// Spin counter-clockwise until the left reading falls while the right rises.
    #[default]
    PeakCrossing,
    /// Turn toward the brighter side and stop once the chosen direction reverses.
    TurnReversal {
        /// Rotation commanded on the tick the reversal is detected.
        final_turn_rate: f64,
        /// Side differences at or below this magnitude count as no preference.
        deadband: f64,
    },
}

impl AlignmentPolicy {
    /// Turn reversal with default final turn and deadband.
    #[must_use]
    pub const fn turn_reversal() -> Self {
        Self::TurnReversal {
            final_turn_rate: FINAL_TURN_RATE,
            deadband: TURN_DEADBAND,
        }
    }
}

/// Reference heading used by the circumvention law before the repulsive term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowHeading {
    /// Bearing of the nearest sensed point. Drives at the surface rather than around it.
    Bearing,
    /// Bearing rotated a quarter turn clockwise, keeping the obstacle on the left.
    #[default]
    Tangent,
}

/// Gains of the circumvention law.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringGains {
    /// Rotational gain on the reference heading (K1).
    pub k1: f64,
    /// Translational gain (K2).
    pub k2: f64,
    /// Slope of the repulsive term (K3).
    pub k3: f64,
}

impl Default for SteeringGains {
    fn default() -> Self {
        Self {
            k1: ROTATION_GAIN,
            k2: TRANSLATION_GAIN,
            k3: REPULSION_GAIN,
        }
    }
}

/// Full configuration of a [`NavigationController`](super::NavigationController).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub goal: GoalPolicy,
    /// Obstacles closer than this (from the agent's surface) trigger Follow.
    pub safety_distance: f64,
    pub gains: SteeringGains,
    /// Translational velocity in Forward.
    pub cruise_speed: f64,
    /// Rotational velocity while scanning in Orientation.
    pub scan_rate: f64,
    /// Observations are sampled on ticks divisible by this.
    pub sample_every: u64,
    pub alignment: AlignmentPolicy,
    pub follow_heading: FollowHeading,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            goal: GoalPolicy::default(),
            safety_distance: SAFETY_DISTANCE,
            gains: SteeringGains::default(),
            cruise_speed: CRUISE_SPEED,
            scan_rate: SCAN_RATE,
            sample_every: SAMPLE_EVERY,
            alignment: AlignmentPolicy::default(),
            follow_heading: FollowHeading::default(),
        }
    }
}

impl ControllerConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::ConfigParse`] for malformed JSON and
    /// [`ControllerError::InvalidConfig`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_goal(mut self, goal: GoalPolicy) -> Self {
        self.goal = goal;
        self
    }

    #[must_use]
    pub fn with_safety_distance(mut self, safety_distance: f64) -> Self {
        self.safety_distance = safety_distance;
        self
    }

    #[must_use]
    pub fn with_gains(mut self, gains: SteeringGains) -> Self {
        self.gains = gains;
        self
    }

    #[must_use]
    pub fn with_cruise_speed(mut self, cruise_speed: f64) -> Self {
        self.cruise_speed = cruise_speed;
        self
    }

    #[must_use]
    pub fn with_scan_rate(mut self, scan_rate: f64) -> Self {
        self.scan_rate = scan_rate;
        self
    }

    #[must_use]
    pub fn with_sample_every(mut self, sample_every: u64) -> Self {
        self.sample_every = sample_every;
        self
    }

    #[must_use]
    pub fn with_alignment(mut self, alignment: AlignmentPolicy) -> Self {
        self.alignment = alignment;
        self
    }

    #[must_use]
    pub fn with_follow_heading(mut self, follow_heading: FollowHeading) -> Self {
        self.follow_heading = follow_heading;
        self
    }

    /// Checks every value the controller relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::InvalidConfig`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        positive("safety_distance", self.safety_distance)?;
        positive("gains.k1", self.gains.k1)?;
        positive("gains.k2", self.gains.k2)?;
        positive("gains.k3", self.gains.k3)?;
        positive("cruise_speed", self.cruise_speed)?;
        // Peak crossing assumes a counter-clockwise sweep
        positive("scan_rate", self.scan_rate)?;
        if self.sample_every == 0 {
            return Err(ControllerError::invalid("sample_every", "at least 1", 0.0));
        }

        match self.goal {
            GoalPolicy::Luminance {
                center_min,
                side_max,
            } => {
                non_negative("goal.side_max", side_max)?;
                if !(center_min.is_finite() && center_min > side_max) {
                    return Err(ControllerError::invalid(
                        "goal.center_min",
                        "finite and above goal.side_max",
                        center_min,
                    ));
                }
            }
            GoalPolicy::Position { x, y, z, radius } => {
                finite("goal.x", x)?;
                finite("goal.y", y)?;
                finite("goal.z", z)?;
                positive("goal.radius", radius)?;
            }
        }

        if let AlignmentPolicy::TurnReversal {
            final_turn_rate,
            deadband,
        } = self.alignment
        {
            positive("alignment.final_turn_rate", final_turn_rate)?;
            non_negative("alignment.deadband", deadband)?;
        }

        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ControllerError::invalid(field, "finite", value))
    }
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ControllerError::invalid(field, "finite and positive", value))
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ControllerError::invalid(field, "finite and non-negative", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ControllerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_safety() {
        let config = ControllerConfig::default().with_safety_distance(0.0);
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ControllerError::InvalidConfig {
                field: "safety_distance",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_sampling_divisor() {
        let config = ControllerConfig::default().with_sample_every(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_luminance_thresholds() {
        let config = ControllerConfig::default().with_goal(GoalPolicy::Luminance {
            center_min: 0.03,
            side_max: 0.04,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_nan_gain() {
        let config = ControllerConfig::default().with_gains(SteeringGains {
            k3: f64::NAN,
            ..SteeringGains::default()
        });
        assert!(config.validate().is_err());
    }
}
