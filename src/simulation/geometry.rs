//! Planar helpers shared by the circumvention law and the arena.
//!
//! The agent frame has `forward` along the heading and `lateral` pointing to the
//! agent's left, so positive angles are counter-clockwise.

use std::f64::consts::{PI, TAU};

use crate::simulation::sensors::SonarReading;

/// A point in the agent's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocalPoint {
    pub forward: f64,
    pub lateral: f64,
}

impl LocalPoint {
    #[must_use]
    pub const fn new(forward: f64, lateral: f64) -> Self {
        Self { forward, lateral }
    }

    /// Distance from the agent origin.
    #[must_use]
    pub fn norm(&self) -> f64 {
        self.forward.hypot(self.lateral)
    }

    /// Angle of the point relative to the heading, in (-π, π].
    #[must_use]
    pub fn bearing(&self) -> f64 {
        self.lateral.atan2(self.forward)
    }
}

/// Wraps an angle into (-π, π].
///
/// Angles already inside the interval come back untouched, which makes the
/// function exactly idempotent. Non-finite input is returned as is.
#[must_use]
pub fn wrap_to_pi(angle: f64) -> f64 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let wrapped = PI - (PI - angle).rem_euclid(TAU);
    // rem_euclid may round up to TAU for tiny negative remainders
    if wrapped <= -PI { PI } else { wrapped }
}

/// Converts a sonar reading into the sensed surface point in the agent frame.
///
/// The point lies `agent_radius + distance` along the sensor's mounting angle,
/// using `max_range` in place of the distance when the sensor saw nothing.
#[must_use]
pub fn sensed_point(agent_radius: f64, reading: &SonarReading, max_range: f64) -> LocalPoint {
    let range = agent_radius + reading.effective_distance(max_range);
    LocalPoint {
        forward: range * reading.angle.cos(),
        lateral: range * reading.angle.sin(),
    }
}
