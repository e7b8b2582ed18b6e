//! Predicates that decide when the controller changes behavior.
//!
//! All of these are pure functions of the current snapshot and, where needed,
//! the data the active state keeps.

use std::f64::consts::FRAC_PI_2;

use super::config::GoalPolicy;
use crate::simulation::error::{ControllerError, Result};
use crate::simulation::geometry::wrap_to_pi;
use crate::simulation::memory::ObservationHistory;
use crate::simulation::sensors::{LightTriad, Position, SensorFrame, SonarBelt};

/// True when the last three samples form a strict peak: `s[n-3] < s[n-2] > s[n-1]`.
///
/// Fewer than three samples never count as a peak.
#[must_use]
pub fn found_local_maximum(history: &ObservationHistory) -> bool {
    history
        .last_three()
        .is_some_and(|[newest, middle, oldest]| newest < middle && middle > oldest)
}

/// Whether a sonar mounted at `angle` looks into the forward hemisphere.
#[must_use]
pub fn in_forward_hemisphere(angle: f64) -> bool {
    wrap_to_pi(angle).abs() <= FRAC_PI_2
}

/// Smallest distance reported by forward-facing sonars that hit something.
///
/// # Errors
///
/// Returns [`ControllerError::EmptySonarBelt`] when the belt has no sensors.
pub fn nearest_forward_hit(belt: &SonarBelt) -> Result<Option<f64>> {
    if belt.is_empty() {
        return Err(ControllerError::empty_belt("obstacle detection"));
    }
    Ok(belt
        .readings
        .iter()
        .filter(|r| r.hit && in_forward_hemisphere(r.angle))
        .map(|r| r.distance)
        .reduce(f64::min))
}

/// True when something in the forward hemisphere is within `safety_distance`.
///
/// # Errors
///
/// Returns [`ControllerError::EmptySonarBelt`] when the belt has no sensors.
pub fn found_obstacle(belt: &SonarBelt, safety_distance: f64) -> Result<bool> {
    Ok(nearest_forward_hit(belt)?.is_some_and(|d| d <= safety_distance))
}

/// Whether the goal condition of `policy` holds for this snapshot.
#[must_use]
pub fn reached_goal(policy: &GoalPolicy, frame: &SensorFrame) -> bool {
    match *policy {
        GoalPolicy::Luminance {
            center_min,
            side_max,
        } => {
            let light = &frame.light;
            light.center >= center_min && light.left <= side_max && light.right <= side_max
        }
        GoalPolicy::Position { x, y, z, radius } => {
            frame.position.distance(&Position::new(x, y, z)) <= radius
        }
    }
}

/// Peak crossing: the left reading dropped below its last sample while the right
/// reading rose above its own.
#[must_use]
pub fn crossed_peak(previous_sides: Option<(f64, f64)>, light: &LightTriad) -> bool {
    previous_sides.is_some_and(|(left, right)| light.left < left && light.right > right)
}

/// Turn direction (+1 counter-clockwise, -1 clockwise) toward the brighter side.
///
/// Differences inside `deadband` carry the previous direction forward, or scan
/// counter-clockwise if there is none, so a balanced reading never flips the turn.
#[must_use]
pub fn turn_direction(light: &LightTriad, deadband: f64, previous_turn: f64) -> f64 {
    let difference = light.left - light.right;
    if difference.abs() <= deadband {
        if previous_turn == 0.0 {
            1.0
        } else {
            previous_turn.signum()
        }
    } else {
        difference.signum()
    }
}

/// True when `next_turn` points the opposite way to a non-zero `previous_turn`.
#[must_use]
pub fn reversed(previous_turn: f64, next_turn: f64) -> bool {
    previous_turn != 0.0 && next_turn != 0.0 && previous_turn.signum() == -next_turn.signum()
}
