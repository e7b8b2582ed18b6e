//! Obstacle circumvention law used while following an obstacle.
//!
//! Given the nearest sensed point `p` at distance `d`:
//!
//! ```text
//! phRef = wrap(phLin + atan(K3 (d - SAFETY)))
//! w     = K1 phRef
//! v     = K2 cos(phRef)
//! ```
//!
//! where `phLin` is either the bearing of `p` or that bearing turned a quarter
//! turn clockwise (see [`FollowHeading`]).

use super::VelocityCommand;
use super::config::{ControllerConfig, FollowHeading};
use crate::simulation::error::{ControllerError, Result};
use crate::simulation::geometry::{LocalPoint, sensed_point, wrap_to_pi};
use crate::simulation::sensors::{SensorFrame, SonarBelt};

/// Intermediate values of one circumvention step, kept for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Steering {
    /// Index of the sonar with the smallest effective distance.
    pub nearest: usize,
    pub point: LocalPoint,
    pub distance: f64,
    pub ph_lin: f64,
    pub ph_rot: f64,
    pub ph_ref: f64,
    pub command: VelocityCommand,
}

/// Index of the sonar with the smallest effective distance, lowest index on ties.
///
/// # Errors
///
/// Returns [`ControllerError::EmptySonarBelt`] when the belt has no sensors.
pub fn nearest_sonar(belt: &SonarBelt) -> Result<usize> {
    let mut readings = belt.readings.iter().enumerate();
    let Some((_, first)) = readings.next() else {
        return Err(ControllerError::empty_belt("obstacle circumvention"));
    };

    let mut nearest = 0;
    let mut best = first.effective_distance(belt.max_range);
    for (i, reading) in readings {
        let distance = reading.effective_distance(belt.max_range);
        if distance < best {
            nearest = i;
            best = distance;
        }
    }
    Ok(nearest)
}

/// Runs the circumvention law on one snapshot.
///
/// # Errors
///
/// Returns [`ControllerError::EmptySonarBelt`] for an empty belt and
/// [`ControllerError::NonFiniteCommand`] if the readings produce NaN or infinity.
pub fn circumvent(frame: &SensorFrame, config: &ControllerConfig) -> Result<Steering> {
    let belt = &frame.sonars;
    let nearest = nearest_sonar(belt)?;
    let point = sensed_point(frame.agent_radius, &belt.readings[nearest], belt.max_range);
    let distance = point.norm();

    let ph_lin = match config.follow_heading {
        FollowHeading::Bearing => point.lateral.atan2(point.forward),
        FollowHeading::Tangent => (-point.forward).atan2(point.lateral),
    };
    let gains = config.gains;
    let ph_rot = (gains.k3 * (distance - config.safety_distance)).atan();
    let ph_ref = wrap_to_pi(ph_lin + ph_rot);

    let command = VelocityCommand::new(gains.k1 * ph_ref, gains.k2 * ph_ref.cos());
    command.ensure_finite("obstacle circumvention")?;

    Ok(Steering {
        nearest,
        point,
        distance,
        ph_lin,
        ph_rot,
        ph_ref,
        command,
    })
}
