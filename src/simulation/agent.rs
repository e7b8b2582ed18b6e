use std::f64::consts::TAU;

use crate::simulation::controller::{
    ControllerConfig, NavigationController, TickOutcome, VelocityCommand,
};
use crate::simulation::environment::Arena;
use crate::simulation::error::Result;
use crate::simulation::params::{LIGHT_SENSOR_ANGLE, ROBOT_RADIUS, SONAR_COUNT, SONAR_MAX_RANGE};
use crate::simulation::sensors::{LightTriad, Position, SensorFrame, SonarBelt, SonarReading};

/// A differential-drive robot carrying a light triad and a sonar belt.
///
/// The robot owns its pose and its controller. Each tick it senses the arena,
/// asks the controller for a command and integrates that command over `dt`.
#[derive(Debug, Clone)]
pub struct Robot {
    pub x: f64,
    pub z: f64,
    /// World heading, counter-clockwise from +x.
    pub heading: f64,
    pub radius: f64,
    pub velocity: VelocityCommand,
    pub tick_count: u64,
    /// Mounting angles of the sonar belt, relative to the heading.
    pub sonar_angles: Vec<f64>,
    pub sonar_range: f64,
    pub controller: NavigationController,
}

impl Robot {
    /// Creates a robot at rest with a 12-sonar belt.
    ///
    /// # Errors
    ///
    /// Returns the controller's configuration error if `config` is invalid.
    pub fn new(x: f64, z: f64, heading: f64, config: ControllerConfig) -> Result<Self> {
        Ok(Self {
            x,
            z,
            heading,
            radius: ROBOT_RADIUS,
            velocity: VelocityCommand::stop(),
            tick_count: 0,
            sonar_angles: SonarBelt::evenly_spaced_angles(SONAR_COUNT),
            sonar_range: SONAR_MAX_RANGE,
            controller: NavigationController::new(config)?,
        })
    }

    /// Spawns a robot at the arena's start position, facing +x.
    ///
    /// # Errors
    ///
    /// Returns the controller's configuration error if `config` is invalid.
    pub fn spawn(arena: &Arena, config: ControllerConfig) -> Result<Self> {
        Self::new(arena.start.0, arena.start.1, 0.0, config)
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.x, 0.0, self.z)
    }

    /// Reads every sensor against the arena.
    #[must_use]
    pub fn sense(&self, arena: &Arena) -> SensorFrame {
        let light_at = |offset: f64| {
            let axis = self.heading + offset;
            let sx = self.x + self.radius * axis.cos();
            let sz = self.z + self.radius * axis.sin();
            arena.luminance(sx, sz, axis)
        };
        let light = LightTriad::new(
            light_at(0.0),
            light_at(LIGHT_SENSOR_ANGLE),
            light_at(-LIGHT_SENSOR_ANGLE),
        );

        let readings = self
            .sonar_angles
            .iter()
            .map(|&angle| {
                let surface = arena.cast_ray(self.x, self.z, self.heading + angle) - self.radius;
                if surface <= self.sonar_range {
                    SonarReading::hit(angle, surface.max(0.0))
                } else {
                    SonarReading::miss(angle)
                }
            })
            .collect();

        SensorFrame {
            tick: self.tick_count,
            position: self.position(),
            light,
            sonars: SonarBelt::new(readings, self.sonar_range),
            agent_radius: self.radius,
        }
    }

    /// Senses, runs the controller and moves the robot by one step of `dt`.
    ///
    /// Translation that would push the robot into a wall or obstacle is dropped;
    /// rotation is always applied.
    ///
    /// # Errors
    ///
    /// Propagates controller precondition errors. The robot does not move then.
    pub fn update_state(&mut self, arena: &Arena, dt: f64) -> Result<TickOutcome> {
        let frame = self.sense(arena);
        let outcome = self.controller.tick(&frame)?;
        self.apply(arena, outcome.command, dt);
        Ok(outcome)
    }

    /// Integrates `command` over `dt` with unicycle kinematics.
    pub fn apply(&mut self, arena: &Arena, command: VelocityCommand, dt: f64) {
        self.velocity = command;
        self.heading = (self.heading + command.rotational * dt).rem_euclid(TAU);

        let step = command.translational * dt;
        let next_x = self.x + step * self.heading.cos();
        let next_z = self.z + step * self.heading.sin();
        if !arena.collides(next_x, next_z, self.radius) {
            self.x = next_x;
            self.z = next_z;
        }
        self.tick_count += 1;
    }
}
