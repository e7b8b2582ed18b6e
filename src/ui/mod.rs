pub mod field;
pub mod render;

use crate::simulation::agent::Robot;
use crate::simulation::controller::{Mode, VelocityCommand};
use crate::simulation::sensors::LightTriad;

/// What the HUD line shows about the robot each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardState {
    pub mode: Mode,
    pub light: LightTriad,
    pub command: VelocityCommand,
    pub tick: u64,
    /// Planar distance from the robot to the light.
    pub light_distance: f64,
}

impl DashboardState {
    #[must_use]
    pub fn capture(robot: &Robot, light: LightTriad, light_xz: (f64, f64)) -> Self {
        Self {
            mode: robot.controller.mode(),
            light,
            command: robot.velocity,
            tick: robot.tick_count,
            light_distance: (light_xz.0 - robot.x).hypot(light_xz.1 - robot.z),
        }
    }

    /// Everything on the HUD except the mode label.
    #[must_use]
    pub fn readout(&self) -> String {
        format!(
            "Lum C/L/R: {:.3} {:.3} {:.3} | Rot: {:+.2} | Trans: {:+.2} | Dist: {:.2} | Tick: {}",
            self.light.center,
            self.light.left,
            self.light.right,
            self.command.rotational,
            self.command.translational,
            self.light_distance,
            self.tick
        )
    }

    #[must_use]
    pub fn hud_line(&self) -> String {
        format!("{:<11} | {}", self.mode.to_string(), self.readout())
    }
}
