//! Reactive navigation controller.
//!
//! A four-state machine ticked once per simulation step:
//!
//! | State         | Action                         | Leaves when                         |
//! |---------------|--------------------------------|-------------------------------------|
//! | `Orientation` | rotate in place                | aligned with the light -> `Forward` |
//! | `Forward`     | drive straight                 | goal -> `Stop`, obstacle -> `Follow`, luminance peak -> `Orientation` |
//! | `Follow`      | circumvention law              | luminance peak -> `Orientation`     |
//! | `Stop`        | stand still                    | never                               |
//!
//! Each state carries its own observation data, and a transition
//! always builds the next state's data from scratch, so nothing observed in one
//! behavior can leak into the next.

mod circumvent;
mod config;
mod detectors;

use std::fmt;

use tracing::{debug, info, trace};

pub use circumvent::{Steering, circumvent, nearest_sonar};
pub use config::{AlignmentPolicy, ControllerConfig, FollowHeading, GoalPolicy, SteeringGains};
pub use detectors::{
    crossed_peak, found_local_maximum, found_obstacle, in_forward_hemisphere,
    nearest_forward_hit, reached_goal, reversed, turn_direction,
};

use crate::simulation::error::{ControllerError, Result};
use crate::simulation::memory::ObservationHistory;
use crate::simulation::sensors::SensorFrame;

/// Velocity intent written once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VelocityCommand {
    /// Radians per unit time, counter-clockwise positive.
    pub rotational: f64,
    /// Length per unit time along the heading.
    pub translational: f64,
}

impl VelocityCommand {
    #[must_use]
    pub const fn new(rotational: f64, translational: f64) -> Self {
        Self {
            rotational,
            translational,
        }
    }

    #[must_use]
    pub const fn stop() -> Self {
        Self::new(0.0, 0.0)
    }

    #[must_use]
    pub const fn rotate(rate: f64) -> Self {
        Self::new(rate, 0.0)
    }

    #[must_use]
    pub const fn drive(speed: f64) -> Self {
        Self::new(0.0, speed)
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.rotational.is_finite() && self.translational.is_finite()
    }

    /// # Errors
    ///
    /// Returns [`ControllerError::NonFiniteCommand`] if either component is NaN or infinite.
    pub fn ensure_finite(&self, context: &'static str) -> Result<()> {
        if self.is_finite() {
            Ok(())
        } else {
            Err(ControllerError::NonFiniteCommand {
                context,
                rotational: self.rotational,
                translational: self.translational,
            })
        }
    }
}

/// Behavior the controller is currently in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Orientation,
    Forward,
    Follow,
    Stop,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Orientation => "Orientation",
            Self::Forward => "Forward",
            Self::Follow => "Follow",
            Self::Stop => "Stop",
        };
        f.write_str(name)
    }
}

/// Why a transition happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionReason {
    Aligned,
    GoalReached,
    ObstacleDetected,
    LocalMaximum,
    Reset,
}

/// A state change, reported by the tick that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Mode,
    pub to: Mode,
    pub reason: TransitionReason,
    pub tick: u64,
}

/// Result of one controller tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub command: VelocityCommand,
    pub transition: Option<Transition>,
}

/// Orientation-private memory.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Scan {
    /// Last sampled (left, right) luminance, for peak crossing.
    previous_sides: Option<(f64, f64)>,
    /// Direction of the last commanded turn, for turn reversal. Zero before the first.
    previous_turn: f64,
}

/// Active state together with the data only that state uses.
#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Orientation(Scan),
    Forward(ObservationHistory),
    Follow(ObservationHistory),
    Stop,
}

impl Phase {
    fn fresh(mode: Mode) -> Self {
        match mode {
            Mode::Orientation => Self::Orientation(Scan::default()),
            Mode::Forward => Self::Forward(ObservationHistory::new()),
            Mode::Follow => Self::Follow(ObservationHistory::new()),
            Mode::Stop => Self::Stop,
        }
    }

    const fn mode(&self) -> Mode {
        match self {
            Self::Orientation(_) => Mode::Orientation,
            Self::Forward(_) => Mode::Forward,
            Self::Follow(_) => Mode::Follow,
            Self::Stop => Mode::Stop,
        }
    }
}

/// What a state handler decided for this tick.
struct Step {
    phase: Phase,
    command: VelocityCommand,
    next: Option<(Mode, TransitionReason)>,
}

impl Step {
    const fn stay(phase: Phase, command: VelocityCommand) -> Self {
        Self {
            phase,
            command,
            next: None,
        }
    }

    const fn switch(
        phase: Phase,
        command: VelocityCommand,
        to: Mode,
        reason: TransitionReason,
    ) -> Self {
        Self {
            phase,
            command,
            next: Some((to, reason)),
        }
    }
}

/// Finite-state phototaxis controller for one agent.
///
/// The controller never fails once constructed except on malformed snapshots; a
/// failed tick leaves its state exactly as it was.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationController {
    config: ControllerConfig,
    phase: Phase,
    last_command: VelocityCommand,
}

impl NavigationController {
    /// Creates a controller in `Orientation` with zeroed velocities.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: ControllerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            phase: Phase::fresh(Mode::Orientation),
            last_command: VelocityCommand::stop(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.phase.mode()
    }

    /// Command emitted by the last successful tick.
    #[must_use]
    pub const fn last_command(&self) -> VelocityCommand {
        self.last_command
    }

    /// Sampled center luminance of the current state, if it keeps any.
    #[must_use]
    pub const fn history(&self) -> Option<&ObservationHistory> {
        match &self.phase {
            Phase::Forward(history) | Phase::Follow(history) => Some(history),
            Phase::Orientation(_) | Phase::Stop => None,
        }
    }

    /// Returns to the spawn state: `Orientation`, nothing observed, zero velocity.
    pub fn reset(&mut self, tick: u64) -> Transition {
        self.last_command = VelocityCommand::stop();
        self.transition(Mode::Orientation, TransitionReason::Reset, tick)
    }

    /// Runs one control step.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::EmptySonarBelt`] when the active state needs range
    /// sensors and the snapshot has none, and [`ControllerError::NonFiniteCommand`]
    /// when the readings would produce NaN steering. The controller is unchanged
    /// in both cases.
    pub fn tick(&mut self, frame: &SensorFrame) -> Result<TickOutcome> {
        let config = &self.config;
        let step = match &self.phase {
            Phase::Orientation(scan) => orient(config, *scan, frame),
            Phase::Forward(history) => forward(config, history.clone(), frame)?,
            Phase::Follow(history) => follow(config, history.clone(), frame)?,
            Phase::Stop => Step::stay(Phase::Stop, VelocityCommand::stop()),
        };
        step.command.ensure_finite("controller tick")?;

        trace!(
            tick = frame.tick,
            mode = %self.mode(),
            rotational = step.command.rotational,
            translational = step.command.translational,
            "controller step"
        );

        self.phase = step.phase;
        self.last_command = step.command;
        let transition = step
            .next
            .map(|(to, reason)| self.transition(to, reason, frame.tick));

        Ok(TickOutcome {
            command: step.command,
            transition,
        })
    }

    /// The only place the active state changes.
    fn transition(&mut self, to: Mode, reason: TransitionReason, tick: u64) -> Transition {
        let from = self.mode();
        self.phase = Phase::fresh(to);

        if reason == TransitionReason::GoalReached {
            info!(tick, "goal reached");
        }
        debug!(%from, %to, ?reason, tick, "controller transition");

        Transition {
            from,
            to,
            reason,
            tick,
        }
    }
}

fn is_sampling_tick(config: &ControllerConfig, tick: u64) -> bool {
    tick % config.sample_every == 0
}

fn orient(config: &ControllerConfig, mut scan: Scan, frame: &SensorFrame) -> Step {
    let light = &frame.light;
    match config.alignment {
        AlignmentPolicy::PeakCrossing => {
            let command = VelocityCommand::rotate(config.scan_rate);
            if crossed_peak(scan.previous_sides, light) {
                return Step::switch(
                    Phase::Orientation(scan),
                    command,
                    Mode::Forward,
                    TransitionReason::Aligned,
                );
            }
            if is_sampling_tick(config, frame.tick) {
                scan.previous_sides = Some((light.left, light.right));
            }
            Step::stay(Phase::Orientation(scan), command)
        }
        AlignmentPolicy::TurnReversal {
            final_turn_rate,
            deadband,
        } => {
            let direction = turn_direction(light, deadband, scan.previous_turn);
            if reversed(scan.previous_turn, direction) {
                return Step::switch(
                    Phase::Orientation(scan),
                    VelocityCommand::rotate(direction * final_turn_rate),
                    Mode::Forward,
                    TransitionReason::Aligned,
                );
            }
            scan.previous_turn = direction;
            Step::stay(
                Phase::Orientation(scan),
                VelocityCommand::rotate(direction * config.scan_rate),
            )
        }
    }
}

fn forward(
    config: &ControllerConfig,
    mut history: ObservationHistory,
    frame: &SensorFrame,
) -> Result<Step> {
    let command = VelocityCommand::drive(config.cruise_speed);
    if is_sampling_tick(config, frame.tick) {
        history.push(frame.light.center);
    }

    let next = if reached_goal(&config.goal, frame) {
        Some((Mode::Stop, TransitionReason::GoalReached))
    } else if found_obstacle(&frame.sonars, config.safety_distance)? {
        Some((Mode::Follow, TransitionReason::ObstacleDetected))
    } else if found_local_maximum(&history) {
        Some((Mode::Orientation, TransitionReason::LocalMaximum))
    } else {
        None
    };

    Ok(Step {
        phase: Phase::Forward(history),
        command,
        next,
    })
}

fn follow(
    config: &ControllerConfig,
    mut history: ObservationHistory,
    frame: &SensorFrame,
) -> Result<Step> {
    let steering = circumvent(frame, config)?;
    if is_sampling_tick(config, frame.tick) {
        history.push(frame.light.center);
    }

    let next = found_local_maximum(&history)
        .then_some((Mode::Orientation, TransitionReason::LocalMaximum));
    Ok(Step {
        phase: Phase::Follow(history),
        command: steering.command,
        next,
    })
}
