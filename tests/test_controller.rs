//! Tests for the navigation state machine.

use std::f64::consts::FRAC_PI_2;

use approx::assert_relative_eq;
use phototaxis_rust::simulation::ControllerError;
use phototaxis_rust::simulation::controller::{
    AlignmentPolicy, ControllerConfig, FollowHeading, Mode, NavigationController, TickOutcome,
    TransitionReason, VelocityCommand, circumvent,
};
use phototaxis_rust::simulation::sensors::{LightTriad, SensorFrame, SonarBelt, SonarReading};

const RADIUS: f64 = 0.3;

fn clear_belt() -> SonarBelt {
    SonarBelt::new(
        SonarBelt::evenly_spaced_angles(12)
            .into_iter()
            .map(SonarReading::miss)
            .collect(),
        1.5,
    )
}

fn blocked_belt(distance: f64) -> SonarBelt {
    let mut belt = clear_belt();
    belt.readings[0] = SonarReading::hit(0.0, distance);
    belt
}

fn frame(tick: u64, light: LightTriad, sonars: SonarBelt) -> SensorFrame {
    SensorFrame {
        tick,
        light,
        sonars,
        agent_radius: RADIUS,
        ..SensorFrame::default()
    }
}

fn dim(center: f64) -> LightTriad {
    LightTriad::new(center, 0.0, 0.0)
}

fn sampling_every_tick() -> ControllerConfig {
    ControllerConfig::default().with_sample_every(1)
}

/// Drives a fresh controller through a peak crossing into Forward at tick 1.
fn forward_controller(config: ControllerConfig) -> NavigationController {
    let mut controller = NavigationController::new(config).unwrap();
    controller
        .tick(&frame(0, LightTriad::new(0.0, 0.5, 0.2), clear_belt()))
        .unwrap();
    let outcome = controller
        .tick(&frame(1, LightTriad::new(0.0, 0.4, 0.3), clear_belt()))
        .unwrap();
    assert_eq!(outcome.transition.map(|t| t.to), Some(Mode::Forward));
    controller
}

fn follow_controller(config: ControllerConfig) -> NavigationController {
    let mut controller = forward_controller(config);
    let outcome = controller.tick(&frame(2, dim(0.0), blocked_belt(0.3))).unwrap();
    assert_eq!(outcome.transition.map(|t| t.to), Some(Mode::Follow));
    controller
}

fn reason(outcome: &TickOutcome) -> Option<TransitionReason> {
    outcome.transition.map(|t| t.reason)
}

// ============== Construction ==============

#[test]
fn test_starts_in_orientation_at_rest() {
    let controller = NavigationController::new(ControllerConfig::default()).unwrap();
    assert_eq!(controller.mode(), Mode::Orientation);
    assert_eq!(controller.last_command(), VelocityCommand::stop());
    assert!(controller.history().is_none());
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = ControllerConfig::default().with_safety_distance(-0.7);
    let err = NavigationController::new(config).unwrap_err();
    assert!(matches!(err, ControllerError::InvalidConfig { .. }));
}

// ============== Orientation: peak crossing ==============

#[test]
fn test_orientation_spins_in_place() {
    let mut controller = NavigationController::new(sampling_every_tick()).unwrap();
    let outcome = controller
        .tick(&frame(0, LightTriad::new(0.0, 0.1, 0.2), clear_belt()))
        .unwrap();
    assert_eq!(outcome.command, VelocityCommand::rotate(1.0));
    assert!(outcome.transition.is_none());
}

#[test]
fn test_first_orientation_tick_never_aligns() {
    let mut controller = NavigationController::new(sampling_every_tick()).unwrap();
    // Would look like a crossing against any earlier sample
    let outcome = controller
        .tick(&frame(0, LightTriad::new(0.0, 0.0, 1.0), clear_belt()))
        .unwrap();
    assert!(outcome.transition.is_none());
}

#[test]
fn test_peak_crossing_switches_to_forward() {
    let mut controller = NavigationController::new(sampling_every_tick()).unwrap();
    controller
        .tick(&frame(0, LightTriad::new(0.0, 0.5, 0.2), clear_belt()))
        .unwrap();
    let outcome = controller
        .tick(&frame(1, LightTriad::new(0.0, 0.4, 0.3), clear_belt()))
        .unwrap();

    assert_eq!(reason(&outcome), Some(TransitionReason::Aligned));
    // The transition tick still carries the scanning command
    assert_eq!(outcome.command, VelocityCommand::rotate(1.0));
    assert_eq!(controller.mode(), Mode::Forward);
}

#[test]
fn test_both_sides_rising_is_not_aligned() {
    let mut controller = NavigationController::new(sampling_every_tick()).unwrap();
    controller
        .tick(&frame(0, LightTriad::new(0.0, 0.2, 0.2), clear_belt()))
        .unwrap();
    let outcome = controller
        .tick(&frame(1, LightTriad::new(0.0, 0.3, 0.3), clear_belt()))
        .unwrap();
    assert!(outcome.transition.is_none());
}

#[test]
fn test_peak_crossing_compares_against_gated_sample() {
    let config = ControllerConfig::default().with_sample_every(7);
    let mut controller = NavigationController::new(config).unwrap();

    controller
        .tick(&frame(0, LightTriad::new(0.0, 0.5, 0.2), clear_belt()))
        .unwrap();
    // Not a sampling tick, so the reference stays at tick 0's reading
    let outcome = controller
        .tick(&frame(1, LightTriad::new(0.0, 0.6, 0.1), clear_belt()))
        .unwrap();
    assert!(outcome.transition.is_none());

    let outcome = controller
        .tick(&frame(2, LightTriad::new(0.0, 0.45, 0.25), clear_belt()))
        .unwrap();
    assert_eq!(reason(&outcome), Some(TransitionReason::Aligned));
}

// ============== Orientation: turn reversal ==============

fn turn_reversal() -> ControllerConfig {
    sampling_every_tick().with_alignment(AlignmentPolicy::turn_reversal())
}

#[test]
fn test_turn_reversal_turns_toward_brighter_side() {
    let mut controller = NavigationController::new(turn_reversal()).unwrap();
    let outcome = controller
        .tick(&frame(0, LightTriad::new(0.0, 0.1, 0.3), clear_belt()))
        .unwrap();
    assert_eq!(outcome.command, VelocityCommand::rotate(-1.0));
}

#[test]
fn test_turn_reversal_applies_final_turn() {
    let mut controller = NavigationController::new(turn_reversal()).unwrap();
    controller
        .tick(&frame(0, LightTriad::new(0.0, 0.3, 0.1), clear_belt()))
        .unwrap();
    let outcome = controller
        .tick(&frame(1, LightTriad::new(0.0, 0.1, 0.3), clear_belt()))
        .unwrap();

    assert_eq!(reason(&outcome), Some(TransitionReason::Aligned));
    assert_eq!(outcome.command, VelocityCommand::rotate(-3.0));
    assert_eq!(controller.mode(), Mode::Forward);
}

#[test]
fn test_balanced_reading_never_triggers_reversal() {
    let mut controller = NavigationController::new(turn_reversal()).unwrap();
    controller
        .tick(&frame(0, LightTriad::new(0.0, 0.3, 0.1), clear_belt()))
        .unwrap();

    for tick in 1..5 {
        let outcome = controller
            .tick(&frame(tick, LightTriad::new(0.0, 0.2, 0.2), clear_belt()))
            .unwrap();
        assert!(outcome.transition.is_none());
        assert_eq!(outcome.command, VelocityCommand::rotate(1.0));
    }
}

#[test]
fn test_balanced_first_reading_scans_counter_clockwise() {
    let mut controller = NavigationController::new(turn_reversal()).unwrap();
    let outcome = controller
        .tick(&frame(0, LightTriad::new(0.0, 0.0, 0.0), clear_belt()))
        .unwrap();
    assert!(outcome.transition.is_none());
    assert_eq!(outcome.command, VelocityCommand::rotate(1.0));
}

// ============== Forward ==============

#[test]
fn test_forward_drives_straight() {
    let mut controller = forward_controller(sampling_every_tick());
    let outcome = controller.tick(&frame(2, dim(0.01), clear_belt())).unwrap();
    assert_eq!(outcome.command, VelocityCommand::drive(1.0));
    assert!(outcome.transition.is_none());
}

#[test]
fn test_forward_stops_at_goal() {
    let mut controller = forward_controller(sampling_every_tick());
    let outcome = controller
        .tick(&frame(2, LightTriad::new(0.12, 0.02, 0.02), clear_belt()))
        .unwrap();
    assert_eq!(reason(&outcome), Some(TransitionReason::GoalReached));
    assert_eq!(controller.mode(), Mode::Stop);
}

#[test]
fn test_goal_takes_priority_over_obstacle() {
    let mut controller = forward_controller(sampling_every_tick());
    let outcome = controller
        .tick(&frame(2, LightTriad::new(0.12, 0.02, 0.02), blocked_belt(0.1)))
        .unwrap();
    assert_eq!(controller.mode(), Mode::Stop);
    assert_eq!(reason(&outcome), Some(TransitionReason::GoalReached));
}

#[test]
fn test_forward_switches_to_follow_near_obstacle() {
    let mut controller = forward_controller(sampling_every_tick());
    let outcome = controller.tick(&frame(2, dim(0.01), blocked_belt(0.6))).unwrap();
    assert_eq!(reason(&outcome), Some(TransitionReason::ObstacleDetected));
    assert_eq!(controller.mode(), Mode::Follow);
}

#[test]
fn test_forward_ignores_obstacle_beyond_safety() {
    let mut controller = forward_controller(sampling_every_tick());
    let outcome = controller.tick(&frame(2, dim(0.01), blocked_belt(0.9))).unwrap();
    assert!(outcome.transition.is_none());
}

#[test]
fn test_forward_reorients_after_luminance_peak() {
    let mut controller = forward_controller(sampling_every_tick());
    let mut last = None;
    for (tick, center) in [(2, 0.01), (3, 0.03), (4, 0.02)] {
        last = Some(controller.tick(&frame(tick, dim(center), clear_belt())).unwrap());
    }
    assert_eq!(
        last.as_ref().and_then(reason),
        Some(TransitionReason::LocalMaximum)
    );
    assert_eq!(controller.mode(), Mode::Orientation);
}

#[test]
fn test_forward_samples_only_on_gate() {
    let mut controller = forward_controller(ControllerConfig::default().with_sample_every(3));
    for tick in 2..=7 {
        controller.tick(&frame(tick, dim(0.01), clear_belt())).unwrap();
    }
    // Ticks 3 and 6 are sampled
    assert_eq!(controller.history().map(|h| h.len()), Some(2));
}

#[test]
fn test_forward_with_empty_belt_fails_without_side_effects() {
    let mut controller = forward_controller(sampling_every_tick());
    let err = controller
        .tick(&frame(2, dim(0.01), SonarBelt::default()))
        .unwrap_err();
    assert!(matches!(err, ControllerError::EmptySonarBelt { .. }));
    assert_eq!(controller.mode(), Mode::Forward);
    assert_eq!(controller.history().map(|h| h.len()), Some(0));
}

// ============== History reset ==============

#[test]
fn test_transition_clears_history() {
    let mut controller = forward_controller(sampling_every_tick());
    for (tick, center) in [(2, 0.01), (3, 0.02), (4, 0.03), (5, 0.04)] {
        controller.tick(&frame(tick, dim(center), clear_belt())).unwrap();
    }
    assert_eq!(controller.history().map(|h| h.len()), Some(4));

    let outcome = controller.tick(&frame(6, dim(0.05), blocked_belt(0.3))).unwrap();
    assert_eq!(reason(&outcome), Some(TransitionReason::ObstacleDetected));

    // Against the old history this sample would be a peak
    let outcome = controller.tick(&frame(7, dim(0.001), blocked_belt(0.3))).unwrap();
    assert!(outcome.transition.is_none());
    assert_eq!(controller.mode(), Mode::Follow);
    assert_eq!(controller.history().map(|h| h.len()), Some(1));
}

// ============== Follow ==============

#[test]
fn test_follow_at_safety_boundary_keeps_full_speed() {
    let config = ControllerConfig::default().with_follow_heading(FollowHeading::Bearing);
    // Sensed point sits straight ahead at exactly the safety distance
    let f = frame(0, dim(0.0), blocked_belt(config.safety_distance - RADIUS));
    let steering = circumvent(&f, &config).unwrap();

    assert_eq!(steering.nearest, 0);
    assert_relative_eq!(steering.distance, config.safety_distance, epsilon = 1e-12);
    assert_relative_eq!(steering.ph_rot, 0.0, epsilon = 1e-12);
    assert_relative_eq!(steering.command.translational, config.gains.k2, epsilon = 1e-12);
    assert_relative_eq!(steering.command.rotational, 0.0, epsilon = 1e-12);
}

#[test]
fn test_default_follow_turns_alongside_obstacle() {
    let config = ControllerConfig::default();
    assert_eq!(config.follow_heading, FollowHeading::Tangent);

    let f = frame(0, dim(0.0), blocked_belt(config.safety_distance - RADIUS));
    let steering = circumvent(&f, &config).unwrap();

    // Wall dead ahead: stop advancing and turn right, leaving it on the left
    assert_relative_eq!(steering.ph_ref, -FRAC_PI_2, epsilon = 1e-12);
    assert_relative_eq!(steering.command.translational, 0.0, epsilon = 1e-12);
    assert_relative_eq!(
        steering.command.rotational,
        -config.gains.k1 * FRAC_PI_2,
        epsilon = 1e-12
    );
}

#[test]
fn test_follow_repulsion_sign() {
    let config = ControllerConfig::default();
    let near = circumvent(&frame(0, dim(0.0), blocked_belt(0.1)), &config).unwrap();
    let far = circumvent(&frame(0, dim(0.0), blocked_belt(1.2)), &config).unwrap();
    assert!(near.ph_rot < 0.0);
    assert!(far.ph_rot > 0.0);
}

#[test]
fn test_follow_emits_circumvention_command() {
    let config = sampling_every_tick();
    let mut controller = follow_controller(config.clone());
    let f = frame(3, dim(0.0), blocked_belt(0.2));
    let outcome = controller.tick(&f).unwrap();
    let expected = circumvent(&f, &config).unwrap().command;
    assert_eq!(outcome.command, expected);
}

#[test]
fn test_follow_reorients_after_luminance_peak() {
    let mut controller = follow_controller(sampling_every_tick());
    let mut transitions = Vec::new();
    for (tick, center) in [(3, 0.01), (4, 0.03), (5, 0.02)] {
        let outcome = controller
            .tick(&frame(tick, dim(center), blocked_belt(0.5)))
            .unwrap();
        transitions.extend(outcome.transition);
    }
    assert_eq!(transitions.len(), 1);
    assert_eq!(transitions[0].from, Mode::Follow);
    assert_eq!(transitions[0].to, Mode::Orientation);
}

#[test]
fn test_follow_with_empty_belt_fails() {
    let mut controller = follow_controller(sampling_every_tick());
    let err = controller
        .tick(&frame(3, dim(0.0), SonarBelt::default()))
        .unwrap_err();
    assert!(matches!(err, ControllerError::EmptySonarBelt { .. }));
    assert_eq!(controller.mode(), Mode::Follow);
}

// ============== Stop ==============

#[test]
fn test_stop_is_steady() {
    let mut controller = forward_controller(sampling_every_tick());
    controller
        .tick(&frame(2, LightTriad::new(0.12, 0.02, 0.02), clear_belt()))
        .unwrap();

    for tick in 3..20 {
        // Even an empty belt is fine: Stop reads no sensors
        let outcome = controller
            .tick(&frame(tick, dim(0.0), SonarBelt::default()))
            .unwrap();
        assert_eq!(outcome.command, VelocityCommand::stop());
        assert!(outcome.transition.is_none());
    }
    assert_eq!(controller.mode(), Mode::Stop);
}

#[test]
fn test_reset_after_stop() {
    let mut controller = forward_controller(sampling_every_tick());
    controller
        .tick(&frame(2, LightTriad::new(0.12, 0.02, 0.02), clear_belt()))
        .unwrap();
    let transition = controller.reset(3);
    assert_eq!(transition.reason, TransitionReason::Reset);
    assert_eq!(controller.mode(), Mode::Orientation);
}
