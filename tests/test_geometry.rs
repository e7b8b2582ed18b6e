//! Tests for angle wrapping and sensed-point conversion.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use approx::assert_relative_eq;
use phototaxis_rust::simulation::geometry::{LocalPoint, sensed_point, wrap_to_pi};
use phototaxis_rust::simulation::sensors::SonarReading;
use proptest::prelude::*;

/// Angular distance between two angles, immune to the ±π seam.
fn angular_gap(a: f64, b: f64) -> f64 {
    wrap_to_pi(a - b).abs()
}

// ============== wrap_to_pi ==============

#[test]
fn test_wrap_identity_inside_interval() {
    for angle in [0.0, 1.0, -1.0, FRAC_PI_2, -3.0, PI] {
        assert_eq!(wrap_to_pi(angle).to_bits(), angle.to_bits());
    }
}

#[test]
fn test_wrap_lower_bound_is_open() {
    assert_relative_eq!(wrap_to_pi(-PI), PI);
    assert!(wrap_to_pi(-PI - 1e-9) > 0.0);
}

#[test]
fn test_wrap_multiple_turns() {
    assert_relative_eq!(wrap_to_pi(10.0 * TAU + 0.25), 0.25, epsilon = 1e-9);
    assert_relative_eq!(wrap_to_pi(-7.0 * TAU - 0.25), -0.25, epsilon = 1e-9);
}

proptest! {
    #[test]
    fn wrap_result_in_half_open_interval(angle in -1.0e4..1.0e4f64) {
        let wrapped = wrap_to_pi(angle);
        prop_assert!(wrapped > -PI && wrapped <= PI);
    }

    #[test]
    fn wrap_is_idempotent(angle in -1.0e4..1.0e4f64) {
        let once = wrap_to_pi(angle);
        prop_assert_eq!(wrap_to_pi(once).to_bits(), once.to_bits());
    }

    #[test]
    fn wrap_is_periodic(angle in -1.0e3..1.0e3f64, turns in -5i32..5) {
        let shifted = angle + f64::from(turns) * TAU;
        prop_assert!(angular_gap(wrap_to_pi(shifted), wrap_to_pi(angle)) < 1e-9);
    }

    #[test]
    fn wrap_preserves_direction(angle in -1.0e3..1.0e3f64) {
        let wrapped = wrap_to_pi(angle);
        prop_assert!((wrapped.cos() - angle.cos()).abs() < 1e-9);
        prop_assert!((wrapped.sin() - angle.sin()).abs() < 1e-9);
    }
}

// ============== sensed_point ==============

#[test]
fn test_sensed_point_straight_ahead() {
    let p = sensed_point(0.3, &SonarReading::hit(0.0, 0.4), 1.5);
    assert_relative_eq!(p.forward, 0.7, epsilon = 1e-12);
    assert_relative_eq!(p.lateral, 0.0, epsilon = 1e-12);
}

#[test]
fn test_sensed_point_left_diagonal() {
    let p = sensed_point(0.0, &SonarReading::hit(FRAC_PI_4, 2.0_f64.sqrt()), 1.5);
    assert_relative_eq!(p.forward, 1.0, epsilon = 1e-12);
    assert_relative_eq!(p.lateral, 1.0, epsilon = 1e-12);
    assert_relative_eq!(p.bearing(), FRAC_PI_4, epsilon = 1e-12);
}

#[test]
fn test_sensed_point_miss_uses_max_range() {
    let p = sensed_point(0.3, &SonarReading::miss(PI), 1.5);
    assert_relative_eq!(p.forward, -1.8, epsilon = 1e-12);
    assert_relative_eq!(p.norm(), 1.8, epsilon = 1e-12);
}

#[test]
fn test_local_point_norm() {
    assert_relative_eq!(LocalPoint::new(-3.0, 4.0).norm(), 5.0);
}
