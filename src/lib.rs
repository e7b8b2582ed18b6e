#![warn(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

//! Reactive phototaxis for a mobile agent.
//!
//! The [`simulation::controller::NavigationController`] turns one tick of light and
//! sonar readings into a rotational/translational velocity command. The rest of
//! [`simulation`] is a small arena used to drive it, and [`ui`] draws that arena in
//! the terminal.

pub mod simulation;
pub mod ui;
