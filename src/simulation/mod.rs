pub mod agent;
pub mod controller;
pub mod environment;
pub mod error;
pub mod geometry;
pub mod memory;
pub mod params;
pub mod sensors;

pub use controller::{Mode, NavigationController, VelocityCommand};
pub use error::ControllerError;
