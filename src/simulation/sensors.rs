//! Per-tick sensor snapshot consumed by the navigation controller.
//!
//! The host fills a [`SensorFrame`] once per tick. The controller never keeps a
//! reference to it.

use serde::{Deserialize, Serialize};

/// World position of the agent. The ground plane is `x`/`z`, `y` is height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        (self.x - other.x)
            .hypot(self.y - other.y)
            .hypot(self.z - other.z)
    }
}

/// Average luminance seen by the forward light sensor triad.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LightTriad {
    pub center: f64,
    pub left: f64,
    pub right: f64,
}

impl LightTriad {
    #[must_use]
    pub const fn new(center: f64, left: f64, right: f64) -> Self {
        Self {
            center,
            left,
            right,
        }
    }
}

/// One range sensor of the belt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SonarReading {
    /// Whether the beam hit anything within range.
    pub hit: bool,
    /// Measured distance from the agent's surface. Meaningless when `hit` is false.
    pub distance: f64,
    /// Mounting angle relative to the heading, counter-clockwise positive.
    pub angle: f64,
}

impl SonarReading {
    #[must_use]
    pub const fn hit(angle: f64, distance: f64) -> Self {
        Self {
            hit: true,
            distance,
            angle,
        }
    }

    #[must_use]
    pub const fn miss(angle: f64) -> Self {
        Self {
            hit: false,
            distance: 0.0,
            angle,
        }
    }

    /// Distance used by the geometry: the measurement on a hit, `max_range` otherwise.
    #[must_use]
    pub const fn effective_distance(&self, max_range: f64) -> f64 {
        if self.hit { self.distance } else { max_range }
    }
}

/// The ring of range sensors around the agent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SonarBelt {
    pub readings: Vec<SonarReading>,
    pub max_range: f64,
}

impl SonarBelt {
    #[must_use]
    pub const fn new(readings: Vec<SonarReading>, max_range: f64) -> Self {
        Self {
            readings,
            max_range,
        }
    }

    /// Mounting angles of `count` sensors spread evenly around the agent, starting
    /// straight ahead and going counter-clockwise.
    #[must_use]
    pub fn evenly_spaced_angles(count: usize) -> Vec<f64> {
        (0..count)
            .map(|i| i as f64 * std::f64::consts::TAU / count as f64)
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

/// Everything the controller may read during one tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensorFrame {
    /// Monotonic tick counter, used only for the sampling gate.
    pub tick: u64,
    pub position: Position,
    pub light: LightTriad,
    pub sonars: SonarBelt,
    pub agent_radius: f64,
}
