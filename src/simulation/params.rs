//! Simulation hyperparameters.

// Controller defaults
pub const SAFETY_DISTANCE: f64 = 0.7;
pub const ROTATION_GAIN: f64 = 5.0; // K1
pub const TRANSLATION_GAIN: f64 = 0.8; // K2
pub const REPULSION_GAIN: f64 = 1.0; // K3
pub const CRUISE_SPEED: f64 = 1.0;
pub const SCAN_RATE: f64 = 1.0; // Radians per unit time
pub const SAMPLE_EVERY: u64 = 7;
pub const GOAL_CENTER_LUMINANCE: f64 = 0.10;
pub const GOAL_SIDE_LUMINANCE: f64 = 0.04;
pub const GOAL_RADIUS: f64 = 0.6;
pub const FINAL_TURN_RATE: f64 = 3.0;
pub const TURN_DEADBAND: f64 = 1e-6;
pub const HISTORY_CAPACITY: usize = 16;

// Robot body and sensors
pub const ROBOT_RADIUS: f64 = 0.3;
pub const SONAR_COUNT: usize = 12;
pub const SONAR_MAX_RANGE: f64 = 1.5;
pub const LIGHT_SENSOR_ANGLE: f64 = std::f64::consts::FRAC_PI_4; // Radians off heading
pub const TIME_STEP: f64 = 0.05;

// Arena
pub const ARENA_HALF_EXTENT: f64 = 10.0;
pub const LIGHT_HEIGHT: f64 = 2.0;
pub const LIGHT_INTENSITY: f64 = 1.0;
pub const LIGHT_SENSOR_EXPONENT: i32 = 2;
pub const RANDOM_OBSTACLE_COUNT: usize = 5;
pub const RANDOM_OBSTACLE_SIZE_MIN: f64 = 0.5;
pub const RANDOM_OBSTACLE_SIZE_MAX: f64 = 3.0;
pub const SPAWN_CLEARANCE: f64 = 1.5;
