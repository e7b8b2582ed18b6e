use crate::simulation::params::{
    ARENA_HALF_EXTENT, LIGHT_HEIGHT, LIGHT_INTENSITY, LIGHT_SENSOR_EXPONENT,
    RANDOM_OBSTACLE_COUNT, RANDOM_OBSTACLE_SIZE_MAX, RANDOM_OBSTACLE_SIZE_MIN, SPAWN_CLEARANCE,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A point light hanging above the ground plane.
///
/// `height` softens the falloff so luminance stays finite right under the light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub x: f64,
    pub z: f64,
    pub height: f64,
    pub intensity: f64,
}

impl LightSource {
    #[must_use]
    pub const fn at(x: f64, z: f64) -> Self {
        Self {
            x,
            z,
            height: LIGHT_HEIGHT,
            intensity: LIGHT_INTENSITY,
        }
    }
}

/// An axis-aligned box obstacle on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxObstacle {
    pub x: f64,
    pub z: f64,
    pub half_x: f64,
    pub half_z: f64,
}

impl BoxObstacle {
    /// Creates a box from its center and full side lengths.
    #[must_use]
    pub fn new(x: f64, z: f64, size_x: f64, size_z: f64) -> Self {
        Self {
            x,
            z,
            half_x: size_x / 2.0,
            half_z: size_z / 2.0,
        }
    }

    /// The same box turned by a quarter turn.
    #[must_use]
    pub const fn rotated_90(self) -> Self {
        Self {
            half_x: self.half_z,
            half_z: self.half_x,
            ..self
        }
    }

    /// Whether `(px, pz)` lies inside the box grown by `margin` on every side.
    #[must_use]
    pub fn contains(&self, px: f64, pz: f64, margin: f64) -> bool {
        (px - self.x).abs() <= self.half_x + margin && (pz - self.z).abs() <= self.half_z + margin
    }

    /// Distance along the unit ray `(dx, dz)` from `(ox, oz)` to the box surface.
    #[must_use]
    pub fn ray_distance(&self, ox: f64, oz: f64, dx: f64, dz: f64) -> Option<f64> {
        let (t_near, t_far) = slab_interval(
            (ox, oz),
            (dx, dz),
            (self.x - self.half_x, self.x + self.half_x),
            (self.z - self.half_z, self.z + self.half_z),
        )?;
        if t_far < 0.0 {
            return None;
        }
        Some(t_near.max(0.0))
    }
}

/// Entry/exit parameters of a ray through an axis-aligned rectangle.
fn slab_interval(
    origin: (f64, f64),
    direction: (f64, f64),
    x_range: (f64, f64),
    z_range: (f64, f64),
) -> Option<(f64, f64)> {
    let mut t_near = f64::NEG_INFINITY;
    let mut t_far = f64::INFINITY;
    for (o, d, (lo, hi)) in [
        (origin.0, direction.0, x_range),
        (origin.1, direction.1, z_range),
    ] {
        if d.abs() < f64::EPSILON {
            if o < lo || o > hi {
                return None;
            }
        } else {
            let t1 = (lo - o) / d;
            let t2 = (hi - o) / d;
            t_near = t_near.max(t1.min(t2));
            t_far = t_far.min(t1.max(t2));
        }
    }
    (t_near <= t_far).then_some((t_near, t_far))
}

/// The preset scenes: one wall, two blocks, and an L-shaped corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePreset {
    Wall,
    TwoBlocks,
    Corner,
}

impl ScenePreset {
    /// Maps a scene number (1-3) to its preset.
    #[must_use]
    pub const fn from_index(index: u32) -> Option<Self> {
        match index {
            1 => Some(Self::Wall),
            2 => Some(Self::TwoBlocks),
            3 => Some(Self::Corner),
            _ => None,
        }
    }
}

/// The square world the robot drives in (the "arena").
///
/// Contains one light and a set of box obstacles, and answers the two questions a
/// robot's sensors ask: how bright is it in a given direction, and how far is the
/// nearest surface along a ray.
#[derive(Debug, Clone, PartialEq)]
pub struct Arena {
    /// Walls sit at `±half_extent` on both axes.
    pub half_extent: f64,
    pub light: LightSource,
    pub obstacles: Vec<BoxObstacle>,
    /// Where a robot should spawn, `(x, z)`.
    pub start: (f64, f64),
}

impl Arena {
    /// Creates an empty arena with a light at `(x, z)`.
    #[must_use]
    pub fn new(light: LightSource, start: (f64, f64)) -> Self {
        Self {
            half_extent: ARENA_HALF_EXTENT,
            light,
            obstacles: Vec::new(),
            start,
        }
    }

    #[must_use]
    pub fn with_obstacle(mut self, obstacle: BoxObstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    /// Builds one of the preset scenes.
    #[must_use]
    pub fn preset(preset: ScenePreset) -> Self {
        match preset {
            ScenePreset::Wall => Self::new(LightSource::at(3.0, 0.0), (-7.0, 2.0))
                .with_obstacle(BoxObstacle::new(-4.0, 0.0, 2.0, 6.0)),
            ScenePreset::TwoBlocks => Self::new(LightSource::at(-5.0, 5.0), (0.0, 0.0))
                .with_obstacle(BoxObstacle::new(0.0, 3.0, 3.0, 5.0))
                .with_obstacle(BoxObstacle::new(6.0, 1.0, 4.0, 3.0)),
            ScenePreset::Corner => Self::new(LightSource::at(-3.0, 4.0), (0.0, -5.0))
                .with_obstacle(BoxObstacle::new(0.0, 3.0, 2.0, 6.0))
                .with_obstacle(BoxObstacle::new(-2.0, -1.0, 2.0, 10.0).rotated_90()),
        }
    }

    /// Builds a reproducible random scene from `seed`.
    ///
    /// Obstacles never cover the light or the start position.
    #[must_use]
    pub fn scattered(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let bound = ARENA_HALF_EXTENT - SPAWN_CLEARANCE;

        let light = LightSource::at(
            rng.random_range(-bound..bound),
            rng.random_range(-bound..bound),
        );
        let start = (
            rng.random_range(-bound..bound),
            rng.random_range(-bound..bound),
        );
        let mut arena = Self::new(light, start);

        let max_attempts = 100 * RANDOM_OBSTACLE_COUNT;
        let mut attempts = 0;
        while arena.obstacles.len() < RANDOM_OBSTACLE_COUNT && attempts < max_attempts {
            attempts += 1;
            let candidate = BoxObstacle::new(
                rng.random_range(-bound..bound),
                rng.random_range(-bound..bound),
                rng.random_range(RANDOM_OBSTACLE_SIZE_MIN..RANDOM_OBSTACLE_SIZE_MAX),
                rng.random_range(RANDOM_OBSTACLE_SIZE_MIN..RANDOM_OBSTACLE_SIZE_MAX),
            );
            if candidate.contains(light.x, light.z, SPAWN_CLEARANCE)
                || candidate.contains(start.0, start.1, SPAWN_CLEARANCE)
            {
                continue;
            }
            arena.obstacles.push(candidate);
        }
        arena
    }

    /// Omnidirectional brightness at `(x, z)`, in `(0, intensity]`.
    #[must_use]
    pub fn illuminance_at(&self, x: f64, z: f64) -> f64 {
        let r_sq = (self.light.x - x).powi(2) + (self.light.z - z).powi(2);
        self.light.intensity / (1.0 + r_sq / self.light.height.powi(2))
    }

    /// Brightness seen by a light sensor at `(x, z)` looking along world angle `axis`.
    ///
    /// Falls off with the squared cosine of the angle between the sensor axis and
    /// the light, and is zero when the light is behind the sensor.
    #[must_use]
    pub fn luminance(&self, x: f64, z: f64, axis: f64) -> f64 {
        let dx = self.light.x - x;
        let dz = self.light.z - z;
        let r = dx.hypot(dz);
        let alignment = if r < f64::EPSILON {
            1.0
        } else {
            ((dx * axis.cos() + dz * axis.sin()) / r).max(0.0)
        };
        self.illuminance_at(x, z) * alignment.powi(LIGHT_SENSOR_EXPONENT)
    }

    /// Distance from `(x, z)` to the first surface along world angle `angle`.
    ///
    /// Walls are always hit, so this is finite for any point inside the arena.
    #[must_use]
    pub fn cast_ray(&self, x: f64, z: f64, angle: f64) -> f64 {
        let (dx, dz) = (angle.cos(), angle.sin());
        let wall = slab_interval(
            (x, z),
            (dx, dz),
            (-self.half_extent, self.half_extent),
            (-self.half_extent, self.half_extent),
        )
        .map_or(0.0, |(_, t_far)| t_far.max(0.0));

        self.obstacles
            .iter()
            .filter_map(|o| o.ray_distance(x, z, dx, dz))
            .fold(wall, f64::min)
    }

    /// Whether a disc of `radius` at `(x, z)` overlaps a wall or obstacle.
    #[must_use]
    pub fn collides(&self, x: f64, z: f64, radius: f64) -> bool {
        let limit = self.half_extent - radius;
        x.abs() > limit
            || z.abs() > limit
            || self.obstacles.iter().any(|o| o.contains(x, z, radius))
    }
}
