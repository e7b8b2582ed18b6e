use crate::simulation::environment::Arena;
use rayon::prelude::*;

const CHARS: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];
pub const OBSTACLE_CHAR: char = 'X';
pub const LIGHT_CHAR: char = 'L';

/// World `(x, z)` at the center of grid cell `(row, col)`. Row 0 is the far (+z) edge.
#[must_use]
pub fn grid_to_world(
    arena: &Arena,
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
) -> (f64, f64) {
    let span = 2.0 * arena.half_extent;
    let x = -arena.half_extent + (col as f64 + 0.5) * span / cols as f64;
    let z = arena.half_extent - (row as f64 + 0.5) * span / rows as f64;
    (x, z)
}

/// Renders the arena's light field as ASCII shading with obstacles drawn solid.
#[must_use]
pub fn compute_field_grid(arena: &Arena, rows: usize, cols: usize) -> Vec<String> {
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    // Use rayon to compute rows in parallel
    (0..rows)
        .into_par_iter()
        .map(|r| {
            let mut line = String::with_capacity(cols);
            for c in 0..cols {
                let (x, z) = grid_to_world(arena, r, c, rows, cols);
                if arena.obstacles.iter().any(|o| o.contains(x, z, 0.0)) {
                    line.push(OBSTACLE_CHAR);
                    continue;
                }

                let val = arena.illuminance_at(x, z) / arena.light.intensity;
                let idx = (val * (CHARS.len() - 1) as f64).round() as usize;
                line.push(CHARS[idx.min(CHARS.len() - 1)]);
            }
            line
        })
        .collect()
}
