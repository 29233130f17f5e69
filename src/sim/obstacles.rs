//! Static obstacle layout
//!
//! Three square blocks placed at fixed fractions of the grid. Generated once
//! per session and never moved.

use glam::IVec2;

use super::state::GridPosition;
use crate::consts::OBSTACLE_BLOCK_SIZE;

/// Top-left anchor of each block as a fraction of (width, height)
pub const OBSTACLE_ANCHORS: [(f32, f32); 3] = [(0.25, 0.25), (0.75, 0.25), (0.5, 0.75)];

/// Build the obstacle cells for a grid of the given size
pub fn generate_obstacles(width: i32, height: i32) -> Vec<GridPosition> {
    let mut cells: Vec<GridPosition> = Vec::with_capacity(
        OBSTACLE_ANCHORS.len() * (OBSTACLE_BLOCK_SIZE * OBSTACLE_BLOCK_SIZE) as usize,
    );

    for (fx, fy) in OBSTACLE_ANCHORS {
        let anchor = IVec2::new(
            (width as f32 * fx).floor() as i32,
            (height as f32 * fy).floor() as i32,
        );
        for dy in 0..OBSTACLE_BLOCK_SIZE {
            for dx in 0..OBSTACLE_BLOCK_SIZE {
                // Wrap so tiny grids still get in-bounds cells
                let cell = IVec2::new(
                    (anchor.x + dx).rem_euclid(width.max(1)),
                    (anchor.y + dy).rem_euclid(height.max(1)),
                );
                if !cells.contains(&cell) {
                    cells.push(cell);
                }
            }
        }
    }

    cells
}
