//! Grid-traversal raycasting (DDA).
//!
//! Rays step cell boundary to cell boundary, so the cost is proportional to
//! the number of cells crossed and thin walls can never be skipped. The same
//! traversal backs wall projection, projectile wall tests and line-of-sight.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use crate::grid::Grid;
use crate::tile::{is_solid, CellCode, WALL};

/// Which kind of cell boundary the ray crossed last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Crossed a vertical grid line (stepped along x)
    X,
    /// Crossed a horizontal grid line (stepped along y)
    Y,
}

/// Result of a ray cast against the grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the casting direction to the face that was hit
    pub distance: f32,
    /// Code of the solid cell that stopped the ray (`WALL` past the grid edge)
    pub cell: CellCode,
    pub map_x: i32,
    pub map_y: i32,
    pub side: Side,
}

impl RayHit {
    /// Distance projected onto a view direction, removes fisheye distortion
    /// when the ray was cast off-axis.
    pub fn perpendicular(&self, ray_angle: f32, view_angle: f32) -> f32 {
        self.distance * (ray_angle - view_angle).cos()
    }
}

#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Wrap an angle into (-PI, PI]
pub fn normalize_angle(angle: f32) -> f32 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Per-ray DDA state
struct Traversal {
    map_x: i32,
    map_y: i32,
    step_x: i32,
    step_y: i32,
    side_dist_x: f32,
    side_dist_y: f32,
    delta_x: f32,
    delta_y: f32,
}

impl Traversal {
    fn new(origin: Vec2, dir: Vec2) -> Self {
        let map_x = origin.x.floor() as i32;
        let map_y = origin.y.floor() as i32;

        // An axis the ray never moves along has an infinitely distant boundary
        let delta_x = if dir.x == 0.0 { f32::INFINITY } else { (1.0 / dir.x).abs() };
        let delta_y = if dir.y == 0.0 { f32::INFINITY } else { (1.0 / dir.y).abs() };

        let (step_x, side_dist_x) = if dir.x < 0.0 {
            (-1, (origin.x - map_x as f32) * delta_x)
        } else if dir.x > 0.0 {
            (1, (map_x as f32 + 1.0 - origin.x) * delta_x)
        } else {
            (0, f32::INFINITY)
        };
        let (step_y, side_dist_y) = if dir.y < 0.0 {
            (-1, (origin.y - map_y as f32) * delta_y)
        } else if dir.y > 0.0 {
            (1, (map_y as f32 + 1.0 - origin.y) * delta_y)
        } else {
            (0, f32::INFINITY)
        };

        Self {
            map_x,
            map_y,
            step_x,
            step_y,
            side_dist_x,
            side_dist_y,
            delta_x,
            delta_y,
        }
    }

    /// Advance into the next cell; returns the distance at which it was entered.
    fn advance(&mut self) -> (f32, Side) {
        if self.side_dist_x < self.side_dist_y {
            let dist = self.side_dist_x;
            self.side_dist_x += self.delta_x;
            self.map_x += self.step_x;
            (dist, Side::X)
        } else {
            let dist = self.side_dist_y;
            self.side_dist_y += self.delta_y;
            self.map_y += self.step_y;
            (dist, Side::Y)
        }
    }
}

/// Upper bound on cells a ray can cross before it leaves the grid
fn step_cap(grid: &Grid) -> usize {
    grid.width + grid.height + 4
}

/// Cast a ray from `origin` along `angle` until it meets a solid cell or
/// leaves the grid. Always terminates; the grid edge acts as a wall.
pub fn cast_ray(origin: Vec2, angle: f32, grid: &Grid) -> RayHit {
    cast_ray_limited(origin, angle, grid, f32::INFINITY).unwrap_or(RayHit {
        distance: f32::INFINITY,
        cell: WALL,
        map_x: origin.x.floor() as i32,
        map_y: origin.y.floor() as i32,
        side: Side::X,
    })
}

/// Like `cast_ray`, but gives up (returns `None`) once the next wall face
/// lies beyond `max_distance`.
pub fn cast_ray_limited(origin: Vec2, angle: f32, grid: &Grid, max_distance: f32) -> Option<RayHit> {
    let start_x = origin.x.floor() as i32;
    let start_y = origin.y.floor() as i32;
    if !origin.is_finite() || !grid.in_bounds(start_x, start_y) {
        return Some(RayHit {
            distance: 0.0,
            cell: WALL,
            map_x: start_x,
            map_y: start_y,
            side: Side::X,
        });
    }

    let dir = direction(angle);
    let mut ray = Traversal::new(origin, dir);

    for _ in 0..step_cap(grid) {
        let (dist, side) = ray.advance();
        if dist > max_distance {
            return None;
        }
        match grid.get(ray.map_x, ray.map_y) {
            None => {
                return Some(RayHit {
                    distance: dist,
                    cell: WALL,
                    map_x: ray.map_x,
                    map_y: ray.map_y,
                    side,
                })
            }
            Some(code) if is_solid(code) => {
                return Some(RayHit {
                    distance: dist,
                    cell: code,
                    map_x: ray.map_x,
                    map_y: ray.map_y,
                    side,
                })
            }
            Some(_) => {}
        }
    }

    // Only reachable with a degenerate direction (NaN angle); treat as blocked
    Some(RayHit {
        distance: 0.0,
        cell: WALL,
        map_x: ray.map_x,
        map_y: ray.map_y,
        side: Side::X,
    })
}

/// Whether no solid cell lies strictly between the cells of `from` and `to`.
pub fn has_line_of_sight(from: Vec2, to: Vec2, grid: &Grid) -> bool {
    let target_x = to.x.floor() as i32;
    let target_y = to.y.floor() as i32;
    let start_x = from.x.floor() as i32;
    let start_y = from.y.floor() as i32;
    if (start_x, start_y) == (target_x, target_y) {
        return true;
    }

    let delta = to - from;
    let length = delta.length();
    if !length.is_finite() || length <= f32::EPSILON {
        return true;
    }

    let mut ray = Traversal::new(from, delta / length);
    for _ in 0..step_cap(grid) {
        let (dist, _) = ray.advance();
        if (ray.map_x, ray.map_y) == (target_x, target_y) || dist > length {
            return true;
        }
        if grid.is_blocked(ray.map_x, ray.map_y) {
            return false;
        }
    }
    false
}
