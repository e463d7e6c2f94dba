//! Grid collision and movement.
//!
//! Agents are points in continuous tile space; a move is legal when the
//! destination point lies in a passable cell. Out-of-bounds is never legal.

use glam::Vec2;

use crate::grid::Grid;

/// Whether an agent may stand at `pos`
pub fn can_occupy(grid: &Grid, pos: Vec2) -> bool {
    !grid.is_blocked_at(pos.x, pos.y)
}

/// Move to `target` if it is free. Returns whether the move happened.
pub fn try_move(grid: &Grid, pos: &mut Vec2, target: Vec2) -> bool {
    if can_occupy(grid, target) {
        *pos = target;
        true
    } else {
        false
    }
}

/// Step `step_len` along `dir`; when blocked, try the two directions rotated
/// 90 degrees either way before giving up. Returns the new position, or
/// `None` when all three steps are blocked.
pub fn step_with_slide(grid: &Grid, pos: Vec2, dir: Vec2, step_len: f32) -> Option<Vec2> {
    let dir = dir.normalize_or_zero();
    if dir == Vec2::ZERO || step_len <= 0.0 {
        return None;
    }
    [dir, dir.perp(), -dir.perp()]
        .into_iter()
        .map(|d| pos + d * step_len)
        .find(|&candidate| can_occupy(grid, candidate))
}

/// Move by `delta` one axis at a time (x, then y) so the mover slides along
/// walls instead of stopping dead.
pub fn move_axis_separated(grid: &Grid, pos: Vec2, delta: Vec2) -> Vec2 {
    let mut out = pos;
    let across = Vec2::new(out.x + delta.x, out.y);
    try_move(grid, &mut out, across);
    let along = Vec2::new(out.x, out.y + delta.y);
    try_move(grid, &mut out, along);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn room() -> Grid {
        Grid::from_ascii(
            "#####
             #...#
             #.#.#
             #...#
             #####",
        )
    }

    #[test]
    fn test_move_into_wall_is_rejected() {
        let grid = room();
        let mut pos = Vec2::new(1.5, 1.5);
        assert!(!try_move(&grid, &mut pos, Vec2::new(2.5, 2.5)));
        assert_eq!(pos, Vec2::new(1.5, 1.5));
        assert!(try_move(&grid, &mut pos, Vec2::new(2.5, 1.5)));
        assert_eq!(pos, Vec2::new(2.5, 1.5));
    }

    #[test]
    fn test_move_out_of_bounds_is_rejected() {
        let grid = Grid::from_rows(&vec![vec![0; 3]; 3]);
        let mut pos = Vec2::new(0.5, 0.5);
        assert!(!try_move(&grid, &mut pos, Vec2::new(-0.2, 0.5)));
        assert!(!try_move(&grid, &mut pos, Vec2::new(0.5, 3.1)));
        assert_eq!(pos, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn test_slide_tries_perpendicular_directions() {
        let grid = room();
        // Straight down from (2.5, 1.5) hits the centre pillar; +90 deg from
        // "down" is "left", which is open.
        let moved = step_with_slide(&grid, Vec2::new(2.5, 1.5), Vec2::new(0.0, 1.0), 0.8);
        let moved = moved.unwrap_or(Vec2::ZERO);
        assert_abs_diff_eq!(moved.x, 1.7, epsilon = 1e-5);
        assert_abs_diff_eq!(moved.y, 1.5, epsilon = 1e-5);
    }

    #[test]
    fn test_slide_gives_up_when_boxed_in() {
        let grid = Grid::from_ascii(
            "###
             #.#
             ###",
        );
        assert_eq!(step_with_slide(&grid, Vec2::new(1.5, 1.5), Vec2::X, 0.6), None);
    }

    #[test]
    fn test_axis_separated_move_slides_along_wall() {
        let grid = room();
        // Diagonal into the top wall: x progresses, y is rejected
        let end = move_axis_separated(&grid, Vec2::new(1.5, 1.5), Vec2::new(0.5, -0.8));
        assert_abs_diff_eq!(end.x, 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(end.y, 1.5, epsilon = 1e-5);
    }

    #[test]
    fn test_axis_separated_move_uses_updated_x_for_y_step() {
        let grid = room();
        // x lands at 3.3 beside the pillar column; y is then tested from there
        let end = move_axis_separated(&grid, Vec2::new(2.5, 1.5), Vec2::new(0.8, 1.0));
        assert_abs_diff_eq!(end.x, 3.3, epsilon = 1e-5);
        assert_abs_diff_eq!(end.y, 2.5, epsilon = 1e-5);
    }
}
