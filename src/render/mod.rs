//! Projection pass: turns game state into wall columns and sprite quads.
//!
//! `Renderer::render` is a pure function of the state. It casts one ray per
//! viewport column, keeps the perpendicular distance of every column in a
//! depth buffer and projects sprites in the same units, so a sprite nearer
//! than a wall is drawn over it and one behind a wall is clipped.
//! Rasterizing the result into pixels lives in `framebuffer`.

mod framebuffer;
mod sprites;

pub use framebuffer::Framebuffer;
pub use sprites::{project_sprites, SpriteKind, SpriteProjection};

use glam::Vec2;

use crate::config::RenderConfig;
use crate::constants::RENDER_MIN_DEPTH;
use crate::engine::GameState;
use crate::grid::Grid;
use crate::raycast::cast_ray;
use crate::tile::{CellCode, TileType};

/// How a wall column is filled, chosen by the cell code that was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallStyle {
    Stone,
    Pillar,
    Platform,
    Bridge,
    Stair,
    FlowerWallpaper,
    FlowerWallpaperLeaves,
}

impl WallStyle {
    pub fn from_cell(code: CellCode) -> Self {
        match TileType::from_code(code) {
            TileType::Pillar => WallStyle::Pillar,
            TileType::Platform => WallStyle::Platform,
            TileType::Bridge => WallStyle::Bridge,
            TileType::Stair => WallStyle::Stair,
            TileType::FlowerWallpaper => WallStyle::FlowerWallpaper,
            TileType::FlowerWallpaperLeaves => WallStyle::FlowerWallpaperLeaves,
            TileType::Wall | TileType::Floor => WallStyle::Stone,
        }
    }

    pub fn is_flowered(self) -> bool {
        matches!(self, WallStyle::FlowerWallpaper | WallStyle::FlowerWallpaperLeaves)
    }
}

/// One vertical wall slab
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallColumn {
    /// Perpendicular distance to the wall face
    pub distance: f32,
    /// Slab height in pixels
    pub height: f32,
    /// Top edge in pixels; may be negative for walls taller than the screen
    pub top: f32,
    /// Linear distance falloff, 0..=1
    pub brightness: f32,
    pub cell: CellCode,
    pub style: WallStyle,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub columns: Vec<WallColumn>,
    /// Wall distance per column, in the same units as `SpriteProjection::depth`
    pub depth: Vec<f32>,
    /// Sorted far to near
    pub sprites: Vec<SpriteProjection>,
}

/// Linear falloff with distance, clamped to `[0, 1]`
pub fn shade(distance: f32, shade_distance: f32) -> f32 {
    if shade_distance <= 0.0 {
        return 0.0;
    }
    (1.0 - distance / shade_distance).clamp(0.0, 1.0)
}

pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Ray angle for viewport column `column`
    pub fn column_angle(&self, view_angle: f32, column: u32) -> f32 {
        let fov = self.config.fov;
        view_angle - fov * 0.5 + column as f32 * (fov / self.config.width as f32)
    }

    /// Project the whole view. Reads the state, never mutates it.
    pub fn render(&self, state: &GameState) -> Frame {
        puffin::profile_function!();

        let columns = self.cast_columns(&state.grid, state.player.pos, state.player.angle);
        let depth: Vec<f32> = columns.iter().map(|c| c.distance).collect();
        let sprites = project_sprites(
            &state.world,
            &state.grid,
            &state.player,
            state.now(),
            &self.config,
            &depth,
        );

        Frame {
            width: self.config.width,
            height: self.config.height,
            columns,
            depth,
            sprites,
        }
    }

    /// One wall column per viewport column, fisheye-corrected.
    pub fn cast_columns(&self, grid: &Grid, origin: Vec2, view_angle: f32) -> Vec<WallColumn> {
        puffin::profile_scope!("cast_columns");

        let screen_h = self.config.height as f32;
        (0..self.config.width)
            .map(|column| {
                let ray_angle = self.column_angle(view_angle, column);
                let hit = cast_ray(origin, ray_angle, grid);
                let distance = hit.perpendicular(ray_angle, view_angle).max(0.0);
                let height = screen_h * self.config.wall_height_scale / distance.max(RENDER_MIN_DEPTH);
                WallColumn {
                    distance,
                    height,
                    top: (screen_h - height) * 0.5,
                    brightness: shade(distance, self.config.shade_distance),
                    cell: hit.cell,
                    style: WallStyle::from_cell(hit.cell),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::dungeon_gen::Rect;
    use crate::spawning::{spawn_enemy, EnemyKind};
    use approx::assert_abs_diff_eq;

    fn small_config() -> RenderConfig {
        RenderConfig {
            width: 64,
            height: 48,
            ..RenderConfig::default()
        }
    }

    fn hall_state() -> GameState {
        let grid = Grid::from_ascii(
            "##########
             #........#
             #........#
             #........f
             ##########",
        );
        let mut config = GameConfig::default();
        config.spawn.enemies_per_room = 0;
        config.render = small_config();
        GameState::with_grid(config, grid, vec![Rect::new(1, 1, 8, 3)], 1)
    }

    #[test]
    fn test_column_angles_span_the_fov() {
        let renderer = Renderer::new(small_config());
        let fov = small_config().fov;
        assert_abs_diff_eq!(renderer.column_angle(0.0, 0), -fov / 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(renderer.column_angle(0.0, 32), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_center_column_projects_facing_wall() {
        let mut state = hall_state();
        state.player.pos = Vec2::new(2.5, 2.5);
        state.player.angle = 0.0;
        let renderer = Renderer::new(small_config());
        let columns = renderer.cast_columns(&state.grid, state.player.pos, 0.0);

        let center = columns[32];
        assert_abs_diff_eq!(center.distance, 6.5, epsilon = 1e-4);
        assert_abs_diff_eq!(center.height, 48.0 / 6.5, epsilon = 1e-3);
        assert_abs_diff_eq!(center.top, (48.0 - center.height) / 2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(center.brightness, 1.0 - 6.5 / 20.0, epsilon = 1e-5);
        assert_eq!(center.style, WallStyle::Stone);
    }

    #[test]
    fn test_flat_wall_has_uniform_depth() {
        // Perpendicular distance to a wall square to the view is the same in
        // every column
        let state = hall_state();
        let renderer = Renderer::new(small_config());
        let columns = renderer.cast_columns(&state.grid, Vec2::new(5.0, 2.5), -std::f32::consts::FRAC_PI_2);
        for column in &columns[8..56] {
            assert_abs_diff_eq!(column.distance, 1.5, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_style_follows_cell_code() {
        let state = hall_state();
        let renderer = Renderer::new(small_config());
        let columns = renderer.cast_columns(&state.grid, Vec2::new(5.5, 3.5), 0.0);
        assert_eq!(columns[32].cell, 6);
        assert_eq!(columns[32].style, WallStyle::FlowerWallpaper);
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut state = hall_state();
        spawn_enemy(&mut state.world, EnemyKind::Cacodemon, Vec2::new(7.5, 2.5));
        let renderer = Renderer::new(small_config());
        let first = renderer.render(&state);
        let second = renderer.render(&state);
        assert_eq!(first.depth, second.depth);
        assert_eq!(first, second);
        assert_eq!(first.columns.len(), 64);
    }

    #[test]
    fn test_shade_clamps() {
        assert_eq!(shade(0.0, 20.0), 1.0);
        assert_eq!(shade(40.0, 20.0), 0.0);
        assert_abs_diff_eq!(shade(5.0, 20.0), 0.75, epsilon = 1e-6);
    }
}
