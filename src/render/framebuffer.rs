//! Software rasterizer for a projected `Frame`.
//!
//! The only randomness in rendering lives here: flower placement on
//! wallpapered walls jitters every frame. It uses its own rng so drawing
//! never disturbs the simulation.

use std::path::Path;

use image::{ImageResult, Rgba, RgbaImage};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::spawning::EnemyKind;

use super::{Frame, SpriteKind, SpriteProjection, WallStyle};

const CEILING: Rgba<u8> = Rgba([0x33, 0x33, 0x33, 0xff]);
const FLOOR: Rgba<u8> = Rgba([0x66, 0x66, 0x66, 0xff]);
const LEGS: [u8; 3] = [0x8b, 0x45, 0x13];
const PROJECTILE: [u8; 3] = [0xff, 0xff, 0x00];
const HEALTH_BAR: [u8; 3] = [0x00, 0xc8, 0x00];
const HEALTH_BAR_BACK: [u8; 3] = [0x50, 0x00, 0x00];
const FLOWER_PETAL: [u8; 3] = [0xff, 0x69, 0xb4];
const FLOWER_CENTER: [u8; 3] = [0xff, 0xd7, 0x00];
const FLOWER_LEAF: [u8; 3] = [0x22, 0x8b, 0x22];

fn wall_color(style: WallStyle) -> [u8; 3] {
    match style {
        WallStyle::Stone => [0xb0, 0xb0, 0xb0],
        WallStyle::Pillar => [0xa0, 0x52, 0x2d],
        WallStyle::Platform => [0x70, 0x80, 0x90],
        WallStyle::Bridge => [0x8b, 0x5a, 0x2b],
        WallStyle::Stair => [0xc2, 0xb2, 0x80],
        WallStyle::FlowerWallpaper => [0xf5, 0xde, 0xb3],
        WallStyle::FlowerWallpaperLeaves => [0xee, 0xe8, 0xaa],
    }
}

fn enemy_color(kind: EnemyKind) -> [u8; 3] {
    match kind {
        EnemyKind::Imp => [0xff, 0x45, 0x00],
        EnemyKind::Cacodemon => [0xff, 0x00, 0x00],
        EnemyKind::Baron => [0x8b, 0x00, 0x00],
    }
}

fn shaded(rgb: [u8; 3], brightness: f32) -> Rgba<u8> {
    let b = brightness.clamp(0.0, 1.0);
    Rgba([
        (rgb[0] as f32 * b) as u8,
        (rgb[1] as f32 * b) as u8,
        (rgb[2] as f32 * b) as u8,
        0xff,
    ])
}

pub struct Framebuffer {
    image: RgbaImage,
    rng: ChaCha8Rng,
}

impl Framebuffer {
    /// `seed` drives decorative jitter only
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Paint a frame: ceiling and floor, wall columns, then sprites clipped
    /// against the depth buffer.
    pub fn rasterize(&mut self, frame: &Frame) {
        puffin::profile_function!();

        if self.image.dimensions() != (frame.width, frame.height) {
            self.image = RgbaImage::new(frame.width, frame.height);
        }
        let horizon = frame.height / 2;
        for (_, y, pixel) in self.image.enumerate_pixels_mut() {
            *pixel = if y < horizon { CEILING } else { FLOOR };
        }

        for (x, column) in frame.columns.iter().enumerate() {
            let x = x as u32;
            let top = column.top;
            let bottom = column.top + column.height;
            self.fill_column(x, top, bottom, shaded(wall_color(column.style), column.brightness));
            if column.style.is_flowered() {
                self.scatter_flowers(x, top, bottom, column.style, column.brightness);
            }
        }

        for sprite in &frame.sprites {
            self.draw_sprite(sprite, frame);
        }
    }

    pub fn save_png(&self, path: &Path) -> ImageResult<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)
    }

    fn fill_column(&mut self, x: u32, top: f32, bottom: f32, color: Rgba<u8>) {
        let (width, height) = self.image.dimensions();
        if x >= width {
            return;
        }
        let y0 = top.max(0.0) as u32;
        let y1 = (bottom.min(height as f32).max(0.0)) as u32;
        for y in y0..y1 {
            self.image.put_pixel(x, y, color);
        }
    }

    /// A flower or two at random heights on a wallpapered column
    fn scatter_flowers(&mut self, x: u32, top: f32, bottom: f32, style: WallStyle, brightness: f32) {
        let span = bottom - top;
        if span < 4.0 || !self.rng.gen_bool(0.15) {
            return;
        }
        let size = (span / 4.0).min(5.0);
        let center = self.rng.gen_range(top..(bottom - size).max(top + 1.0)) + size * 0.5;
        self.fill_column(x, center - size * 0.5, center + size * 0.5, shaded(FLOWER_PETAL, brightness));
        self.fill_column(x, center - size * 0.2, center + size * 0.2, shaded(FLOWER_CENTER, brightness));
        if style == WallStyle::FlowerWallpaperLeaves {
            self.fill_column(x, center + size * 0.5, center + size, shaded(FLOWER_LEAF, brightness));
        }
    }

    fn draw_sprite(&mut self, sprite: &SpriteProjection, frame: &Frame) {
        let horizon = frame.height as f32 * 0.5;
        let half = sprite.size * 0.5;
        let left = sprite.screen_x - half;

        for x in sprite.first_column..=sprite.last_column {
            let occluded = frame
                .depth
                .get(x as usize)
                .map_or(true, |&wall| wall < sprite.depth);
            if occluded {
                continue;
            }
            let u = (x as f32 + 0.5 - left) / sprite.size.max(f32::EPSILON);

            match sprite.kind {
                SpriteKind::Projectile => {
                    self.fill_column(x, horizon - half, horizon + half, shaded(PROJECTILE, 1.0));
                }
                SpriteKind::Enemy {
                    kind,
                    health_fraction,
                    attacking,
                } => {
                    // Body above the horizon, legs below
                    let body = if attacking { [0xff, 0xff, 0xff] } else { enemy_color(kind) };
                    self.fill_column(x, horizon - sprite.size, horizon, shaded(body, sprite.brightness));
                    if (0.25..0.42).contains(&u) || (0.58..0.75).contains(&u) {
                        self.fill_column(x, horizon, horizon + half, shaded(LEGS, sprite.brightness));
                    }
                    let bar_top = horizon - sprite.size - 6.0;
                    let bar = if u <= health_fraction { HEALTH_BAR } else { HEALTH_BAR_BACK };
                    self.fill_column(x, bar_top, bar_top + 3.0, shaded(bar, 1.0));
                }
                SpriteKind::DyingEnemy { kind, progress } => {
                    // Collapses toward the floor and fades out
                    let remaining = 1.0 - progress;
                    let top = horizon - sprite.size * remaining;
                    self.fill_column(x, top, horizon, shaded(enemy_color(kind), sprite.brightness * remaining));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::WallColumn;

    fn frame_with_wall(brightness: f32, style: WallStyle) -> Frame {
        let column = WallColumn {
            distance: 2.0,
            height: 10.0,
            top: 5.0,
            brightness,
            cell: 1,
            style,
        };
        Frame {
            width: 4,
            height: 20,
            columns: vec![column; 4],
            depth: vec![2.0; 4],
            sprites: Vec::new(),
        }
    }

    #[test]
    fn test_rasterize_paints_ceiling_wall_and_floor() {
        let mut fb = Framebuffer::new(4, 20, 0);
        fb.rasterize(&frame_with_wall(1.0, WallStyle::Stone));
        let image = fb.image();
        assert_eq!(*image.get_pixel(0, 0), CEILING);
        assert_eq!(*image.get_pixel(0, 19), FLOOR);
        assert_eq!(*image.get_pixel(0, 10), shaded(wall_color(WallStyle::Stone), 1.0));
    }

    #[test]
    fn test_sprite_hidden_behind_nearer_wall() {
        let mut frame = frame_with_wall(1.0, WallStyle::Stone);
        frame.sprites.push(SpriteProjection {
            kind: SpriteKind::Projectile,
            screen_x: 2.0,
            size: 4.0,
            depth: 3.0,
            first_column: 0,
            last_column: 3,
            brightness: 1.0,
        });
        let mut fb = Framebuffer::new(4, 20, 0);
        fb.rasterize(&frame);
        assert_eq!(*fb.image().get_pixel(1, 10), shaded(wall_color(WallStyle::Stone), 1.0));

        frame.sprites[0].depth = 1.0;
        fb.rasterize(&frame);
        assert_eq!(*fb.image().get_pixel(1, 10), shaded(PROJECTILE, 1.0));
    }

    #[test]
    fn test_flower_jitter_is_seeded() {
        let frame = Frame {
            width: 64,
            height: 64,
            ..frame_with_wall(1.0, WallStyle::FlowerWallpaper)
        };
        let frame = Frame {
            columns: vec![frame.columns[0]; 64],
            depth: vec![2.0; 64],
            ..frame
        };
        let mut a = Framebuffer::new(64, 64, 5);
        let mut b = Framebuffer::new(64, 64, 5);
        a.rasterize(&frame);
        b.rasterize(&frame);
        assert_eq!(a.image(), b.image());
    }
}
