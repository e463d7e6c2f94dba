//! Billboard projection for enemies and projectiles.

use glam::Vec2;
use hecs::World;

use crate::components::{Dying, Enemy, EnemyAi, Health, Player, Position, Projectile};
use crate::config::RenderConfig;
use crate::constants::RENDER_MIN_DEPTH;
use crate::grid::Grid;
use crate::raycast::{has_line_of_sight, normalize_angle};
use crate::spawning::EnemyKind;

use super::shade;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteKind {
    Enemy {
        kind: EnemyKind,
        health_fraction: f32,
        /// Inside the attack pose window
        attacking: bool,
    },
    DyingEnemy {
        kind: EnemyKind,
        /// 0 at the moment of death, 1 when gone
        progress: f32,
    },
    Projectile,
}

/// A sprite placed on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteProjection {
    pub kind: SpriteKind,
    /// Horizontal centre in pixels
    pub screen_x: f32,
    /// Edge length in pixels
    pub size: f32,
    /// Distance along the view direction, comparable with wall depth
    pub depth: f32,
    /// First and last viewport column not hidden behind a nearer wall
    pub first_column: u32,
    pub last_column: u32,
    pub brightness: f32,
}

/// Place one world point on screen, or `None` if it is culled.
fn project(
    target: Vec2,
    scale: f32,
    player: &Player,
    grid: &Grid,
    config: &RenderConfig,
    depth_buffer: &[f32],
) -> Option<(f32, f32, f32, u32, u32)> {
    let rel = target - player.pos;
    let distance = rel.length();
    if distance <= RENDER_MIN_DEPTH || distance > config.max_sprite_distance {
        return None;
    }

    let bearing = normalize_angle(rel.y.atan2(rel.x) - player.angle);
    if bearing.abs() > config.fov * 0.5 {
        return None;
    }
    if !has_line_of_sight(player.pos, target, grid) {
        return None;
    }

    let width = config.width as f32;
    let screen_x = (bearing / config.fov + 0.5) * width;
    let depth = (distance * bearing.cos()).max(RENDER_MIN_DEPTH);
    let size = config.height as f32 * scale / depth;

    let last = config.width.saturating_sub(1) as i64;
    let half = size * 0.5;
    let mut first = ((screen_x - half).floor() as i64).clamp(0, last);
    let mut end = ((screen_x + half).ceil() as i64 - 1).clamp(0, last);

    // Shrink the span past columns where a wall is in front
    let hidden = |column: i64| {
        depth_buffer
            .get(column as usize)
            .map_or(false, |&wall| wall < depth)
    };
    while first <= end && hidden(first) {
        first += 1;
    }
    while end >= first && hidden(end) {
        end -= 1;
    }
    if first > end {
        return None;
    }

    Some((screen_x, size, depth, first as u32, end as u32))
}

/// Project every visible enemy and projectile, sorted far to near.
pub fn project_sprites(
    world: &World,
    grid: &Grid,
    player: &Player,
    now: f32,
    config: &RenderConfig,
    depth_buffer: &[f32],
) -> Vec<SpriteProjection> {
    puffin::profile_function!();

    let mut sprites = Vec::new();

    for (_, (pos, enemy, health, ai, dying)) in world
        .query::<(&Position, &Enemy, &Health, &EnemyAi, Option<&Dying>)>()
        .iter()
    {
        let kind = match dying {
            Some(dying) => SpriteKind::DyingEnemy {
                kind: enemy.kind,
                progress: dying.progress(),
            },
            None => SpriteKind::Enemy {
                kind: enemy.kind,
                health_fraction: health.percentage(),
                attacking: ai.in_attack_pose(now),
            },
        };
        let projected = project(
            pos.as_vec2(),
            config.sprite_scale,
            player,
            grid,
            config,
            depth_buffer,
        );
        if let Some((screen_x, size, depth, first_column, last_column)) = projected {
            sprites.push(SpriteProjection {
                kind,
                screen_x,
                size,
                depth,
                first_column,
                last_column,
                brightness: shade(depth, config.shade_distance),
            });
        }
    }

    for (_, (pos, _)) in world.query::<(&Position, &Projectile)>().iter() {
        let projected = project(
            pos.as_vec2(),
            config.projectile_scale,
            player,
            grid,
            config,
            depth_buffer,
        );
        if let Some((screen_x, size, depth, first_column, last_column)) = projected {
            sprites.push(SpriteProjection {
                kind: SpriteKind::Projectile,
                screen_x,
                size,
                depth,
                first_column,
                last_column,
                // Pellets glow
                brightness: 1.0,
            });
        }
    }

    sprites.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    sprites
}
