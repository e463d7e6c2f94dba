//! Projectile system for shotgun pellets.
//!
//! Each tick a pellet sweeps the segment it would travel. The sweep is tested
//! against walls with the raycaster, so a pellet that crosses a wall face is
//! stopped in that very tick, and against live enemies by distance from the
//! segment. Hits are collected during the query and applied afterwards; an
//! enemy whose pending damage already kills it stops being a target, so the
//! rest of a blast passes on to whatever stands behind it.

use glam::Vec2;
use hecs::{Entity, World};

use crate::components::{Position, Projectile, Weapon};
use crate::config::AiTuning;
use crate::constants::ENEMY_HIT_RADIUS;
use crate::events::{EventQueue, GameEvent};
use crate::grid::Grid;
use crate::raycast::cast_ray_limited;
use crate::systems::combat::{damage_enemy, live_enemy_targets};

/// Launch one pellet from `origin` along `angle`
pub fn spawn_projectile(world: &mut World, origin: Vec2, angle: f32, weapon: &Weapon) -> Entity {
    world.spawn((
        Position::from_vec2(origin),
        Projectile::new(angle, weapon.projectile_speed, weapon.max_range, weapon.pellet_damage),
    ))
}

/// Distance along the segment `start + dir * t` (t in `[0, len]`) of the point
/// closest to `target`, and how far `target` is from it.
fn closest_on_segment(start: Vec2, dir: Vec2, len: f32, target: Vec2) -> (f32, f32) {
    let t = (target - start).dot(dir).clamp(0.0, len.max(0.0));
    let closest = start + dir * t;
    (t, closest.distance(target))
}

/// Advance every projectile by `dt`, resolving wall hits, enemy hits and
/// range exhaustion. Finished projectiles are despawned.
pub fn update_projectiles(
    world: &mut World,
    grid: &Grid,
    dt: f32,
    now: f32,
    tuning: &AiTuning,
    events: &mut EventQueue,
) {
    puffin::profile_function!();

    let mut targets = live_enemy_targets(world);
    let mut finished: Vec<Entity> = Vec::new();
    let mut hits: Vec<(Entity, i32)> = Vec::new();

    for (entity, (pos, projectile)) in world.query_mut::<(&mut Position, &mut Projectile)>() {
        let start = pos.as_vec2();
        let dir = projectile.direction();
        let step = (projectile.speed * dt).max(0.0).min(projectile.remaining_range());

        // Wall within this tick's travel?
        let wall = cast_ray_limited(start, projectile.angle, grid, step);
        let travel = wall.map(|hit| hit.distance).unwrap_or(step);

        // Nearest live enemy swept before the wall
        let struck = targets
            .iter()
            .enumerate()
            .filter(|(_, target)| target.2 > 0)
            .map(|(slot, &(target, target_pos, _))| {
                let (t, miss) = closest_on_segment(start, dir, travel, target_pos);
                (slot, target, t, miss)
            })
            .filter(|&(_, _, _, miss)| miss < ENEMY_HIT_RADIUS)
            .min_by(|a, b| a.2.total_cmp(&b.2));

        if let Some((slot, target, t, _)) = struck {
            targets[slot].2 -= projectile.damage;
            let position = start + dir * t;
            *pos = Position::from_vec2(position);
            hits.push((target, projectile.damage));
            events.push(GameEvent::ProjectileHitEnemy {
                entity: target,
                position,
                damage: projectile.damage,
            });
            finished.push(entity);
            continue;
        }

        if let Some(hit) = wall {
            let position = start + dir * hit.distance;
            *pos = Position::from_vec2(position);
            events.push(GameEvent::ProjectileHitWall {
                position,
                cell: hit.cell,
            });
            finished.push(entity);
            continue;
        }

        *pos = Position::from_vec2(start + dir * step);
        projectile.traveled += step;
        if projectile.traveled >= projectile.max_range {
            events.push(GameEvent::ProjectileExpired {
                position: pos.as_vec2(),
            });
            finished.push(entity);
        }
    }

    for entity in finished {
        let _ = world.despawn(entity);
    }
    for (target, damage) in hits {
        damage_enemy(world, target, damage, now, tuning, events);
    }
}
