//! Enemy state machine.
//!
//! `idle -> chase -> attack`, with `hurt` entered from any state on damage.
//! Time is passed in explicitly (`now`, `dt` in simulation seconds); the
//! machine never mutates the player, it only raises `is_attacking` on the tick
//! a strike fires and leaves damage to the combat system.

use glam::Vec2;
use hecs::World;

use crate::components::{AiState, Dying, Enemy, EnemyAi, Position};
use crate::config::AiTuning;
use crate::events::{EventQueue, GameEvent};
use crate::grid::Grid;
use crate::spawning::EnemyStats;
use crate::systems::movement::step_with_slide;

/// Advance one enemy by one tick. Returns the new state when it changed.
pub fn tick_enemy(
    ai: &mut EnemyAi,
    pos: &mut Position,
    stats: &EnemyStats,
    grid: &Grid,
    player_pos: Vec2,
    now: f32,
    dt: f32,
    tuning: &AiTuning,
) -> Option<AiState> {
    let before = ai.state;
    ai.is_attacking = false;

    // A stunned enemy does nothing until the stun wears off, then chases
    // in the same tick.
    if ai.state == AiState::Hurt {
        if now < ai.hurt_until {
            return None;
        }
        ai.state = AiState::Chase;
    }

    let distance = pos.distance(player_pos);
    match ai.state {
        AiState::Idle => {
            if distance < tuning.notice_radius {
                ai.state = AiState::Chase;
            }
        }
        AiState::Chase => {
            if distance > tuning.lose_radius {
                ai.state = AiState::Idle;
            } else if distance <= stats.attack_range {
                ai.state = AiState::Attack;
            } else {
                let dir = player_pos - pos.as_vec2();
                if let Some(next) = step_with_slide(grid, pos.as_vec2(), dir, stats.speed * dt) {
                    *pos = Position::from_vec2(next);
                }
            }
        }
        AiState::Attack => {
            if distance > stats.attack_range {
                ai.state = AiState::Chase;
            } else if now >= ai.next_attack_at {
                ai.is_attacking = true;
                ai.next_attack_at = now + stats.attack_cooldown;
                ai.attack_pose_until = now + tuning.attack_pose_duration;
            }
        }
        AiState::Hurt => {}
    }

    (ai.state != before).then_some(ai.state)
}

/// Tick every live enemy, emitting `EnemyStateChanged` on transitions.
pub fn update_enemies(
    world: &mut World,
    grid: &Grid,
    player_pos: Vec2,
    now: f32,
    dt: f32,
    tuning: &AiTuning,
    events: &mut EventQueue,
) {
    puffin::profile_function!();

    for (entity, (pos, enemy, ai, dying)) in
        world.query_mut::<(&mut Position, &Enemy, &mut EnemyAi, Option<&Dying>)>()
    {
        if dying.is_some() {
            continue;
        }
        if let Some(state) = tick_enemy(ai, pos, &enemy.stats, grid, player_pos, now, dt, tuning) {
            events.push(GameEvent::EnemyStateChanged { entity, state });
        }
    }
}
