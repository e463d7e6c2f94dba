//! Game simulation - one fixed order of updates per frame.
//!
//! `step` is a function of the current state, the player's intent and the
//! frame delta. It never reads the wall clock.

use glam::Vec2;
use log::info;

use crate::components::Player;
use crate::events::GameEvent;
use crate::grid::Grid;
use crate::raycast::{direction, normalize_angle};
use crate::systems;

use super::game_state::{GameState, Outcome};

/// What the player wants to do this frame, before validation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerIntent {
    /// Along the view direction, -1 (back) to 1 (forward)
    pub forward: f32,
    /// Sideways, -1 (left) to 1 (right)
    pub strafe: f32,
    /// Requested turn in radians; limited by the player's turn speed
    pub turn: f32,
    pub fire: bool,
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl PlayerIntent {
    /// Drop non-finite input, clamp the axes and keep diagonal moves from
    /// being faster than straight ones.
    pub fn sanitized(&self) -> Self {
        let mut forward = finite_or_zero(self.forward).clamp(-1.0, 1.0);
        let mut strafe = finite_or_zero(self.strafe).clamp(-1.0, 1.0);
        let len = Vec2::new(forward, strafe).length();
        if len > 1.0 {
            forward /= len;
            strafe /= len;
        }
        Self {
            forward,
            strafe,
            turn: finite_or_zero(self.turn),
            fire: self.fire,
        }
    }
}

/// Rotate the player by at most `turn_speed * dt`.
pub fn turn_player(player: &mut Player, turn: f32, dt: f32) {
    let limit = (player.turn_speed * dt).abs();
    player.angle = normalize_angle(player.angle + turn.clamp(-limit, limit));
}

/// Walk and strafe relative to the view angle, sliding along walls.
pub fn move_player(grid: &Grid, player: &mut Player, intent: &PlayerIntent, dt: f32) {
    let facing = direction(player.angle);
    let right = facing.perp();
    let delta = (facing * intent.forward + right * intent.strafe) * player.move_speed * dt;
    if delta != Vec2::ZERO {
        player.pos = systems::move_axis_separated(grid, player.pos, delta);
    }
}

impl GameState {
    /// Advance the simulation by one frame. Returns the outcome once the
    /// level has ended; after that further calls change nothing.
    pub fn step(&mut self, intent: &PlayerIntent, dt: f32) -> Option<Outcome> {
        puffin::profile_function!();

        if self.outcome.is_some() {
            return self.outcome;
        }

        let dt = self.clock.tick(dt);
        let now = self.clock.time;
        let intent = intent.sanitized();

        turn_player(&mut self.player, intent.turn, dt);
        move_player(&self.grid, &mut self.player, &intent, dt);
        if intent.fire {
            systems::fire_weapon(
                &mut self.world,
                &mut self.player,
                now,
                &mut self.rng,
                &mut self.events,
            );
        }

        let tuning = self.config.ai;
        systems::update_projectiles(&mut self.world, &self.grid, dt, now, &tuning, &mut self.events);
        systems::update_enemies(
            &mut self.world,
            &self.grid,
            self.player.pos,
            now,
            dt,
            &tuning,
            &mut self.events,
        );
        systems::resolve_enemy_strikes(&self.world, &mut self.player, &mut self.events);
        systems::update_dying(&mut self.world, dt);

        self.outcome = self.check_outcome();
        self.outcome
    }

    /// Player death wins over a cleared level in the same frame.
    fn check_outcome(&mut self) -> Option<Outcome> {
        if self.player.is_dead() {
            info!("Player died on level {} at t={:.2}s", self.level, self.clock.time);
            self.events.push(GameEvent::PlayerDied);
            return Some(Outcome::PlayerDead);
        }
        if self.live_enemy_count() == 0 {
            info!("Level {} complete at t={:.2}s", self.level, self.clock.time);
            self.events.push(GameEvent::LevelComplete);
            return Some(Outcome::LevelComplete);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Dying, Enemy, EnemyAi, Projectile};
    use crate::config::GameConfig;
    use crate::dungeon_gen::Rect;
    use crate::spawning::{spawn_enemy, EnemyKind};
    use approx::assert_abs_diff_eq;
    use hecs::Entity;

    const DT: f32 = 1.0 / 60.0;

    fn arena() -> Grid {
        Grid::from_ascii(
            "############
             #..........#
             #..........#
             #..........#
             #..........#
             #..........#
             ############",
        )
    }

    /// An arena with no spawned enemies; tests add their own.
    fn quiet_state() -> GameState {
        let mut config = GameConfig::default();
        config.spawn.enemies_per_room = 0;
        GameState::with_grid(config, arena(), vec![Rect::new(1, 1, 10, 5)], 7)
    }

    fn kill_all(state: &mut GameState) {
        let enemies: Vec<Entity> = state.world.query::<&Enemy>().iter().map(|(e, _)| e).collect();
        for entity in enemies {
            let _ = state.world.despawn(entity);
        }
    }

    #[test]
    fn test_sanitize_clamps_and_normalizes() {
        let intent = PlayerIntent {
            forward: 5.0,
            strafe: 1.0,
            turn: f32::NAN,
            fire: true,
        }
        .sanitized();
        assert_abs_diff_eq!(intent.forward, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
        assert_abs_diff_eq!(intent.strafe, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
        assert_eq!(intent.turn, 0.0);
        assert!(intent.fire);

        let intent = PlayerIntent {
            forward: f32::INFINITY,
            strafe: -0.5,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(intent.forward, 0.0);
        assert_eq!(intent.strafe, -0.5);
    }

    #[test]
    fn test_turn_is_rate_limited_and_wrapped() {
        let mut state = quiet_state();
        spawn_enemy(&mut state.world, EnemyKind::Imp, Vec2::new(10.5, 5.5));
        state.player.angle = 3.1;
        let intent = PlayerIntent {
            turn: 10.0,
            ..Default::default()
        };
        state.step(&intent, 0.05);
        // 6 rad/s for 0.05 s: 0.3 rad, wrapping past PI
        assert_abs_diff_eq!(state.player.angle, 3.4 - std::f32::consts::TAU, epsilon = 1e-4);
    }

    #[test]
    fn test_player_slides_along_wall() {
        let mut state = quiet_state();
        spawn_enemy(&mut state.world, EnemyKind::Baron, Vec2::new(10.5, 5.5));
        state.player.pos = Vec2::new(1.1, 2.5);
        // Facing up-left into the corner of the west wall
        state.player.angle = std::f32::consts::PI * 1.25;
        let intent = PlayerIntent {
            forward: 1.0,
            ..Default::default()
        };
        let start = state.player.pos;
        state.step(&intent, 0.05);
        assert_eq!(state.player.pos.x, start.x);
        assert!(state.player.pos.y < start.y);
        assert!(!state.grid.is_blocked_at(state.player.pos.x, state.player.pos.y));
    }

    #[test]
    fn test_fire_spawns_pellets() {
        let mut state = quiet_state();
        spawn_enemy(&mut state.world, EnemyKind::Baron, Vec2::new(10.5, 5.5));
        let intent = PlayerIntent {
            fire: true,
            ..Default::default()
        };
        state.step(&intent, DT);
        assert_eq!(state.player.ammo, 49);
        assert_eq!(state.world.query::<&Projectile>().iter().count(), 5);
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::WeaponFired { pellets: 5 })));
    }

    #[test]
    fn test_level_complete_when_no_enemies_remain() {
        let mut state = quiet_state();
        let imp = spawn_enemy(&mut state.world, EnemyKind::Imp, Vec2::new(10.5, 5.5));
        assert_eq!(state.step(&PlayerIntent::default(), DT), None);

        // A dying enemy no longer counts as alive
        state.world.insert_one(imp, Dying::new(0.5)).unwrap();
        assert_eq!(state.step(&PlayerIntent::default(), DT), Some(Outcome::LevelComplete));
        assert!(state.events.iter().any(|e| *e == GameEvent::LevelComplete));

        // Further steps are no-ops
        let time = state.now();
        assert_eq!(state.step(&PlayerIntent::default(), DT), Some(Outcome::LevelComplete));
        assert_eq!(state.now(), time);
    }

    #[test]
    fn test_player_death_takes_precedence() {
        let mut state = quiet_state();
        kill_all(&mut state);
        state.player.health.current = 0;
        assert_eq!(state.step(&PlayerIntent::default(), DT), Some(Outcome::PlayerDead));
        let events: Vec<_> = state.events.drain().collect();
        assert!(events.contains(&GameEvent::PlayerDied));
        assert!(!events.contains(&GameEvent::LevelComplete));
    }

    #[test]
    fn test_enemy_chases_and_hurts_player() {
        let mut state = quiet_state();
        let imp = spawn_enemy(&mut state.world, EnemyKind::Imp, Vec2::new(6.5, 3.5));
        state.player.pos = Vec2::new(2.5, 3.5);

        for _ in 0..240 {
            state.step(&PlayerIntent::default(), DT);
        }
        let ai_state = state.world.get::<&EnemyAi>(imp).map(|ai| ai.state).unwrap();
        assert_eq!(ai_state, crate::components::AiState::Attack);
        assert!(state.player.health.current < 100);
        assert!(state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::PlayerDamaged { source, .. } if *source == imp)));
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut state = quiet_state();
        spawn_enemy(&mut state.world, EnemyKind::Imp, Vec2::new(10.5, 5.5));
        state.step(&PlayerIntent::default(), 5.0);
        assert_abs_diff_eq!(state.now(), 0.1, epsilon = 1e-6);
        state.step(&PlayerIntent::default(), f32::NAN);
        assert_abs_diff_eq!(state.now(), 0.1, epsilon = 1e-6);
    }
}
