//! Moving between levels. Both flows are host-invoked after `step` reports
//! an outcome; the core never advances on its own.

use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::GameConfig;

use super::game_state::GameState;
use super::initialization;

impl GameState {
    /// Generate the next level with `config`, carrying over the player's
    /// health and ammo. The new seed is drawn from the gameplay rng so a
    /// seeded run stays reproducible.
    pub fn next_level(&mut self, config: &GameConfig) {
        let seed: u64 = self.rng.gen();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let level = initialization::build_level(config, &mut rng);

        let health = self.player.health;
        let ammo = self.player.ammo;
        let number = self.level + 1;
        info!("Advancing to level {}", number);

        *self = GameState::from_level(config.clone(), level, rng, seed, number);
        self.player.health = health;
        self.player.ammo = 0;
        self.player.add_ammo(ammo);
    }

    /// Throw everything away and start again at level 1.
    pub fn restart(&mut self) {
        info!("Restarting from level 1");
        *self = GameState::new(self.config.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Outcome, PlayerIntent};

    fn seeded_config(seed: u64) -> GameConfig {
        let mut config = GameConfig::default();
        config.level.seed = Some(seed);
        config
    }

    #[test]
    fn test_next_level_keeps_health_and_ammo() {
        let config = seeded_config(3);
        let mut state = GameState::new(config.clone());
        state.player.health.current = 42;
        state.player.ammo = 7;
        let old_grid = state.grid.clone();

        state.next_level(&config);
        assert_eq!(state.level, 2);
        assert_eq!(state.player.health.current, 42);
        assert_eq!(state.player.ammo, 7);
        assert_eq!(state.outcome(), None);
        assert_eq!(state.now(), 0.0);
        assert_ne!(state.grid, old_grid);
    }

    #[test]
    fn test_next_level_caps_ammo_at_new_max() {
        let config = seeded_config(4);
        let mut state = GameState::new(config.clone());
        state.player.ammo = 90;

        let mut tighter = config;
        tighter.player.max_ammo = 60;
        tighter.player.starting_ammo = 10;
        state.next_level(&tighter);
        assert_eq!(state.player.max_ammo, 60);
        assert_eq!(state.player.ammo, 60);
    }

    #[test]
    fn test_restart_with_fixed_seed_rebuilds_same_level() {
        let config = seeded_config(9);
        let mut state = GameState::new(config);
        let original = state.grid.clone();
        state.player.health.current = 0;
        assert_eq!(state.step(&PlayerIntent::default(), 0.016), Some(Outcome::PlayerDead));

        state.restart();
        assert_eq!(state.level, 1);
        assert_eq!(state.grid, original);
        assert_eq!(state.player.health.current, state.player.health.max);
        assert_eq!(state.outcome(), None);
    }
}
