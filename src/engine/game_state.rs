//! Core game state - owns the simulation data.

use hecs::World;
use log::info;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::components::Player;
use crate::config::GameConfig;
use crate::dungeon_gen::{GenerationReport, Rect};
use crate::events::EventQueue;
use crate::grid::Grid;
use crate::systems::combat;
use crate::time_system::GameClock;

use super::initialization::{self, Level};

/// Terminal condition of a level. The host decides what happens next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    LevelComplete,
    PlayerDead,
}

/// Core game state - owns all simulation data.
pub struct GameState {
    /// Current level grid, read-only after generation
    pub grid: Grid,

    /// Rooms of the current level; index 0 is the spawn room
    pub rooms: Vec<Rect>,

    /// How generation went for this level
    pub report: GenerationReport,

    /// Enemies and projectiles
    pub world: World,

    pub player: Player,

    /// Simulation clock, advanced only by `step`
    pub clock: GameClock,

    /// Notifications for the host. Drain once per frame after `step`; an
    /// undrained queue keeps only the most recent events.
    pub events: EventQueue,

    /// Level number, starting at 1
    pub level: u32,

    /// Seed this level was generated from
    pub seed: u64,

    pub config: GameConfig,

    pub(super) outcome: Option<Outcome>,

    /// Gameplay randomness (shot spread, next level seeds)
    pub(super) rng: ChaCha8Rng,
}

impl GameState {
    /// Start at level 1. Uses `config.level.seed` when set, a random seed otherwise.
    pub fn new(config: GameConfig) -> Self {
        let seed = config.level.seed.unwrap_or_else(|| rand::thread_rng().gen());
        Self::with_seed(config, seed)
    }

    /// Start at level 1 with a generated level from `seed`.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let level = initialization::build_level(&config, &mut rng);
        Self::from_level(config, level, rng, seed, 1)
    }

    /// Start on an authored grid instead of a generated one. `rooms[0]` is
    /// where the player spawns.
    pub fn with_grid(config: GameConfig, grid: Grid, rooms: Vec<Rect>, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let level = initialization::level_from_grid(&config, grid, rooms, &mut rng);
        Self::from_level(config, level, rng, seed, 1)
    }

    pub(super) fn from_level(
        config: GameConfig,
        level: Level,
        rng: ChaCha8Rng,
        seed: u64,
        number: u32,
    ) -> Self {
        let player = config
            .player
            .build(level.player_start, 0.0, config.weapon.build());

        info!(
            "Level {} ready: seed {}, {}/{} rooms reachable, {} enemies",
            number,
            seed,
            level.report.reachable_rooms,
            level.rooms.len(),
            level.enemy_count
        );

        Self {
            grid: level.grid,
            rooms: level.rooms,
            report: level.report,
            world: level.world,
            player,
            clock: GameClock::new(),
            events: EventQueue::new(),
            level: number,
            seed,
            config,
            outcome: None,
            rng,
        }
    }

    /// Terminal condition reached so far, if any
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Enemies still alive (dying ones excluded)
    pub fn live_enemy_count(&self) -> usize {
        combat::live_enemy_count(&self.world)
    }

    /// Simulation time in seconds
    pub fn now(&self) -> f32 {
        self.clock.time
    }
}
