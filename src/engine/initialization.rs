//! Level construction: generate the grid, place the player, populate enemies.

use glam::Vec2;
use hecs::World;
use rand::Rng;

use crate::config::GameConfig;
use crate::dungeon_gen::{verify_connectivity, DungeonGenerator, GenerationReport, Rect};
use crate::grid::Grid;

/// Everything a fresh level needs before the player struct is built
pub struct Level {
    pub grid: Grid,
    pub rooms: Vec<Rect>,
    pub report: GenerationReport,
    pub world: World,
    pub player_start: Vec2,
    pub enemy_count: usize,
}

/// Generate a dungeon from `config.level` and populate it.
pub fn build_level(config: &GameConfig, rng: &mut impl Rng) -> Level {
    let result = DungeonGenerator::generate(&config.level.params(), rng);
    populate(config, result.grid, result.rooms, result.report, rng)
}

/// Wrap an externally authored grid in a level. `rooms[0]` is the spawn room.
pub fn level_from_grid(config: &GameConfig, grid: Grid, rooms: Vec<Rect>, rng: &mut impl Rng) -> Level {
    let reachable = verify_connectivity(&grid, &rooms);
    let report = GenerationReport {
        requested_rooms: rooms.len(),
        placed_rooms: rooms.len(),
        reachable_rooms: reachable,
        corridor_attempts: 0,
        fully_connected: reachable == rooms.len(),
    };
    populate(config, grid, rooms, report, rng)
}

fn populate(
    config: &GameConfig,
    grid: Grid,
    rooms: Vec<Rect>,
    report: GenerationReport,
    rng: &mut impl Rng,
) -> Level {
    let player_start = player_start(&grid, rooms.first());
    let mut world = World::new();
    let enemy_count = config
        .spawn
        .table()
        .spawn_all(&mut world, &grid, &rooms, player_start, rng);

    Level {
        grid,
        rooms,
        report,
        world,
        player_start,
        enemy_count,
    }
}

/// Centre of the spawn room if open, else the first open cell in it, else the
/// first open cell anywhere.
pub fn player_start(grid: &Grid, room: Option<&Rect>) -> Vec2 {
    let cell_center = |x: i32, y: i32| Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

    if let Some(room) = room {
        let (cx, cy) = room.center();
        if !grid.is_blocked(cx, cy) {
            return cell_center(cx, cy);
        }
        for y in room.y..room.bottom() {
            for x in room.x..room.right() {
                if !grid.is_blocked(x, y) {
                    return cell_center(x, y);
                }
            }
        }
    }

    for y in 0..grid.height as i32 {
        for x in 0..grid.width as i32 {
            if !grid.is_blocked(x, y) {
                return cell_center(x, y);
            }
        }
    }
    Vec2::new(grid.width as f32 * 0.5, grid.height as f32 * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Enemy;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_player_start_prefers_room_center() {
        let grid = Grid::from_ascii(
            "#######
             #.....#
             #.....#
             #.....#
             #######",
        );
        let room = Rect::new(1, 1, 5, 3);
        assert_eq!(player_start(&grid, Some(&room)), Vec2::new(3.5, 2.5));
    }

    #[test]
    fn test_player_start_falls_back_to_open_cell() {
        let grid = Grid::from_ascii(
            "#####
             ###.#
             #####",
        );
        assert_eq!(player_start(&grid, None), Vec2::new(3.5, 1.5));
    }

    #[test]
    fn test_build_level_populates_world() {
        let config = GameConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let level = build_level(&config, &mut rng);

        assert!(!level.grid.is_blocked_at(level.player_start.x, level.player_start.y));
        assert_eq!(level.world.query::<&Enemy>().iter().count(), level.enemy_count);
        assert!(level.enemy_count > 0);
    }
}
