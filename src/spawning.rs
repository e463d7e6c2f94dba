//! Data-driven enemy spawning.
//!
//! Each enemy kind maps to one stat bundle, looked up once when the enemy is
//! spawned. Adding a kind means adding a table entry, not touching the AI.

use glam::Vec2;
use hecs::{Entity, World};
use log::warn;
use rand::Rng;

use crate::components::{Enemy, EnemyAi, Health, Position};
use crate::constants::*;
use crate::dungeon_gen::Rect;
use crate::grid::Grid;

/// Enemy kinds, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Imp,
    Cacodemon,
    Baron,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Imp, EnemyKind::Cacodemon, EnemyKind::Baron];

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Imp => "imp",
            EnemyKind::Cacodemon => "cacodemon",
            EnemyKind::Baron => "baron",
        }
    }

    /// Case-insensitive lookup
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Like `parse`, but unknown names fall back to the default kind.
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            warn!(
                "Unknown enemy kind '{}', using {} stats",
                name,
                EnemyKind::default().name()
            );
            EnemyKind::default()
        })
    }
}

impl Default for EnemyKind {
    fn default() -> Self {
        EnemyKind::Imp
    }
}

/// Per-kind stat bundle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    /// Tiles per second
    pub speed: f32,
    pub health: i32,
    pub damage: i32,
    /// Tiles
    pub attack_range: f32,
    /// Seconds between strikes
    pub attack_cooldown: f32,
}

impl EnemyStats {
    pub fn for_kind(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Imp => enemies::IMP,
            EnemyKind::Cacodemon => enemies::CACODEMON,
            EnemyKind::Baron => enemies::BARON,
        }
    }
}

/// Predefined enemy stats
pub mod enemies {
    use super::*;

    pub const IMP: EnemyStats = EnemyStats {
        speed: IMP_SPEED,
        health: IMP_HEALTH,
        damage: IMP_DAMAGE,
        attack_range: IMP_ATTACK_RANGE,
        attack_cooldown: IMP_ATTACK_COOLDOWN,
    };

    pub const CACODEMON: EnemyStats = EnemyStats {
        speed: CACODEMON_SPEED,
        health: CACODEMON_HEALTH,
        damage: CACODEMON_DAMAGE,
        attack_range: CACODEMON_ATTACK_RANGE,
        attack_cooldown: CACODEMON_ATTACK_COOLDOWN,
    };

    pub const BARON: EnemyStats = EnemyStats {
        speed: BARON_SPEED,
        health: BARON_HEALTH,
        damage: BARON_DAMAGE,
        attack_range: BARON_ATTACK_RANGE,
        attack_cooldown: BARON_ATTACK_COOLDOWN,
    };
}

/// Spawn one enemy of `kind` at `pos`
pub fn spawn_enemy(world: &mut World, kind: EnemyKind, pos: Vec2) -> Entity {
    let enemy = Enemy::new(kind);
    world.spawn((
        Position::from_vec2(pos),
        Health::new(enemy.stats.health),
        EnemyAi::new(),
        enemy,
    ))
}

/// Pick a free spot in `room`: passable, away from the room edges, and
/// spaced from the player and from already placed enemies.
pub fn find_spawn_position(
    grid: &Grid,
    room: &Rect,
    occupied: &[Vec2],
    player_pos: Vec2,
    rng: &mut impl Rng,
) -> Option<Vec2> {
    // Small rooms shrink the margin so the sampling range never empties
    let margin_x = ENEMY_SPAWN_EDGE_MARGIN.min((room.width as f32 - 1.0) / 2.0).max(0.0);
    let margin_y = ENEMY_SPAWN_EDGE_MARGIN.min((room.height as f32 - 1.0) / 2.0).max(0.0);
    let (lo_x, hi_x) = (room.x as f32 + margin_x, room.right() as f32 - margin_x);
    let (lo_y, hi_y) = (room.y as f32 + margin_y, room.bottom() as f32 - margin_y);
    if hi_x <= lo_x || hi_y <= lo_y {
        return None;
    }

    for _ in 0..ENEMY_SPAWN_ATTEMPTS {
        let pos = Vec2::new(rng.gen_range(lo_x..hi_x), rng.gen_range(lo_y..hi_y));
        if grid.is_blocked_at(pos.x, pos.y) {
            continue;
        }
        if pos.distance(player_pos) < ENEMY_SPAWN_SPACING {
            continue;
        }
        if occupied.iter().any(|other| other.distance(pos) < ENEMY_SPAWN_SPACING) {
            continue;
        }
        return Some(pos);
    }
    None
}

/// How many enemies go where, and which kinds by distance from the spawn room
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnTable {
    pub enemies_per_room: usize,
    pub spawn_room_enemies: usize,
    /// Kinds from nearest rooms to farthest
    pub tiers: Vec<EnemyKind>,
}

impl Default for SpawnTable {
    fn default() -> Self {
        Self {
            enemies_per_room: ENEMIES_PER_ROOM,
            spawn_room_enemies: SPAWN_ROOM_ENEMIES,
            tiers: EnemyKind::ALL.to_vec(),
        }
    }
}

impl SpawnTable {
    /// Kind for the room ranked `rank` of `total` non-spawn rooms by distance
    fn kind_for_rank(&self, rank: usize, total: usize) -> EnemyKind {
        if self.tiers.is_empty() {
            return EnemyKind::default();
        }
        let tier = rank * self.tiers.len() / total.max(1);
        self.tiers[tier.min(self.tiers.len() - 1)]
    }

    /// Populate every room. `rooms[0]` is the spawn room.
    /// Returns the number of enemies spawned.
    pub fn spawn_all(
        &self,
        world: &mut World,
        grid: &Grid,
        rooms: &[Rect],
        player_pos: Vec2,
        rng: &mut impl Rng,
    ) -> usize {
        let Some(spawn_room) = rooms.first() else {
            return 0;
        };

        // Rank the other rooms by distance from the spawn room
        let (sx, sy) = spawn_room.center();
        let mut ranked: Vec<&Rect> = rooms[1..].iter().collect();
        ranked.sort_by_key(|room| {
            let (cx, cy) = room.center();
            (cx - sx).pow(2) + (cy - sy).pow(2)
        });

        let mut placements: Vec<(&Rect, usize, EnemyKind)> = Vec::with_capacity(rooms.len());
        placements.push((spawn_room, self.spawn_room_enemies, self.kind_for_rank(0, 1)));
        let total = ranked.len();
        for (rank, room) in ranked.into_iter().enumerate() {
            placements.push((room, self.enemies_per_room, self.kind_for_rank(rank, total)));
        }

        let mut occupied: Vec<Vec2> = Vec::new();
        for (room, count, kind) in placements {
            for _ in 0..count {
                match find_spawn_position(grid, room, &occupied, player_pos, rng) {
                    Some(pos) => {
                        spawn_enemy(world, kind, pos);
                        occupied.push(pos);
                    }
                    None => {
                        warn!("No free spawn position in room {:?}, skipping", room);
                        break;
                    }
                }
            }
        }
        occupied.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon_gen::{DungeonGenerator, LevelParams};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_kind_names_are_case_insensitive() {
        assert_eq!(EnemyKind::from_name("BARON"), EnemyKind::Baron);
        assert_eq!(EnemyKind::from_name(" Cacodemon "), EnemyKind::Cacodemon);
        assert_eq!(EnemyKind::parse("imp"), Some(EnemyKind::Imp));
    }

    #[test]
    fn test_unknown_kind_falls_back_to_default() {
        assert_eq!(EnemyKind::parse("cyberdemon"), None);
        assert_eq!(EnemyKind::from_name("cyberdemon"), EnemyKind::Imp);
    }

    #[test]
    fn test_stronger_kinds_trade_speed_for_power() {
        for pair in EnemyKind::ALL.windows(2) {
            let weak = EnemyStats::for_kind(pair[0]);
            let strong = EnemyStats::for_kind(pair[1]);
            assert!(strong.health > weak.health);
            assert!(strong.damage > weak.damage);
            assert!(strong.attack_range > weak.attack_range);
            assert!(strong.speed < weak.speed);
        }
    }

    #[test]
    fn test_spawn_enemy_has_full_health() {
        let mut world = World::new();
        let entity = spawn_enemy(&mut world, EnemyKind::Cacodemon, Vec2::new(3.5, 3.5));
        let health = world.get::<&Health>(entity).map(|h| *h);
        assert_eq!(health.ok(), Some(Health::new(CACODEMON_HEALTH)));
    }

    #[test]
    fn test_spawn_position_respects_walls_and_spacing() {
        let grid = Grid::from_ascii(
            "########
             #......#
             #..##..#
             #......#
             #......#
             ########",
        );
        let room = Rect::new(1, 1, 6, 4);
        let player = Vec2::new(1.5, 1.5);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut occupied = Vec::new();
        while let Some(pos) = find_spawn_position(&grid, &room, &occupied, player, &mut rng) {
            assert!(!grid.is_blocked_at(pos.x, pos.y));
            assert!(pos.distance(player) >= ENEMY_SPAWN_SPACING);
            assert!(occupied.iter().all(|o: &Vec2| o.distance(pos) >= ENEMY_SPAWN_SPACING));
            occupied.push(pos);
            assert!(occupied.len() < 16, "spacing must bound the room's capacity");
        }
    }

    #[test]
    fn test_spawn_all_skips_spawn_room() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let level = DungeonGenerator::generate(&LevelParams::default(), &mut rng);
        let (px, py) = level.spawn_room.center();
        let player = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);

        let mut world = World::new();
        let spawned = SpawnTable::default().spawn_all(&mut world, &level.grid, &level.rooms, player, &mut rng);
        assert!(spawned > 0);

        let mut query = world.query::<(&Position, &Enemy)>();
        let enemies: Vec<_> = query.iter().map(|(_, (p, e))| (*p, *e)).collect();
        assert_eq!(enemies.len(), spawned);
        for (pos, _) in &enemies {
            assert!(!level.spawn_room.contains(pos.x as i32, pos.y as i32));
            assert!(!level.grid.is_blocked_at(pos.x, pos.y));
        }
    }

    #[test]
    fn test_spawn_all_ranks_rooms_by_distance() {
        let grid = Grid::from_rows(&vec![vec![0; 40]; 9]);
        // Spawn room first, the rest deliberately out of distance order
        let rooms = [
            Rect::new(1, 1, 6, 6),
            Rect::new(24, 1, 6, 6),
            Rect::new(9, 1, 6, 6),
            Rect::new(32, 1, 6, 6),
        ];
        let table = SpawnTable {
            enemies_per_room: 1,
            ..SpawnTable::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut world = World::new();
        let spawned = table.spawn_all(&mut world, &grid, &rooms, Vec2::new(4.5, 4.5), &mut rng);
        assert_eq!(spawned, 3);

        let kind_in = |room: &Rect| {
            let mut query = world.query::<(&Position, &Enemy)>();
            let kinds: Vec<EnemyKind> = query
                .iter()
                .filter(|(_, (p, _))| room.contains(p.x as i32, p.y as i32))
                .map(|(_, (_, e))| e.kind)
                .collect();
            kinds
        };
        assert_eq!(kind_in(&rooms[2]), vec![EnemyKind::Imp]);
        assert_eq!(kind_in(&rooms[1]), vec![EnemyKind::Cacodemon]);
        assert_eq!(kind_in(&rooms[3]), vec![EnemyKind::Baron]);
        assert!(kind_in(&rooms[0]).is_empty());
    }

    #[test]
    fn test_tier_ranks_cover_all_kinds() {
        let table = SpawnTable::default();
        assert_eq!(table.kind_for_rank(0, 6), EnemyKind::Imp);
        assert_eq!(table.kind_for_rank(2, 6), EnemyKind::Cacodemon);
        assert_eq!(table.kind_for_rank(5, 6), EnemyKind::Baron);
        let empty = SpawnTable {
            tiers: Vec::new(),
            ..SpawnTable::default()
        };
        assert_eq!(empty.kind_for_rank(3, 6), EnemyKind::Imp);
    }
}
