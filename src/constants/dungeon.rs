//! Dungeon generation constants.

/// Default dungeon width in cells
pub const DUNGEON_DEFAULT_WIDTH: usize = 40;
/// Default dungeon height in cells
pub const DUNGEON_DEFAULT_HEIGHT: usize = 40;
/// Smallest grid the generator accepts on either axis
pub const DUNGEON_MIN_DIMENSION: usize = 8;
/// Rooms requested by a random layout
pub const DUNGEON_DEFAULT_ROOM_COUNT: usize = 7;
/// Minimum room side length
pub const DUNGEON_MIN_ROOM_SIZE: i32 = 5;
/// Maximum room side length
pub const DUNGEON_MAX_ROOM_SIZE: i32 = 10;
/// Inflation applied to a room's box for the overlap test (minimum wall thickness)
pub const DUNGEON_ROOM_MARGIN: i32 = 2;
/// Radius of the disc brush used to carve corridors
pub const DUNGEON_CORRIDOR_HALF_WIDTH: i32 = 1;
/// Random room placement tries before giving up on the requested count
pub const DUNGEON_PLACEMENT_ATTEMPTS: usize = 200;
/// Corridor carving passes before accepting a partially connected level
pub const DUNGEON_CORRIDOR_RETRIES: usize = 5;
/// Chance of an extra loop corridor per room
pub const DUNGEON_EXTRA_CONNECTION_CHANCE: f64 = 0.3;
/// Rooms at least this large on both axes get flower wallpaper
pub const DUNGEON_WALLPAPER_MIN_ROOM: i32 = 6;
/// Spatial frequency of the wallpaper noise field
pub const DUNGEON_WALLPAPER_NOISE_SCALE: f64 = 0.35;
/// Passable orthogonal neighbours that turn a wall stub into a pillar
pub const DUNGEON_PILLAR_MIN_OPEN_SIDES: usize = 3;
