//! Core gameplay constants (player, weapon, frame pacing).

/// Player's maximum (and starting) health
pub const PLAYER_MAX_HEALTH: i32 = 100;
/// Ammo the player starts a life with
pub const PLAYER_STARTING_AMMO: u32 = 50;
/// Ammo cap
pub const PLAYER_MAX_AMMO: u32 = 100;
/// Walking speed (tiles per second)
pub const PLAYER_MOVE_SPEED: f32 = 6.0;
/// Maximum turn rate (radians per second)
pub const PLAYER_TURN_SPEED: f32 = 6.0;

/// Seconds between shots
pub const WEAPON_FIRE_INTERVAL: f32 = 0.3;
/// Pellets per shotgun blast
pub const WEAPON_PELLETS: u32 = 5;
/// Total spread of a blast (radians)
pub const WEAPON_SPREAD: f32 = 0.2;
/// Damage dealt by one pellet
pub const WEAPON_PELLET_DAMAGE: i32 = 25;
/// Seconds the muzzle flash stays lit
pub const WEAPON_MUZZLE_FLASH_DURATION: f32 = 0.1;

/// Projectile speed (tiles per second)
pub const PROJECTILE_SPEED: f32 = 12.0;
/// Distance after which a projectile fizzles out
pub const PROJECTILE_MAX_RANGE: f32 = 15.0;

/// Largest simulation step accepted in one frame (seconds)
pub const MAX_FRAME_DT: f32 = 0.1;

/// Undrained events kept before the oldest are dropped
pub const EVENT_QUEUE_CAPACITY: usize = 4096;
