//! Enemy stats and behaviour constants.

// IMP
/// Imp movement speed (tiles per second)
pub const IMP_SPEED: f32 = 1.8;
/// Imp health
pub const IMP_HEALTH: i32 = 50;
/// Imp attack damage
pub const IMP_DAMAGE: i32 = 10;
/// Imp attack range (tiles)
pub const IMP_ATTACK_RANGE: f32 = 1.0;
/// Seconds between imp attacks
pub const IMP_ATTACK_COOLDOWN: f32 = 1.0;

// CACODEMON
/// Cacodemon movement speed (tiles per second)
pub const CACODEMON_SPEED: f32 = 1.2;
/// Cacodemon health
pub const CACODEMON_HEALTH: i32 = 100;
/// Cacodemon attack damage
pub const CACODEMON_DAMAGE: i32 = 20;
/// Cacodemon attack range (tiles)
pub const CACODEMON_ATTACK_RANGE: f32 = 1.5;
/// Seconds between cacodemon attacks
pub const CACODEMON_ATTACK_COOLDOWN: f32 = 1.5;

// BARON
/// Baron movement speed (tiles per second, slow but heavy)
pub const BARON_SPEED: f32 = 0.6;
/// Baron health
pub const BARON_HEALTH: i32 = 200;
/// Baron attack damage
pub const BARON_DAMAGE: i32 = 40;
/// Baron attack range (tiles)
pub const BARON_ATTACK_RANGE: f32 = 2.0;
/// Seconds between baron attacks
pub const BARON_ATTACK_COOLDOWN: f32 = 2.0;

// AI
/// Distance at which an idle enemy notices the player
pub const ENEMY_NOTICE_RADIUS: f32 = 10.0;
/// Distance at which a chasing enemy loses the player (must exceed the notice radius)
pub const ENEMY_LOSE_RADIUS: f32 = 15.0;
/// Seconds an enemy stays stunned after taking damage
pub const ENEMY_HURT_DURATION: f32 = 0.5;
/// Seconds the attack pose stays visible after a strike
pub const ENEMY_ATTACK_POSE_DURATION: f32 = 0.2;
/// Seconds the death animation plays before the enemy is removed
pub const ENEMY_DEATH_DURATION: f32 = 0.5;
/// Projectile-to-enemy distance that counts as a hit
pub const ENEMY_HIT_RADIUS: f32 = 0.5;

// SPAWNING
/// Enemies placed in each non-spawn room
pub const ENEMIES_PER_ROOM: usize = 2;
/// Enemies placed in the player's spawn room
pub const SPAWN_ROOM_ENEMIES: usize = 0;
/// Position samples per enemy before the room is skipped
pub const ENEMY_SPAWN_ATTEMPTS: usize = 20;
/// Minimum distance between spawned enemies (and from the player)
pub const ENEMY_SPAWN_SPACING: f32 = 2.0;
/// Distance kept from room edges when sampling spawn positions
pub const ENEMY_SPAWN_EDGE_MARGIN: f32 = 2.0;
