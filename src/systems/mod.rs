//! Game systems organized by domain.
//!
//! - `movement`: grid collision, wall sliding, axis-separated player moves
//! - `ai`: the enemy state machine
//! - `combat`: damage, strikes on the player, firing, death countdown
//! - `projectile`: pellet flight and collision

pub mod ai;
pub mod combat;
pub mod movement;
pub mod projectile;

// Re-export commonly used items
pub use ai::{tick_enemy, update_enemies};
pub use combat::{
    damage_enemy, fire_weapon, is_dead, live_enemy_count, resolve_enemy_strikes, take_damage,
    update_dying,
};
pub use movement::{can_occupy, move_axis_separated, step_with_slide, try_move};
pub use projectile::{spawn_projectile, update_projectiles};
