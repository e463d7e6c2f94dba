//! Game engine - owns all game state and exposes a small API to the host.
//!
//! The engine handles:
//! - Game state (grid, world, player, clock)
//! - Player intent validation
//! - Simulation advancement and terminal outcomes
//! - Level transitions
//!
//! The host (the demo binary, or a windowed shell) only:
//! - Feeds frame deltas and intents to `GameState::step`
//! - Drains `GameState::events`
//! - Renders what `render::Renderer` projects from the state

mod game_state;
pub mod initialization;
mod level_transition;
mod simulation;

pub use game_state::{GameState, Outcome};
pub use simulation::{move_player, turn_player, PlayerIntent};
