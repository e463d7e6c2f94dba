//! Core of a first-person raycasting shooter: procedural dungeon generation,
//! DDA raycasting, enemy AI and projectiles, and a pure projection pass the
//! host turns into pixels.

pub mod components;
pub mod config;
pub mod constants;
pub mod dungeon_gen;
pub mod engine;
pub mod error;
pub mod events;
pub mod grid;
pub mod logging;
pub mod raycast;
pub mod render;
pub mod spawning;
pub mod systems;
pub mod tile;
pub mod time_system;

pub use config::GameConfig;
pub use engine::{GameState, Outcome, PlayerIntent};
pub use error::ConfigError;
pub use render::{Frame, Framebuffer, Renderer};
