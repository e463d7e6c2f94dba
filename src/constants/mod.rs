//! Game constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.
//! Most of these are only defaults: `GameConfig` can override them at runtime.

mod dungeon;
mod enemies;
mod gameplay;
mod render;

pub use dungeon::*;
pub use enemies::*;
pub use gameplay::*;
pub use render::*;
