//! Runtime configuration, loaded from JSON.
//!
//! Every section falls back to the defaults in `constants`, so a config file
//! only needs to name the values it changes.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::{Health, Player, Weapon};
use crate::constants::*;
use crate::dungeon_gen::{LevelParams, RoomLayout};
use crate::error::ConfigError;
use crate::spawning::{EnemyKind, SpawnTable};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub level: LevelConfig,
    pub ai: AiTuning,
    pub spawn: SpawnConfig,
    pub player: PlayerConfig,
    pub weapon: WeaponConfig,
    pub render: RenderConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            level: LevelConfig::default(),
            ai: AiTuning::default(),
            spawn: SpawnConfig::default(),
            player: PlayerConfig::default(),
            weapon: WeaponConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub width: usize,
    pub height: usize,
    pub room_count: usize,
    pub min_room_size: i32,
    pub max_room_size: i32,
    pub room_margin: i32,
    pub corridor_half_width: i32,
    pub placement_attempts: usize,
    pub corridor_retries: usize,
    pub decorate: bool,
    /// Fixed seed for reproducible levels; random when absent
    pub seed: Option<u64>,
    /// Use the hand-authored manor instead of random rooms
    pub authored: bool,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: DUNGEON_DEFAULT_WIDTH,
            height: DUNGEON_DEFAULT_HEIGHT,
            room_count: DUNGEON_DEFAULT_ROOM_COUNT,
            min_room_size: DUNGEON_MIN_ROOM_SIZE,
            max_room_size: DUNGEON_MAX_ROOM_SIZE,
            room_margin: DUNGEON_ROOM_MARGIN,
            corridor_half_width: DUNGEON_CORRIDOR_HALF_WIDTH,
            placement_attempts: DUNGEON_PLACEMENT_ATTEMPTS,
            corridor_retries: DUNGEON_CORRIDOR_RETRIES,
            decorate: true,
            seed: None,
            authored: false,
        }
    }
}

impl LevelConfig {
    pub fn params(&self) -> LevelParams {
        LevelParams {
            width: self.width,
            height: self.height,
            room_count: self.room_count,
            min_room_size: self.min_room_size,
            max_room_size: self.max_room_size,
            room_margin: self.room_margin,
            corridor_half_width: self.corridor_half_width,
            placement_attempts: self.placement_attempts,
            corridor_retries: self.corridor_retries,
            decorate: self.decorate,
            layout: if self.authored {
                RoomLayout::manor()
            } else {
                RoomLayout::Random
            },
        }
    }
}

/// Enemy perception and timing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    pub notice_radius: f32,
    /// Must exceed `notice_radius` so chase/idle does not flicker
    pub lose_radius: f32,
    pub hurt_duration: f32,
    pub attack_pose_duration: f32,
    pub death_duration: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            notice_radius: ENEMY_NOTICE_RADIUS,
            lose_radius: ENEMY_LOSE_RADIUS,
            hurt_duration: ENEMY_HURT_DURATION,
            attack_pose_duration: ENEMY_ATTACK_POSE_DURATION,
            death_duration: ENEMY_DEATH_DURATION,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    pub enemies_per_room: usize,
    pub spawn_room_enemies: usize,
    /// Enemy kind names, nearest rooms first
    pub tiers: Vec<String>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            enemies_per_room: ENEMIES_PER_ROOM,
            spawn_room_enemies: SPAWN_ROOM_ENEMIES,
            tiers: EnemyKind::ALL.iter().map(|k| k.name().to_string()).collect(),
        }
    }
}

impl SpawnConfig {
    /// Resolve tier names; unknown names fall back to the default kind.
    pub fn table(&self) -> SpawnTable {
        SpawnTable {
            enemies_per_room: self.enemies_per_room,
            spawn_room_enemies: self.spawn_room_enemies,
            tiers: self.tiers.iter().map(|name| EnemyKind::from_name(name)).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub max_health: i32,
    pub starting_ammo: u32,
    pub max_ammo: u32,
    pub move_speed: f32,
    pub turn_speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            max_health: PLAYER_MAX_HEALTH,
            starting_ammo: PLAYER_STARTING_AMMO,
            max_ammo: PLAYER_MAX_AMMO,
            move_speed: PLAYER_MOVE_SPEED,
            turn_speed: PLAYER_TURN_SPEED,
        }
    }
}

impl PlayerConfig {
    pub fn build(&self, pos: Vec2, angle: f32, weapon: Weapon) -> Player {
        Player {
            pos,
            angle,
            health: Health::new(self.max_health),
            ammo: self.starting_ammo.min(self.max_ammo),
            max_ammo: self.max_ammo,
            move_speed: self.move_speed,
            turn_speed: self.turn_speed,
            weapon,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    pub fire_interval: f32,
    pub pellets: u32,
    pub spread: f32,
    pub pellet_damage: i32,
    pub projectile_speed: f32,
    pub max_range: f32,
    pub flash_duration: f32,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            fire_interval: WEAPON_FIRE_INTERVAL,
            pellets: WEAPON_PELLETS,
            spread: WEAPON_SPREAD,
            pellet_damage: WEAPON_PELLET_DAMAGE,
            projectile_speed: PROJECTILE_SPEED,
            max_range: PROJECTILE_MAX_RANGE,
            flash_duration: WEAPON_MUZZLE_FLASH_DURATION,
        }
    }
}

impl WeaponConfig {
    pub fn build(&self) -> Weapon {
        Weapon {
            fire_interval: self.fire_interval,
            pellets: self.pellets,
            spread: self.spread,
            pellet_damage: self.pellet_damage,
            projectile_speed: self.projectile_speed,
            max_range: self.max_range,
            flash_duration: self.flash_duration,
            next_fire_at: 0.0,
            flash_until: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Horizontal field of view in radians
    pub fov: f32,
    pub shade_distance: f32,
    pub wall_height_scale: f32,
    pub sprite_scale: f32,
    pub projectile_scale: f32,
    pub max_sprite_distance: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: RENDER_DEFAULT_WIDTH,
            height: RENDER_DEFAULT_HEIGHT,
            fov: RENDER_DEFAULT_FOV,
            shade_distance: RENDER_SHADE_DISTANCE,
            wall_height_scale: RENDER_WALL_HEIGHT_SCALE,
            sprite_scale: RENDER_SPRITE_SCALE,
            projectile_scale: RENDER_PROJECTILE_SCALE,
            max_sprite_distance: RENDER_MAX_SPRITE_DISTANCE,
        }
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

impl GameConfig {
    /// Read, parse and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("ai.notice_radius", self.ai.notice_radius),
            ("ai.lose_radius", self.ai.lose_radius),
            ("ai.hurt_duration", self.ai.hurt_duration),
            ("ai.attack_pose_duration", self.ai.attack_pose_duration),
            ("ai.death_duration", self.ai.death_duration),
            ("player.move_speed", self.player.move_speed),
            ("player.turn_speed", self.player.turn_speed),
            ("weapon.fire_interval", self.weapon.fire_interval),
            ("weapon.spread", self.weapon.spread),
            ("weapon.projectile_speed", self.weapon.projectile_speed),
            ("weapon.max_range", self.weapon.max_range),
            ("weapon.flash_duration", self.weapon.flash_duration),
            ("render.fov", self.render.fov),
            ("render.shade_distance", self.render.shade_distance),
            ("render.wall_height_scale", self.render.wall_height_scale),
            ("render.sprite_scale", self.render.sprite_scale),
            ("render.projectile_scale", self.render.projectile_scale),
            ("render.max_sprite_distance", self.render.max_sprite_distance),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{name} must be finite, got {value}")));
        }

        if self.ai.lose_radius <= self.ai.notice_radius {
            return Err(invalid(format!(
                "ai.lose_radius ({}) must exceed ai.notice_radius ({})",
                self.ai.lose_radius, self.ai.notice_radius
            )));
        }
        if self.level.width < DUNGEON_MIN_DIMENSION || self.level.height < DUNGEON_MIN_DIMENSION {
            return Err(invalid(format!(
                "level must be at least {DUNGEON_MIN_DIMENSION}x{DUNGEON_MIN_DIMENSION}, got {}x{}",
                self.level.width, self.level.height
            )));
        }
        if self.level.min_room_size < 1 || self.level.min_room_size > self.level.max_room_size {
            return Err(invalid(format!(
                "room sizes must satisfy 1 <= min ({}) <= max ({})",
                self.level.min_room_size, self.level.max_room_size
            )));
        }
        if self.render.width == 0 || self.render.height == 0 {
            return Err(invalid("render viewport must be non-empty"));
        }
        if self.render.fov <= 0.0 || self.render.fov >= std::f32::consts::PI {
            return Err(invalid(format!("render.fov must lie in (0, pi), got {}", self.render.fov)));
        }
        if self.player.max_health <= 0 {
            return Err(invalid("player.max_health must be positive"));
        }
        Ok(())
    }
}
