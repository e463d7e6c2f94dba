use glam::Vec2;

use crate::spawning::{EnemyKind, EnemyStats};

/// Position component - continuous world coordinates in tile units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn from_vec2(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn distance(&self, other: Vec2) -> f32 {
        self.as_vec2().distance(other)
    }
}

/// Health component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn percentage(&self) -> f32 {
        if self.max <= 0 {
            return 0.0;
        }
        (self.current as f32 / self.max as f32).clamp(0.0, 1.0)
    }

    /// Subtract `amount`, keeping health within `[0, max]`.
    pub fn apply_damage(&mut self, amount: i32) {
        self.current = (self.current - amount.max(0)).clamp(0, self.max);
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0
    }
}

/// Enemy marker with the stat bundle looked up at spawn time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub stats: EnemyStats,
}

impl Enemy {
    pub fn new(kind: EnemyKind) -> Self {
        Self {
            kind,
            stats: EnemyStats::for_kind(kind),
        }
    }
}

/// Behavioural state of an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiState {
    Idle,
    Chase,
    Attack,
    Hurt,
}

/// Enemy state machine data. All timestamps are simulation seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyAi {
    pub state: AiState,
    /// When a `Hurt` stun wears off
    pub hurt_until: f32,
    /// Earliest time the next strike may fire
    pub next_attack_at: f32,
    /// True only on the tick a strike fires
    pub is_attacking: bool,
    /// The attack pose stays visible until this time
    pub attack_pose_until: f32,
}

impl EnemyAi {
    pub fn new() -> Self {
        Self {
            state: AiState::Idle,
            hurt_until: 0.0,
            next_attack_at: 0.0,
            is_attacking: false,
            attack_pose_until: 0.0,
        }
    }

    pub fn in_attack_pose(&self, now: f32) -> bool {
        now < self.attack_pose_until
    }
}

impl Default for EnemyAi {
    fn default() -> Self {
        Self::new()
    }
}

/// Death animation countdown; the entity is despawned when it runs out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dying {
    pub remaining: f32,
    pub duration: f32,
}

impl Dying {
    pub fn new(duration: f32) -> Self {
        let duration = duration.max(0.0);
        Self {
            remaining: duration,
            duration,
        }
    }

    /// 0 at the moment of death, 1 when the animation is over
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        (1.0 - self.remaining / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// Projectile component. Direction is fixed at launch, `traveled` only grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub angle: f32,
    pub traveled: f32,
    pub speed: f32,
    pub max_range: f32,
    pub damage: i32,
}

impl Projectile {
    pub fn new(angle: f32, speed: f32, max_range: f32, damage: i32) -> Self {
        Self {
            angle,
            traveled: 0.0,
            speed,
            max_range,
            damage,
        }
    }

    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.angle.cos(), self.angle.sin())
    }

    pub fn remaining_range(&self) -> f32 {
        (self.max_range - self.traveled).max(0.0)
    }
}

/// The player's shotgun
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weapon {
    pub fire_interval: f32,
    pub pellets: u32,
    /// Total spread of a blast, centred on the view angle
    pub spread: f32,
    pub pellet_damage: i32,
    pub projectile_speed: f32,
    pub max_range: f32,
    pub flash_duration: f32,
    pub next_fire_at: f32,
    pub flash_until: f32,
}

impl Weapon {
    pub fn can_fire(&self, now: f32) -> bool {
        now >= self.next_fire_at
    }

    pub fn muzzle_flash(&self, now: f32) -> bool {
        now < self.flash_until
    }

    /// Start the cooldown and flash for a shot fired at `now`
    pub fn trigger(&mut self, now: f32) {
        self.next_fire_at = now + self.fire_interval;
        self.flash_until = now + self.flash_duration;
    }
}

/// The player. Lives outside the ECS world, on `GameState`.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    /// View angle in radians, kept in (-PI, PI]
    pub angle: f32,
    pub health: Health,
    pub ammo: u32,
    pub max_ammo: u32,
    pub move_speed: f32,
    pub turn_speed: f32,
    pub weapon: Weapon,
}

impl Player {
    /// Pick up shells, never beyond `max_ammo`
    pub fn add_ammo(&mut self, amount: u32) {
        self.ammo = self.ammo.saturating_add(amount).min(self.max_ammo);
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }
}
