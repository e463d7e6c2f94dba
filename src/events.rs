//! Game event system for decoupled communication with the host.
//!
//! The simulation pushes events while it steps; the host drains them once per
//! frame to drive sound, HUD and score without the core knowing about any of it.

use std::collections::VecDeque;

use glam::Vec2;
use hecs::Entity;
use log::warn;

use crate::components::AiState;
use crate::constants::EVENT_QUEUE_CAPACITY;
use crate::spawning::EnemyKind;
use crate::tile::CellCode;

/// Game events emitted by the simulation step
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// An enemy took a killing hit and started its death animation
    EnemyDied {
        entity: Entity,
        kind: EnemyKind,
        position: Vec2,
    },
    /// An enemy strike landed on the player
    PlayerDamaged {
        amount: i32,
        source: Entity,
        position: Vec2,
    },
    /// A projectile stopped at a wall face
    ProjectileHitWall { position: Vec2, cell: CellCode },
    /// A projectile struck a live enemy
    ProjectileHitEnemy {
        entity: Entity,
        position: Vec2,
        damage: i32,
    },
    /// A projectile ran out of range
    ProjectileExpired { position: Vec2 },
    /// The player fired a blast
    WeaponFired { pellets: u32 },
    /// The trigger was pulled with no ammo left
    WeaponEmpty,
    /// An enemy's behavioural state changed
    EnemyStateChanged { entity: Entity, state: AiState },
    /// No live enemies remain
    LevelComplete,
    /// Player health reached zero
    PlayerDied,
}

/// Bounded event queue - events are pushed during a step, drained by the host.
///
/// A host that stops draining loses the oldest events once `capacity` is
/// reached; memory stays bounded either way.
#[derive(Debug)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
    capacity: usize,
    dropped: usize,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_QUEUE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    /// Push an event to be processed later, evicting the oldest when full
    pub fn push(&mut self, event: GameEvent) {
        if self.events.len() >= self.capacity {
            if self.dropped == 0 {
                warn!("Event queue full ({} events), dropping oldest", self.capacity);
            }
            self.events.pop_front();
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// Drain all events for processing
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.dropped = 0;
        self.events.drain(..)
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Events evicted since the last drain
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Pending events, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_queue_in_order() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::WeaponFired { pellets: 5 });
        queue.push(GameEvent::WeaponEmpty);
        assert_eq!(queue.len(), 2);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained, vec![GameEvent::WeaponFired { pellets: 5 }, GameEvent::WeaponEmpty]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_full_queue_drops_oldest() {
        let mut queue = EventQueue::with_capacity(3);
        for pellets in 1..=5 {
            queue.push(GameEvent::WeaponFired { pellets });
        }
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.dropped(), 2);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained[0], GameEvent::WeaponFired { pellets: 3 });
        assert_eq!(drained[2], GameEvent::WeaponFired { pellets: 5 });
        assert_eq!(queue.dropped(), 0);
    }
}
