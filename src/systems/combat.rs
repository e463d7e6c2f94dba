//! Combat system functions: damage, enemy strikes, the player's shotgun and
//! the death animation countdown.

use glam::Vec2;
use hecs::{Entity, World};
use log::debug;
use rand::Rng;

use crate::components::{AiState, Dying, Enemy, EnemyAi, Health, Player, Position};
use crate::config::AiTuning;
use crate::events::{EventQueue, GameEvent};
use crate::systems::projectile::spawn_projectile;

/// Apply `amount` to an enemy and stun it. Returns whether it is now dead.
pub fn take_damage(health: &mut Health, ai: &mut EnemyAi, amount: i32, now: f32, hurt_duration: f32) -> bool {
    health.apply_damage(amount);
    ai.state = AiState::Hurt;
    ai.hurt_until = now + hurt_duration;
    ai.is_attacking = false;
    health.is_dead()
}

/// Dead means out of health; a dying enemy is dead even while its animation plays.
pub fn is_dead(health: &Health) -> bool {
    health.is_dead()
}

/// Damage an enemy entity. On the killing hit the enemy starts its death
/// animation and `EnemyDied` is emitted. Hits on dying or missing entities
/// are ignored. Returns whether this hit killed it.
pub fn damage_enemy(
    world: &mut World,
    entity: Entity,
    amount: i32,
    now: f32,
    tuning: &AiTuning,
    events: &mut EventQueue,
) -> bool {
    let Ok((health, ai, pos, enemy, dying)) =
        world.query_one_mut::<(&mut Health, &mut EnemyAi, &Position, &Enemy, Option<&Dying>)>(entity)
    else {
        return false;
    };
    if dying.is_some() {
        return false;
    }

    let killed = take_damage(health, ai, amount, now, tuning.hurt_duration);
    let position = pos.as_vec2();
    let kind = enemy.kind;
    if !killed {
        events.push(GameEvent::EnemyStateChanged {
            entity,
            state: AiState::Hurt,
        });
        return false;
    }

    let _ = world.insert_one(entity, Dying::new(tuning.death_duration));
    debug!("{} died at ({:.1}, {:.1})", kind.name(), position.x, position.y);
    events.push(GameEvent::EnemyDied { entity, kind, position });
    true
}

/// Apply every strike that fired this tick to the player, if still in reach.
/// Health is clamped at zero.
pub fn resolve_enemy_strikes(world: &World, player: &mut Player, events: &mut EventQueue) {
    for (entity, (pos, enemy, ai, dying)) in world
        .query::<(&Position, &Enemy, &EnemyAi, Option<&Dying>)>()
        .iter()
    {
        if dying.is_some() || !ai.is_attacking {
            continue;
        }
        if pos.distance(player.pos) > enemy.stats.attack_range {
            continue;
        }
        player.health.apply_damage(enemy.stats.damage);
        events.push(GameEvent::PlayerDamaged {
            amount: enemy.stats.damage,
            source: entity,
            position: pos.as_vec2(),
        });
    }
}

/// Pull the trigger. Respects the cooldown, consumes one shell and spawns
/// the pellets with uniform spread. Returns whether a blast was fired.
pub fn fire_weapon(
    world: &mut World,
    player: &mut Player,
    now: f32,
    rng: &mut impl Rng,
    events: &mut EventQueue,
) -> bool {
    if !player.weapon.can_fire(now) {
        return false;
    }
    if player.ammo == 0 {
        events.push(GameEvent::WeaponEmpty);
        return false;
    }

    player.ammo -= 1;
    player.weapon.trigger(now);
    let half_spread = (player.weapon.spread * 0.5).abs();
    for _ in 0..player.weapon.pellets {
        let angle = player.angle + rng.gen_range(-half_spread..=half_spread);
        spawn_projectile(world, player.pos, angle, &player.weapon);
    }
    events.push(GameEvent::WeaponFired {
        pellets: player.weapon.pellets,
    });
    true
}

/// Run death animations down and despawn finished enemies.
/// Returns the number of entities removed.
pub fn update_dying(world: &mut World, dt: f32) -> usize {
    let mut finished = Vec::new();
    for (entity, dying) in world.query_mut::<&mut Dying>() {
        dying.remaining = (dying.remaining - dt).max(0.0);
        if dying.is_finished() {
            finished.push(entity);
        }
    }
    for &entity in &finished {
        let _ = world.despawn(entity);
    }
    finished.len()
}

/// Enemies that are alive and not playing a death animation
pub fn live_enemy_count(world: &World) -> usize {
    world
        .query::<(&Enemy, &Health, Option<&Dying>)>()
        .iter()
        .filter(|(_, (_, health, dying))| dying.is_none() && !health.is_dead())
        .count()
}

/// Position and remaining health of every live enemy, for collision tests
/// against a snapshot
pub fn live_enemy_targets(world: &World) -> Vec<(Entity, Vec2, i32)> {
    world
        .query::<(&Position, &Health, &Enemy, Option<&Dying>)>()
        .iter()
        .filter(|(_, (_, health, _, dying))| dying.is_none() && !health.is_dead())
        .map(|(entity, (pos, health, _, _))| (entity, pos.as_vec2(), health.current))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Projectile;
    use crate::config::{PlayerConfig, WeaponConfig};
    use crate::spawning::{spawn_enemy, EnemyKind};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn player_at(pos: Vec2) -> Player {
        PlayerConfig::default().build(pos, 0.0, WeaponConfig::default().build())
    }

    #[test]
    fn test_take_damage_reports_death_threshold() {
        let mut health = Health::new(50);
        let mut ai = EnemyAi::new();
        assert!(!take_damage(&mut health, &mut ai, 25, 1.0, 0.5));
        assert_eq!(ai.state, AiState::Hurt);
        assert_eq!(ai.hurt_until, 1.5);
        assert!(take_damage(&mut health, &mut ai, 25, 1.2, 0.5));
        assert!(is_dead(&health));
        assert_eq!(health.current, 0);
    }

    #[test]
    fn test_killing_hit_starts_death_animation() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let tuning = AiTuning::default();
        let imp = spawn_enemy(&mut world, EnemyKind::Imp, Vec2::new(3.5, 3.5));

        assert!(!damage_enemy(&mut world, imp, 25, 0.0, &tuning, &mut events));
        assert_eq!(live_enemy_count(&world), 1);
        assert!(damage_enemy(&mut world, imp, 25, 0.1, &tuning, &mut events));
        assert_eq!(live_enemy_count(&world), 0);
        assert!(world.get::<&Dying>(imp).is_ok());

        // Further hits on a dying enemy are ignored
        assert!(!damage_enemy(&mut world, imp, 25, 0.2, &tuning, &mut events));
        let deaths = events
            .drain()
            .filter(|e| matches!(e, GameEvent::EnemyDied { kind: EnemyKind::Imp, .. }))
            .count();
        assert_eq!(deaths, 1);

        // Despawned once the animation has played out
        assert_eq!(update_dying(&mut world, 0.3), 0);
        assert_eq!(update_dying(&mut world, 0.3), 1);
        assert!(!world.contains(imp));
    }

    #[test]
    fn test_strikes_only_land_in_range() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let near = spawn_enemy(&mut world, EnemyKind::Imp, Vec2::new(5.0, 5.0));
        let far = spawn_enemy(&mut world, EnemyKind::Baron, Vec2::new(12.0, 5.0));
        for entity in [near, far] {
            if let Ok(mut ai) = world.get::<&mut EnemyAi>(entity) {
                ai.is_attacking = true;
            }
        }

        let mut player = player_at(Vec2::new(5.5, 5.0));
        resolve_enemy_strikes(&world, &mut player, &mut events);
        assert_eq!(player.health.current, 100 - 10);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_player_health_clamps_at_zero() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let baron = spawn_enemy(&mut world, EnemyKind::Baron, Vec2::new(5.0, 5.0));
        if let Ok(mut ai) = world.get::<&mut EnemyAi>(baron) {
            ai.is_attacking = true;
        }
        let mut player = player_at(Vec2::new(6.0, 5.0));
        player.health.current = 15;
        resolve_enemy_strikes(&world, &mut player, &mut events);
        assert_eq!(player.health.current, 0);
        assert!(player.is_dead());
    }

    #[test]
    fn test_fire_spawns_spread_pellets_and_uses_ammo() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut player = player_at(Vec2::new(2.5, 2.5));
        player.angle = 0.3;

        assert!(fire_weapon(&mut world, &mut player, 1.0, &mut rng, &mut events));
        assert_eq!(player.ammo, 49);
        let angles: Vec<f32> = world.query::<&Projectile>().iter().map(|(_, p)| p.angle).collect();
        assert_eq!(angles.len(), 5);
        assert!(angles.iter().all(|a| (a - 0.3).abs() <= 0.1 + 1e-6));

        // Cooldown blocks the next shot
        assert!(!fire_weapon(&mut world, &mut player, 1.1, &mut rng, &mut events));
        assert_eq!(player.ammo, 49);
    }

    #[test]
    fn test_empty_weapon_reports_and_spawns_nothing() {
        let mut world = World::new();
        let mut events = EventQueue::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut player = player_at(Vec2::new(2.5, 2.5));
        player.ammo = 0;

        assert!(!fire_weapon(&mut world, &mut player, 1.0, &mut rng, &mut events));
        assert_eq!(world.query::<&Projectile>().iter().count(), 0);
        assert_eq!(events.drain().collect::<Vec<_>>(), vec![GameEvent::WeaponEmpty]);
    }
}
