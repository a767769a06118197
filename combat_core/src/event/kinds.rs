//! Concrete events of the attack → damage → death chain

use super::Event;
use crate::arena::Arena;
use crate::combat::{AttackState, CombatResult};
use crate::tags::{Tag, TagSet};
use crate::types::EntityId;
use tracing::{debug, trace};

/// An attack has been rolled and is on its way to the target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackGiven {
    pub raw_damage: i32,
    /// Knockback force, carried for collaborators
    pub force: f32,
    pub attacker: EntityId,
    pub target: EntityId,
    pub tags: TagSet,
}

impl AttackGiven {
    pub const NAME: &'static str = "attack_given";

    /// Notify the attacker's listeners, then make the target take the hit
    pub fn propagate(&self, arena: &mut Arena) -> CombatResult {
        arena.notify(self.attacker, &Event::AttackGiven(*self));
        arena.take_damage(self)
    }
}

/// Mitigated damage has been subtracted from the target's health
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageApplied {
    pub actual_damage: i32,
    pub attacker: EntityId,
    pub target: EntityId,
    pub tags: TagSet,
}

impl DamageApplied {
    pub const NAME: &'static str = "damage_applied";

    /// Display, notify the target, and check for death
    ///
    /// A `NotTakeEvent` tag stops everything here, including the death
    /// check, even if the target is already at or below zero health.
    pub fn propagate(&self, arena: &mut Arena) -> AttackState {
        if self.tags.contains(Tag::NotTakeEvent) {
            trace!(target_id = %self.target, damage = self.actual_damage, "damage event suppressed");
            return AttackState::Suppressed;
        }

        arena.display_damage(
            self.actual_damage,
            self.tags.contains(Tag::CriticalHit),
            self.target,
        );
        arena.notify(self.target, &Event::DamageApplied(*self));

        let dead = arena
            .stats(self.target)
            .is_some_and(|stats| stats.current_health <= 0);
        if !dead {
            return AttackState::Notified;
        }

        EntityDied {
            entity: self.target,
            attacker: self.attacker,
        }
        .propagate(arena);
        AttackState::Died
    }
}

/// An entity's health dropped to zero or below
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDied {
    pub entity: EntityId,
    pub attacker: EntityId,
}

impl EntityDied {
    pub const NAME: &'static str = "entity_died";

    /// Notify the dead entity's listeners, then the attacker's
    ///
    /// On a self-kill both lists are the same list, which is notified once.
    pub fn propagate(&self, arena: &mut Arena) {
        debug!(entity = %self.entity, attacker = %self.attacker, "entity died");
        let event = Event::EntityDied(*self);
        arena.notify(self.entity, &event);
        if self.attacker != self.entity {
            arena.notify(self.attacker, &event);
        }
    }
}
