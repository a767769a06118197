//! Damage resolution - the attack → damage → death pipeline
//!
//! 1. Attacker computes raw damage (crit roll happens here)
//! 2. Friendly fire is discarded before the target is reached
//! 3. `AttackGiven` goes to the attacker's listeners
//! 4. Target mitigates, loses health, and `DamageApplied` propagates

use super::request::DamageRequest;
use super::result::{AttackState, CombatResult};
use crate::arena::Arena;
use crate::event::{AttackGiven, DamageApplied};
use crate::tags::TagSet;
use crate::types::EntityId;
use tracing::{debug, warn};

impl Arena {
    /// Attack `target` for `coefficient` × attacker's attack
    pub fn give_damage(
        &mut self,
        attacker: EntityId,
        target: EntityId,
        coefficient: f32,
        tags: TagSet,
    ) -> CombatResult {
        self.give_damage_with(DamageRequest::new(attacker, target, coefficient).with_tags(tags))
    }

    /// Run the full pipeline for `request`
    pub fn give_damage_with(&mut self, request: DamageRequest) -> CombatResult {
        let mut tags = request.tags;
        let (Some(source), Some(victim)) = (
            self.entities.get(&request.attacker),
            self.entities.get(&request.target),
        ) else {
            warn!(attacker = %request.attacker, target_id = %request.target, "damage between missing entities");
            return CombatResult::discarded(request.attacker, request.target, tags);
        };

        // Raw damage is rolled before the faction check so a discarded hit
        // consumes the same random draws as a landed one
        let raw_damage = match request.true_damage {
            Some(amount) => amount,
            None => source.stats().compute_attack_damage(
                &mut tags,
                request.coefficient,
                request.force_coefficient,
                &mut *self.rng,
            ),
        };

        if self.faction_rule.same_faction(source, victim) {
            debug!(attacker = %request.attacker, target_id = %request.target, "friendly fire discarded");
            return CombatResult::discarded(request.attacker, request.target, tags);
        }

        let result = AttackGiven {
            raw_damage,
            force: request.force,
            attacker: request.attacker,
            target: request.target,
            tags,
        }
        .propagate(self);

        debug!(
            attacker = %result.attacker,
            target_id = %result.target,
            raw = result.raw_damage,
            actual = result.actual_damage,
            critical = result.is_critical(),
            state = ?result.state,
            "attack resolved"
        );
        result
    }

    /// Mitigate an incoming attack, apply it, and propagate `DamageApplied`
    pub fn take_damage(&mut self, attack: &AttackGiven) -> CombatResult {
        let Some(stats) = self.stats_mut(attack.target) else {
            warn!(target_id = %attack.target, "attack on missing entity");
            return CombatResult::discarded(attack.attacker, attack.target, attack.tags);
        };

        let actual_damage = stats.compute_incoming_damage(&attack.tags, attack.raw_damage);
        let health_before = stats.current_health;
        stats.apply_health_delta(actual_damage);
        let health_after = stats.current_health;

        let state = DamageApplied {
            actual_damage,
            attacker: attack.attacker,
            target: attack.target,
            tags: attack.tags,
        }
        .propagate(self);

        CombatResult {
            attacker: attack.attacker,
            target: attack.target,
            raw_damage: attack.raw_damage,
            actual_damage,
            tags: attack.tags,
            health_before,
            health_after,
            state,
        }
    }
}
