//! Damage formulas - outgoing damage for attackers, mitigation for defenders
//!
//! Both formulas run in two phases: [`StatBlock::resolve_modifiers`] produces
//! the block to compute against (volatile buffs baked in), then the formula
//! runs on that resolved block without ever resolving again.
//!
//! Every multiplication truncates toward zero before the next stage.

use crate::stat_block::StatBlock;
use crate::tags::{Tag, TagSet};
use rand::Rng;
use tracing::trace;

/// Armor curve constant: mitigation factor is `C / (defense + C)`
pub const MITIGATION_CONSTANT: f32 = 200.0;

impl StatBlock {
    /// Raw outgoing damage for a hit worth `coefficient` before modifiers
    ///
    /// If the hit crits, `Tag::CriticalHit` is inserted into `tags` so later
    /// stages (and the target) see it. A set that already carries
    /// `CriticalHit` gets the crit multiplier without a roll.
    pub fn compute_outgoing_damage<R: Rng + ?Sized>(
        &self,
        tags: &mut TagSet,
        coefficient: f32,
        rng: &mut R,
    ) -> i32 {
        self.resolve_modifiers()
            .outgoing_on_resolved(tags, coefficient, rng)
    }

    /// Outgoing damage scaled by attack
    ///
    /// The base is `coefficient × attack` of the resolved block, or the bare
    /// coefficient when `force_coefficient` is set.
    pub fn compute_attack_damage<R: Rng + ?Sized>(
        &self,
        tags: &mut TagSet,
        coefficient: f32,
        force_coefficient: bool,
        rng: &mut R,
    ) -> i32 {
        let resolved = self.resolve_modifiers();
        let base = if force_coefficient {
            coefficient
        } else {
            coefficient * resolved.derived_attack() as f32
        };
        resolved.outgoing_on_resolved(tags, base, rng)
    }

    /// Damage actually taken from a hit of `raw_damage`
    pub fn compute_incoming_damage(&self, tags: &TagSet, raw_damage: i32) -> i32 {
        self.resolve_modifiers().incoming_on_resolved(tags, raw_damage)
    }

    fn outgoing_on_resolved<R: Rng + ?Sized>(
        &self,
        tags: &mut TagSet,
        coefficient: f32,
        rng: &mut R,
    ) -> i32 {
        let flat = self.damage_add_flat.sum_for(tags);
        let mut dmg = (coefficient + flat as f32) as i32;
        trace!(owner = %self.id, coefficient, flat, dmg, "outgoing base");

        if self.rolls_critical(tags, rng) {
            dmg = (dmg as f32 * (1.0 + self.crit_damage / 100.0)) as i32;
            trace!(owner = %self.id, dmg, "critical hit");
        }

        let multiplier = if self.damage_nullified.sum_for(tags) > 0 {
            0.0
        } else {
            self.damage_multiplier.product_for(tags)
        };
        dmg = (dmg as f32 * multiplier) as i32;

        let up = self.damage_up_percent.sum_for(tags);
        dmg = (dmg as f32 * (1.0 + up / 100.0)) as i32;
        trace!(owner = %self.id, multiplier, up, dmg, "outgoing final");

        dmg
    }

    fn rolls_critical<R: Rng + ?Sized>(&self, tags: &mut TagSet, rng: &mut R) -> bool {
        // Already decided upstream: replay without a fresh roll
        if tags.contains(Tag::CriticalHit) {
            return true;
        }
        if tags.contains(Tag::NotCritical) || self.crit_chance <= 0.0 {
            return false;
        }
        if rng.gen::<f32>() < self.crit_chance / 100.0 {
            tags.add(Tag::CriticalHit);
            return true;
        }
        false
    }

    fn incoming_on_resolved(&self, tags: &TagSet, raw_damage: i32) -> i32 {
        let defense = self.derived_defense() as f32;
        let factor = MITIGATION_CONSTANT / (defense + MITIGATION_CONSTANT);
        let mitigated = (raw_damage as f32 * factor) as i32;

        let taken_up = self.damage_taken_up_percent.sum_for(tags);
        let damage = (mitigated as f32 * (1.0 + taken_up / 100.0)) as i32;
        trace!(owner = %self.id, raw_damage, defense, taken_up, damage, "incoming");
        damage
    }
}
