//! Modifier - a single stat change, and ModifierSet - a buff's full effect

use crate::stat_block::StatBlock;
use crate::tags::Tag;
use serde::{Deserialize, Serialize};

/// One change a buff makes to a StatBlock, per stack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Modifier {
    HealthFlat { amount: i32 },
    HealthPercent { percent: f32 },
    AttackFlat { amount: i32 },
    AttackPercent { percent: f32 },
    DefenseFlat { amount: i32 },
    DefensePercent { percent: f32 },
    CritChance { percent: f32 },
    CritDamage { percent: f32 },
    DamageUp { tag: Tag, percent: f32 },
    DamageTakenUp { tag: Tag, percent: f32 },
    DamageMultiplier { tag: Tag, factor: f32 },
    DamageAddFlat { tag: Tag, amount: i32 },
}

impl Modifier {
    /// Apply `stacks` copies of this modifier; negative stacks undo
    ///
    /// Additive entries scale linearly, multipliers by `factor^stacks`.
    /// A zero factor is counted per tag instead of folded into the product,
    /// so taking it away again restores the previous multiplier.
    pub fn apply(&self, block: &mut StatBlock, stacks: i32) {
        let scale = stacks as f32;
        match *self {
            Modifier::HealthFlat { amount } => block.max_health.add_flat(amount * stacks),
            Modifier::HealthPercent { percent } => block.max_health.add_percent(percent * scale),
            Modifier::AttackFlat { amount } => block.attack.add_flat(amount * stacks),
            Modifier::AttackPercent { percent } => block.attack.add_percent(percent * scale),
            Modifier::DefenseFlat { amount } => block.defense.add_flat(amount * stacks),
            Modifier::DefensePercent { percent } => block.defense.add_percent(percent * scale),
            Modifier::CritChance { percent } => block.crit_chance += percent * scale,
            Modifier::CritDamage { percent } => block.crit_damage += percent * scale,
            Modifier::DamageUp { tag, percent } => block.damage_up_percent[tag] += percent * scale,
            Modifier::DamageTakenUp { tag, percent } => {
                block.damage_taken_up_percent[tag] += percent * scale
            }
            Modifier::DamageMultiplier { tag, factor } if factor == 0.0 => {
                block.damage_nullified[tag] += stacks
            }
            Modifier::DamageMultiplier { tag, factor } => {
                block.damage_multiplier[tag] *= factor.powi(stacks)
            }
            Modifier::DamageAddFlat { tag, amount } => block.damage_add_flat[tag] += amount * stacks,
        }
    }

    /// False for values that cannot be undone exactly (NaN or infinite)
    pub fn is_finite(&self) -> bool {
        match *self {
            Modifier::HealthPercent { percent }
            | Modifier::AttackPercent { percent }
            | Modifier::DefensePercent { percent }
            | Modifier::CritChance { percent }
            | Modifier::CritDamage { percent }
            | Modifier::DamageUp { percent, .. }
            | Modifier::DamageTakenUp { percent, .. } => percent.is_finite(),
            Modifier::DamageMultiplier { factor, .. } => factor.is_finite(),
            Modifier::HealthFlat { .. }
            | Modifier::AttackFlat { .. }
            | Modifier::DefenseFlat { .. }
            | Modifier::DamageAddFlat { .. } => true,
        }
    }
}

/// Named, per-stack effect shared by every buff variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModifierSet {
    pub name: String,
    /// Applied once to the live block (true) or replayed per snapshot (false)
    #[serde(default)]
    pub stable: bool,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

impl ModifierSet {
    pub fn new(name: impl Into<String>, stable: bool) -> Self {
        ModifierSet {
            name: name.into(),
            stable,
            modifiers: Vec::new(),
        }
    }

    /// Add a modifier to this set
    pub fn with(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn apply(&self, block: &mut StatBlock, stacks: i32) {
        if stacks == 0 {
            return;
        }
        for modifier in &self.modifiers {
            modifier.apply(block, stacks);
        }
    }
}
