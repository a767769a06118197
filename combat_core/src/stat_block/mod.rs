//! StatBlock - base and modifier stats for one entity

mod computed;
mod damage;
mod registry;
mod stat_value;

pub use damage::MITIGATION_CONSTANT;
pub use registry::BuffRegistry;
pub use stat_value::StatValue;

use crate::buff::Buff;
use crate::tags::TagTable;
use crate::types::EntityId;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::rc::Rc;
use tracing::debug;

/// Complete stat state for an entity
///
/// Base values live inside each [`StatValue`] and never change after
/// creation; everything else is a modifier that buffs add to and take away
/// from. Cloning is always deep: the tag tables are plain arrays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatBlock {
    // === Identity ===
    /// Owner of this block; buffs key their per-target state on it
    pub id: EntityId,

    // === Resources ===
    pub max_health: StatValue,
    /// Not clamped; zero or below means the owner should die
    pub current_health: i32,

    // === Core Stats ===
    pub attack: StatValue,
    pub defense: StatValue,

    // === Critical Strike ===
    /// Chance in percent (25.0 = 25%)
    pub crit_chance: f32,
    /// Bonus damage in percent (50.0 = ×1.5)
    pub crit_damage: f32,

    // === Per-Tag Modifiers ===
    pub damage_up_percent: TagTable<f32>,
    pub damage_taken_up_percent: TagTable<f32>,
    pub damage_multiplier: TagTable<f32>,
    /// Zero-factor multipliers per tag; any live one zeroes the product
    #[serde(default)]
    pub damage_nullified: TagTable<i32>,
    pub damage_add_flat: TagTable<i32>,

    // === Buffs ===
    #[serde(skip)]
    buffs: BuffRegistry,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self::new(100, 10, 0)
    }
}

impl StatBlock {
    /// Create a block with the given bases at full health
    pub fn new(health: i32, attack: i32, defense: i32) -> Self {
        StatBlock {
            id: EntityId::default(),
            max_health: StatValue::with_base(health),
            current_health: health,
            attack: StatValue::with_base(attack),
            defense: StatValue::with_base(defense),
            crit_chance: 0.0,
            crit_damage: 50.0,
            damage_up_percent: TagTable::default(),
            damage_taken_up_percent: TagTable::default(),
            damage_multiplier: TagTable::filled(1.0),
            damage_nullified: TagTable::default(),
            damage_add_flat: TagTable::default(),
            buffs: BuffRegistry::new(),
        }
    }

    /// Set crit chance and crit damage (both in percent)
    pub fn with_crit(mut self, chance: f32, damage: f32) -> Self {
        self.crit_chance = chance;
        self.crit_damage = damage;
        self
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = id;
        self
    }

    // === Snapshots ===

    /// Copy of every stat field with an empty buff registry
    fn detached(&self) -> StatBlock {
        StatBlock {
            id: self.id,
            max_health: self.max_health,
            current_health: self.current_health,
            attack: self.attack,
            defense: self.defense,
            crit_chance: self.crit_chance,
            crit_damage: self.crit_damage,
            damage_up_percent: self.damage_up_percent,
            damage_taken_up_percent: self.damage_taken_up_percent,
            damage_multiplier: self.damage_multiplier,
            damage_nullified: self.damage_nullified,
            damage_add_flat: self.damage_add_flat,
            buffs: BuffRegistry::new(),
        }
    }

    /// Deep copy with every volatile buff baked in, in registration order
    ///
    /// The copy carries no buffs of its own, so computing on it never replays
    /// anything a second time.
    pub fn snapshot(&self) -> StatBlock {
        let mut copy = self.detached();
        for buff in self.buffs.volatile() {
            buff.apply_buff(self.id, &mut copy);
        }
        copy
    }

    /// Block to run a damage formula against
    ///
    /// Borrows `self` when no volatile buff is registered, so entities
    /// without volatile buffs never pay for a copy.
    pub fn resolve_modifiers(&self) -> Cow<'_, StatBlock> {
        if self.buffs.has_volatile() {
            Cow::Owned(self.snapshot())
        } else {
            Cow::Borrowed(self)
        }
    }

    // === Buff Methods ===

    /// Register a buff in its partition
    ///
    /// Stable buffs are applied to this (live) block exactly once here.
    /// Returns false if a buff with the same name is already registered.
    pub fn register_buff(&mut self, buff: Rc<dyn Buff>) -> bool {
        if !self.buffs.register(buff.clone()) {
            return false;
        }
        if buff.is_stable() {
            buff.apply_buff(self.id, self);
        }
        debug!(owner = %self.id, buff = buff.name(), stable = buff.is_stable(), "buff registered");
        true
    }

    /// Unregister a buff by name
    ///
    /// Only the registry entry goes away; a stable buff undoes its own
    /// offsets in `on_remove`.
    pub fn remove_buff(&mut self, name: &str) -> Option<Rc<dyn Buff>> {
        let removed = self.buffs.remove(name);
        if removed.is_some() {
            debug!(owner = %self.id, buff = name, "buff unregistered");
        }
        removed
    }

    pub fn buffs(&self) -> &BuffRegistry {
        &self.buffs
    }

    pub fn has_buff(&self, name: &str) -> bool {
        self.buffs.contains(name)
    }

    // === Health ===

    /// Subtract `amount` from current health, with no clamping
    ///
    /// Saturates at the `i32` bounds instead of overflowing.
    pub fn apply_health_delta(&mut self, amount: i32) {
        self.current_health = self.current_health.saturating_sub(amount);
    }

    /// Restore health, capped at derived max health
    pub fn heal(&mut self, amount: i32) {
        let max = self.derived_max_health();
        self.current_health = self.current_health.saturating_add(amount).min(max);
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }
}
