//! combat_core - Combat resolution core for action games
//!
//! This library provides:
//! - TagSet: bitmask classification of attacks and damage
//! - StatBlock: base stats, modifiers and the damage formulas
//! - Buffs: exclusive, timed and stacking modifiers with per-target state
//! - Event bus: attack → damage → death chain with copy-on-iterate dispatch
//! - Arena: entity store running the damage pipeline

pub mod arena;
pub mod buff;
pub mod combat;
pub mod config;
pub mod entity;
pub mod event;
pub mod prelude;
pub mod stat_block;
pub mod tags;
pub mod types;

// Re-export core types for convenience
pub use arena::{Arena, DamageDisplay, FactionRule, SameFaction};
pub use buff::{
    Buff, BuffArgs, ExclusiveBuff, IndependentStackBuff, Modifier, ModifierSet, Registration,
    SharedStackBuff, TimedBuff, INFINITE_DURATION,
};
pub use combat::{AttackState, CombatResult, DamageRequest};
pub use config::{BuffCatalog, ConfigError, EntityTemplate, StatTemplate};
pub use entity::Entity;
pub use event::{AttackGiven, CallbackListener, DamageApplied, EntityDied, Event, Listener, Subscriber};
pub use stat_block::{BuffRegistry, StatBlock, StatValue, MITIGATION_CONSTANT};
pub use tags::{Tag, TagSet, TagTable};
pub use types::{EntityId, Faction, Position};
