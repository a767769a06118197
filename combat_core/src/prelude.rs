//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Core types
pub use crate::stat_block::{StatBlock, StatValue};
pub use crate::tags::{Tag, TagSet};
pub use crate::types::{EntityId, Faction, Position};

// Entities and dispatch
pub use crate::arena::{Arena, DamageDisplay, FactionRule};
pub use crate::entity::Entity;
pub use crate::event::{CallbackListener, Event, Listener};

// Buffs
pub use crate::buff::{
    Buff, BuffArgs, ExclusiveBuff, IndependentStackBuff, Modifier, ModifierSet, SharedStackBuff,
    TimedBuff, INFINITE_DURATION,
};

// Combat
pub use crate::combat::{AttackState, CombatResult, DamageRequest};

// Config
pub use crate::config::{BuffCatalog, StatTemplate};
