//! Buffs - modifiers that alter a StatBlock for some lifetime
//!
//! A buff is one shared definition (`Rc<dyn Buff>`) tracking many targets.
//! Per-target state (timers, stack counts) lives inside the buff, keyed by
//! [`EntityId`], never inside the entity.
//!
//! Four lifecycle strategies are provided, all built on [`ModifierSet`]:
//! - [`ExclusiveBuff`]: at most one target at a time
//! - [`TimedBuff`]: any number of targets, each with its own countdown
//! - [`IndependentStackBuff`]: fixed slots per target, each decaying alone
//! - [`SharedStackBuff`]: a stack count per target sharing one timer

mod exclusive;
mod independent;
mod modifier;
mod shared;
mod timed;

pub use exclusive::ExclusiveBuff;
pub use independent::IndependentStackBuff;
pub use modifier::{Modifier, ModifierSet};
pub use shared::SharedStackBuff;
pub use timed::{TimedBuff, INFINITE_DURATION};

use crate::arena::Arena;
use crate::event::Listener;
use crate::stat_block::StatBlock;
use crate::types::EntityId;

/// Outcome of [`Buff::on_register`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// Target was not tracked before; the arena must attach the buff to it
    Attach,
    /// Target was already tracked; its state was refreshed in place
    Merged,
}

/// Arguments passed along with a buff registration
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BuffArgs {
    /// Overrides the buff's default duration when set
    pub duration: Option<f32>,
    /// Entity that applied the buff
    pub source: Option<EntityId>,
}

impl BuffArgs {
    pub fn for_duration(duration: f32) -> Self {
        BuffArgs {
            duration: Some(duration),
            source: None,
        }
    }

    pub fn with_source(mut self, source: EntityId) -> Self {
        self.source = Some(source);
        self
    }
}

/// Contract every buff satisfies
///
/// Stable buffs call `apply_buff` once on the live block when attached and
/// must undo their own offsets in `on_remove`. Volatile buffs are replayed
/// onto each snapshot and never touch the live block.
///
/// Implementations must not hold a `RefCell` borrow of their own state while
/// calling back into the [`Arena`]: arena calls can re-enter the buff.
pub trait Buff: Listener {
    fn is_stable(&self) -> bool;

    /// Write this buff's effect for `owner` into `block`
    fn apply_buff(&self, owner: EntityId, block: &mut StatBlock);

    /// Start (or refresh) tracking `target`
    fn on_register(&self, arena: &mut Arena, target: EntityId, args: &BuffArgs) -> Registration;

    /// Stop tracking `target`; called after the buff was detached from it
    ///
    /// Must be a no-op for targets that are not tracked.
    fn on_remove(&self, arena: &mut Arena, target: EntityId);
}

/// Move the live block of `target` by `stacks` worth of `effect`
///
/// Only stable effects are ever written to the live block.
pub(crate) fn shift_live_stacks(arena: &mut Arena, target: EntityId, effect: &ModifierSet, stacks: i32) {
    if !effect.stable || stacks == 0 {
        return;
    }
    if let Some(stats) = arena.stats_mut(target) {
        effect.apply(stats, stacks);
    }
}
