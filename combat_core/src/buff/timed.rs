//! TimedBuff - one countdown per target

use super::{shift_live_stacks, Buff, BuffArgs, ModifierSet, Registration};
use crate::arena::Arena;
use crate::event::Listener;
use crate::stat_block::StatBlock;
use crate::types::EntityId;
use std::cell::RefCell;
use std::collections::BTreeMap;
use tracing::trace;

/// Duration value meaning "never expires"
pub const INFINITE_DURATION: f32 = -1.0;

/// Anything at or below this is treated as infinite
const INFINITE_THRESHOLD: f32 = -0.5;

fn is_infinite(duration: f32) -> bool {
    duration <= INFINITE_THRESHOLD
}

/// Buff tracking many targets, each with its own remaining time
///
/// Re-registering on a tracked target sets its timer to the new duration.
/// When a target's timer runs out, only that target loses the buff.
#[derive(Debug)]
pub struct TimedBuff {
    effect: ModifierSet,
    default_duration: f32,
    timers: RefCell<BTreeMap<EntityId, f32>>,
}

impl TimedBuff {
    pub fn new(effect: ModifierSet, default_duration: f32) -> Self {
        TimedBuff {
            effect,
            default_duration,
            timers: RefCell::new(BTreeMap::new()),
        }
    }

    /// Buff that stays until removed
    pub fn permanent(effect: ModifierSet) -> Self {
        Self::new(effect, INFINITE_DURATION)
    }

    /// Seconds left on `target`; `None` if untracked or infinite
    pub fn remaining(&self, target: EntityId) -> Option<f32> {
        self.timers
            .borrow()
            .get(&target)
            .copied()
            .filter(|time| !is_infinite(*time))
    }

    pub fn is_tracking(&self, target: EntityId) -> bool {
        self.timers.borrow().contains_key(&target)
    }

    pub fn tracked_targets(&self) -> Vec<EntityId> {
        self.timers.borrow().keys().copied().collect()
    }

    pub fn effect(&self) -> &ModifierSet {
        &self.effect
    }
}

impl Listener for TimedBuff {
    fn name(&self) -> &str {
        &self.effect.name
    }

    fn on_tick(&self, arena: &mut Arena, owner: EntityId, delta: f32) {
        let expired = {
            let mut timers = self.timers.borrow_mut();
            match timers.get_mut(&owner) {
                Some(time) if !is_infinite(*time) => {
                    *time -= delta;
                    *time <= 0.0
                }
                _ => false,
            }
        };
        if expired {
            trace!(buff = self.name(), target_id = %owner, "timed buff expired");
            arena.remove_buff(owner, self.name());
        }
    }
}

impl Buff for TimedBuff {
    fn is_stable(&self) -> bool {
        self.effect.stable
    }

    fn apply_buff(&self, _owner: EntityId, block: &mut StatBlock) {
        self.effect.apply(block, 1);
    }

    fn on_register(&self, _arena: &mut Arena, target: EntityId, args: &BuffArgs) -> Registration {
        let duration = args.duration.unwrap_or(self.default_duration);
        match self.timers.borrow_mut().insert(target, duration) {
            Some(_) => Registration::Merged,
            None => Registration::Attach,
        }
    }

    fn on_remove(&self, arena: &mut Arena, target: EntityId) {
        let tracked = self.timers.borrow_mut().remove(&target).is_some();
        if tracked {
            shift_live_stacks(arena, target, &self.effect, -1);
        }
    }
}
