//! SharedStackBuff - a stack count per target sharing a single decay timer

use super::{shift_live_stacks, Buff, BuffArgs, ModifierSet, Registration};
use crate::arena::Arena;
use crate::event::Listener;
use crate::stat_block::StatBlock;
use crate::types::EntityId;
use std::cell::RefCell;
use std::collections::BTreeMap;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq)]
struct SharedStack {
    stacks: u32,
    timer: f32,
    full_duration: f32,
}

/// Buff whose stacks share one timer and decay one at a time
///
/// Each activation adds a stack (up to `limit`) and resets the timer to full.
/// Whenever the timer runs out one stack is lost and the timer restarts,
/// once per elapsed period; losing the last stack removes the target.
#[derive(Debug)]
pub struct SharedStackBuff {
    effect: ModifierSet,
    limit: u32,
    duration: f32,
    stacks: RefCell<BTreeMap<EntityId, SharedStack>>,
}

impl SharedStackBuff {
    /// A limit of 0 is raised to 1
    pub fn new(effect: ModifierSet, limit: u32, duration: f32) -> Self {
        SharedStackBuff {
            effect,
            limit: limit.max(1),
            duration,
            stacks: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Current stacks on `target` (0 if untracked)
    pub fn stack_count(&self, target: EntityId) -> u32 {
        self.stacks
            .borrow()
            .get(&target)
            .map(|s| s.stacks)
            .unwrap_or(0)
    }

    /// Time until `target` loses its next stack
    pub fn remaining(&self, target: EntityId) -> Option<f32> {
        self.stacks.borrow().get(&target).map(|s| s.timer)
    }

    pub fn tracked_targets(&self) -> Vec<EntityId> {
        self.stacks.borrow().keys().copied().collect()
    }

    pub fn effect(&self) -> &ModifierSet {
        &self.effect
    }
}

impl Listener for SharedStackBuff {
    fn name(&self) -> &str {
        &self.effect.name
    }

    fn on_tick(&self, arena: &mut Arena, owner: EntityId, delta: f32) {
        let (lost, left) = {
            let mut map = self.stacks.borrow_mut();
            let Some(state) = map.get_mut(&owner) else {
                return;
            };
            state.timer -= delta;
            // Overshoot carries into the next period
            let before = state.stacks;
            while state.timer <= 0.0 && state.stacks > 0 {
                state.stacks -= 1;
                state.timer += state.full_duration;
            }
            (before - state.stacks, state.stacks)
        };
        if lost == 0 {
            return;
        }

        trace!(buff = self.name(), target_id = %owner, lost, left, "shared stacks decayed");
        shift_live_stacks(arena, owner, &self.effect, -(lost as i32));
        if left == 0 {
            arena.remove_buff(owner, self.name());
        }
    }
}

impl Buff for SharedStackBuff {
    fn is_stable(&self) -> bool {
        self.effect.stable
    }

    fn apply_buff(&self, owner: EntityId, block: &mut StatBlock) {
        self.effect.apply(block, self.stack_count(owner) as i32);
    }

    fn on_register(&self, arena: &mut Arena, target: EntityId, args: &BuffArgs) -> Registration {
        let duration = args.duration.unwrap_or(self.duration);
        let grew = {
            let mut map = self.stacks.borrow_mut();
            match map.get_mut(&target) {
                Some(state) => {
                    let before = state.stacks;
                    state.stacks = (state.stacks + 1).min(self.limit);
                    state.timer = duration;
                    state.full_duration = duration;
                    state.stacks > before
                }
                None => {
                    map.insert(
                        target,
                        SharedStack {
                            stacks: 1,
                            timer: duration,
                            full_duration: duration,
                        },
                    );
                    return Registration::Attach;
                }
            }
        };
        if grew {
            shift_live_stacks(arena, target, &self.effect, 1);
        }
        Registration::Merged
    }

    fn on_remove(&self, arena: &mut Arena, target: EntityId) {
        let stacks = self
            .stacks
            .borrow_mut()
            .remove(&target)
            .map(|s| s.stacks)
            .unwrap_or(0);
        shift_live_stacks(arena, target, &self.effect, -(stacks as i32));
    }
}
