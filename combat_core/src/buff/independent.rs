//! IndependentStackBuff - fixed stack slots per target, each with its own timer

use super::{shift_live_stacks, Buff, BuffArgs, ModifierSet, Registration};
use crate::arena::Arena;
use crate::event::Listener;
use crate::stat_block::StatBlock;
use crate::types::EntityId;
use std::cell::RefCell;
use std::collections::BTreeMap;
use tracing::trace;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Slot {
    active: bool,
    remaining: f32,
}

/// Occupy a slot for a new activation
///
/// Returns true if a previously empty slot was filled (the stack count grew).
/// With every slot full, the slot closest to expiring is refreshed instead,
/// but only if the new duration is longer than what it has left.
fn activate(slots: &mut [Slot], duration: f32) -> bool {
    if let Some(slot) = slots.iter_mut().find(|s| !s.active) {
        *slot = Slot {
            active: true,
            remaining: duration,
        };
        return true;
    }
    if let Some(slot) = slots
        .iter_mut()
        .min_by(|a, b| a.remaining.total_cmp(&b.remaining))
    {
        if duration > slot.remaining {
            slot.remaining = duration;
        }
    }
    false
}

fn active_count(slots: &[Slot]) -> u32 {
    slots.iter().filter(|s| s.active).count() as u32
}

/// Buff whose stacks decay independently of each other
///
/// Each target gets `capacity` slots. The target loses the buff entirely
/// once its last active slot runs out.
#[derive(Debug)]
pub struct IndependentStackBuff {
    effect: ModifierSet,
    capacity: usize,
    duration: f32,
    slots: RefCell<BTreeMap<EntityId, Vec<Slot>>>,
}

impl IndependentStackBuff {
    /// A capacity of 0 is raised to 1
    pub fn new(effect: ModifierSet, capacity: usize, duration: f32) -> Self {
        IndependentStackBuff {
            effect,
            capacity: capacity.max(1),
            duration,
            slots: RefCell::new(BTreeMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Active stacks on `target` (0 if untracked)
    pub fn stack_count(&self, target: EntityId) -> u32 {
        self.slots
            .borrow()
            .get(&target)
            .map(|slots| active_count(slots))
            .unwrap_or(0)
    }

    /// Remaining time of each active stack on `target`, soonest first
    pub fn stack_timers(&self, target: EntityId) -> Vec<f32> {
        let mut timers: Vec<f32> = self
            .slots
            .borrow()
            .get(&target)
            .map(|slots| {
                slots
                    .iter()
                    .filter(|s| s.active)
                    .map(|s| s.remaining)
                    .collect()
            })
            .unwrap_or_default();
        timers.sort_by(f32::total_cmp);
        timers
    }

    pub fn tracked_targets(&self) -> Vec<EntityId> {
        self.slots.borrow().keys().copied().collect()
    }

    pub fn effect(&self) -> &ModifierSet {
        &self.effect
    }
}

impl Listener for IndependentStackBuff {
    fn name(&self) -> &str {
        &self.effect.name
    }

    fn on_tick(&self, arena: &mut Arena, owner: EntityId, delta: f32) {
        let (expired, still_active) = {
            let mut map = self.slots.borrow_mut();
            let Some(slots) = map.get_mut(&owner) else {
                return;
            };
            let mut expired = 0;
            for slot in slots.iter_mut().filter(|s| s.active) {
                slot.remaining -= delta;
                if slot.remaining <= 0.0 {
                    *slot = Slot::default();
                    expired += 1;
                }
            }
            (expired, active_count(slots))
        };

        if expired > 0 {
            trace!(buff = self.name(), target_id = %owner, expired, still_active, "stacks expired");
            shift_live_stacks(arena, owner, &self.effect, -expired);
        }
        if still_active == 0 {
            arena.remove_buff(owner, self.name());
        }
    }
}

impl Buff for IndependentStackBuff {
    fn is_stable(&self) -> bool {
        self.effect.stable
    }

    fn apply_buff(&self, owner: EntityId, block: &mut StatBlock) {
        self.effect.apply(block, self.stack_count(owner) as i32);
    }

    fn on_register(&self, arena: &mut Arena, target: EntityId, args: &BuffArgs) -> Registration {
        let duration = args.duration.unwrap_or(self.duration);
        let grew = {
            let mut map = self.slots.borrow_mut();
            match map.get_mut(&target) {
                Some(slots) => activate(slots, duration),
                None => {
                    let mut slots = vec![Slot::default(); self.capacity];
                    activate(&mut slots, duration);
                    map.insert(target, slots);
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
            .slots
            .borrow_mut()
            .remove(&target)
            .map(|slots| active_count(&slots))
            .unwrap_or(0);
        shift_live_stacks(arena, target, &self.effect, -(stacks as i32));
    }
}
