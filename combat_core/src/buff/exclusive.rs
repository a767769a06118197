//! ExclusiveBuff - a buff that can be on at most one target

use super::{shift_live_stacks, Buff, BuffArgs, ModifierSet, Registration};
use crate::arena::Arena;
use crate::event::Listener;
use crate::stat_block::StatBlock;
use crate::types::EntityId;
use std::cell::Cell;
use tracing::debug;

/// Buff held by a single target at a time
///
/// Registering on a new target force-removes it from the previous one first.
/// There is no timer: the holder keeps it until someone removes it.
#[derive(Debug)]
pub struct ExclusiveBuff {
    effect: ModifierSet,
    target: Cell<Option<EntityId>>,
}

impl ExclusiveBuff {
    pub fn new(effect: ModifierSet) -> Self {
        ExclusiveBuff {
            effect,
            target: Cell::new(None),
        }
    }

    /// Entity currently holding this buff
    pub fn current_target(&self) -> Option<EntityId> {
        self.target.get()
    }

    pub fn tracked_targets(&self) -> Vec<EntityId> {
        self.target.get().into_iter().collect()
    }

    pub fn effect(&self) -> &ModifierSet {
        &self.effect
    }
}

impl Listener for ExclusiveBuff {
    fn name(&self) -> &str {
        &self.effect.name
    }
}

impl Buff for ExclusiveBuff {
    fn is_stable(&self) -> bool {
        self.effect.stable
    }

    fn apply_buff(&self, _owner: EntityId, block: &mut StatBlock) {
        self.effect.apply(block, 1);
    }

    fn on_register(&self, arena: &mut Arena, target: EntityId, _args: &BuffArgs) -> Registration {
        match self.target.get() {
            Some(current) if current == target => return Registration::Merged,
            Some(previous) => {
                debug!(buff = self.name(), from = %previous, to = %target, "exclusive buff moving");
                arena.remove_buff(previous, self.name());
                // A despawned holder has no attachment left to remove
                self.target.set(None);
            }
            None => {}
        }
        self.target.set(Some(target));
        Registration::Attach
    }

    fn on_remove(&self, arena: &mut Arena, target: EntityId) {
        if self.target.get() != Some(target) {
            return;
        }
        self.target.set(None);
        shift_live_stacks(arena, target, &self.effect, -1);
    }
}
