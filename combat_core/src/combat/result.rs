//! CombatResult - outcome of one pass through the damage chain

use crate::tags::{Tag, TagSet};
use crate::types::EntityId;
use serde::{Deserialize, Serialize};

/// How far an attack travelled down the event chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackState {
    /// Never reached the target (friendly fire or missing entity)
    Discarded,
    /// Damage applied, but `NotTakeEvent` stopped display, listeners and death
    Suppressed,
    /// Damage applied and the target's listeners notified
    Notified,
    /// As `Notified`, and the target ended at or below zero health
    Died,
}

/// Result of [`Arena::give_damage`](crate::arena::Arena::give_damage)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatResult {
    pub attacker: EntityId,
    pub target: EntityId,

    // === Damage Breakdown ===
    /// Outgoing damage before the target's mitigation
    pub raw_damage: i32,
    /// Damage subtracted from the target's health
    pub actual_damage: i32,
    /// Final tags, including `CriticalHit` if the roll succeeded
    pub tags: TagSet,

    // === State Changes ===
    pub health_before: i32,
    pub health_after: i32,

    pub state: AttackState,
}

impl CombatResult {
    /// Result for an attack that never reached its target
    pub fn discarded(attacker: EntityId, target: EntityId, tags: TagSet) -> Self {
        CombatResult {
            attacker,
            target,
            raw_damage: 0,
            actual_damage: 0,
            tags,
            health_before: 0,
            health_after: 0,
            state: AttackState::Discarded,
        }
    }

    pub fn is_critical(&self) -> bool {
        self.tags.contains(Tag::CriticalHit)
    }

    pub fn is_killing_blow(&self) -> bool {
        self.state == AttackState::Died
    }

    /// Whether any damage was applied
    pub fn landed(&self) -> bool {
        self.state != AttackState::Discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discarded_result() {
        let result = CombatResult::discarded(EntityId(1), EntityId(2), TagSet::of(&[Tag::Melee]));
        assert!(!result.landed());
        assert!(!result.is_killing_blow());
        assert!(!result.is_critical());
        assert_eq!(result.actual_damage, 0);
    }

    #[test]
    fn test_state_serde_names() {
        let json = serde_json::to_string(&AttackState::Suppressed).unwrap();
        assert_eq!(json, "\"suppressed\"");
    }
}
