//! DamageRequest - everything an attacker decides before the hit lands

use crate::tags::{Tag, TagSet};
use crate::types::EntityId;
use serde::{Deserialize, Serialize};

/// Parameters of one call to [`Arena::give_damage_with`](crate::arena::Arena::give_damage_with)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageRequest {
    pub attacker: EntityId,
    pub target: EntityId,
    /// Multiplier on the attacker's attack, or the base itself when forced
    pub coefficient: f32,
    pub tags: TagSet,
    /// Use `coefficient` as the base instead of scaling attack
    #[serde(default)]
    pub force_coefficient: bool,
    /// Skip the outgoing formula and hit for exactly this much
    #[serde(default)]
    pub true_damage: Option<i32>,
    /// Knockback force handed to listeners
    #[serde(default)]
    pub force: f32,
}

impl DamageRequest {
    pub fn new(attacker: EntityId, target: EntityId, coefficient: f32) -> Self {
        DamageRequest {
            attacker,
            target,
            coefficient,
            tags: TagSet::none(),
            force_coefficient: false,
            true_damage: None,
            force: 0.0,
        }
    }

    /// Hit for a fixed raw amount; no crit roll happens
    pub fn fixed(attacker: EntityId, target: EntityId, raw_damage: i32) -> Self {
        DamageRequest {
            true_damage: Some(raw_damage),
            ..Self::new(attacker, target, 0.0)
        }
    }

    pub fn with_tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.add(tag);
        self
    }

    pub fn forced(mut self) -> Self {
        self.force_coefficient = true;
        self
    }

    pub fn with_force(mut self, force: f32) -> Self {
        self.force = force;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let request = DamageRequest::new(EntityId(1), EntityId(2), 1.5)
            .with_tag(Tag::Fire)
            .with_tag(Tag::Skill)
            .forced()
            .with_force(3.0);

        assert!(request.force_coefficient);
        assert!(request.tags.contains(Tag::Fire));
        assert!(request.tags.contains(Tag::Skill));
        assert_eq!(request.true_damage, None);
        assert!((request.force - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fixed_request() {
        let request = DamageRequest::fixed(EntityId(1), EntityId(2), 40);
        assert_eq!(request.true_damage, Some(40));
        assert!(request.tags.is_empty());
    }
}
