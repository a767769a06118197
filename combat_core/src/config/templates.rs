//! Stat templates - designer-provided numbers for spawning entities

use super::ConfigError;
use crate::arena::Arena;
use crate::stat_block::StatBlock;
use crate::types::{EntityId, Faction, Position};
use serde::{Deserialize, Serialize};

fn default_crit_damage() -> f32 {
    50.0
}

/// Base stats for one kind of entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatTemplate {
    pub health: i32,
    pub attack: i32,
    #[serde(default)]
    pub defense: i32,
    #[serde(default)]
    pub crit_chance: f32,
    #[serde(default = "default_crit_damage")]
    pub crit_damage: f32,
}

impl StatTemplate {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.health <= 0 {
            return Err(ConfigError::ValidationError(format!(
                "health must be positive, got {}",
                self.health
            )));
        }
        if !(0.0..=100.0).contains(&self.crit_chance) {
            return Err(ConfigError::ValidationError(format!(
                "crit_chance must be within 0..=100, got {}",
                self.crit_chance
            )));
        }
        Ok(())
    }

    /// Fresh block at full health
    pub fn build(&self) -> StatBlock {
        StatBlock::new(self.health, self.attack, self.defense)
            .with_crit(self.crit_chance, self.crit_damage)
    }
}

/// A named, factioned entity ready to spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTemplate {
    pub name: String,
    #[serde(default)]
    pub faction: Faction,
    pub stats: StatTemplate,
}

impl EntityTemplate {
    pub fn spawn(&self, arena: &mut Arena, position: Position) -> EntityId {
        arena.spawn_at(self.name.clone(), self.faction, self.stats.build(), position)
    }
}
