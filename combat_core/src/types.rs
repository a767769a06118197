//! Core identity and placement types shared across the crate

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle to an entity living in an [`Arena`](crate::arena::Arena)
///
/// Ids are handed out monotonically and never reused, so a stale id simply
/// fails to resolve instead of aliasing a newer entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(raw: u64) -> Self {
        EntityId(raw)
    }
}

/// Faction category used by the friendly-fire rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Player,
    Ally,
    Hostile,
    /// Never considered friendly with anything, including other neutrals
    #[default]
    Neutral,
}

/// World position reported to the damage display collaborator
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Position { x, y }
    }
}

impl From<(f32, f32)> for Position {
    fn from((x, y): (f32, f32)) -> Self {
        Position { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_ordering() {
        assert!(EntityId(1) < EntityId(2));
        assert_eq!(EntityId::from(7), EntityId(7));
        assert_eq!(EntityId(3).to_string(), "#3");
    }

    #[test]
    fn test_faction_serde_names() {
        let json = serde_json::to_string(&Faction::Hostile).unwrap();
        assert_eq!(json, "\"hostile\"");
        let parsed: Faction = serde_json::from_str("\"ally\"").unwrap();
        assert_eq!(parsed, Faction::Ally);
    }
}
