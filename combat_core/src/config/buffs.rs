//! Buff catalog - buff definitions loaded from data files

use super::ConfigError;
use crate::buff::{
    Buff, ExclusiveBuff, IndependentStackBuff, Modifier, ModifierSet, SharedStackBuff, TimedBuff,
    INFINITE_DURATION,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::rc::Rc;

fn infinite() -> f32 {
    INFINITE_DURATION
}

/// Lifecycle strategy of a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BuffKind {
    Exclusive,
    Timed {
        #[serde(default = "infinite")]
        duration: f32,
    },
    IndependentStack { capacity: usize, duration: f32 },
    SharedStack { limit: u32, duration: f32 },
}

/// One `[[buffs]]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffEntry {
    pub name: String,
    #[serde(default)]
    pub stable: bool,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub kind: BuffKind,
}

impl BuffEntry {
    fn effect(&self) -> ModifierSet {
        ModifierSet {
            name: self.name.clone(),
            stable: self.stable,
            modifiers: self.modifiers.clone(),
        }
    }

    /// Shared buff instance for this entry
    pub fn build(&self) -> Rc<dyn Buff> {
        let effect = self.effect();
        match self.kind {
            BuffKind::Exclusive => Rc::new(ExclusiveBuff::new(effect)),
            BuffKind::Timed { duration } => Rc::new(TimedBuff::new(effect, duration)),
            BuffKind::IndependentStack { capacity, duration } => {
                Rc::new(IndependentStackBuff::new(effect, capacity, duration))
            }
            BuffKind::SharedStack { limit, duration } => {
                Rc::new(SharedStackBuff::new(effect, limit, duration))
            }
        }
    }
}

/// All buff definitions of a game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuffCatalog {
    #[serde(default)]
    pub buffs: Vec<BuffEntry>,
}

impl BuffCatalog {
    /// Load and validate a catalog from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let catalog: BuffCatalog = super::load_toml(path)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate a catalog from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let catalog: BuffCatalog = super::parse_toml(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for entry in &self.buffs {
            if entry.name.is_empty() {
                return Err(ConfigError::ValidationError("buff with empty name".into()));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "duplicate buff name '{}'",
                    entry.name
                )));
            }
            match entry.kind {
                BuffKind::IndependentStack { capacity: 0, .. } => {
                    return Err(ConfigError::ValidationError(format!(
                        "buff '{}' needs a capacity of at least 1",
                        entry.name
                    )));
                }
                BuffKind::SharedStack { limit: 0, .. } => {
                    return Err(ConfigError::ValidationError(format!(
                        "buff '{}' needs a limit of at least 1",
                        entry.name
                    )));
                }
                _ => {}
            }
            if let Some(modifier) = entry.modifiers.iter().find(|m| !m.is_finite()) {
                return Err(ConfigError::ValidationError(format!(
                    "buff '{}' has a non-finite modifier {:?}",
                    entry.name, modifier
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&BuffEntry> {
        self.buffs.iter().find(|entry| entry.name == name)
    }

    /// One shared instance per entry, keyed by name
    pub fn build(&self) -> BTreeMap<String, Rc<dyn Buff>> {
        self.buffs
            .iter()
            .map(|entry| (entry.name.clone(), entry.build()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Listener;
    use crate::tags::Tag;

    const CATALOG: &str = r#"
[[buffs]]
name = "berserk"
stable = true
modifiers = [{ type = "attack_percent", percent = 50.0 }]
kind = { type = "exclusive" }

[[buffs]]
name = "burning"
modifiers = [{ type = "damage_taken_up", tag = "fire", percent = 20.0 }]
kind = { type = "timed", duration = 4.0 }

[[buffs]]
name = "blessing"
stable = true
modifiers = [{ type = "defense_flat", amount = 10 }]
kind = { type = "timed" }

[[buffs]]
name = "bleed"
modifiers = [{ type = "damage_add_flat", tag = "all", amount = 3 }]
kind = { type = "independent_stack", capacity = 5, duration = 2.0 }

[[buffs]]
name = "frenzy"
stable = true
modifiers = [{ type = "crit_chance", percent = 5.0 }]
kind = { type = "shared_stack", limit = 3, duration = 6.0 }
"#;

    #[test]
    fn test_parse_catalog() {
        let catalog = BuffCatalog::parse(CATALOG).unwrap();
        assert_eq!(catalog.buffs.len(), 5);

        let burning = catalog.get("burning").unwrap();
        assert!(!burning.stable);
        assert_eq!(burning.kind, BuffKind::Timed { duration: 4.0 });
        assert_eq!(
            burning.modifiers[0],
            Modifier::DamageTakenUp { tag: Tag::Fire, percent: 20.0 }
        );

        let blessing = catalog.get("blessing").unwrap();
        assert_eq!(blessing.kind, BuffKind::Timed { duration: INFINITE_DURATION });
    }

    #[test]
    fn test_build_catalog() {
        let built = BuffCatalog::parse(CATALOG).unwrap().build();
        assert_eq!(built.len(), 5);
        assert!(built["berserk"].is_stable());
        assert!(!built["bleed"].is_stable());
        assert_eq!(built["frenzy"].name(), "frenzy");
    }

    #[test]
    fn test_rejects_duplicates() {
        let toml = r#"
[[buffs]]
name = "haste"
kind = { type = "exclusive" }

[[buffs]]
name = "haste"
kind = { type = "timed", duration = 1.0 }
"#;
        let err = BuffCatalog::parse(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let toml = r#"
[[buffs]]
name = "bleed"
kind = { type = "independent_stack", capacity = 0, duration = 2.0 }
"#;
        assert!(BuffCatalog::parse(toml).is_err());

        let toml = r#"
[[buffs]]
name = "frenzy"
kind = { type = "shared_stack", limit = 0, duration = 2.0 }
"#;
        assert!(BuffCatalog::parse(toml).is_err());
    }

    #[test]
    fn test_rejects_non_finite_modifier() {
        let mut catalog = BuffCatalog::parse(CATALOG).unwrap();
        catalog.buffs[0].modifiers.push(Modifier::DamageMultiplier {
            tag: Tag::All,
            factor: f32::INFINITY,
        });
        assert!(matches!(catalog.validate(), Err(ConfigError::ValidationError(_))));

        catalog.buffs[0].modifiers[1] = Modifier::DamageMultiplier { tag: Tag::All, factor: 0.0 };
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn test_json_catalog() {
        let json = r#"{ "buffs": [
            { "name": "shield", "stable": true,
              "modifiers": [{ "type": "defense_percent", "percent": 25.0 }],
              "kind": { "type": "exclusive" } }
        ] }"#;
        let catalog: BuffCatalog = crate::config::parse_json(json).unwrap();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.get("shield").map(|e| e.stable), Some(true));
    }
}
