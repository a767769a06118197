//! Entity - a combatant: stats plus an ordered listener list

use crate::buff::Buff;
use crate::event::{Listener, Subscriber};
use crate::stat_block::StatBlock;
use crate::types::{EntityId, Faction, Position};
use std::rc::Rc;

/// A combatant living in an [`Arena`](crate::arena::Arena)
///
/// Listeners are shared (`Rc`); the entity only holds references to them and
/// notifies them in insertion order. Attached buffs appear in the same list.
///
/// A registration is a strong reference: it keeps the listener alive until
/// `remove_listener` or despawn ends it, never longer. The listener's own
/// lifetime belongs to whoever else holds it.
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    pub name: String,
    pub faction: Faction,
    pub position: Position,
    stats: StatBlock,
    listeners: Vec<Subscriber>,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>, faction: Faction, stats: StatBlock) -> Self {
        Entity {
            id,
            name: name.into(),
            faction,
            position: Position::default(),
            stats: stats.with_id(id),
            listeners: Vec::new(),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut StatBlock {
        &mut self.stats
    }

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    // === Listeners ===

    /// Append a listener; returns false if it is already registered
    pub fn register_listener(&mut self, listener: Rc<dyn Listener>) -> bool {
        if self.listeners.iter().any(|s| s.is_listener(&listener)) {
            return false;
        }
        self.listeners.push(Subscriber::Listener(listener));
        true
    }

    /// Remove a listener by identity; returns false if it was not registered
    pub fn remove_listener(&mut self, listener: &Rc<dyn Listener>) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|s| !s.is_listener(listener));
        self.listeners.len() != before
    }

    /// Current listener list in notification order
    pub fn listeners(&self) -> &[Subscriber] {
        &self.listeners
    }

    /// Copy of the listener list to dispatch over
    pub(crate) fn subscribers(&self) -> Vec<Subscriber> {
        self.listeners.clone()
    }

    /// Register `buff` on the stat block and in the listener list
    pub(crate) fn attach_buff(&mut self, buff: Rc<dyn Buff>) -> bool {
        if !self.stats.register_buff(buff.clone()) {
            return false;
        }
        self.listeners.push(Subscriber::Buff(buff));
        true
    }

    /// Take `name` off the stat block and out of the listener list
    pub(crate) fn detach_buff(&mut self, name: &str) -> Option<Rc<dyn Buff>> {
        let buff = self.stats.remove_buff(name)?;
        self.listeners.retain(|s| !s.is_buff(name));
        Some(buff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CallbackListener;

    fn listener(name: &str) -> Rc<dyn Listener> {
        Rc::new(CallbackListener::new(name))
    }

    #[test]
    fn test_new_entity_owns_stat_id() {
        let entity = Entity::new(EntityId(4), "slime", Faction::Hostile, StatBlock::new(30, 3, 0));
        assert_eq!(entity.stats().id, EntityId(4));
        assert!(entity.is_alive());
    }

    #[test]
    fn test_listener_order_and_removal() {
        let mut entity = Entity::new(EntityId(1), "hero", Faction::Player, StatBlock::default());
        let a = listener("a");
        let b = listener("b");
        let c = listener("c");

        assert!(entity.register_listener(a.clone()));
        assert!(entity.register_listener(b.clone()));
        assert!(entity.register_listener(c.clone()));
        assert!(!entity.register_listener(a.clone()));

        assert!(entity.remove_listener(&b));
        assert!(!entity.remove_listener(&b));

        let names: Vec<&str> = entity.listeners().iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_same_name_distinct_listeners() {
        let mut entity = Entity::new(EntityId(1), "hero", Faction::Player, StatBlock::default());
        let first = listener("hud");
        let second = listener("hud");
        entity.register_listener(first.clone());
        entity.register_listener(second);

        entity.remove_listener(&first);
        assert_eq!(entity.listeners().len(), 1);
    }

    #[test]
    fn test_registration_holds_listener_until_removed() {
        let mut entity = Entity::new(EntityId(1), "hero", Faction::Player, StatBlock::default());
        let hud = listener("hud");
        let handle = Rc::downgrade(&hud);

        entity.register_listener(hud.clone());
        assert_eq!(Rc::strong_count(&hud), 2);
        drop(hud);
        assert!(handle.upgrade().is_some());

        let Some(held) = handle.upgrade() else {
            panic!("listener dropped while registered");
        };
        entity.remove_listener(&held);
        drop(held);
        assert!(handle.upgrade().is_none());
    }
}
