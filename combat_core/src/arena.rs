//! Arena - owns every entity and routes buffs, ticks and events
//!
//! Entities are kept in a `BTreeMap` so ticking and debugging walk them in
//! id order. Every dispatch iterates a copy of the listener list, so
//! listeners and buffs may add or remove subscriptions (their own included)
//! while being called.

use crate::buff::{Buff, BuffArgs, Registration};
use crate::entity::Entity;
use crate::event::{Event, Listener};
use crate::stat_block::StatBlock;
use crate::types::{EntityId, Faction, Position};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

/// Collaborator that shows floating damage numbers
pub trait DamageDisplay {
    fn spawn_damage_number(&mut self, amount: i32, critical: bool, position: Position);
}

impl<F> DamageDisplay for F
where
    F: FnMut(i32, bool, Position),
{
    fn spawn_damage_number(&mut self, amount: i32, critical: bool, position: Position) {
        self(amount, critical, position)
    }
}

/// Collaborator deciding whether two entities are on the same side
///
/// Attacks between same-faction entities are discarded.
pub trait FactionRule {
    fn same_faction(&self, a: &Entity, b: &Entity) -> bool;
}

impl<F> FactionRule for F
where
    F: Fn(&Entity, &Entity) -> bool,
{
    fn same_faction(&self, a: &Entity, b: &Entity) -> bool {
        self(a, b)
    }
}

/// Equal factions are friendly, except `Neutral`, which hits and is hit by all
#[derive(Debug, Clone, Copy, Default)]
pub struct SameFaction;

impl FactionRule for SameFaction {
    fn same_faction(&self, a: &Entity, b: &Entity) -> bool {
        a.faction == b.faction && a.faction != Faction::Neutral
    }
}

/// Entity store plus the collaborators the damage chain talks to
pub struct Arena {
    pub(crate) entities: BTreeMap<EntityId, Entity>,
    next_id: u64,
    pub(crate) rng: Box<dyn RngCore>,
    display: Option<Box<dyn DamageDisplay>>,
    pub(crate) faction_rule: Box<dyn FactionRule>,
    ticks: u64,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

impl Arena {
    /// Arena with an entropy-seeded random source
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Arena whose crit rolls are reproducible from `seed`
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: impl RngCore + 'static) -> Self {
        Arena {
            entities: BTreeMap::new(),
            next_id: 1,
            rng: Box::new(rng),
            display: None,
            faction_rule: Box::new(SameFaction),
            ticks: 0,
        }
    }

    pub fn with_display(mut self, display: impl DamageDisplay + 'static) -> Self {
        self.display = Some(Box::new(display));
        self
    }

    pub fn with_faction_rule(mut self, rule: impl FactionRule + 'static) -> Self {
        self.faction_rule = Box::new(rule);
        self
    }

    /// Number of completed [`Arena::tick`] calls
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    // === Entities ===

    pub fn spawn(&mut self, name: impl Into<String>, faction: Faction, stats: StatBlock) -> EntityId {
        self.spawn_at(name, faction, stats, Position::default())
    }

    pub fn spawn_at(
        &mut self,
        name: impl Into<String>,
        faction: Faction,
        stats: StatBlock,
        position: Position,
    ) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;

        let mut entity = Entity::new(id, name, faction, stats);
        entity.position = position;
        debug!(entity = %id, name = %entity.name, ?faction, "spawned");
        self.entities.insert(id, entity);
        id
    }

    /// Remove an entity, releasing every buff still attached to it
    ///
    /// Buffs see `on_remove` after the entity is gone, so they drop their
    /// per-target state without touching any stat block.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let mut entity = self.entities.remove(&id)?;
        let names: Vec<String> = entity
            .stats()
            .buffs()
            .stable()
            .iter()
            .chain(entity.stats().buffs().volatile())
            .map(|buff| buff.name().to_string())
            .collect();

        for name in names {
            if let Some(buff) = entity.detach_buff(&name) {
                buff.on_remove(self, id);
            }
        }
        debug!(entity = %id, "despawned");
        Some(entity)
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn stats(&self, id: EntityId) -> Option<&StatBlock> {
        self.entities.get(&id).map(Entity::stats)
    }

    pub fn stats_mut(&mut self, id: EntityId) -> Option<&mut StatBlock> {
        self.entities.get_mut(&id).map(Entity::stats_mut)
    }

    /// Stats of `id` with every volatile buff baked in
    pub fn snapshot(&self, id: EntityId) -> Option<StatBlock> {
        self.stats(id).map(StatBlock::snapshot)
    }

    // === Listeners ===

    pub fn register_listener(&mut self, id: EntityId, listener: Rc<dyn Listener>) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) => entity.register_listener(listener),
            None => {
                warn!(entity = %id, listener = listener.name(), "listener registered on missing entity");
                false
            }
        }
    }

    pub fn remove_listener(&mut self, id: EntityId, listener: &Rc<dyn Listener>) -> bool {
        self.entities
            .get_mut(&id)
            .is_some_and(|entity| entity.remove_listener(listener))
    }

    // === Buffs ===

    /// Register `buff` on `id`
    ///
    /// The buff decides whether this is a fresh attachment or a refresh of
    /// state it already tracks. Returns false if the entity is missing or a
    /// different buff with the same name is already attached.
    pub fn register_buff(&mut self, id: EntityId, buff: Rc<dyn Buff>, args: BuffArgs) -> bool {
        let Some(entity) = self.entities.get(&id) else {
            warn!(entity = %id, buff = buff.name(), "buff registered on missing entity");
            return false;
        };
        if let Some(existing) = entity.stats().buffs().get(buff.name()) {
            if !same_buff(existing, &buff) {
                warn!(entity = %id, buff = buff.name(), "buff name already taken");
                return false;
            }
        }

        match buff.on_register(self, id, &args) {
            Registration::Merged => true,
            Registration::Attach => {
                let attached = self
                    .entities
                    .get_mut(&id)
                    .is_some_and(|entity| entity.attach_buff(buff.clone()));
                if attached {
                    debug!(entity = %id, buff = buff.name(), source = ?args.source, "buff attached");
                }
                attached
            }
        }
    }

    /// Detach `name` from `id` and let the buff release its state
    ///
    /// Idempotent: returns false when nothing was attached.
    pub fn remove_buff(&mut self, id: EntityId, name: &str) -> bool {
        let Some(buff) = self
            .entities
            .get_mut(&id)
            .and_then(|entity| entity.detach_buff(name))
        else {
            return false;
        };
        debug!(entity = %id, buff = name, "buff detached");
        buff.on_remove(self, id);
        true
    }

    // === Dispatch ===

    /// Deliver `event` to every listener of `id`, in registration order
    pub fn notify(&mut self, id: EntityId, event: &Event) {
        let Some(subscribers) = self.entities.get(&id).map(Entity::subscribers) else {
            return;
        };
        for subscriber in subscribers {
            subscriber.on_event(self, id, event);
        }
    }

    /// Advance every entity by `delta` seconds
    pub fn tick(&mut self, delta: f32) {
        let ids: Vec<EntityId> = self.entities.keys().copied().collect();
        for id in ids {
            self.tick_entity(id, delta);
        }
        self.ticks += 1;
    }

    /// Advance one entity's listeners by `delta` seconds
    pub fn tick_entity(&mut self, id: EntityId, delta: f32) {
        let Some(subscribers) = self.entities.get(&id).map(Entity::subscribers) else {
            return;
        };
        for subscriber in subscribers {
            // A listener may despawn its own owner
            if !self.entities.contains_key(&id) {
                break;
            }
            subscriber.on_tick(self, id, delta);
        }
    }

    /// Hand a damage number for `target` to the display collaborator
    pub(crate) fn display_damage(&mut self, amount: i32, critical: bool, target: EntityId) {
        let position = self
            .entities
            .get(&target)
            .map(|entity| entity.position)
            .unwrap_or_default();
        if let Some(display) = self.display.as_mut() {
            display.spawn_damage_number(amount, critical, position);
        }
    }
}

fn same_buff(a: &Rc<dyn Buff>, b: &Rc<dyn Buff>) -> bool {
    Rc::as_ptr(a) as *const () == Rc::as_ptr(b) as *const ()
}

impl fmt::Debug for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arena")
            .field("entities", &self.entities)
            .field("next_id", &self.next_id)
            .field("has_display", &self.display.is_some())
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buff::{Modifier, ModifierSet, TimedBuff};
    use crate::event::CallbackListener;
    use std::cell::RefCell;

    fn arena() -> Arena {
        Arena::seeded(7)
    }

    fn rage(stable: bool) -> Rc<TimedBuff> {
        Rc::new(TimedBuff::new(
            ModifierSet::new("rage", stable).with(Modifier::AttackFlat { amount: 5 }),
            3.0,
        ))
    }

    #[test]
    fn test_spawn_assigns_increasing_ids() {
        let mut arena = arena();
        let a = arena.spawn("a", Faction::Player, StatBlock::default());
        let b = arena.spawn("b", Faction::Hostile, StatBlock::default());
        assert!(a < b);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.stats(b).map(|s| s.id), Some(b));
    }

    #[test]
    fn test_same_faction_rule() {
        let rule = SameFaction;
        let player = Entity::new(EntityId(1), "p", Faction::Player, StatBlock::default());
        let ally = Entity::new(EntityId(2), "p2", Faction::Player, StatBlock::default());
        let neutral_a = Entity::new(EntityId(3), "n", Faction::Neutral, StatBlock::default());
        let neutral_b = Entity::new(EntityId(4), "n2", Faction::Neutral, StatBlock::default());

        assert!(rule.same_faction(&player, &ally));
        assert!(!rule.same_faction(&player, &neutral_a));
        assert!(!rule.same_faction(&neutral_a, &neutral_b));
    }

    #[test]
    fn test_register_buff_on_missing_entity() {
        let mut arena = arena();
        let buff = rage(true);
        assert!(!arena.register_buff(EntityId(99), buff.clone(), BuffArgs::default()));
        assert!(!buff.is_tracking(EntityId(99)));
    }

    #[test]
    fn test_stable_buff_register_and_remove() {
        let mut arena = arena();
        let hero = arena.spawn("hero", Faction::Player, StatBlock::new(100, 10, 0));
        let buff = rage(true);

        assert!(arena.register_buff(hero, buff.clone(), BuffArgs::default()));
        assert_eq!(arena.stats(hero).map(|s| s.derived_attack()), Some(15));
        assert_eq!(arena.entity(hero).map(|e| e.listeners().len()), Some(1));

        // Refresh does not stack a second time
        assert!(arena.register_buff(hero, buff.clone(), BuffArgs::default()));
        assert_eq!(arena.stats(hero).map(|s| s.derived_attack()), Some(15));

        assert!(arena.remove_buff(hero, "rage"));
        assert!(!arena.remove_buff(hero, "rage"));
        assert_eq!(arena.stats(hero).map(|s| s.derived_attack()), Some(10));
        assert!(!buff.is_tracking(hero));
        assert_eq!(arena.entity(hero).map(|e| e.listeners().len()), Some(0));
    }

    #[test]
    fn test_name_collision_rejected() {
        let mut arena = arena();
        let hero = arena.spawn("hero", Faction::Player, StatBlock::new(100, 10, 0));
        assert!(arena.register_buff(hero, rage(true), BuffArgs::default()));

        let imposter = rage(true);
        assert!(!arena.register_buff(hero, imposter.clone(), BuffArgs::default()));
        assert!(!imposter.is_tracking(hero));
        assert_eq!(arena.stats(hero).map(|s| s.derived_attack()), Some(15));
    }

    #[test]
    fn test_despawn_releases_buffs() {
        let mut arena = arena();
        let hero = arena.spawn("hero", Faction::Player, StatBlock::default());
        let buff = rage(false);
        arena.register_buff(hero, buff.clone(), BuffArgs::default());

        let entity = arena.despawn(hero);
        assert!(entity.is_some());
        assert!(!buff.is_tracking(hero));
        assert!(arena.despawn(hero).is_none());
    }

    #[test]
    fn test_notify_copy_on_iterate() {
        let mut arena = arena();
        let hero = arena.spawn("hero", Faction::Player, StatBlock::default());
        let calls = Rc::new(RefCell::new(Vec::new()));

        let log = calls.clone();
        let late: Rc<dyn Listener> = Rc::new(CallbackListener::new("late").with_event_handler(
            move |_, _, _| log.borrow_mut().push("late"),
        ));
        let log = calls.clone();
        let late_handle = late.clone();
        let adder: Rc<dyn Listener> = Rc::new(CallbackListener::new("adder").with_event_handler(
            move |arena, owner, _| {
                log.borrow_mut().push("adder");
                arena.register_listener(owner, late_handle.clone());
            },
        ));
        arena.register_listener(hero, adder);

        let event = Event::EntityDied(crate::event::EntityDied {
            entity: hero,
            attacker: hero,
        });
        arena.notify(hero, &event);
        assert_eq!(*calls.borrow(), vec!["adder"]);

        arena.notify(hero, &event);
        assert_eq!(*calls.borrow(), vec!["adder", "adder", "late"]);
    }

    #[test]
    fn test_tick_counts_and_skips_despawned() {
        let mut arena = arena();
        let a = arena.spawn("a", Faction::Hostile, StatBlock::default());
        let b = arena.spawn("b", Faction::Hostile, StatBlock::default());
        let ticked = Rc::new(RefCell::new(Vec::new()));

        let log = ticked.clone();
        let killer: Rc<dyn Listener> = Rc::new(CallbackListener::new("killer").with_tick_handler(
            move |arena, owner, _| {
                log.borrow_mut().push(owner);
                arena.despawn(b);
            },
        ));
        let log = ticked.clone();
        let witness: Rc<dyn Listener> = Rc::new(
            CallbackListener::new("witness")
                .with_tick_handler(move |_, owner, _| log.borrow_mut().push(owner)),
        );
        arena.register_listener(a, killer);
        arena.register_listener(b, witness);

        arena.tick(0.1);
        assert_eq!(*ticked.borrow(), vec![a]);
        assert_eq!(arena.ticks(), 1);
    }

    #[test]
    fn test_display_closure_receives_position() {
        let shown = Rc::new(RefCell::new(Vec::new()));
        let log = shown.clone();
        let mut arena = arena().with_display(move |amount: i32, critical: bool, position: Position| {
            log.borrow_mut().push((amount, critical, position.x));
        });
        let dummy = arena.spawn_at("dummy", Faction::Hostile, StatBlock::default(), Position::new(3.0, 4.0));

        arena.display_damage(12, true, dummy);
        assert_eq!(*shown.borrow(), vec![(12, true, 3.0)]);
    }
}
