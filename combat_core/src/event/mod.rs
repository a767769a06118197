//! Event bus - listener contract and the events of the damage chain
//!
//! Events know how to propagate themselves: each kind decides which
//! entities' listener lists receive it, and in what order.
//!
//! - [`AttackGiven`]: attacker's listeners, then the target takes the hit
//! - [`DamageApplied`]: damage display, target's listeners, then death check
//! - [`EntityDied`]: the dead entity's listeners, then the attacker's

mod callback;
mod kinds;

pub use callback::CallbackListener;
pub use kinds::{AttackGiven, DamageApplied, EntityDied};

use crate::arena::Arena;
use crate::buff::Buff;
use crate::types::EntityId;
use std::fmt;
use std::rc::Rc;

/// Anything that reacts to events or per-frame ticks on an entity
///
/// Both callbacks receive the arena mutably and may register or remove
/// listeners and buffs (including themselves) while being dispatched.
pub trait Listener {
    fn name(&self) -> &str;

    fn on_tick(&self, _arena: &mut Arena, _owner: EntityId, _delta: f32) {}

    fn on_event(&self, _arena: &mut Arena, _owner: EntityId, _event: &Event) {}
}

/// An event of the damage chain
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    AttackGiven(AttackGiven),
    DamageApplied(DamageApplied),
    EntityDied(EntityDied),
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::AttackGiven(_) => AttackGiven::NAME,
            Event::DamageApplied(_) => DamageApplied::NAME,
            Event::EntityDied(_) => EntityDied::NAME,
        }
    }

    /// Deliver this event along its kind's propagation path
    pub fn propagate(&self, arena: &mut Arena) {
        match self {
            Event::AttackGiven(e) => {
                e.propagate(arena);
            }
            Event::DamageApplied(e) => {
                e.propagate(arena);
            }
            Event::EntityDied(e) => e.propagate(arena),
        }
    }
}

/// Entry in an entity's listener list
#[derive(Clone)]
pub enum Subscriber {
    Listener(Rc<dyn Listener>),
    /// Attached buff; receives ticks and events like any listener
    Buff(Rc<dyn Buff>),
}

impl Subscriber {
    pub fn name(&self) -> &str {
        match self {
            Subscriber::Listener(l) => l.name(),
            Subscriber::Buff(b) => b.name(),
        }
    }

    pub fn on_tick(&self, arena: &mut Arena, owner: EntityId, delta: f32) {
        match self {
            Subscriber::Listener(l) => l.on_tick(arena, owner, delta),
            Subscriber::Buff(b) => b.on_tick(arena, owner, delta),
        }
    }

    pub fn on_event(&self, arena: &mut Arena, owner: EntityId, event: &Event) {
        match self {
            Subscriber::Listener(l) => l.on_event(arena, owner, event),
            Subscriber::Buff(b) => b.on_event(arena, owner, event),
        }
    }

    /// Whether this entry is exactly `listener` (pointer identity)
    pub fn is_listener(&self, listener: &Rc<dyn Listener>) -> bool {
        match self {
            Subscriber::Listener(l) => {
                Rc::as_ptr(l) as *const () == Rc::as_ptr(listener) as *const ()
            }
            Subscriber::Buff(_) => false,
        }
    }

    pub fn is_buff(&self, name: &str) -> bool {
        matches!(self, Subscriber::Buff(b) if b.name() == name)
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subscriber::Listener(l) => f.debug_tuple("Listener").field(&l.name()).finish(),
            Subscriber::Buff(b) => f.debug_tuple("Buff").field(&b.name()).finish(),
        }
    }
}
