//! CallbackListener - closure-backed listener for collaborators

use super::{Event, Listener};
use crate::arena::Arena;
use crate::types::EntityId;
use std::fmt;

type EventHandler = Box<dyn Fn(&mut Arena, EntityId, &Event)>;
type TickHandler = Box<dyn Fn(&mut Arena, EntityId, f32)>;

/// Listener built from closures
///
/// Handy for subsystems that only need a reaction (energy charge, on-hit
/// triggers, death handling) without a dedicated type.
pub struct CallbackListener {
    name: String,
    event_handler: Option<EventHandler>,
    tick_handler: Option<TickHandler>,
}

impl CallbackListener {
    pub fn new(name: impl Into<String>) -> Self {
        CallbackListener {
            name: name.into(),
            event_handler: None,
            tick_handler: None,
        }
    }

    pub fn with_event_handler(mut self, handler: impl Fn(&mut Arena, EntityId, &Event) + 'static) -> Self {
        self.event_handler = Some(Box::new(handler));
        self
    }

    pub fn with_tick_handler(mut self, handler: impl Fn(&mut Arena, EntityId, f32) + 'static) -> Self {
        self.tick_handler = Some(Box::new(handler));
        self
    }
}

impl Listener for CallbackListener {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_tick(&self, arena: &mut Arena, owner: EntityId, delta: f32) {
        if let Some(handler) = &self.tick_handler {
            handler(arena, owner, delta);
        }
    }

    fn on_event(&self, arena: &mut Arena, owner: EntityId, event: &Event) {
        if let Some(handler) = &self.event_handler {
            handler(arena, owner, event);
        }
    }
}

impl fmt::Debug for CallbackListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackListener")
            .field("name", &self.name)
            .field("on_event", &self.event_handler.is_some())
            .field("on_tick", &self.tick_handler.is_some())
            .finish()
    }
}
