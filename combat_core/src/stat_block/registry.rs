//! BuffRegistry - the stable/volatile partition of buffs attached to a StatBlock

use crate::buff::Buff;
use std::fmt;
use std::rc::Rc;

/// Active buffs on one stat block
///
/// Stable buffs mutated the live block once when they were attached; volatile
/// buffs are replayed onto every snapshot. Which list a buff lands in is
/// decided by `is_stable()` at registration and never re-evaluated.
#[derive(Clone, Default)]
pub struct BuffRegistry {
    stable: Vec<Rc<dyn Buff>>,
    volatile: Vec<Rc<dyn Buff>>,
}

impl BuffRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a buff to its partition
    ///
    /// Returns false (and changes nothing) if a buff with the same name is
    /// already registered.
    pub fn register(&mut self, buff: Rc<dyn Buff>) -> bool {
        if self.contains(buff.name()) {
            return false;
        }
        if buff.is_stable() {
            self.stable.push(buff);
        } else {
            self.volatile.push(buff);
        }
        true
    }

    /// Remove a buff by name from whichever partition holds it
    pub fn remove(&mut self, name: &str) -> Option<Rc<dyn Buff>> {
        for list in [&mut self.stable, &mut self.volatile] {
            if let Some(pos) = list.iter().position(|b| b.name() == name) {
                return Some(list.remove(pos));
            }
        }
        None
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Rc<dyn Buff>> {
        self.stable
            .iter()
            .chain(self.volatile.iter())
            .find(|b| b.name() == name)
    }

    /// Stable buffs in registration order
    pub fn stable(&self) -> &[Rc<dyn Buff>] {
        &self.stable
    }

    /// Volatile buffs in registration order
    pub fn volatile(&self) -> &[Rc<dyn Buff>] {
        &self.volatile
    }

    pub fn has_volatile(&self) -> bool {
        !self.volatile.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stable.len() + self.volatile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stable.is_empty() && self.volatile.is_empty()
    }
}

impl fmt::Debug for BuffRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |list: &[Rc<dyn Buff>]| list.iter().map(|b| b.name().to_string()).collect::<Vec<_>>();
        f.debug_struct("BuffRegistry")
            .field("stable", &names(&self.stable))
            .field("volatile", &names(&self.volatile))
            .finish()
    }
}
