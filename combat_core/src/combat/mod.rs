//! Combat resolution - turn attack requests into health changes and events

mod request;
mod resolution;
mod result;

pub use request::DamageRequest;
pub use result::{AttackState, CombatResult};
