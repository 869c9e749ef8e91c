//! Trigger system.
//!
//! - [`GameEvent`]: something that happened, with its participants
//! - [`TriggerSpec`]: which events a triggered ability listens for
//! - [`collect_triggers`]: match an event against the board
//!
//! Matched triggers are not run here. They are appended to the state's
//! trigger queue and executed by `stack::settle`.

mod condition;
mod event;
mod registry;

pub use condition::{TriggerSpec, TriggerSubject};
pub use event::{EventCause, EventKind, GameEvent};
pub use registry::collect_triggers;
