//! Trigger queue and resolution.
//!
//! Events fired during an action append their matching triggers to the back
//! of `GameState::trigger_queue`. `settle` then drains the queue front to
//! back, interleaving passive recomputation, dead-object cleanup and victory
//! checks between triggers, until the board is quiescent.
//!
//! ## Ordering
//!
//! - Triggers from one event run in board scan order, then binding order
//! - Triggers fired while a trigger runs go to the back of the queue
//! - Each trigger remembers its nesting depth; exceeding
//!   `GameConfig::max_execution_depth` (or `max_trigger_steps` overall) ends
//!   the game in a draw rather than looping forever

mod immediate;

pub use immediate::settle;

use serde::{Deserialize, Serialize};

use crate::core::{AbilityId, GameState, ObjectId};
use crate::effects::{Command, ExecutionContext};
use crate::triggers::{collect_triggers, GameEvent};

/// A matched trigger waiting to run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedTrigger {
    pub ability: AbilityId,
    /// Object carrying the ability when the event fired.
    pub owner: ObjectId,
    pub command: Command,
    pub context: ExecutionContext,
}

/// Queue every trigger that responds to `event`.
pub fn fire(state: &mut GameState, event: GameEvent) {
    let depth = state.execution_depth + 1;
    let triggers = collect_triggers(state, &event, depth);
    if !triggers.is_empty() {
        tracing::debug!(kind = ?event.kind, count = triggers.len(), depth, "triggers queued");
    }
    state.trigger_queue.extend(triggers);
}
