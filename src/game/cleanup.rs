//! State-based checks run between resolution steps.

use crate::cards::CardType;
use crate::core::{GameState, PlayerColor};
use crate::rules::GameResult;
use crate::stack::fire;
use crate::triggers::{EventKind, GameEvent};

use super::ops;

/// Remove every dead object. Returns whether anything was removed.
///
/// `AfterDestroyed` is fired while the object is still on the board, so its
/// own "when this is destroyed" triggers are queued.
pub(crate) fn remove_dead(state: &mut GameState) -> bool {
    let dead: Vec<_> = state
        .objects()
        .filter(|(_, o)| o.is_dead())
        .map(|(hex, o)| (hex, o.id, o.card_type(), o.owner))
        .collect();
    if dead.is_empty() {
        return false;
    }
    for &(_, id, card_type, owner) in &dead {
        fire(state, GameEvent::for_object(EventKind::AfterDestroyed, id, card_type, owner));
    }
    for (hex, _, _, owner) in dead {
        if let Some(object) = ops::remove_object(state, hex) {
            tracing::debug!(object = %object.id, %hex, "destroyed");
            state.log_event(Some(owner), format!("{} was destroyed", object.name()));
        }
    }
    true
}

/// Decide the game if a kernel is gone. Returns whether the game ended.
pub(crate) fn check_victory(state: &mut GameState) -> bool {
    if state.winner.is_some() || !state.started {
        return false;
    }
    let has_kernel = |player: PlayerColor| {
        state
            .objects()
            .any(|(_, o)| o.owner == player && o.card_type() == CardType::Kernel)
    };
    let result = match (has_kernel(PlayerColor::Orange), has_kernel(PlayerColor::Blue)) {
        (true, true) => return false,
        (false, false) => GameResult::Draw,
        (true, false) => GameResult::Winner(PlayerColor::Orange),
        (false, true) => GameResult::Winner(PlayerColor::Blue),
    };
    finish(state, result);
    true
}

/// End the game.
pub(crate) fn finish(state: &mut GameState, result: GameResult) {
    tracing::info!(?result, turn = state.turn_number, "game over");
    let text = match result {
        GameResult::Winner(player) => format!("{player} wins"),
        GameResult::Draw => "the game is a draw".to_string(),
        GameResult::Aborted => "the game was aborted".to_string(),
    };
    state.log_event(None, text);
    state.winner = Some(result);
    state.trigger_queue.clear();
}

/// Abandon a runaway resolution as a draw.
pub(crate) fn declare_draw(state: &mut GameState, reason: &str) {
    tracing::warn!(reason, steps = state.trigger_steps, depth = state.execution_depth, "resolution aborted");
    state.log_event(None, format!("{reason}."));
    finish(state, GameResult::Draw);
}
