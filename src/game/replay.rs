//! Replay and synchronisation.
//!
//! The state is a left fold of `apply_action` over the action history, so a
//! spectator, a reconnecting client or a tutorial rewind only needs the
//! starting state and the records. Fingerprints let two peers confirm they
//! hold the same state without shipping it.

use crate::core::{ActionRecord, EngineError, GameState};
use crate::rules::RulesEngine;

/// Why a replay could not be trusted.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("replayed state diverged: expected fingerprint {expected:#018x}, got {actual:#018x}")]
    Diverged { expected: u64, actual: u64 },

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Apply `records` in order to a copy of `initial`.
pub fn replay<G: RulesEngine>(game: &G, initial: &GameState, records: &[ActionRecord]) -> Result<GameState, EngineError> {
    let mut state = initial.clone();
    for record in records {
        game.apply_action(&mut state, record.player, &record.action)?;
    }
    Ok(state)
}

/// Replay only the first `count` records (tutorial rewind).
pub fn replay_prefix<G: RulesEngine>(
    game: &G,
    initial: &GameState,
    records: &[ActionRecord],
    count: usize,
) -> Result<GameState, EngineError> {
    replay(game, initial, &records[..count.min(records.len())])
}

/// Replay and check the result against a peer's fingerprint.
pub fn verify<G: RulesEngine>(
    game: &G,
    initial: &GameState,
    records: &[ActionRecord],
    expected: u64,
) -> Result<GameState, ReplayError> {
    let state = replay(game, initial, records)?;
    let actual = state.fingerprint()?;
    if actual != expected {
        tracing::warn!(expected, actual, records = records.len(), "replay diverged");
        return Err(ReplayError::Diverged { expected, actual });
    }
    Ok(state)
}
