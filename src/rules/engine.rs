//! Rules engine trait.
//!
//! The host drives a game through `RulesEngine`:
//! - What actions are legal for a player
//! - How an action transforms the state
//! - Whether the game is over
//!
//! `game::Game` is the implementation.

use serde::{Deserialize, Serialize};

use crate::core::{Action, EngineError, GameConfig, GameState, PlayerColor};

/// Result of a completed game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameResult {
    /// Single winner.
    Winner(PlayerColor),
    /// Both kernels fell together, or resolution was aborted.
    Draw,
    /// Ended by the host without a result.
    Aborted,
}

impl GameResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerColor) -> bool {
        matches!(self, GameResult::Winner(p) if *p == player)
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `apply_action` must be a pure function of (state, player, action):
///   replaying the same actions from the same start yields the same state
/// - Illegal actions are not errors; they leave a status message for the
///   player. `Err` is reserved for broken game data
/// - `legal_actions` returns empty when the player can't act
pub trait RulesEngine {
    /// Get the game configuration.
    fn config(&self) -> &GameConfig;

    /// Every action `player` could legally take right now.
    fn legal_actions(&self, state: &GameState, player: PlayerColor) -> Vec<Action>;

    /// Apply an action to the game state.
    ///
    /// On `Err` the state is left exactly as it was.
    fn apply_action(&self, state: &mut GameState, player: PlayerColor, action: &Action) -> Result<(), EngineError>;

    /// Check if the game is over.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        state.winner
    }
}
