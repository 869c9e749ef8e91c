//! Game configuration types.
//!
//! - `GameConfig`: rules constants shared by every game played with a `Game`
//!   (board size, kernel placement, energy and hand limits, resolution bounds)
//! - `GameOptions`: per-match switches carried in the game-start payload
//! - `GameFormat`: which card pool the match was set up with (metadata only)

use serde::{Deserialize, Serialize};

use super::PlayerColor;
use crate::board::HexId;

/// Rules constants for the engine.
///
/// ## Example
///
/// ```
/// use hexbots::core::GameConfig;
///
/// let config = GameConfig::default().with_max_execution_depth(8);
/// assert_eq!(config.board_radius, 3);
/// assert_eq!(config.max_execution_depth, 8);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board radius in hexes (3 gives the 37-hex board).
    pub board_radius: i32,
    /// Where each player's kernel starts.
    pub kernel_hexes: crate::core::PlayerMap<HexId>,
    /// Kernel starting health.
    pub kernel_health: i32,
    /// Cards each player draws before the first turn.
    pub starting_hand_size: usize,
    /// Cards beyond this are burned straight to the discard pile.
    pub max_hand_size: usize,
    /// Cap on a player's total energy.
    pub max_energy: i32,
    /// Robots must be placed within this distance of their kernel.
    pub robot_placement_range: i32,
    /// Structures must be placed within this distance of a friendly object.
    pub structure_placement_range: i32,
    /// Trigger nesting beyond this depth is treated as an infinite loop.
    pub max_execution_depth: u32,
    /// Trigger executions allowed while resolving a single action.
    pub max_trigger_steps: u32,
    /// Overlay passes allowed before the overlay gives up on reaching a fixpoint.
    pub max_overlay_passes: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_radius: 3,
            kernel_hexes: crate::core::PlayerMap::new(|player| match player {
                PlayerColor::Orange => HexId::new(3, 0),
                PlayerColor::Blue => HexId::new(-3, 0),
            }),
            kernel_health: 20,
            starting_hand_size: 2,
            max_hand_size: 7,
            max_energy: 10,
            robot_placement_range: 1,
            structure_placement_range: 1,
            max_execution_depth: 32,
            max_trigger_steps: 10_000,
            max_overlay_passes: 8,
        }
    }
}

impl GameConfig {
    /// Set the board radius.
    #[must_use]
    pub fn with_board_radius(mut self, radius: i32) -> Self {
        self.board_radius = radius;
        self
    }

    /// Set the kernel starting health.
    #[must_use]
    pub fn with_kernel_health(mut self, health: i32) -> Self {
        self.kernel_health = health;
        self
    }

    /// Set the opening hand size.
    #[must_use]
    pub fn with_starting_hand_size(mut self, size: usize) -> Self {
        self.starting_hand_size = size;
        self
    }

    /// Set the hand size cap.
    #[must_use]
    pub fn with_max_hand_size(mut self, size: usize) -> Self {
        self.max_hand_size = size;
        self
    }

    /// Set the trigger nesting bound.
    #[must_use]
    pub fn with_max_execution_depth(mut self, depth: u32) -> Self {
        self.max_execution_depth = depth;
        self
    }

    /// Set the per-action trigger budget.
    #[must_use]
    pub fn with_max_trigger_steps(mut self, steps: u32) -> Self {
        self.max_trigger_steps = steps;
        self
    }

    /// Whether a hex lies on the board.
    #[must_use]
    pub fn on_board(&self, hex: HexId) -> bool {
        hex.distance(HexId::ORIGIN) <= self.board_radius
    }
}

/// Per-match options from the game-start payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameOptions {
    /// Shuffle both decks with the game seed before dealing.
    pub shuffle_decks: bool,
    /// Who takes the first turn.
    pub starting_player: PlayerColor,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            shuffle_decks: true,
            starting_player: PlayerColor::Orange,
        }
    }
}

/// How decks were assembled for the match. Recorded, not interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GameFormat {
    #[default]
    Normal,
    BuiltinOnly,
    SharedDeck,
    Practice,
    Tutorial,
}
