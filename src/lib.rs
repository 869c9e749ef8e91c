//! # hexbots
//!
//! A deterministic game-state engine for a two-player card game played on a
//! hex grid, where card abilities are small programs.
//!
//! ## Design Principles
//!
//! 1. **Pure Reducer**: The whole game is a `GameState` value transformed by
//!    `RulesEngine::apply_action`. Same start, same actions, same state.
//!
//! 2. **Transactional Actions**: Every action resolves on an O(1) clone
//!    (`im` persistent structures) and commits whole or not at all.
//!
//! 3. **Abilities as Data**: Card text compiles (elsewhere) to the `Command`
//!    AST in `effects`, which the engine interprets.
//!
//! ## Architecture
//!
//! - **Trigger Queue**: Events append matching triggers to a FIFO in the
//!   state; `stack::settle` drains it with state-based checks in between.
//!
//! - **Passive Overlay**: Passive abilities are reapplied to a fixpoint after
//!   every step instead of being tracked incrementally.
//!
//! - **Suspendable Choices**: A target choice parks the action; answering
//!   re-runs it with the recorded answers.
//!
//! ## Modules
//!
//! - `core`: Ids, players, state, actions, RNG, configuration, errors
//! - `board`: Hex coordinates and board queries
//! - `cards`: Card definitions, instances and stat adjustments
//! - `effects`: Ability AST, interpreter and passive overlay
//! - `triggers`: Events and trigger matching
//! - `stack`: Trigger queue resolution
//! - `rules`: `RulesEngine` trait
//! - `game`: The reducer, setup and replay

pub mod board;
pub mod cards;
pub mod core;
pub mod effects;
pub mod game;
pub mod rules;
pub mod stack;
pub mod triggers;

// Re-export commonly used types
pub use crate::core::{
    AbilityId, Action, ActionRecord, CardId, EngineError, GameConfig, GameStart, GameState, IllegalAction, ObjectId,
    PlayerColor, PlayerMap,
};

pub use crate::board::HexId;

pub use crate::cards::{CardDefinition, CardInGame, CardType};

pub use crate::rules::{GameResult, RulesEngine};

pub use crate::effects::{Ability, Command, Target};

pub use crate::game::{replay, verify, Game, ReplayError};
