//! Core engine types: ids, players, state, actions, RNG, configuration, errors.

pub mod action;
pub mod config;
pub mod entity;
pub mod error;
pub mod object;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, ActionRecord, GameStart, RevealedCard};
pub use config::{GameConfig, GameFormat, GameOptions};
pub use entity::{AbilityId, CardId, ObjectId};
pub use error::{EngineError, ExecutionError, IllegalAction};
pub use object::{AbilityInstance, Object, StatusGrant};
pub use player::{PlayerColor, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use state::{
    AttackAnimation, CardLocation, CardZone, Choice, ChoiceRequest, ChoiceTape, Energy, GameState, LogEntry,
    PendingChoice, PlayerState, RewriteRequest, SavedValue, StatusKind, StatusMessage,
};
