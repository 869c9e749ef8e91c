//! The game itself: setup, the action reducer, and replay.
//!
//! ## Layout
//!
//! - `builder`: `Game` and `Game::start`
//! - `reducer`: `RulesEngine` for `Game`; the transactional action reducer
//! - `turn`, `combat`: per-action rules
//! - `ops`: state mutation primitives that fire events
//! - `cleanup`: deaths and victory
//! - `replay`: history replay and fingerprint verification

mod builder;
pub(crate) mod cleanup;
mod combat;
pub(crate) mod ops;
mod reducer;
pub mod replay;
mod turn;

pub use builder::Game;
pub use replay::{replay, replay_prefix, verify, ReplayError};
