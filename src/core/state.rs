//! Game state: the single root value the reducer transforms.
//!
//! ## GameState
//!
//! - Per-player state (energy, hand, deck, discard, selection, status)
//! - The board: `OrdMap<HexId, Box<Object>>`, iterated in board scan order
//! - Turn owner, turn number and the result once the game ends
//! - Seeded RNG, id counter, saved values
//! - The target-choice protocol (`pending_choice`, `choice_tape`)
//! - Trigger work queue and execution depth (transient, empty between actions)
//! - Game log and action history
//!
//! Uses `im` persistent structures so a clone is O(1): every action is
//! resolved on a clone and only committed if it is accepted.

use std::hash::Hasher;

use im::{OrdMap, Vector};
use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use super::action::{Action, ActionRecord};
use super::config::GameFormat;
use super::error::EngineError;
use super::object::Object;
use super::player::{PlayerColor, PlayerMap};
use super::rng::GameRng;
use super::{CardId, ObjectId};
use crate::board::HexId;
use crate::cards::{CardInGame, CardType};
use crate::effects::TargetSet;
use crate::rules::GameResult;
use crate::stack::QueuedTrigger;

/// A player's energy pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Energy {
    pub available: i32,
    pub total: i32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusKind {
    Error,
    Info,
}

/// A user-facing message for one player.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub message: String,
}

impl StatusMessage {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            message: message.into(),
        }
    }
}

/// Everything one player owns off the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub color: PlayerColor,
    pub energy: Energy,
    pub hand: Vector<CardInGame>,
    pub deck: Vector<CardInGame>,
    pub discard: Vector<CardInGame>,
    pub selected_card: Option<usize>,
    pub selected_tile: Option<HexId>,
    pub status: Option<StatusMessage>,
}

impl PlayerState {
    #[must_use]
    pub fn new(color: PlayerColor) -> Self {
        Self {
            color,
            energy: Energy::default(),
            hand: Vector::new(),
            deck: Vector::new(),
            discard: Vector::new(),
            selected_card: None,
            selected_tile: None,
            status: None,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_card = None;
        self.selected_tile = None;
    }
}

/// A line in the game log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub turn: u32,
    pub player: Option<PlayerColor>,
    pub text: String,
}

/// An answer to a target choice.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Choice {
    Tile(HexId),
    HandCard(CardId),
    DiscardCard(CardId),
}

/// What the interpreter is waiting for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceRequest {
    pub chooser: PlayerColor,
    /// Every acceptable answer.
    pub options: Vec<Choice>,
}

/// An action suspended on a target choice.
///
/// Answering re-runs `action` from the pre-action state with `answers`
/// replayed in order, so the interpreter resumes exactly where it stopped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PendingChoice {
    pub actor: PlayerColor,
    pub action: Action,
    pub answers: Vector<Choice>,
    pub request: ChoiceRequest,
}

/// Recorded answers consumed by `Target::Choose` during one resolution.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceTape {
    answers: Vector<Choice>,
    cursor: usize,
}

impl ChoiceTape {
    #[must_use]
    pub fn new(answers: Vector<Choice>) -> Self {
        Self { answers, cursor: 0 }
    }

    /// Take the next recorded answer, if any.
    pub fn next_answer(&mut self) -> Option<Choice> {
        let answer = self.answers.get(self.cursor).copied();
        if answer.is_some() {
            self.cursor += 1;
        }
        answer
    }
}

/// A request for the host to recompile a card from new text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRequest {
    pub id: u32,
    pub player: PlayerColor,
    pub card: CardId,
    pub text: String,
}

/// Presentational attack sequencing for the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackAnimation {
    pub from: HexId,
    pub to: HexId,
    pub retracting: bool,
}

/// A value stored by `Save`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SavedValue {
    Targets(TargetSet),
    Number(i32),
}

/// Which pile a card sits in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardZone {
    Hand,
    Deck,
    Discard,
}

/// Where a card was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardLocation {
    pub player: PlayerColor,
    pub zone: CardZone,
    pub index: usize,
}

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    // === Lifecycle ===
    pub started: bool,
    pub format: GameFormat,
    /// Seat of the local player, if this copy belongs to a client.
    pub viewer: Option<PlayerColor>,
    pub usernames: PlayerMap<String>,
    pub winner: Option<GameResult>,

    // === Game Progression ===
    pub current_turn: PlayerColor,
    /// Turn number (starts at 1).
    pub turn_number: u32,
    pub players: PlayerMap<PlayerState>,
    /// Objects are boxed: `im` keeps values inline in its B-tree nodes.
    pub board: OrdMap<HexId, Box<Object>>,

    // === Determinism ===
    pub rng: GameRng,
    pub next_id: u32,
    pub memory: OrdMap<String, SavedValue>,

    // === Multi-action protocols ===
    pub pending_choice: Option<PendingChoice>,
    pub pending_rewrites: Vector<RewriteRequest>,
    pub attack: Option<AttackAnimation>,

    // === Resolution (transient) ===
    pub choice_tape: ChoiceTape,
    pub trigger_queue: Vector<QueuedTrigger>,
    pub execution_depth: u32,
    pub trigger_steps: u32,

    // === History ===
    pub log: Vector<LogEntry>,
    pub action_history: Vector<ActionRecord>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(0)
    }
}

impl GameState {
    /// An empty, not-yet-started state.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            started: false,
            format: GameFormat::default(),
            viewer: None,
            usernames: PlayerMap::with_default(),
            winner: None,
            current_turn: PlayerColor::Orange,
            turn_number: 1,
            players: PlayerMap::new(PlayerState::new),
            board: OrdMap::new(),
            rng: GameRng::new(seed),
            next_id: 1,
            memory: OrdMap::new(),
            pending_choice: None,
            pending_rewrites: Vector::new(),
            attack: None,
            choice_tape: ChoiceTape::default(),
            trigger_queue: Vector::new(),
            execution_depth: 0,
            trigger_steps: 0,
            log: Vector::new(),
            action_history: Vector::new(),
        }
    }

    /// Started and not yet decided.
    #[must_use]
    pub fn in_progress(&self) -> bool {
        self.started && self.winner.is_none()
    }

    /// Allocate a fresh id for an object, card, ability or request.
    pub fn alloc_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // === Board lookups ===

    #[must_use]
    pub fn object_at(&self, hex: HexId) -> Option<&Object> {
        self.board.get(&hex).map(|o| &**o)
    }

    pub fn object_at_mut(&mut self, hex: HexId) -> Option<&mut Object> {
        self.board.get_mut(&hex).map(|o| &mut **o)
    }

    /// Put an object on a hex, replacing whatever was there.
    pub fn insert_object(&mut self, hex: HexId, object: Object) {
        self.board.insert(hex, Box::new(object));
    }

    /// Take the object off a hex.
    pub fn take_object(&mut self, hex: HexId) -> Option<Object> {
        self.board.remove(&hex).map(|o| *o)
    }

    /// Locate an object by id. O(board size).
    #[must_use]
    pub fn find_object(&self, id: ObjectId) -> Option<(HexId, &Object)> {
        self.objects().find(|(_, o)| o.id == id)
    }

    #[must_use]
    pub fn hex_of(&self, id: ObjectId) -> Option<HexId> {
        self.find_object(id).map(|(hex, _)| hex)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
        let hex = self.hex_of(id)?;
        self.object_at_mut(hex)
    }

    /// Objects in board scan order.
    pub fn objects(&self) -> impl Iterator<Item = (HexId, &Object)> {
        self.board.iter().map(|(hex, o)| (*hex, &**o))
    }

    #[must_use]
    pub fn kernel_hex(&self, player: PlayerColor) -> Option<HexId> {
        self.objects()
            .find(|(_, o)| o.owner == player && o.card_type() == CardType::Kernel)
            .map(|(hex, _)| hex)
    }

    // === Card lookups ===

    /// Locate a card in any hand, deck or discard pile.
    #[must_use]
    pub fn find_card(&self, id: CardId) -> Option<CardLocation> {
        for (player, ps) in self.players.iter() {
            for (zone, pile) in [(CardZone::Hand, &ps.hand), (CardZone::Deck, &ps.deck), (CardZone::Discard, &ps.discard)] {
                if let Some(index) = pile.iter().position(|c| c.id == id) {
                    return Some(CardLocation { player, zone, index });
                }
            }
        }
        None
    }

    pub fn card_mut(&mut self, location: CardLocation) -> Option<&mut CardInGame> {
        let ps = &mut self.players[location.player];
        let pile = match location.zone {
            CardZone::Hand => &mut ps.hand,
            CardZone::Deck => &mut ps.deck,
            CardZone::Discard => &mut ps.discard,
        };
        pile.get_mut(location.index)
    }

    // === History ===

    /// Append a line to the game log.
    pub fn log_event(&mut self, player: Option<PlayerColor>, text: impl Into<String>) {
        let entry = LogEntry {
            turn: self.turn_number,
            player,
            text: text.into(),
        };
        self.log.push_back(entry);
    }

    /// Append an action to the history.
    pub fn record_action(&mut self, player: PlayerColor, action: Action) {
        let record = ActionRecord::new(player, action, self.turn_number, self.action_history.len() as u32);
        self.action_history.push_back(record);
    }

    /// A 64-bit hash of the canonical byte encoding of the whole state.
    ///
    /// Two states have equal fingerprints iff they serialize identically.
    pub fn fingerprint(&self) -> Result<u64, EngineError> {
        let bytes = bincode::serialize(self).map_err(|e| EngineError::Serialization(e.to_string()))?;
        let mut hasher = FxHasher::default();
        hasher.write(&bytes);
        Ok(hasher.finish())
    }
}
