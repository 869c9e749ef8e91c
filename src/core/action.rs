//! Actions: the only unit of mutation.
//!
//! On the wire an action is `{ "type": "MOVE_ROBOT", "payload": { ... } }`.
//! The set of types is closed; anything else deserializes to
//! `Action::Unknown`, which the reducer ignores. A payload sent with a type
//! that carries none is ignored too. `type` must precede `payload`.
//!
//! The acting player is not part of the payload. The host tags each action
//! with its sender and hands both to `RulesEngine::apply_action`.

use std::fmt;

use serde::de::value::StrDeserializer;
use serde::de::{
    self, DeserializeSeed, Deserializer, EnumAccess, IgnoredAny, IntoDeserializer, MapAccess, VariantAccess, Visitor,
};
use serde::{forward_to_deserialize_any, Deserialize, Serialize};

use super::config::{GameFormat, GameOptions};
use super::player::{PlayerColor, PlayerMap};
use super::CardId;
use crate::board::HexId;
use crate::cards::CardDefinition;

/// Everything needed to construct a fresh game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStart {
    /// Seat of the local player, for client copies.
    #[serde(default)]
    pub player: Option<PlayerColor>,
    #[serde(default)]
    pub usernames: PlayerMap<String>,
    pub decks: PlayerMap<Vec<CardDefinition>>,
    pub seed: u64,
    #[serde(default)]
    pub format: GameFormat,
    #[serde(default)]
    pub options: GameOptions,
    /// Deal that player's cards face-down (a client's view of its opponent).
    #[serde(default)]
    pub hidden: PlayerMap<bool>,
}

/// A card identity injected by `REVEAL_CARDS`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealedCard {
    pub id: CardId,
    pub card: CardDefinition,
}

/// A player- or system-initiated state transition.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    StartGame(GameStart),

    // === Turn actions ===
    PlaceCard { card: usize, tile: HexId },
    PlayEvent { card: usize },
    MoveRobot { from: HexId, to: HexId },
    Attack { source: HexId, target: HexId },
    MoveRobotAndAttack { from: HexId, to: HexId, target: HexId },
    /// Activate the object at `tile`, or at the selected tile if omitted.
    ActivateObject { ability: usize, tile: Option<HexId> },
    PassTurn,

    // === Presentation ===
    AttackRetract,
    AttackComplete,

    // === Selection and target choice ===
    SetSelectedCard { card: usize },
    SetSelectedCardInDiscardPile { card: CardId },
    SetSelectedTile { tile: HexId },
    Deselect,
    CancelChoice,

    // === Host-injected ===
    RevealCards { cards: Vec<RevealedCard> },
    CompleteRewrite { request: u32, card: CardDefinition },

    // === Game end ===
    Forfeit,
    Abort,

    Unknown,
}

impl Action {
    /// Wire name of the action type.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Action::StartGame(_) => "START_GAME",
            Action::PlaceCard { .. } => "PLACE_CARD",
            Action::PlayEvent { .. } => "PLAY_EVENT",
            Action::MoveRobot { .. } => "MOVE_ROBOT",
            Action::Attack { .. } => "ATTACK",
            Action::MoveRobotAndAttack { .. } => "MOVE_ROBOT_AND_ATTACK",
            Action::ActivateObject { .. } => "ACTIVATE_OBJECT",
            Action::PassTurn => "PASS_TURN",
            Action::AttackRetract => "ATTACK_RETRACT",
            Action::AttackComplete => "ATTACK_COMPLETE",
            Action::SetSelectedCard { .. } => "SET_SELECTED_CARD",
            Action::SetSelectedCardInDiscardPile { .. } => "SET_SELECTED_CARD_IN_DISCARD_PILE",
            Action::SetSelectedTile { .. } => "SET_SELECTED_TILE",
            Action::Deselect => "DESELECT",
            Action::CancelChoice => "CANCEL_CHOICE",
            Action::RevealCards { .. } => "REVEAL_CARDS",
            Action::CompleteRewrite { .. } => "COMPLETE_REWRITE",
            Action::Forfeit => "FORFEIT",
            Action::Abort => "ABORT",
            Action::Unknown => "UNKNOWN",
        }
    }

    /// Whether a pending target choice started from this action may be cancelled.
    #[must_use]
    pub fn is_cancellable(&self) -> bool {
        matches!(
            self,
            Action::PlaceCard { .. } | Action::PlayEvent { .. } | Action::ActivateObject { .. }
        )
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_struct("Action", &["type", "payload"], ActionVisitor)
    }
}

/// Action types whose payload is ignored.
fn unit_action(kind: &str) -> Option<Action> {
    Some(match kind {
        "PASS_TURN" => Action::PassTurn,
        "ATTACK_RETRACT" => Action::AttackRetract,
        "ATTACK_COMPLETE" => Action::AttackComplete,
        "DESELECT" => Action::Deselect,
        "CANCEL_CHOICE" => Action::CancelChoice,
        "FORFEIT" => Action::Forfeit,
        "ABORT" => Action::Abort,
        _ => return None,
    })
}

/// Payload-carrying actions, in the externally tagged form `ActionVisitor`
/// feeds them through.
#[derive(Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum Payload {
    StartGame(GameStart),
    PlaceCard { card: usize, tile: HexId },
    PlayEvent { card: usize },
    MoveRobot { from: HexId, to: HexId },
    Attack { source: HexId, target: HexId },
    MoveRobotAndAttack { from: HexId, to: HexId, target: HexId },
    ActivateObject {
        ability: usize,
        #[serde(default)]
        tile: Option<HexId>,
    },
    SetSelectedCard { card: usize },
    SetSelectedCardInDiscardPile { card: CardId },
    SetSelectedTile { tile: HexId },
    RevealCards { cards: Vec<RevealedCard> },
    CompleteRewrite { request: u32, card: CardDefinition },
}

const PAYLOAD_TYPES: &[&str] = &[
    "START_GAME",
    "PLACE_CARD",
    "PLAY_EVENT",
    "MOVE_ROBOT",
    "ATTACK",
    "MOVE_ROBOT_AND_ATTACK",
    "ACTIVATE_OBJECT",
    "SET_SELECTED_CARD",
    "SET_SELECTED_CARD_IN_DISCARD_PILE",
    "SET_SELECTED_TILE",
    "REVEAL_CARDS",
    "COMPLETE_REWRITE",
];

impl From<Payload> for Action {
    fn from(payload: Payload) -> Self {
        match payload {
            Payload::StartGame(start) => Action::StartGame(start),
            Payload::PlaceCard { card, tile } => Action::PlaceCard { card, tile },
            Payload::PlayEvent { card } => Action::PlayEvent { card },
            Payload::MoveRobot { from, to } => Action::MoveRobot { from, to },
            Payload::Attack { source, target } => Action::Attack { source, target },
            Payload::MoveRobotAndAttack { from, to, target } => Action::MoveRobotAndAttack { from, to, target },
            Payload::ActivateObject { ability, tile } => Action::ActivateObject { ability, tile },
            Payload::SetSelectedCard { card } => Action::SetSelectedCard { card },
            Payload::SetSelectedCardInDiscardPile { card } => Action::SetSelectedCardInDiscardPile { card },
            Payload::SetSelectedTile { tile } => Action::SetSelectedTile { tile },
            Payload::RevealCards { cards } => Action::RevealCards { cards },
            Payload::CompleteRewrite { request, card } => Action::CompleteRewrite { request, card },
        }
    }
}

struct ActionVisitor;

impl<'de> Visitor<'de> for ActionVisitor {
    type Value = Action;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an action object with a `type` and an optional `payload`")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Action, A::Error> {
        let mut kind: Option<String> = None;
        let mut payload: Option<Payload> = None;
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "type" => {
                    if kind.is_some() {
                        return Err(de::Error::duplicate_field("type"));
                    }
                    kind = Some(map.next_value()?);
                }
                "payload" => {
                    let Some(kind) = kind.as_deref() else {
                        return Err(de::Error::custom("`type` must come before `payload`"));
                    };
                    if PAYLOAD_TYPES.contains(&kind) {
                        payload = Some(map.next_value_seed(PayloadSeed { kind })?);
                    } else {
                        map.next_value::<IgnoredAny>()?;
                    }
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        let kind = kind.ok_or_else(|| de::Error::missing_field("type"))?;
        if let Some(action) = unit_action(&kind) {
            return Ok(action);
        }
        if !PAYLOAD_TYPES.contains(&kind.as_str()) {
            return Ok(Action::Unknown);
        }
        payload.map(Action::from).ok_or_else(|| de::Error::missing_field("payload"))
    }
}

/// Deserializes a payload as the `Payload` variant named by `kind`.
struct PayloadSeed<'a> {
    kind: &'a str,
}

impl<'de> DeserializeSeed<'de> for PayloadSeed<'_> {
    type Value = Payload;

    fn deserialize<D: Deserializer<'de>>(self, payload: D) -> Result<Payload, D::Error> {
        Payload::deserialize(Tagged { kind: self.kind, payload })
    }
}

/// Presents `(kind, payload)` as an externally tagged enum.
struct Tagged<'a, D> {
    kind: &'a str,
    payload: D,
}

impl<'de, D: Deserializer<'de>> Deserializer<'de> for Tagged<'_, D> {
    type Error = D::Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, D::Error> {
        visitor.visit_enum(self)
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

impl<'de, D: Deserializer<'de>> EnumAccess<'de> for Tagged<'_, D> {
    type Error = D::Error;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self), D::Error> {
        let kind: StrDeserializer<'_, D::Error> = self.kind.into_deserializer();
        let variant = seed.deserialize(kind)?;
        Ok((variant, self))
    }
}

impl<'de, D: Deserializer<'de>> VariantAccess<'de> for Tagged<'_, D> {
    type Error = D::Error;

    fn unit_variant(self) -> Result<(), D::Error> {
        IgnoredAny::deserialize(self.payload).map(|_| ())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, D::Error> {
        seed.deserialize(self.payload)
    }

    fn tuple_variant<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value, D::Error> {
        self.payload.deserialize_tuple(len, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, D::Error> {
        self.payload.deserialize_struct("payload", fields, visitor)
    }
}

/// A recorded action with metadata for history tracking.
///
/// Used for:
/// - Replay for spectators and reconnecting players
/// - Tutorial rewind
/// - Persisted game records
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerColor,

    /// The action taken.
    pub action: Action,

    /// Turn number when action was taken.
    pub turn: u32,

    /// Position in the history.
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerColor, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
        }
    }
}
