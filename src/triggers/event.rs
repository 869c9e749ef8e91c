//! Game events.
//!
//! Events describe something that just happened (or is about to happen, for
//! `BeforeAttack`). The engine fires them from its mutation primitives;
//! triggered abilities listen for them.

use serde::{Deserialize, Serialize};

use crate::cards::CardType;
use crate::core::{ObjectId, PlayerColor};

/// Kinds of events a triggered ability can listen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// An object entered the board from a card.
    AfterPlayed,
    /// Any card was played from hand.
    AfterCardPlay,
    AfterMove,
    BeforeAttack,
    AfterAttack,
    AfterDamageReceived,
    AfterDestroyed,
    BeginningOfTurn,
    EndOfTurn,
}

/// What caused an event, for triggers that care.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventCause {
    Combat,
    Effect,
}

/// A fired event with its context.
///
/// ## Fields
///
/// - `subject`: the object the event is about (bound as `It`)
/// - `other`: the other participant (bound as `That`)
/// - `player`: the player the event is about (bound as `ItP`)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub kind: EventKind,
    pub player: PlayerColor,
    pub subject: Option<ObjectId>,
    pub subject_type: Option<CardType>,
    pub other: Option<ObjectId>,
    pub amount: Option<i32>,
    pub cause: Option<EventCause>,
}

impl GameEvent {
    /// An event about a player (turn boundaries).
    #[must_use]
    pub fn for_player(kind: EventKind, player: PlayerColor) -> Self {
        Self {
            kind,
            player,
            subject: None,
            subject_type: None,
            other: None,
            amount: None,
            cause: None,
        }
    }

    /// An event about an object.
    #[must_use]
    pub fn for_object(kind: EventKind, object: ObjectId, card_type: CardType, owner: PlayerColor) -> Self {
        Self {
            subject: Some(object),
            subject_type: Some(card_type),
            ..Self::for_player(kind, owner)
        }
    }

    /// Set the other participant.
    #[must_use]
    pub fn with_other(mut self, other: ObjectId) -> Self {
        self.other = Some(other);
        self
    }

    /// Set the amount.
    #[must_use]
    pub fn with_amount(mut self, amount: i32) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the cause.
    #[must_use]
    pub fn with_cause(mut self, cause: EventCause) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Set the card type (for card-play events without a subject object).
    #[must_use]
    pub fn with_card_type(mut self, card_type: CardType) -> Self {
        self.subject_type = Some(card_type);
        self
    }
}
