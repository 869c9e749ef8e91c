//! Trigger conditions: which events a triggered ability responds to.

use serde::{Deserialize, Serialize};

use super::event::{EventCause, EventKind, GameEvent};
use crate::cards::CardType;
use crate::core::{ObjectId, PlayerColor};
use crate::effects::PlayerTarget;

/// Whose events a trigger listens to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerSubject {
    /// Only events about the object carrying the ability.
    This,
    /// Events about objects (or cards) of the given types, all if empty.
    Objects {
        #[serde(default)]
        types: Vec<CardType>,
        #[serde(default)]
        controlled_by: Option<PlayerTarget>,
    },
    /// Events about a player, e.g. "at the beginning of your turn".
    Player(PlayerTarget),
}

/// The trigger half of a triggered ability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSpec {
    pub event: EventKind,
    pub subject: TriggerSubject,
    #[serde(default)]
    pub cause: Option<EventCause>,
}

impl TriggerSpec {
    /// Events about the ability's own object.
    #[must_use]
    pub fn this(event: EventKind) -> Self {
        Self {
            event,
            subject: TriggerSubject::This,
            cause: None,
        }
    }

    /// Events about any matching object.
    #[must_use]
    pub fn objects(event: EventKind, types: Vec<CardType>, controlled_by: Option<PlayerTarget>) -> Self {
        Self {
            event,
            subject: TriggerSubject::Objects { types, controlled_by },
            cause: None,
        }
    }

    /// Events about a player.
    #[must_use]
    pub fn player(event: EventKind, player: PlayerTarget) -> Self {
        Self {
            event,
            subject: TriggerSubject::Player(player),
            cause: None,
        }
    }

    /// Only events with this cause.
    #[must_use]
    pub fn with_cause(mut self, cause: EventCause) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Whether the event fires this trigger for an ability on `owner`.
    #[must_use]
    pub fn matches(&self, event: &GameEvent, owner: ObjectId, controller: PlayerColor) -> bool {
        if self.event != event.kind {
            return false;
        }
        if self.cause.is_some() && self.cause != event.cause {
            return false;
        }
        match &self.subject {
            TriggerSubject::This => event.subject == Some(owner),
            TriggerSubject::Objects { types, controlled_by } => {
                let Some(card_type) = event.subject_type else {
                    return false;
                };
                (types.is_empty() || types.contains(&card_type))
                    && controlled_by
                        .as_ref()
                        .map_or(true, |p| player_matches(p, controller, event.player))
            }
            TriggerSubject::Player(p) => player_matches(p, controller, event.player),
        }
    }
}

/// Resolve a player reference relative to the ability's controller.
///
/// Only the controller-relative forms make sense here; contextual forms
/// (`ItP`, `TheyP`, `ControllerOf`) never match.
fn player_matches(target: &PlayerTarget, controller: PlayerColor, player: PlayerColor) -> bool {
    match target {
        PlayerTarget::Controller => player == controller,
        PlayerTarget::Opponent => player == controller.opponent(),
        PlayerTarget::AllPlayers => true,
        PlayerTarget::ItP | PlayerTarget::TheyP | PlayerTarget::ControllerOf(_) => false,
    }
}
