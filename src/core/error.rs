//! Error taxonomy.
//!
//! - `IllegalAction`: user input that fails a precondition. Never escapes the
//!   reducer; it becomes a status message for the acting player.
//! - `EngineError`: internal contract violations (malformed ability data,
//!   invalid game-start payload). Fatal for the game, returned to the host.
//! - `ExecutionError`: control flow inside one action's resolution, including
//!   suspension on an unanswered target choice.

use crate::board::HexId;
use crate::core::state::ChoiceRequest;
use crate::core::{CardId, ObjectId};

/// A player action that does not satisfy its preconditions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IllegalAction {
    #[error("The game has not started.")]
    NotStarted,

    #[error("The game is over.")]
    GameOver,

    #[error("It's not your turn.")]
    NotYourTurn,

    #[error("There is no card at position {0} in your hand.")]
    NoSuchCard(usize),

    #[error("{0} can't be placed on the board.")]
    NotPlaceable(String),

    #[error("{0} is not an event card.")]
    NotAnEvent(String),

    #[error("You need {needed} energy but only have {available}.")]
    InsufficientEnergy { needed: i32, available: i32 },

    #[error("You can't place a card at {0}.")]
    InvalidPlacement(HexId),

    #[error("There is nothing at {0}.")]
    NoObject(HexId),

    #[error("You don't control the object at {0}.")]
    NotYourObject(HexId),

    #[error("The object at {0} can't move right now.")]
    CannotMove(HexId),

    #[error("The object at {from} can't reach {to}.")]
    InvalidMove { from: HexId, to: HexId },

    #[error("The object at {0} can't attack right now.")]
    CannotAttack(HexId),

    #[error("The object at {from} can't attack {to}.")]
    InvalidAttack { from: HexId, to: HexId },

    #[error("The object at {0} can't activate right now.")]
    CannotActivate(HexId),

    #[error("The object at {tile} has no activated ability #{index}.")]
    NoSuchAbility { tile: HexId, index: usize },

    #[error("Select an object first.")]
    NoTileSelected,

    #[error("Finish choosing targets first.")]
    ChoicePending,

    #[error("There is no choice to make.")]
    NoPendingChoice,

    #[error("It's not your choice to make.")]
    NotYourChoice,

    #[error("That is not a valid target.")]
    InvalidChoice,

    #[error("This choice can't be cancelled.")]
    CannotCancel,

    #[error("Unknown card rewrite request {0}.")]
    UnknownRewrite(u32),
}

/// An internal contract violation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("malformed ability: {0}")]
    MalformedAbility(String),

    #[error("{0} disappeared during resolution")]
    MissingObject(ObjectId),

    #[error("{0} disappeared during resolution")]
    MissingCard(CardId),

    #[error("invalid game start: {0}")]
    InvalidStart(String),

    #[error("state serialization failed: {0}")]
    Serialization(String),
}

/// Control flow within a single action's resolution.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecutionError {
    #[error("awaiting a target choice")]
    AwaitingChoice(ChoiceRequest),

    #[error(transparent)]
    Illegal(#[from] IllegalAction),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = IllegalAction::InsufficientEnergy { needed: 3, available: 1 };
        assert_eq!(err.to_string(), "You need 3 energy but only have 1.");

        let err = IllegalAction::InvalidPlacement(HexId::new(0, 1));
        assert_eq!(err.to_string(), "You can't place a card at 0,1,-1.");
    }

    #[test]
    fn test_execution_error_conversion() {
        let err: ExecutionError = IllegalAction::NotYourTurn.into();
        assert_eq!(err.to_string(), "It's not your turn.");

        let err: ExecutionError = EngineError::MalformedAbility("choose in passive".into()).into();
        assert!(matches!(err, ExecutionError::Engine(_)));
    }
}
