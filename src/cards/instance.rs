//! Card instances - a card as it exists in one game.

use serde::{Deserialize, Serialize};

use super::attributes::{Attribute, StatAdjustments};
use super::definition::{CardDefinition, CardType};
use crate::core::CardId;

/// A card in a deck, hand, discard pile, or backing an object on the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardInGame {
    pub id: CardId,
    pub definition: CardDefinition,
    /// Dealt face-down; identity is injected later by `REVEAL_CARDS`.
    pub hidden: bool,
    /// Adjustments that apply while the card is in hand (e.g. cost discounts).
    pub adjustments: StatAdjustments,
}

impl CardInGame {
    #[must_use]
    pub fn new(id: CardId, definition: CardDefinition) -> Self {
        Self {
            id,
            definition,
            hidden: false,
            adjustments: StatAdjustments::new(),
        }
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    #[must_use]
    pub fn card_type(&self) -> CardType {
        self.definition.card_type
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Cost after adjustments, never below zero.
    #[must_use]
    pub fn cost(&self) -> i32 {
        self.adjustments.apply(Attribute::Cost, self.definition.cost).max(0)
    }

    /// Effective value of any attribute while the card is off the board.
    #[must_use]
    pub fn attribute(&self, attribute: Attribute) -> Option<i32> {
        let base = match attribute {
            Attribute::Attack => self.definition.stats.attack,
            Attribute::Health => self.definition.stats.health,
            Attribute::Speed => self.definition.stats.speed,
            Attribute::Cost => Some(self.definition.cost),
        }?;
        Some(self.adjustments.apply(attribute, base))
    }

    /// Swap in a new definition, keeping identity and adjustments.
    pub fn replace_definition(&mut self, definition: CardDefinition) {
        self.definition = definition;
        self.hidden = false;
    }
}
