//! Card definitions - static card data.
//!
//! `CardDefinition` holds what a card *is*: name, text, cost, type, base
//! stats and its compiled ability program. Card text is carried verbatim for
//! display; the engine never parses it.
//!
//! Instance-specific data (id, hidden flag, discounts while in hand) lives in
//! `CardInGame`.

use serde::{Deserialize, Serialize};

use crate::effects::{Ability, Command};

/// What kind of card this is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardType {
    /// Moves, attacks and activates.
    Robot,
    /// One-shot effect, resolved immediately then discarded.
    Event,
    /// Stationary object; only activates.
    Structure,
    /// A player's core. Destruction loses the game.
    Kernel,
}

impl CardType {
    /// Whether cards of this type become objects on the board.
    #[must_use]
    pub const fn is_object(self) -> bool {
        !matches!(self, CardType::Event)
    }
}

/// Base stats. Absent stats are not applicable to the card type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub attack: Option<i32>,
    pub health: Option<i32>,
    pub speed: Option<i32>,
}

impl Stats {
    #[must_use]
    pub const fn robot(attack: i32, health: i32, speed: i32) -> Self {
        Self {
            attack: Some(attack),
            health: Some(health),
            speed: Some(speed),
        }
    }

    #[must_use]
    pub const fn structure(health: i32) -> Self {
        Self {
            attack: None,
            health: Some(health),
            speed: None,
        }
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use hexbots::cards::{CardDefinition, CardType};
///
/// let bot = CardDefinition::robot("Crawler", 1, 1, 2, 1).with_text("A small robot.");
///
/// assert_eq!(bot.card_type, CardType::Robot);
/// assert_eq!(bot.stats.health, Some(2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDefinition {
    pub name: String,
    #[serde(default)]
    pub text: String,
    pub cost: i32,
    pub card_type: CardType,
    #[serde(default)]
    pub stats: Stats,
    /// Abilities of an object-type card.
    #[serde(default)]
    pub abilities: Vec<Ability>,
    /// Body of an event card.
    #[serde(default)]
    pub command: Option<Command>,
}

impl CardDefinition {
    /// Create a bare definition.
    pub fn new(name: impl Into<String>, card_type: CardType, cost: i32) -> Self {
        Self {
            name: name.into(),
            text: String::new(),
            cost,
            card_type,
            stats: Stats::default(),
            abilities: Vec::new(),
            command: None,
        }
    }

    /// A robot card.
    pub fn robot(name: impl Into<String>, cost: i32, attack: i32, health: i32, speed: i32) -> Self {
        Self::new(name, CardType::Robot, cost).with_stats(Stats::robot(attack, health, speed))
    }

    /// A structure card.
    pub fn structure(name: impl Into<String>, cost: i32, health: i32) -> Self {
        Self::new(name, CardType::Structure, cost).with_stats(Stats::structure(health))
    }

    /// An event card.
    pub fn event(name: impl Into<String>, cost: i32, command: Command) -> Self {
        let mut card = Self::new(name, CardType::Event, cost);
        card.command = Some(command);
        card
    }

    /// The kernel card placed for each player at game start.
    pub fn kernel(health: i32) -> Self {
        Self::new("Kernel", CardType::Kernel, 0).with_stats(Stats::structure(health))
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let wall = CardDefinition::structure("Wall", 2, 5);
        assert_eq!(wall.stats.attack, None);
        assert_eq!(wall.stats.health, Some(5));
        assert!(wall.card_type.is_object());

        let kernel = CardDefinition::kernel(20);
        assert_eq!(kernel.card_type, CardType::Kernel);
        assert_eq!(kernel.stats.health, Some(20));

        assert!(!CardType::Event.is_object());
    }

    #[test]
    fn test_deserialize_minimal() {
        let card: CardDefinition =
            serde_json::from_str(r#"{"name": "Bot", "cost": 1, "cardType": "robot", "stats": {"attack": 1, "health": 1, "speed": 2}}"#)
                .unwrap();
        assert_eq!(card.stats, Stats::robot(1, 1, 2));
        assert!(card.abilities.is_empty());
        assert!(card.command.is_none());
    }
}
