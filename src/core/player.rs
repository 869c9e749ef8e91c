//! Player identification and per-player data storage.
//!
//! ## PlayerColor
//!
//! The game is strictly two-player: orange and blue. Each color owns a
//! kernel, a deck, a hand and a discard pile.
//!
//! ## PlayerMap
//!
//! Two-slot per-player storage with O(1) access, indexable by `PlayerColor`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two seats at the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Orange,
    Blue,
}

impl PlayerColor {
    /// Both colors, in seat order.
    pub const ALL: [PlayerColor; 2] = [PlayerColor::Orange, PlayerColor::Blue];

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            PlayerColor::Orange => PlayerColor::Blue,
            PlayerColor::Blue => PlayerColor::Orange,
        }
    }

    /// Seat index (orange = 0, blue = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PlayerColor::Orange => 0,
            PlayerColor::Blue => 1,
        }
    }
}

impl std::fmt::Display for PlayerColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerColor::Orange => write!(f, "orange"),
            PlayerColor::Blue => write!(f, "blue"),
        }
    }
}

/// Per-player data storage.
///
/// ## Example
///
/// ```
/// use hexbots::core::{PlayerColor, PlayerMap};
///
/// let mut energy: PlayerMap<i32> = PlayerMap::with_value(0);
/// energy[PlayerColor::Blue] = 3;
/// assert_eq!(energy[PlayerColor::Orange], 0);
/// assert_eq!(energy[PlayerColor::Blue], 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    orange: T,
    blue: T,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(factory: impl Fn(PlayerColor) -> T) -> Self {
        Self {
            orange: factory(PlayerColor::Orange),
            blue: factory(PlayerColor::Blue),
        }
    }

    /// Create a new PlayerMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a new PlayerMap with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerColor) -> &T {
        match player {
            PlayerColor::Orange => &self.orange,
            PlayerColor::Blue => &self.blue,
        }
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerColor) -> &mut T {
        match player {
            PlayerColor::Orange => &mut self.orange,
            PlayerColor::Blue => &mut self.blue,
        }
    }

    /// Iterate over (PlayerColor, &T) pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerColor, &T)> {
        [(PlayerColor::Orange, &self.orange), (PlayerColor::Blue, &self.blue)].into_iter()
    }

    /// Iterate over (PlayerColor, &mut T) pairs in seat order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerColor, &mut T)> {
        [(PlayerColor::Orange, &mut self.orange), (PlayerColor::Blue, &mut self.blue)].into_iter()
    }
}

impl<T: Default> Default for PlayerMap<T> {
    fn default() -> Self {
        Self::with_default()
    }
}

impl<T> Index<PlayerColor> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerColor) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerColor> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerColor) -> &mut Self::Output {
        self.get_mut(player)
    }
}
