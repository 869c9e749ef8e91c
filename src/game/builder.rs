//! Game setup.

use crate::cards::{CardDefinition, CardInGame};
use crate::core::{CardId, Energy, EngineError, GameConfig, GameStart, GameState, PlayerColor};
use crate::effects::apply_abilities;

use super::ops;

/// The hex card game.
///
/// Holds only the rules constants; all mutable data lives in `GameState`.
#[derive(Clone, Debug, Default)]
pub struct Game {
    pub(super) config: GameConfig,
}

impl Game {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    /// Build the opening state for a match.
    ///
    /// Decks are dealt with fresh card ids (face-down for seats marked
    /// `hidden`), shuffled with the match seed if requested, kernels are
    /// placed, and each player draws a starting hand. The starting player
    /// gets 1 energy.
    pub fn start(&self, start: &GameStart) -> Result<GameState, EngineError> {
        let config = &self.config;
        for player in PlayerColor::ALL {
            let hex = config.kernel_hexes[player];
            if !config.on_board(hex) {
                return Err(EngineError::InvalidStart(format!("{player} kernel at {hex} is off the board")));
            }
        }
        if config.kernel_hexes[PlayerColor::Orange] == config.kernel_hexes[PlayerColor::Blue] {
            return Err(EngineError::InvalidStart("kernels share a hex".into()));
        }

        let mut state = GameState::new(start.seed);
        state.format = start.format;
        state.viewer = start.player;
        state.usernames = start.usernames.clone();

        for player in PlayerColor::ALL {
            let mut deck: Vec<CardInGame> = start.decks[player]
                .iter()
                .map(|definition| {
                    let card = CardInGame::new(CardId(state.alloc_id()), definition.clone());
                    if start.hidden[player] {
                        card.hidden()
                    } else {
                        card
                    }
                })
                .collect();
            if start.options.shuffle_decks {
                state.rng.shuffle(&mut deck);
            }
            state.players[player].deck = deck.into_iter().collect();
        }

        for player in PlayerColor::ALL {
            let kernel = CardInGame::new(CardId(state.alloc_id()), CardDefinition::kernel(config.kernel_health));
            ops::enter_play(&mut state, player, kernel, config.kernel_hexes[player]);
        }
        for player in PlayerColor::ALL {
            ops::draw_cards(&mut state, config, player, config.starting_hand_size);
        }

        let first = start.options.starting_player;
        state.current_turn = first;
        state.turn_number = 1;
        state.players[first].energy = Energy { available: 1, total: 1 };
        state.started = true;
        apply_abilities(&mut state, config)?;

        tracing::info!(seed = start.seed, format = ?start.format, starting = %first, "game started");
        state.log_event(None, format!("{first} goes first"));
        Ok(state)
    }
}
