//! Shared fixtures for integration tests.

#![allow(dead_code)]

use hexbots::cards::{CardDefinition, CardInGame};
use hexbots::core::{AbilityId, AbilityInstance, Action, CardId, Energy, GameOptions, GameStart, GameState, Object, ObjectId, PlayerColor, PlayerMap, StatusKind};
use hexbots::{Game, HexId, RulesEngine};

pub const ORANGE: PlayerColor = PlayerColor::Orange;
pub const BLUE: PlayerColor = PlayerColor::Blue;

/// A vanilla robot deck.
pub fn filler_deck(size: usize) -> Vec<CardDefinition> {
    (0..size).map(|i| CardDefinition::robot(format!("Filler {i}"), 1, 1, 1, 1)).collect()
}

/// A START_GAME action with unshuffled decks.
pub fn start_action(seed: u64, decks: PlayerMap<Vec<CardDefinition>>) -> Action {
    Action::StartGame(GameStart {
        player: None,
        usernames: PlayerMap::new(|p| p.to_string()),
        decks,
        seed,
        format: Default::default(),
        options: GameOptions {
            shuffle_decks: false,
            ..GameOptions::default()
        },
        hidden: PlayerMap::with_default(),
    })
}

/// A started game with filler decks.
pub fn started() -> (Game, GameState) {
    started_with(PlayerMap::new(|_| filler_deck(10)))
}

pub fn started_with(decks: PlayerMap<Vec<CardDefinition>>) -> (Game, GameState) {
    let game = Game::default();
    let mut state = GameState::default();
    game.apply_action(&mut state, ORANGE, &start_action(42, decks)).unwrap();
    (game, state)
}

/// Apply an action and assert it was accepted.
pub fn act(game: &Game, state: &mut GameState, player: PlayerColor, action: Action) {
    let label = action.type_name();
    game.apply_action(state, player, &action).unwrap();
    if let Some(status) = &state.players[player].status {
        assert_ne!(status.kind, StatusKind::Error, "{label} rejected: {}", status.message);
    }
}

/// Apply an action and return the error message it produced.
pub fn reject(game: &Game, state: &mut GameState, player: PlayerColor, action: Action) -> String {
    game.apply_action(state, player, &action).unwrap();
    let status = state.players[player].status.clone().expect("expected a status message");
    assert_eq!(status.kind, StatusKind::Error);
    status.message
}

/// Put a card in a player's hand and return its index.
pub fn give(state: &mut GameState, player: PlayerColor, card: CardDefinition) -> usize {
    let id = CardId(state.alloc_id());
    state.players[player].hand.push_back(CardInGame::new(id, card));
    state.players[player].hand.len() - 1
}

pub fn set_energy(state: &mut GameState, player: PlayerColor, amount: i32) {
    state.players[player].energy = Energy {
        available: amount,
        total: amount,
    };
}

/// Put an object straight onto the board, ready to act.
pub fn put(state: &mut GameState, hex: HexId, owner: PlayerColor, card: CardDefinition) -> ObjectId {
    let card_id = CardId(state.alloc_id());
    let abilities = card
        .abilities
        .iter()
        .map(|ability| AbilityInstance {
            id: AbilityId(state.alloc_id()),
            ability: ability.clone(),
            granted_by: None,
        })
        .collect();
    let id = ObjectId(state.alloc_id());
    state.insert_object(hex, Object::new(id, owner, CardInGame::new(card_id, card), abilities));
    id
}

pub fn hex(q: i32, r: i32) -> HexId {
    HexId::new(q, r)
}
