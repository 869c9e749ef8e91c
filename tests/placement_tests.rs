//! Placement and event-card integration tests.

mod common;

use common::*;
use hexbots::cards::{CardDefinition, CardType};
use hexbots::core::{Action, PlayerMap};
use hexbots::effects::{Ability, Collection, Command, Number, PlayerTarget, Target};
use hexbots::triggers::{EventKind, TriggerSpec};
use hexbots::RulesEngine;

/// Playing a robot spends energy and puts a just-played object on the board.
#[test]
fn test_place_robot_from_hand() {
    let (game, mut state) = started();
    set_energy(&mut state, ORANGE, 3);
    let index = give(&mut state, ORANGE, CardDefinition::robot("Scout", 2, 1, 2, 2));

    act(&game, &mut state, ORANGE, Action::PlaceCard { card: index, tile: hex(2, 0) });

    let scout = state.object_at(hex(2, 0)).expect("robot placed");
    assert_eq!(scout.name(), "Scout");
    assert!(scout.just_played);
    assert!(!scout.can_move(), "robots can't move on the turn they're played");
    assert_eq!(state.players[ORANGE].energy.available, 1);
    assert_eq!(state.players[ORANGE].hand.len(), 2);
}

/// Placement is rejected without enough energy, and nothing changes.
#[test]
fn test_insufficient_energy() {
    let (game, mut state) = started();
    let index = give(&mut state, ORANGE, CardDefinition::robot("Tank", 5, 3, 6, 1));
    let board = state.board.clone();

    let message = reject(&game, &mut state, ORANGE, Action::PlaceCard { card: index, tile: hex(2, 0) });

    assert_eq!(message, "You need 5 energy but only have 1.");
    assert_eq!(state.board, board);
    assert_eq!(state.players[ORANGE].hand.len(), 3);
}

/// Robots go next to their own kernel only.
#[test]
fn test_placement_range() {
    let (game, mut state) = started();
    set_energy(&mut state, ORANGE, 5);
    let index = give(&mut state, ORANGE, CardDefinition::robot("Scout", 1, 1, 1, 1));

    reject(&game, &mut state, ORANGE, Action::PlaceCard { card: index, tile: hex(0, 0) });
    reject(&game, &mut state, ORANGE, Action::PlaceCard { card: index, tile: hex(-2, 0) });
    act(&game, &mut state, ORANGE, Action::PlaceCard { card: index, tile: hex(3, -1) });
}

/// Structures may be placed next to any friendly object.
#[test]
fn test_structure_next_to_friendly_robot() {
    let (game, mut state) = started();
    set_energy(&mut state, ORANGE, 5);
    put(&mut state, hex(0, 0), ORANGE, CardDefinition::robot("Runner", 1, 1, 1, 1));
    let index = give(&mut state, ORANGE, CardDefinition::structure("Wall", 1, 4));

    act(&game, &mut state, ORANGE, Action::PlaceCard { card: index, tile: hex(-1, 0) });
    assert_eq!(state.object_at(hex(-1, 0)).unwrap().card_type(), CardType::Structure);
}

/// Only the current player may play cards.
#[test]
fn test_not_your_turn() {
    let (game, mut state) = started();
    set_energy(&mut state, BLUE, 5);
    let message = reject(&game, &mut state, BLUE, Action::PlaceCard { card: 0, tile: hex(-2, 0) });
    assert_eq!(message, "It's not your turn.");
}

/// "When this robot is played, draw a card."
#[test]
fn test_after_played_trigger() {
    let (game, mut state) = started();
    set_energy(&mut state, ORANGE, 2);
    let scholar = CardDefinition::robot("Scholar", 2, 1, 1, 1).with_ability(Ability::triggered(
        TriggerSpec::this(EventKind::AfterPlayed),
        Command::Draw {
            player: PlayerTarget::Controller,
            count: Number::Literal(1),
        },
    ));
    let index = give(&mut state, ORANGE, scholar);
    let deck_before = state.players[ORANGE].deck.len();

    act(&game, &mut state, ORANGE, Action::PlaceCard { card: index, tile: hex(2, 0) });

    assert_eq!(state.players[ORANGE].deck.len(), deck_before - 1);
    assert_eq!(state.players[ORANGE].hand.len(), 3);
    assert!(state.trigger_queue.is_empty());
}

/// An event card runs its command and goes to the discard pile.
#[test]
fn test_play_event() {
    let (game, mut state) = started();
    set_energy(&mut state, ORANGE, 3);
    let target = put(&mut state, hex(0, 0), BLUE, CardDefinition::robot("Victim", 1, 1, 3, 1));
    let blast = CardDefinition::event(
        "Blast",
        2,
        Command::DealDamage {
            target: Target::All(Collection::Objects {
                types: vec![CardType::Robot],
                conditions: vec![],
            }),
            amount: Number::Literal(2),
        },
    );
    let index = give(&mut state, ORANGE, blast);

    act(&game, &mut state, ORANGE, Action::PlayEvent { card: index });

    let (_, victim) = state.find_object(target).unwrap();
    assert_eq!(victim.health(), 1);
    assert_eq!(state.players[ORANGE].discard.len(), 1);
    assert_eq!(state.players[ORANGE].energy.available, 1);
}

/// Robot cards can't be played as events, and vice versa.
#[test]
fn test_wrong_card_kind() {
    let (game, mut state) = started_with(PlayerMap::new(|_| filler_deck(5)));
    set_energy(&mut state, ORANGE, 5);
    let message = reject(&game, &mut state, ORANGE, Action::PlayEvent { card: 0 });
    assert_eq!(message, "Filler 0 is not an event card.");

    let zap = give(&mut state, ORANGE, CardDefinition::event("Zap", 0, Command::Sequence(vec![])));
    let message = reject(&game, &mut state, ORANGE, Action::PlaceCard { card: zap, tile: hex(2, 0) });
    assert_eq!(message, "Zap can't be placed on the board.");
}

/// Every placement offered by `legal_actions` is accepted.
#[test]
fn test_legal_placements_are_accepted() {
    let (game, mut state) = started();
    set_energy(&mut state, ORANGE, 1);

    let placements: Vec<_> = game
        .legal_actions(&state, ORANGE)
        .into_iter()
        .filter(|a| matches!(a, Action::PlaceCard { .. }))
        .collect();
    assert_eq!(placements.len(), 6, "two cards, three hexes each");

    for action in placements {
        let mut trial = state.clone();
        act(&game, &mut trial, ORANGE, action);
    }
}
