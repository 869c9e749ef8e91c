//! Passive ability integration tests.

mod common;

use common::*;
use hexbots::cards::{Attribute, CardDefinition, CardType};
use hexbots::core::Action;
use hexbots::effects::{
    Ability, Collection, Command, Comparison, Condition, Number, PassiveEffect, PlayerTarget, StatExpr, Target,
};

fn friendly_robots() -> Target {
    Target::All(Collection::Objects {
        types: vec![CardType::Robot],
        conditions: vec![Condition::ControlledBy(PlayerTarget::Controller), Condition::Other],
    })
}

fn banner() -> CardDefinition {
    CardDefinition::structure("Banner", 2, 3).with_ability(Ability::passive(
        friendly_robots(),
        PassiveEffect::AttributeAdjustment {
            attribute: Attribute::Attack,
            func: StatExpr::add(2),
        },
    ))
}

/// An aura buffs robots that enter play after it, and leaves with it.
#[test]
fn test_aura_follows_source() {
    let (game, mut state) = started();
    put(&mut state, hex(1, 0), ORANGE, banner());
    set_energy(&mut state, ORANGE, 1);
    let index = give(&mut state, ORANGE, CardDefinition::robot("Grunt", 1, 1, 3, 1));

    act(&game, &mut state, ORANGE, Action::PlaceCard { card: index, tile: hex(2, 0) });
    assert_eq!(state.object_at(hex(2, 0)).unwrap().attack(), 3);

    let blast = CardDefinition::event(
        "Demolish",
        0,
        Command::Destroy {
            target: Target::All(Collection::Objects {
                types: vec![CardType::Structure],
                conditions: vec![],
            }),
        },
    );
    let index = give(&mut state, ORANGE, blast);
    act(&game, &mut state, ORANGE, Action::PlayEvent { card: index });

    let grunt = state.object_at(hex(2, 0)).unwrap();
    assert_eq!(grunt.attack(), 1);
    assert!(grunt.adjustments.is_empty());
}

/// Health auras keep damaged robots alive only while they last.
#[test]
fn test_health_aura_loss_kills() {
    let (game, mut state) = started();
    let shield = CardDefinition::structure("Shield Generator", 2, 2).with_ability(Ability::passive(
        friendly_robots(),
        PassiveEffect::AttributeAdjustment {
            attribute: Attribute::Health,
            func: StatExpr::add(3),
        },
    ));
    let generator = put(&mut state, hex(1, 0), ORANGE, shield);
    let grunt = put(&mut state, hex(0, 0), ORANGE, CardDefinition::robot("Grunt", 1, 1, 1, 1));
    act(&game, &mut state, ORANGE, Action::Deselect);
    state.object_at_mut(hex(0, 0)).unwrap().damage = 2;
    assert_eq!(state.object_at(hex(0, 0)).unwrap().health(), 2);

    put(&mut state, hex(1, -1), BLUE, CardDefinition::robot("Sapper", 1, 2, 5, 1));
    act(&game, &mut state, ORANGE, Action::PassTurn);
    act(&game, &mut state, BLUE, Action::Attack { source: hex(1, -1), target: hex(1, 0) });

    assert!(state.find_object(generator).is_none(), "generator destroyed");
    assert_eq!(state.object_at(hex(1, 0)).map(|o| o.name()), Some("Sapper"));
    assert!(state.find_object(grunt).is_none(), "grunt lost its health bonus");
}

/// An adjacency buff is dropped when the robot walks away and comes back with it.
#[test]
fn test_adjacency_buff_tracks_position() {
    let (game, mut state) = started();
    let beacon = CardDefinition::structure("Beacon", 2, 3).with_ability(Ability::passive(
        Target::All(Collection::Objects {
            types: vec![CardType::Robot],
            conditions: vec![
                Condition::ControlledBy(PlayerTarget::Controller),
                Condition::AdjacentTo(Box::new(Target::This)),
            ],
        }),
        PassiveEffect::AttributeAdjustment {
            attribute: Attribute::Attack,
            func: StatExpr::add(1),
        },
    ));
    put(&mut state, hex(0, 0), ORANGE, beacon);
    let runner = put(&mut state, hex(1, 0), ORANGE, CardDefinition::robot("Runner", 1, 1, 2, 2));
    act(&game, &mut state, ORANGE, Action::Deselect);
    assert_eq!(state.find_object(runner).unwrap().1.attack(), 2);

    act(&game, &mut state, ORANGE, Action::MoveRobot { from: hex(1, 0), to: hex(2, 0) });
    let (_, moved) = state.find_object(runner).unwrap();
    assert_eq!(moved.attack(), 1);
    assert!(moved.adjustments.is_empty());

    act(&game, &mut state, ORANGE, Action::MoveRobot { from: hex(2, 0), to: hex(1, 0) });
    let (_, back) = state.find_object(runner).unwrap();
    assert_eq!(back.attack(), 2);
    assert_eq!(back.adjustments.len(), 1, "the buff is not stacked twice");
}

/// Passives can discount cards in hand.
#[test]
fn test_hand_cost_reduction() {
    let (game, mut state) = started();
    let workshop = CardDefinition::structure("Workshop", 3, 4).with_ability(Ability::passive(
        Target::All(Collection::CardsInHand {
            player: PlayerTarget::Controller,
            card_type: Some(CardType::Robot),
            conditions: vec![],
        }),
        PassiveEffect::AttributeAdjustment {
            attribute: Attribute::Cost,
            func: StatExpr::add(-1),
        },
    ));
    put(&mut state, hex(1, 0), ORANGE, workshop);
    let index = give(&mut state, ORANGE, CardDefinition::robot("Pricey", 2, 1, 1, 1));
    act(&game, &mut state, ORANGE, Action::Deselect);

    assert_eq!(state.players[ORANGE].hand[index].cost(), 1);
    assert_eq!(state.players[BLUE].hand[0].cost(), 1, "opponent's hand untouched");
    act(&game, &mut state, ORANGE, Action::PlaceCard { card: index, tile: hex(2, 0) });
    assert_eq!(state.players[ORANGE].energy.available, 0);
}

/// One passive's output can enable another's condition.
#[test]
fn test_chained_passives_settle() {
    let (game, mut state) = started();
    put(&mut state, hex(1, 0), ORANGE, banner());
    // Robots with 3+ attack get +1 health from the commander.
    let commander = CardDefinition::structure("Commander", 2, 3).with_ability(Ability::passive(
        Target::All(Collection::Objects {
            types: vec![CardType::Robot],
            conditions: vec![Condition::AttributeComparison {
                attribute: Attribute::Attack,
                comparison: Comparison::GreaterThanOrEqual,
                value: Number::Literal(3),
            }],
        }),
        PassiveEffect::AttributeAdjustment {
            attribute: Attribute::Health,
            func: StatExpr::add(1),
        },
    ));
    put(&mut state, hex(1, -1), ORANGE, commander);
    let grunt = put(&mut state, hex(0, 0), ORANGE, CardDefinition::robot("Grunt", 1, 1, 2, 1));

    act(&game, &mut state, ORANGE, Action::Deselect);

    let (_, grunt) = state.find_object(grunt).unwrap();
    assert_eq!(grunt.attack(), 3);
    assert_eq!(grunt.health(), 3);
}
