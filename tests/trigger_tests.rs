//! Triggered ability integration tests.

mod common;

use common::*;
use hexbots::cards::{Attribute, CardDefinition, CardType, Duration};
use hexbots::core::{Action, SavedValue};
use hexbots::effects::{
    Ability, Collection, Command, Condition, Number, PassiveEffect, PlayerTarget, SaveValue, StatExpr, Target,
};
use hexbots::triggers::{EventKind, TriggerSpec};
use hexbots::GameResult;

fn robots(controller: PlayerTarget) -> Collection {
    Collection::Objects {
        types: vec![CardType::Robot],
        conditions: vec![Condition::ControlledBy(controller)],
    }
}

/// A structure that records `value` under "last" at the end of its controller's turn.
fn recorder(value: i32) -> CardDefinition {
    CardDefinition::structure(format!("Recorder {value}"), 1, 3).with_ability(Ability::triggered(
        TriggerSpec::player(EventKind::EndOfTurn, PlayerTarget::Controller),
        Command::Save {
            key: "last".into(),
            value: SaveValue::Number(Number::Literal(value)),
        },
    ))
}

#[test]
fn test_beginning_of_turn_draw() {
    let (game, mut state) = started();
    let library = CardDefinition::structure("Library", 2, 3).with_ability(Ability::triggered(
        TriggerSpec::player(EventKind::BeginningOfTurn, PlayerTarget::Controller),
        Command::Draw {
            player: PlayerTarget::Controller,
            count: Number::Literal(1),
        },
    ));
    put(&mut state, hex(2, 0), ORANGE, library);
    assert_eq!(state.players[ORANGE].hand.len(), 2);

    act(&game, &mut state, ORANGE, Action::PassTurn);
    assert_eq!(state.players[BLUE].hand.len(), 3, "opponent's turn is unaffected");
    act(&game, &mut state, BLUE, Action::PassTurn);

    assert_eq!(state.players[ORANGE].hand.len(), 4);
}

#[test]
fn test_after_played_trigger() {
    let (game, mut state) = started();
    let herald = CardDefinition::robot("Herald", 1, 1, 1, 1).with_ability(Ability::triggered(
        TriggerSpec::this(EventKind::AfterPlayed),
        Command::Draw {
            player: PlayerTarget::Controller,
            count: Number::Literal(1),
        },
    ));
    let index = give(&mut state, ORANGE, herald);
    assert_eq!(state.players[ORANGE].hand.len(), 3);

    act(&game, &mut state, ORANGE, Action::PlaceCard { card: index, tile: hex(2, 0) });
    assert_eq!(state.players[ORANGE].hand.len(), 3);
}

#[test]
fn test_enemy_destroyed_trigger() {
    let (game, mut state) = started();
    let scrapper = CardDefinition::structure("Scrapper", 2, 3).with_ability(Ability::triggered(
        TriggerSpec::objects(EventKind::AfterDestroyed, vec![CardType::Robot], Some(PlayerTarget::Opponent)),
        Command::ModifyEnergy {
            player: PlayerTarget::Controller,
            func: StatExpr::add(1),
        },
    ));
    put(&mut state, hex(2, 0), ORANGE, scrapper);
    put(&mut state, hex(-2, 0), BLUE, CardDefinition::robot("Scout", 1, 1, 1, 1));
    put(&mut state, hex(-2, 1), BLUE, CardDefinition::robot("Scout", 1, 1, 1, 1));
    let zap = CardDefinition::event(
        "Zap",
        1,
        Command::DealDamage {
            target: Target::All(robots(PlayerTarget::Opponent)),
            amount: Number::Literal(5),
        },
    );
    let index = give(&mut state, ORANGE, zap);

    act(&game, &mut state, ORANGE, Action::PlayEvent { card: index });

    assert!(state.object_at(hex(-2, 0)).is_none());
    assert!(state.object_at(hex(-2, 1)).is_none());
    assert_eq!(state.players[ORANGE].energy.available, 2);
}

#[test]
fn test_triggers_run_in_board_order() {
    let (game, mut state) = started();
    // Placed first, but scanned second.
    put(&mut state, hex(1, -1), ORANGE, recorder(2));
    put(&mut state, hex(0, 0), ORANGE, recorder(1));

    act(&game, &mut state, ORANGE, Action::PassTurn);

    assert_eq!(state.memory.get("last"), Some(&SavedValue::Number(2)));
}

#[test]
fn test_nested_triggers_queue_behind_siblings() {
    let (game, mut state) = started();
    // The first recorder pings every robot, which makes the sentinel record 3.
    let pinger = CardDefinition::structure("Pinger", 1, 3).with_ability(Ability::triggered(
        TriggerSpec::player(EventKind::EndOfTurn, PlayerTarget::Controller),
        Command::DealDamage {
            target: Target::All(robots(PlayerTarget::Controller)),
            amount: Number::Literal(1),
        },
    ));
    let sentinel = CardDefinition::robot("Sentinel", 1, 0, 5, 1).with_ability(Ability::triggered(
        TriggerSpec::this(EventKind::AfterDamageReceived),
        Command::Save {
            key: "last".into(),
            value: SaveValue::Number(Number::Literal(3)),
        },
    ));
    put(&mut state, hex(0, 0), ORANGE, pinger);
    put(&mut state, hex(1, -1), ORANGE, recorder(2));
    let sentinel = put(&mut state, hex(-1, 1), ORANGE, sentinel);

    act(&game, &mut state, ORANGE, Action::PassTurn);

    assert_eq!(state.memory.get("last"), Some(&SavedValue::Number(3)));
    assert_eq!(state.find_object(sentinel).unwrap().1.damage, 1);
    assert_eq!(state.execution_depth, 0);
    assert!(state.trigger_queue.is_empty());
}

#[test]
fn test_infinite_loop_ends_in_draw() {
    let (game, mut state) = started();
    let echo = |name: &str| {
        CardDefinition::robot(name, 1, 0, 50, 1).with_ability(Ability::triggered(
            TriggerSpec::this(EventKind::AfterDamageReceived),
            Command::DealDamage {
                target: Target::All(Collection::Objects {
                    types: vec![CardType::Robot],
                    conditions: vec![Condition::Other],
                }),
                amount: Number::Literal(1),
            },
        ))
    };
    put(&mut state, hex(0, 0), ORANGE, echo("Echo A"));
    put(&mut state, hex(-1, 0), BLUE, echo("Echo B"));
    let spark = CardDefinition::event(
        "Spark",
        0,
        Command::DealDamage {
            target: Target::All(Collection::Objects {
                types: vec![CardType::Robot],
                conditions: vec![],
            }),
            amount: Number::Literal(1),
        },
    );
    let index = give(&mut state, ORANGE, spark);

    act(&game, &mut state, ORANGE, Action::PlayEvent { card: index });

    assert_eq!(state.winner, Some(GameResult::Draw));
    assert!(state.trigger_queue.is_empty());
    assert_eq!(reject(&game, &mut state, ORANGE, Action::PassTurn), "The game is over.");
    assert_eq!(state.action_history.len(), 3);
}

#[test]
fn test_end_of_turn_adjustment_expires() {
    let (game, mut state) = started();
    put(&mut state, hex(0, 0), ORANGE, CardDefinition::robot("Grunt", 1, 1, 2, 1));
    let overclock = CardDefinition::event(
        "Overclock",
        1,
        Command::ModifyAttribute {
            target: Target::All(robots(PlayerTarget::Controller)),
            attribute: Attribute::Attack,
            func: StatExpr::add(2),
            duration: Some(Duration::EndOfTurn),
        },
    );
    let index = give(&mut state, ORANGE, overclock);

    act(&game, &mut state, ORANGE, Action::PlayEvent { card: index });
    assert_eq!(state.object_at(hex(0, 0)).unwrap().attack(), 3);

    act(&game, &mut state, ORANGE, Action::PassTurn);
    assert_eq!(state.object_at(hex(0, 0)).unwrap().attack(), 1);
}

/// A granted "whenever this attacks, draw a card" draws once per attack, and
/// stops once the structure granting it is gone.
#[test]
fn test_granted_attack_draw() {
    let (game, mut state) = started();
    let muse = CardDefinition::structure("Muse", 2, 3).with_ability(Ability::passive(
        Target::All(robots(PlayerTarget::Controller)),
        PassiveEffect::GrantAbility(Box::new(Ability::triggered(
            TriggerSpec::this(EventKind::AfterAttack),
            Command::Draw {
                player: PlayerTarget::Controller,
                count: Number::Literal(1),
            },
        ))),
    ));
    put(&mut state, hex(1, 0), ORANGE, muse);
    put(&mut state, hex(0, 0), ORANGE, CardDefinition::robot("Brawler", 1, 1, 5, 1));
    put(&mut state, hex(-1, 0), BLUE, CardDefinition::structure("Wall", 1, 10));
    act(&game, &mut state, ORANGE, Action::Deselect);

    let before = state.players[ORANGE].hand.len();
    act(&game, &mut state, ORANGE, Action::Attack { source: hex(0, 0), target: hex(-1, 0) });
    assert_eq!(state.players[ORANGE].hand.len(), before + 1);

    let demolish = CardDefinition::event(
        "Demolish",
        0,
        Command::Destroy {
            target: Target::All(Collection::Objects {
                types: vec![CardType::Structure],
                conditions: vec![Condition::ControlledBy(PlayerTarget::Controller)],
            }),
        },
    );
    let index = give(&mut state, ORANGE, demolish);
    act(&game, &mut state, ORANGE, Action::PlayEvent { card: index });
    assert!(state.object_at(hex(1, 0)).is_none());
    act(&game, &mut state, ORANGE, Action::PassTurn);
    act(&game, &mut state, BLUE, Action::PassTurn);

    let before = state.players[ORANGE].hand.len();
    act(&game, &mut state, ORANGE, Action::Attack { source: hex(0, 0), target: hex(-1, 0) });
    assert_eq!(state.players[ORANGE].hand.len(), before);
    assert_eq!(state.object_at(hex(-1, 0)).unwrap().damage, 2);
}
