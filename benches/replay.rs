//! Benchmarks for action application and full-history replay.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use hexbots::core::{Action, ActionRecord, GameStart, GameState, PlayerMap};
use hexbots::{replay, CardDefinition, Game, RulesEngine};

fn deck() -> Vec<CardDefinition> {
    (0..20)
        .map(|i| {
            if i % 3 == 0 {
                CardDefinition::structure(format!("Wall {i}"), 1, 3)
            } else {
                CardDefinition::robot(format!("Bot {i}"), 1 + i % 3, 2, 3, 2)
            }
        })
        .collect()
}

fn start(seed: u64) -> Action {
    Action::StartGame(GameStart {
        player: None,
        usernames: PlayerMap::with_default(),
        decks: PlayerMap::new(|_| deck()),
        seed,
        format: Default::default(),
        options: Default::default(),
        hidden: PlayerMap::with_default(),
    })
}

/// Play `steps` actions, always taking the first legal action that isn't a pass.
fn scripted_game(game: &Game, steps: usize) -> GameState {
    let mut state = GameState::default();
    game.apply_action(&mut state, hexbots::PlayerColor::Orange, &start(42)).unwrap();
    for step in 0..steps {
        if !state.in_progress() {
            break;
        }
        let player = state.current_turn;
        let actions = game.legal_actions(&state, player);
        let action = if step % 4 == 3 {
            Action::PassTurn
        } else {
            actions.into_iter().find(|a| *a != Action::PassTurn).unwrap_or(Action::PassTurn)
        };
        game.apply_action(&mut state, player, &action).unwrap();
    }
    state
}

fn bench_apply(c: &mut Criterion) {
    let game = Game::default();
    let state = scripted_game(&game, 40);
    let player = state.current_turn;
    let actions = game.legal_actions(&state, player);

    c.bench_function("legal_actions", |b| {
        b.iter(|| black_box(game.legal_actions(black_box(&state), player)));
    });

    c.bench_function("apply_first_legal", |b| {
        b.iter(|| {
            let mut next = state.clone();
            game.apply_action(&mut next, player, black_box(&actions[0])).unwrap();
            black_box(next)
        });
    });
}

fn bench_replay(c: &mut Criterion) {
    let game = Game::default();
    let state = scripted_game(&game, 200);
    let records: Vec<ActionRecord> = state.action_history.iter().cloned().collect();

    c.bench_function("replay_200_actions", |b| {
        b.iter(|| black_box(replay(&game, &GameState::default(), black_box(&records)).unwrap()));
    });

    c.bench_function("fingerprint", |b| {
        b.iter(|| black_box(state.fingerprint().unwrap()));
    });
}

criterion_group!(benches, bench_apply, bench_replay);
criterion_main!(benches);
