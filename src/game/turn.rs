//! Turn actions: placing cards, playing events, moving, activating and
//! passing the turn, plus host-injected card updates.

use crate::board::{move_distances, valid_placement_hexes, HexId};
use crate::cards::CardType;
use crate::core::{
    Energy, EngineError, ExecutionError, GameConfig, GameState, IllegalAction, PlayerColor, RevealedCard,
};
use crate::effects::{Command, ExecutionContext, Interpreter};
use crate::stack::{fire, settle};
use crate::triggers::{EventKind, GameEvent};

use super::ops;

/// The game is running.
pub(crate) fn ensure_in_progress(state: &GameState) -> Result<(), IllegalAction> {
    if !state.started {
        return Err(IllegalAction::NotStarted);
    }
    if state.winner.is_some() {
        return Err(IllegalAction::GameOver);
    }
    Ok(())
}

/// The game is running and it is `player`'s turn.
pub(crate) fn ensure_turn(state: &GameState, player: PlayerColor) -> Result<(), IllegalAction> {
    ensure_in_progress(state)?;
    if state.current_turn != player {
        return Err(IllegalAction::NotYourTurn);
    }
    Ok(())
}

fn pay(state: &mut GameState, player: PlayerColor, cost: i32) -> Result<(), IllegalAction> {
    let energy = &mut state.players[player].energy;
    if cost > energy.available {
        return Err(IllegalAction::InsufficientEnergy {
            needed: cost,
            available: energy.available,
        });
    }
    energy.available -= cost;
    Ok(())
}

pub(crate) fn place_card(
    state: &mut GameState,
    config: &GameConfig,
    player: PlayerColor,
    index: usize,
    tile: HexId,
) -> Result<(), ExecutionError> {
    ensure_turn(state, player)?;
    let card = state.players[player]
        .hand
        .get(index)
        .cloned()
        .ok_or(IllegalAction::NoSuchCard(index))?;
    let card_type = card.card_type();
    if !matches!(card_type, CardType::Robot | CardType::Structure) {
        return Err(IllegalAction::NotPlaceable(card.name().to_string()).into());
    }
    if !valid_placement_hexes(state, config, player, card_type).contains(&tile) {
        return Err(IllegalAction::InvalidPlacement(tile).into());
    }
    pay(state, player, card.cost())?;

    let ps = &mut state.players[player];
    ps.hand.remove(index);
    ps.clear_selection();
    ops::place_object(state, player, card, tile);
    fire(state, GameEvent::for_player(EventKind::AfterCardPlay, player).with_card_type(card_type));
    settle(state, config)
}

pub(crate) fn play_event(
    state: &mut GameState,
    config: &GameConfig,
    player: PlayerColor,
    index: usize,
) -> Result<(), ExecutionError> {
    ensure_turn(state, player)?;
    let card = state.players[player]
        .hand
        .get(index)
        .cloned()
        .ok_or(IllegalAction::NoSuchCard(index))?;
    if card.card_type() != CardType::Event {
        return Err(IllegalAction::NotAnEvent(card.name().to_string()).into());
    }
    let command: Command = card
        .definition
        .command
        .clone()
        .ok_or_else(|| EngineError::MalformedAbility(format!("event {} has no command", card.name())))?;
    pay(state, player, card.cost())?;

    let ps = &mut state.players[player];
    ps.hand.remove(index);
    ps.clear_selection();
    state.log_event(Some(player), format!("played {}", card.name()));
    Interpreter::new(state, config).execute(&command, &ExecutionContext::for_player(player))?;

    let mut card = card;
    card.adjustments = crate::cards::StatAdjustments::new();
    state.players[player].discard.push_back(card);
    fire(state, GameEvent::for_player(EventKind::AfterCardPlay, player).with_card_type(CardType::Event));
    settle(state, config)
}

/// Check that the robot at `from` belongs to `player`, may move, and can
/// reach `to`. Returns the number of hexes the move uses.
pub(crate) fn validate_move(
    state: &GameState,
    config: &GameConfig,
    player: PlayerColor,
    from: HexId,
    to: HexId,
) -> Result<i32, IllegalAction> {
    ensure_turn(state, player)?;
    let object = state.object_at(from).ok_or(IllegalAction::NoObject(from))?;
    if object.owner != player {
        return Err(IllegalAction::NotYourObject(from));
    }
    if !object.can_move() {
        return Err(IllegalAction::CannotMove(from));
    }
    move_distances(state, config, from)
        .get(&to)
        .copied()
        .ok_or(IllegalAction::InvalidMove { from, to })
}

pub(crate) fn move_robot(
    state: &mut GameState,
    config: &GameConfig,
    player: PlayerColor,
    from: HexId,
    to: HexId,
) -> Result<(), ExecutionError> {
    let distance = validate_move(state, config, player, from, to)?;
    ops::move_object(state, from, to);
    if let Some(object) = state.object_at_mut(to) {
        object.moves_used += distance;
    }
    state.players[player].clear_selection();
    settle(state, config)
}

pub(crate) fn activate(
    state: &mut GameState,
    config: &GameConfig,
    player: PlayerColor,
    index: usize,
    tile: Option<HexId>,
) -> Result<(), ExecutionError> {
    ensure_turn(state, player)?;
    let tile = tile.ok_or(IllegalAction::NoTileSelected)?;
    let object = state.object_at(tile).ok_or(IllegalAction::NoObject(tile))?;
    if object.owner != player {
        return Err(IllegalAction::NotYourObject(tile).into());
    }
    let (ability, activated) = object
        .activated_abilities()
        .nth(index)
        .map(|(id, a)| (id, a.clone()))
        .ok_or(IllegalAction::NoSuchAbility { tile, index })?;
    if !object.can_activate() {
        return Err(IllegalAction::CannotActivate(tile).into());
    }
    let (id, is_robot, name) = (object.id, object.card_type() == CardType::Robot, object.name().to_string());
    pay(state, player, activated.cost)?;

    if let Some(object) = state.object_at_mut(tile) {
        object.cant_activate = true;
        if is_robot {
            object.cant_move = true;
            object.cant_attack = true;
        }
    }
    state.log_event(Some(player), format!("activated {name}"));
    let ctx = ExecutionContext::for_object(player, id, Some(ability));
    Interpreter::new(state, config).execute(&activated.command, &ctx)?;
    settle(state, config)
}

pub(crate) fn pass_turn(state: &mut GameState, config: &GameConfig, player: PlayerColor) -> Result<(), ExecutionError> {
    ensure_turn(state, player)?;
    fire(state, GameEvent::for_player(EventKind::EndOfTurn, player));
    settle(state, config)?;
    if state.winner.is_some() {
        return Ok(());
    }

    let hexes: Vec<HexId> = state.board.keys().copied().collect();
    for hex in &hexes {
        if let Some(object) = state.object_at_mut(*hex) {
            object.adjustments.strip_end_of_turn();
        }
    }
    for color in PlayerColor::ALL {
        for card in state.players[color].hand.iter_mut() {
            card.adjustments.strip_end_of_turn();
        }
    }
    state.players[player].clear_selection();

    let next = player.opponent();
    state.current_turn = next;
    state.turn_number += 1;
    for hex in &hexes {
        if let Some(object) = state.object_at_mut(*hex) {
            object.reset_turn_flags();
        }
    }
    let total = (state.players[next].energy.total + 1).min(config.max_energy);
    state.players[next].energy = Energy { available: total, total };
    ops::draw_cards(state, config, next, 1);

    tracing::debug!(turn = state.turn_number, player = %next, "turn started");
    state.log_event(Some(next), format!("turn {} begins", state.turn_number));
    fire(state, GameEvent::for_player(EventKind::BeginningOfTurn, next));
    settle(state, config)
}

/// Inject real card identities, wherever the cards are.
pub(crate) fn reveal_cards(state: &mut GameState, config: &GameConfig, cards: &[RevealedCard]) -> Result<(), ExecutionError> {
    for revealed in cards {
        if let Some(location) = state.find_card(revealed.id) {
            if let Some(card) = state.card_mut(location) {
                card.replace_definition(revealed.card.clone());
            }
            continue;
        }
        let Some(hex) = state.objects().find(|(_, o)| o.card.id == revealed.id).map(|(hex, _)| hex) else {
            continue;
        };
        let abilities = ops::bind_abilities(state, &revealed.card);
        if let Some(object) = state.object_at_mut(hex) {
            object.reveal(revealed.card.clone(), abilities);
        }
    }
    crate::effects::apply_abilities(state, config)?;
    Ok(())
}

/// Apply a recompiled card from the host.
pub(crate) fn complete_rewrite(
    state: &mut GameState,
    config: &GameConfig,
    request: u32,
    card: &crate::cards::CardDefinition,
) -> Result<(), ExecutionError> {
    let index = state
        .pending_rewrites
        .iter()
        .position(|r| r.id == request)
        .ok_or(IllegalAction::UnknownRewrite(request))?;
    let pending = state.pending_rewrites.remove(index);
    match state.find_card(pending.card) {
        Some(location) if location.zone == crate::core::CardZone::Hand => {
            if let Some(target) = state.card_mut(location) {
                target.replace_definition(card.clone());
            }
            state.log_event(Some(pending.player), format!("rewrote a card: {}", pending.text));
        }
        _ => tracing::debug!(request, "rewritten card left the hand; rewrite dropped"),
    }
    crate::effects::apply_abilities(state, config)?;
    Ok(())
}
