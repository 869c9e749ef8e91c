//! Attacks.
//!
//! ## Sequence
//!
//! 1. The attacker is exhausted for the turn and the attack animation starts
//! 2. `BeforeAttack` fires and resolves; it may remove either party
//! 3. Attacker deals its attack to the defender; a surviving defender
//!    fights back unless it has `CannotFightBack`
//! 4. Dead objects are removed. If the defender died and the attacker
//!    survived, the attacker advances into the defender's hex
//! 5. `AfterAttack` fires and resolves

use crate::board::HexId;
use crate::core::{AttackAnimation, ExecutionError, GameConfig, GameState, IllegalAction, ObjectId, PlayerColor};
use crate::effects::StatusEffect;
use crate::stack::{fire, settle};
use crate::triggers::{EventCause, EventKind, GameEvent};

use super::{cleanup, ops, turn};

/// Check an attack by the robot at `source` on the object at `target`.
///
/// `source` is where the attacker will be; `attacker_at` is where it is now
/// (they differ for move-and-attack).
pub(crate) fn validate_attack(
    state: &GameState,
    player: PlayerColor,
    attacker_at: HexId,
    source: HexId,
    target: HexId,
) -> Result<(), IllegalAction> {
    turn::ensure_turn(state, player)?;
    let attacker = state.object_at(attacker_at).ok_or(IllegalAction::NoObject(attacker_at))?;
    if attacker.owner != player {
        return Err(IllegalAction::NotYourObject(attacker_at));
    }
    if !attacker.can_attack() {
        return Err(IllegalAction::CannotAttack(attacker_at));
    }
    let defender = state.object_at(target).ok_or(IllegalAction::NoObject(target))?;
    if defender.owner == player || !source.is_adjacent(target) {
        return Err(IllegalAction::InvalidAttack { from: source, to: target });
    }
    Ok(())
}

pub(crate) fn attack(
    state: &mut GameState,
    config: &GameConfig,
    player: PlayerColor,
    source: HexId,
    target: HexId,
) -> Result<(), ExecutionError> {
    validate_attack(state, player, source, source, target)?;
    let (attacker, defender) = match (state.object_at(source), state.object_at(target)) {
        (Some(a), Some(d)) => (a.id, d.id),
        _ => return Ok(()),
    };

    if let Some(object) = state.object_at_mut(source) {
        object.cant_attack = true;
        object.cant_move = true;
        object.cant_activate = true;
    }
    state.attack = Some(AttackAnimation {
        from: source,
        to: target,
        retracting: false,
    });
    state.players[player].clear_selection();

    let before = event(state, EventKind::BeforeAttack, attacker, defender);
    fire(state, before);
    settle(state, config)?;
    if state.winner.is_some() {
        return Ok(());
    }

    let Some(attack_value) = state.find_object(attacker).map(|(_, o)| o.attack()) else {
        return Ok(());
    };
    let Some(defender_hex) = state.hex_of(defender) else {
        return Ok(());
    };
    tracing::debug!(%attacker, %defender, attack = attack_value, "attack");
    ops::deal_damage(state, defender, attack_value, Some(attacker), EventCause::Combat);

    let fight_back = state
        .find_object(defender)
        .filter(|(_, o)| !o.is_dead() && !o.has_status(StatusEffect::CannotFightBack))
        .and_then(|(_, o)| o.stats.attack.map(|_| o.attack()));
    if let Some(amount) = fight_back {
        ops::deal_damage(state, attacker, amount, Some(defender), EventCause::Combat);
    }

    cleanup::remove_dead(state);
    let defender_gone = state.find_object(defender).is_none();
    if defender_gone && !state.board.contains_key(&defender_hex) {
        if let Some(attacker_hex) = state.hex_of(attacker) {
            ops::move_object(state, attacker_hex, defender_hex);
        }
    }

    if state.find_object(attacker).is_some() {
        let after = event(state, EventKind::AfterAttack, attacker, defender);
        fire(state, after);
    }
    settle(state, config)
}

fn event(state: &GameState, kind: EventKind, attacker: ObjectId, defender: ObjectId) -> GameEvent {
    match state.find_object(attacker) {
        Some((_, object)) => GameEvent::for_object(kind, attacker, object.card_type(), object.owner).with_other(defender),
        None => GameEvent::for_player(kind, state.current_turn),
    }
}

/// Move, then attack from the destination if the robot is still there.
pub(crate) fn move_and_attack(
    state: &mut GameState,
    config: &GameConfig,
    player: PlayerColor,
    from: HexId,
    to: HexId,
    target: HexId,
) -> Result<(), ExecutionError> {
    turn::validate_move(state, config, player, from, to)?;
    validate_attack(state, player, from, to, target)?;
    let Some(id) = state.object_at(from).map(|o| o.id) else {
        return Ok(());
    };

    turn::move_robot(state, config, player, from, to)?;
    if state.winner.is_some() || state.hex_of(id) != Some(to) {
        tracing::debug!(object = %id, "moved robot no longer in position; attack skipped");
        return Ok(());
    }
    attack(state, config, player, to, target)
}
