//! The action reducer.
//!
//! `apply_action` is the only entry point that changes a `GameState`. Every
//! action is resolved on a clone of the state and committed whole:
//!
//! - Success: the clone becomes the new state
//! - Illegal action: the old state is kept, with an error status for the
//!   acting player
//! - Awaiting a target choice: the old state is kept, with the action parked
//!   in `pending_choice` until the chooser answers
//! - Engine error: nothing changes and the error is returned
//!
//! Everything but `Unknown` is appended to the action history, accepted or
//! not, so replaying the history reproduces the state exactly.

use im::Vector;

use crate::board::{valid_attack_hexes, valid_move_hexes, valid_placement_hexes};
use crate::cards::CardType;
use crate::core::{
    Action, Choice, ChoiceTape, EngineError, ExecutionError, GameConfig, GameState, IllegalAction, PendingChoice,
    PlayerColor, StatusMessage,
};
use crate::effects::apply_abilities;
use crate::rules::{GameResult, RulesEngine};

use super::builder::Game;
use super::{cleanup, combat, turn};

impl RulesEngine for Game {
    fn config(&self) -> &GameConfig {
        &self.config
    }

    fn legal_actions(&self, state: &GameState, player: PlayerColor) -> Vec<Action> {
        if !state.in_progress() {
            return vec![];
        }
        if let Some(pending) = &state.pending_choice {
            return answer_actions(state, player, pending);
        }
        if state.current_turn != player {
            return vec![];
        }

        let config = &self.config;
        let ps = &state.players[player];
        let mut actions = Vec::new();

        for (index, card) in ps.hand.iter().enumerate() {
            if card.cost() > ps.energy.available {
                continue;
            }
            match card.card_type() {
                CardType::Robot | CardType::Structure => {
                    for tile in valid_placement_hexes(state, config, player, card.card_type()) {
                        actions.push(Action::PlaceCard { card: index, tile });
                    }
                }
                CardType::Event => actions.push(Action::PlayEvent { card: index }),
                CardType::Kernel => {}
            }
        }

        for (hex, object) in state.objects().filter(|(_, o)| o.owner == player) {
            for to in valid_move_hexes(state, config, hex) {
                actions.push(Action::MoveRobot { from: hex, to });
            }
            for target in valid_attack_hexes(state, hex) {
                actions.push(Action::Attack { source: hex, target });
            }
            if object.can_activate() {
                for (index, (_, activated)) in object.activated_abilities().enumerate() {
                    if activated.cost <= ps.energy.available {
                        actions.push(Action::ActivateObject {
                            ability: index,
                            tile: Some(hex),
                        });
                    }
                }
            }
        }

        actions.push(Action::PassTurn);
        actions
    }

    fn apply_action(&self, state: &mut GameState, player: PlayerColor, action: &Action) -> Result<(), EngineError> {
        let action = match action {
            Action::Unknown => {
                tracing::debug!(%player, "ignoring unknown action");
                return Ok(());
            }
            Action::StartGame(start) => {
                let mut next = self.start(start)?;
                next.record_action(player, action.clone());
                *state = next;
                return Ok(());
            }
            Action::ActivateObject { ability, tile: None } => Action::ActivateObject {
                ability: *ability,
                tile: state.players[player].selected_tile,
            },
            other => other.clone(),
        };

        let mut next = match self.resolve_action(state, player, &action) {
            Ok(next) => next,
            Err(ExecutionError::Illegal(reason)) => {
                tracing::debug!(%player, action = action.type_name(), %reason, "illegal action");
                let mut next = state.clone();
                next.players[player].status = Some(StatusMessage::error(reason.to_string()));
                next
            }
            Err(ExecutionError::AwaitingChoice(request)) => {
                let mut next = state.clone();
                park(&mut next, player, action.clone(), Vector::new(), request);
                next
            }
            Err(ExecutionError::Engine(error)) => {
                tracing::error!(%player, action = action.type_name(), %error, "action failed");
                return Err(error);
            }
        };
        next.record_action(player, action);
        *state = next;
        Ok(())
    }
}

fn park(state: &mut GameState, actor: PlayerColor, action: Action, answers: Vector<Choice>, request: crate::core::ChoiceRequest) {
    tracing::debug!(%actor, action = action.type_name(), chooser = %request.chooser, options = request.options.len(), "awaiting target choice");
    state.players[actor].status = None;
    state.players[request.chooser].status = Some(StatusMessage::info("Choose a target."));
    state.pending_choice = Some(PendingChoice {
        actor,
        action,
        answers,
        request,
    });
}

fn answer_actions(state: &GameState, player: PlayerColor, pending: &PendingChoice) -> Vec<Action> {
    let mut actions = Vec::new();
    if pending.request.chooser == player {
        for option in &pending.request.options {
            let action = match *option {
                Choice::Tile(tile) => Some(Action::SetSelectedTile { tile }),
                Choice::HandCard(id) => state.players[player]
                    .hand
                    .iter()
                    .position(|c| c.id == id)
                    .map(|card| Action::SetSelectedCard { card }),
                Choice::DiscardCard(card) => Some(Action::SetSelectedCardInDiscardPile { card }),
            };
            actions.extend(action);
        }
    }
    if pending.actor == player && pending.action.is_cancellable() {
        actions.push(Action::CancelChoice);
    }
    actions
}

impl Game {
    /// Resolve an action against `state`, returning the state it produces.
    fn resolve_action(&self, state: &GameState, player: PlayerColor, action: &Action) -> Result<GameState, ExecutionError> {
        if let Some(pending) = &state.pending_choice {
            match action {
                Action::SetSelectedTile { tile } => return self.answer(state, player, pending, Choice::Tile(*tile)),
                Action::SetSelectedCard { card } => {
                    let id = state.players[player]
                        .hand
                        .get(*card)
                        .map(|c| c.id)
                        .ok_or(IllegalAction::InvalidChoice)?;
                    return self.answer(state, player, pending, Choice::HandCard(id));
                }
                Action::SetSelectedCardInDiscardPile { card } => {
                    return self.answer(state, player, pending, Choice::DiscardCard(*card));
                }
                Action::CancelChoice => return cancel(state, player, pending),
                Action::RevealCards { .. }
                | Action::CompleteRewrite { .. }
                | Action::Deselect
                | Action::Forfeit
                | Action::Abort
                | Action::AttackRetract
                | Action::AttackComplete => {}
                _ => return Err(IllegalAction::ChoicePending.into()),
            }
        }
        self.run(state, player, action, Vector::new())
    }

    /// Run an action on a copy of `state`, feeding `answers` to target choices.
    pub(crate) fn run(
        &self,
        state: &GameState,
        player: PlayerColor,
        action: &Action,
        answers: Vector<Choice>,
    ) -> Result<GameState, ExecutionError> {
        let mut trial = state.clone();
        trial.choice_tape = ChoiceTape::new(answers);
        trial.players[player].status = None;
        trial.trigger_steps = 0;
        trial.execution_depth = 0;
        self.dispatch(&mut trial, player, action)?;
        apply_abilities(&mut trial, &self.config)?;
        trial.choice_tape = ChoiceTape::default();
        trial.trigger_queue.clear();
        Ok(trial)
    }

    /// Continue a parked action with one more answer.
    fn answer(
        &self,
        state: &GameState,
        player: PlayerColor,
        pending: &PendingChoice,
        choice: Choice,
    ) -> Result<GameState, ExecutionError> {
        if player != pending.request.chooser {
            return Err(IllegalAction::NotYourChoice.into());
        }
        if !pending.request.options.contains(&choice) {
            return Err(IllegalAction::InvalidChoice.into());
        }

        let mut base = state.clone();
        base.pending_choice = None;
        base.players[player].status = None;
        let mut answers = pending.answers.clone();
        answers.push_back(choice);

        match self.run(&base, pending.actor, &pending.action, answers.clone()) {
            Ok(next) => Ok(next),
            Err(ExecutionError::AwaitingChoice(request)) => {
                park(&mut base, pending.actor, pending.action.clone(), answers, request);
                Ok(base)
            }
            Err(ExecutionError::Illegal(reason)) => {
                tracing::debug!(%reason, "parked action no longer legal");
                base.players[pending.actor].status = Some(StatusMessage::error(reason.to_string()));
                Ok(base)
            }
            Err(error) => Err(error),
        }
    }

    fn dispatch(&self, state: &mut GameState, player: PlayerColor, action: &Action) -> Result<(), ExecutionError> {
        let config = &self.config;
        match action {
            Action::StartGame(_) | Action::Unknown => Ok(()),

            Action::PlaceCard { card, tile } => turn::place_card(state, config, player, *card, *tile),
            Action::PlayEvent { card } => turn::play_event(state, config, player, *card),
            Action::MoveRobot { from, to } => turn::move_robot(state, config, player, *from, *to),
            Action::Attack { source, target } => combat::attack(state, config, player, *source, *target),
            Action::MoveRobotAndAttack { from, to, target } => {
                combat::move_and_attack(state, config, player, *from, *to, *target)
            }
            Action::ActivateObject { ability, tile } => turn::activate(state, config, player, *ability, *tile),
            Action::PassTurn => turn::pass_turn(state, config, player),

            Action::AttackRetract => {
                if let Some(attack) = state.attack.as_mut() {
                    attack.retracting = true;
                }
                Ok(())
            }
            Action::AttackComplete => {
                state.attack = None;
                Ok(())
            }

            Action::SetSelectedCard { card } => {
                turn::ensure_in_progress(state)?;
                let ps = &mut state.players[player];
                if *card >= ps.hand.len() {
                    return Err(IllegalAction::NoSuchCard(*card).into());
                }
                ps.selected_card = if ps.selected_card == Some(*card) { None } else { Some(*card) };
                ps.selected_tile = None;
                Ok(())
            }
            Action::SetSelectedTile { tile } => {
                turn::ensure_in_progress(state)?;
                let ps = &mut state.players[player];
                ps.selected_tile = if ps.selected_tile == Some(*tile) { None } else { Some(*tile) };
                Ok(())
            }
            Action::SetSelectedCardInDiscardPile { .. } => Err(IllegalAction::NoPendingChoice.into()),
            Action::Deselect => {
                state.players[player].clear_selection();
                Ok(())
            }
            Action::CancelChoice => Err(IllegalAction::NoPendingChoice.into()),

            Action::RevealCards { cards } => turn::reveal_cards(state, config, cards),
            Action::CompleteRewrite { request, card } => turn::complete_rewrite(state, config, *request, card),

            Action::Forfeit => {
                turn::ensure_in_progress(state)?;
                state.log_event(Some(player), "forfeited");
                cleanup::finish(state, GameResult::Winner(player.opponent()));
                state.pending_choice = None;
                Ok(())
            }
            Action::Abort => {
                turn::ensure_in_progress(state)?;
                cleanup::finish(state, GameResult::Aborted);
                state.pending_choice = None;
                Ok(())
            }
        }
    }
}

fn cancel(state: &GameState, player: PlayerColor, pending: &PendingChoice) -> Result<GameState, ExecutionError> {
    if player != pending.actor || !pending.action.is_cancellable() {
        return Err(IllegalAction::CannotCancel.into());
    }
    let mut next = state.clone();
    next.pending_choice = None;
    next.players[pending.request.chooser].status = None;
    next.players[player].clear_selection();
    tracing::debug!(%player, action = pending.action.type_name(), "choice cancelled");
    Ok(next)
}
