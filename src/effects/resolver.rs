//! Ability interpreter.
//!
//! `Interpreter` executes a `Command` tree against a `GameState` under an
//! `ExecutionContext`. Every state change goes through `game::ops`, which
//! also fires the resulting game events into the trigger queue; nothing
//! here resolves triggers directly.
//!
//! ## Failure modes
//!
//! - A target that resolves to nothing makes its command a no-op.
//! - `Choose` with no recorded answer suspends with
//!   `ExecutionError::AwaitingChoice`; the caller discards the partial
//!   state and re-runs once the answer arrives.
//! - Commands that cannot be carried out as written (spawning an event
//!   card, rewriting a card on the board) are `EngineError::MalformedAbility`.

use serde::{Deserialize, Serialize};

use super::command::{Command, SaveValue, TurnAction};
use super::targeting::{Subject, TargetSet};
use crate::cards::{CardInGame, CardType, StatAdjustment, StatFn};
use crate::core::{
    AbilityId, AbilityInstance, CardId, EngineError, ExecutionError, GameConfig, GameState, ObjectId, PlayerColor,
    RewriteRequest, SavedValue,
};
use crate::game::ops;
use crate::triggers::{EventCause, GameEvent};

/// Bindings visible to a command while it runs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// The player the command acts for.
    pub controller: PlayerColor,
    /// The object whose ability is running.
    pub this: Option<ObjectId>,
    /// The object the triggering event was about.
    pub it: Option<ObjectId>,
    /// The player the triggering event was about.
    pub it_player: PlayerColor,
    /// The other party of the triggering event (attacker, damage source).
    pub that: Option<ObjectId>,
    /// The current element of the innermost `ForEach`.
    pub they: Option<Subject>,
    pub event_amount: Option<i32>,
    /// Ability that is running, if any.
    pub source: Option<AbilityId>,
    /// Trigger nesting level this command runs at.
    pub depth: u32,
}

impl ExecutionContext {
    /// Context for a command played directly by a player (event cards).
    #[must_use]
    pub fn for_player(player: PlayerColor) -> Self {
        Self {
            controller: player,
            this: None,
            it: None,
            it_player: player,
            that: None,
            they: None,
            event_amount: None,
            source: None,
            depth: 0,
        }
    }

    /// Context for an ability of `object`.
    #[must_use]
    pub fn for_object(controller: PlayerColor, object: ObjectId, source: Option<AbilityId>) -> Self {
        Self {
            this: Some(object),
            it: Some(object),
            source,
            ..Self::for_player(controller)
        }
    }

    /// Context for a trigger of `object` responding to `event`.
    #[must_use]
    pub fn for_trigger(
        controller: PlayerColor,
        object: ObjectId,
        ability: AbilityId,
        event: &GameEvent,
        depth: u32,
    ) -> Self {
        Self {
            controller,
            this: Some(object),
            it: Some(event.subject.unwrap_or(object)),
            it_player: event.player,
            that: event.other,
            they: None,
            event_amount: event.amount,
            source: Some(ability),
            depth,
        }
    }

    /// This context with `they` bound to `subject`.
    #[must_use]
    pub fn with_they(&self, subject: Subject) -> Self {
        Self {
            they: Some(subject),
            ..self.clone()
        }
    }
}

/// Executes commands against a state.
pub struct Interpreter<'a> {
    pub(crate) state: &'a mut GameState,
    pub(crate) config: &'a GameConfig,
    /// Passive targets: `Choose` and `Random` are rejected.
    pub(crate) static_only: bool,
}

impl<'a> Interpreter<'a> {
    pub fn new(state: &'a mut GameState, config: &'a GameConfig) -> Self {
        Self {
            state,
            config,
            static_only: false,
        }
    }

    /// An interpreter for evaluating passive ability targets.
    pub fn passive(state: &'a mut GameState, config: &'a GameConfig) -> Self {
        Self {
            state,
            config,
            static_only: true,
        }
    }

    /// Execute a command tree.
    pub fn execute(&mut self, command: &Command, ctx: &ExecutionContext) -> Result<(), ExecutionError> {
        if self.state.winner.is_some() {
            return Ok(());
        }
        match command {
            Command::Sequence(commands) => {
                for command in commands {
                    self.execute(command, ctx)?;
                }
            }
            Command::If { condition, then } => {
                if self.check(condition, ctx)? {
                    self.execute(then, ctx)?;
                }
            }
            Command::ForEach { collection, body } => {
                let members = self.evaluate_collection(collection, ctx)?;
                for subject in members.subjects() {
                    if let Subject::Object(id) = subject {
                        if self.state.find_object(id).is_none() {
                            continue;
                        }
                    }
                    self.execute(body, &ctx.with_they(subject))?;
                }
            }
            Command::DealDamage { target, amount } => {
                let amount = self.evaluate_number(amount, ctx)?;
                for id in self.resolve_target(target, ctx)?.objects(self.state) {
                    ops::deal_damage(self.state, id, amount, ctx.this, EventCause::Effect);
                }
            }
            Command::Destroy { target } => {
                for id in self.resolve_target(target, ctx)?.objects(self.state) {
                    ops::destroy(self.state, id);
                }
            }
            Command::RestoreHealth { target } => {
                for id in self.resolve_target(target, ctx)?.objects(self.state) {
                    if let Some(object) = self.state.object_mut(id) {
                        object.damage = 0;
                    }
                }
            }
            Command::ModifyAttribute {
                target,
                attribute,
                func,
                duration,
            } => {
                let value = self.evaluate_number(&func.operand, ctx)?;
                let mut adjustment = StatAdjustment::permanent(*attribute, StatFn { op: func.op, value });
                if let Some(duration) = duration {
                    adjustment = adjustment.with_duration(*duration);
                }
                let targets = self.resolve_target(target, ctx)?;
                self.adjust(&targets, adjustment);
            }
            Command::MoveObject { target, destination } => {
                let object = self.resolve_target(target, ctx)?.objects(self.state).first().copied();
                let hex = self.resolve_target(destination, ctx)?.hexes(self.state).first().copied();
                if let (Some(id), Some(to)) = (object, hex) {
                    if self.config.on_board(to) && !self.state.board.contains_key(&to) {
                        if let Some(from) = self.state.hex_of(id) {
                            ops::move_object(self.state, from, to);
                        }
                    }
                }
            }
            Command::ReturnToHand { target } => {
                for id in self.resolve_target(target, ctx)?.objects(self.state) {
                    ops::return_to_hand(self.state, self.config, id);
                }
            }
            Command::SpawnObject { card, tile, owner } => {
                if !card.card_type.is_object() || card.card_type == CardType::Kernel {
                    return Err(EngineError::MalformedAbility(format!("cannot spawn {} card", card.name)).into());
                }
                let owner = self.resolve_players(owner, ctx)?.first().copied().unwrap_or(ctx.controller);
                let hex = self.resolve_target(tile, ctx)?.hexes(self.state).first().copied();
                if let Some(hex) = hex.filter(|h| self.config.on_board(*h) && !self.state.board.contains_key(h)) {
                    let id = CardId(self.state.alloc_id());
                    ops::place_object(self.state, owner, CardInGame::new(id, (**card).clone()), hex);
                }
            }
            Command::GiveAbility { target, ability } => {
                for id in self.resolve_target(target, ctx)?.objects(self.state) {
                    let instance = AbilityInstance {
                        id: AbilityId(self.state.alloc_id()),
                        ability: (**ability).clone(),
                        granted_by: None,
                    };
                    if let Some(object) = self.state.object_mut(id) {
                        object.abilities.push_back(instance);
                    }
                }
            }
            Command::AllowAgain { target, action } => {
                for id in self.resolve_target(target, ctx)?.objects(self.state) {
                    if let Some(object) = self.state.object_mut(id) {
                        match action {
                            TurnAction::Move => {
                                object.cant_move = false;
                                object.moves_used = 0;
                            }
                            TurnAction::Attack => object.cant_attack = false,
                            TurnAction::Activate => object.cant_activate = false,
                        }
                    }
                }
            }
            Command::Draw { player, count } => {
                let count = self.evaluate_number(count, ctx)?.max(0) as usize;
                for player in self.resolve_players(player, ctx)? {
                    ops::draw_cards(self.state, self.config, player, count);
                }
            }
            Command::Discard { target } => {
                let targets = self.resolve_target(target, ctx)?;
                for card in targets.hand_cards() {
                    ops::discard_from_hand(self.state, *card);
                }
            }
            Command::ModifyEnergy { player, func } => {
                let value = self.evaluate_number(&func.operand, ctx)?;
                let f = StatFn { op: func.op, value };
                for player in self.resolve_players(player, ctx)? {
                    let energy = &mut self.state.players[player].energy;
                    energy.available = f.apply(energy.available).max(0);
                }
            }
            Command::RewriteCardText { target, text } => {
                let targets = self.resolve_target(target, ctx)?;
                if !matches!(targets, TargetSet::CardsInHand(_)) && !targets.is_empty() {
                    return Err(EngineError::MalformedAbility("only cards in hand can be rewritten".into()).into());
                }
                for card in targets.hand_cards() {
                    let Some(location) = self.state.find_card(*card) else {
                        continue;
                    };
                    let request = RewriteRequest {
                        id: self.state.alloc_id(),
                        player: location.player,
                        card: *card,
                        text: text.clone(),
                    };
                    tracing::debug!(request = request.id, card = %card, "rewrite requested");
                    self.state.pending_rewrites.push_back(request);
                }
            }
            Command::Save { key, value } => {
                let saved = match value {
                    SaveValue::Target(target) => SavedValue::Targets(self.resolve_target(target, ctx)?),
                    SaveValue::Number(number) => SavedValue::Number(self.evaluate_number(number, ctx)?),
                };
                self.state.memory.insert(key.clone(), saved);
            }
        }
        Ok(())
    }

    fn adjust(&mut self, targets: &TargetSet, adjustment: StatAdjustment) {
        match targets {
            TargetSet::CardsInHand(cards) | TargetSet::CardsInDiscardPile(cards) => {
                for card in cards {
                    if let Some(location) = self.state.find_card(*card) {
                        if let Some(card) = self.state.card_mut(location) {
                            card.adjustments.push(adjustment.clone());
                        }
                    }
                }
            }
            _ => {
                for id in targets.objects(self.state) {
                    if let Some(object) = self.state.object_mut(id) {
                        object.adjustments.push(adjustment.clone());
                    }
                }
            }
        }
    }
}
