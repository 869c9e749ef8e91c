//! Target resolution.
//!
//! Evaluates `Target`, `PlayerTarget`, `Collection`, `Condition`, `Number` and
//! `GlobalCondition` against the current state, producing typed `TargetSet`s.
//!
//! ## Choice and randomness
//!
//! - `Choose` consumes the next recorded answer from the state's choice
//!   tape. With no answer left it suspends execution with
//!   `ExecutionError::AwaitingChoice`. An empty candidate set, or a recorded
//!   answer that is no longer a candidate, yields an empty set and the
//!   command using it does nothing.
//! - `Random` draws from the state's seeded RNG only.
//!
//! Conditions that reference other targets are resolved once per collection,
//! before filtering, so a nested `Choose` asks only one question.

use serde::{Deserialize, Serialize};

use super::command::{Collection, Comparison, Condition, GlobalCondition, Number, PlayerTarget, Target};
use super::resolver::{ExecutionContext, Interpreter};
use crate::board::HexId;
use crate::cards::{Attribute, CardType};
use crate::core::{
    CardId, CardZone, Choice, ChoiceRequest, EngineError, ExecutionError, GameState, ObjectId, PlayerColor,
    SavedValue,
};

/// A typed set of selectable entities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TargetSet {
    Objects(Vec<ObjectId>),
    Players(Vec<PlayerColor>),
    Hexes(Vec<HexId>),
    CardsInHand(Vec<CardId>),
    CardsInDiscardPile(Vec<CardId>),
}

/// A single member of a `TargetSet`; what `They` is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Subject {
    Object(ObjectId),
    Player(PlayerColor),
    Hex(HexId),
    Card(CardId),
}

impl Subject {
    /// The player who controls this subject.
    #[must_use]
    pub fn owner(self, state: &GameState) -> Option<PlayerColor> {
        match self {
            Subject::Object(id) => state.find_object(id).map(|(_, o)| o.owner),
            Subject::Player(player) => Some(player),
            Subject::Hex(hex) => state.object_at(hex).map(|o| o.owner),
            Subject::Card(id) => state.find_card(id).map(|l| l.player),
        }
    }

    /// Where the subject is on the board.
    #[must_use]
    pub fn hex(self, state: &GameState) -> Option<HexId> {
        match self {
            Subject::Object(id) => state.hex_of(id),
            Subject::Player(player) => state.kernel_hex(player),
            Subject::Hex(hex) => Some(hex),
            Subject::Card(_) => None,
        }
    }

    /// Effective attribute value.
    #[must_use]
    pub fn attribute(self, state: &GameState, attribute: Attribute) -> Option<i32> {
        match self {
            Subject::Object(id) => state.find_object(id).and_then(|(_, o)| o.attribute(attribute)),
            Subject::Hex(hex) => state.object_at(hex).and_then(|o| o.attribute(attribute)),
            Subject::Card(id) => {
                let location = state.find_card(id)?;
                let ps = &state.players[location.player];
                let pile = match location.zone {
                    CardZone::Hand => &ps.hand,
                    CardZone::Deck => &ps.deck,
                    CardZone::Discard => &ps.discard,
                };
                pile.get(location.index).and_then(|c| c.attribute(attribute))
            }
            Subject::Player(_) => None,
        }
    }
}

impl TargetSet {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            TargetSet::Objects(v) => v.len(),
            TargetSet::Players(v) => v.len(),
            TargetSet::Hexes(v) => v.len(),
            TargetSet::CardsInHand(v) | TargetSet::CardsInDiscardPile(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Members in order.
    #[must_use]
    pub fn subjects(&self) -> Vec<Subject> {
        match self {
            TargetSet::Objects(v) => v.iter().copied().map(Subject::Object).collect(),
            TargetSet::Players(v) => v.iter().copied().map(Subject::Player).collect(),
            TargetSet::Hexes(v) => v.iter().copied().map(Subject::Hex).collect(),
            TargetSet::CardsInHand(v) | TargetSet::CardsInDiscardPile(v) => {
                v.iter().copied().map(Subject::Card).collect()
            }
        }
    }

    /// The objects this set refers to that are still on the board.
    ///
    /// Hexes refer to their occupants and players to their kernels.
    #[must_use]
    pub fn objects(&self, state: &GameState) -> Vec<ObjectId> {
        match self {
            TargetSet::Objects(ids) => ids.iter().copied().filter(|id| state.find_object(*id).is_some()).collect(),
            TargetSet::Hexes(hexes) => hexes.iter().filter_map(|h| state.object_at(*h).map(|o| o.id)).collect(),
            TargetSet::Players(players) => players
                .iter()
                .filter_map(|p| state.kernel_hex(*p))
                .filter_map(|h| state.object_at(h).map(|o| o.id))
                .collect(),
            TargetSet::CardsInHand(_) | TargetSet::CardsInDiscardPile(_) => Vec::new(),
        }
    }

    /// Board positions of the members.
    #[must_use]
    pub fn hexes(&self, state: &GameState) -> Vec<HexId> {
        self.subjects().into_iter().filter_map(|s| s.hex(state)).collect()
    }

    /// Controllers of the members, deduplicated, in seat order.
    #[must_use]
    pub fn players(&self, state: &GameState) -> Vec<PlayerColor> {
        let owners: Vec<_> = self.subjects().into_iter().filter_map(|s| s.owner(state)).collect();
        PlayerColor::ALL.into_iter().filter(|p| owners.contains(p)).collect()
    }

    /// Cards in hand referenced by this set.
    #[must_use]
    pub fn hand_cards(&self) -> &[CardId] {
        match self {
            TargetSet::CardsInHand(ids) => ids,
            _ => &[],
        }
    }

    fn empty_like(&self) -> Self {
        self.pick(&[])
    }

    fn pick(&self, indices: &[usize]) -> Self {
        fn take<T: Copy>(v: &[T], indices: &[usize]) -> Vec<T> {
            indices.iter().filter_map(|&i| v.get(i).copied()).collect()
        }
        match self {
            TargetSet::Objects(v) => TargetSet::Objects(take(v, indices)),
            TargetSet::Players(v) => TargetSet::Players(take(v, indices)),
            TargetSet::Hexes(v) => TargetSet::Hexes(take(v, indices)),
            TargetSet::CardsInHand(v) => TargetSet::CardsInHand(take(v, indices)),
            TargetSet::CardsInDiscardPile(v) => TargetSet::CardsInDiscardPile(take(v, indices)),
        }
    }

    /// How each member is named by a selection action.
    fn choice_for(&self, index: usize, state: &GameState) -> Option<Choice> {
        match self {
            TargetSet::Objects(v) => v.get(index).and_then(|id| state.hex_of(*id)).map(Choice::Tile),
            TargetSet::Players(v) => v.get(index).and_then(|p| state.kernel_hex(*p)).map(Choice::Tile),
            TargetSet::Hexes(v) => v.get(index).copied().map(Choice::Tile),
            TargetSet::CardsInHand(v) => v.get(index).copied().map(Choice::HandCard),
            TargetSet::CardsInDiscardPile(v) => v.get(index).copied().map(Choice::DiscardCard),
        }
    }

    fn choice_options(&self, state: &GameState) -> Vec<Choice> {
        (0..self.len()).filter_map(|i| self.choice_for(i, state)).collect()
    }

    fn select(&self, choice: Choice, state: &GameState) -> Option<Self> {
        let index = (0..self.len()).find(|&i| self.choice_for(i, state) == Some(choice))?;
        Some(self.pick(&[index]))
    }
}

/// A condition with its target references already resolved.
enum ResolvedCondition {
    ControlledBy(Vec<PlayerColor>),
    Near { hexes: Vec<HexId>, distance: i32 },
    Attribute { attribute: Attribute, comparison: Comparison, value: i32 },
    NotThis(Option<ObjectId>),
    Damaged,
    Unoccupied,
}

impl ResolvedCondition {
    fn holds(&self, subject: Subject, state: &GameState) -> bool {
        match self {
            ResolvedCondition::ControlledBy(players) => subject.owner(state).is_some_and(|o| players.contains(&o)),
            ResolvedCondition::Near { hexes, distance } => subject.hex(state).is_some_and(|h| {
                hexes.iter().any(|x| {
                    let d = x.distance(h);
                    d >= 1 && d <= *distance
                })
            }),
            ResolvedCondition::Attribute { attribute, comparison, value } => subject
                .attribute(state, *attribute)
                .is_some_and(|v| comparison.holds(v, *value)),
            ResolvedCondition::NotThis(this) => match (subject, this) {
                (Subject::Object(id), Some(this)) => id != *this,
                (Subject::Hex(hex), Some(this)) => state.object_at(hex).map_or(true, |o| o.id != *this),
                _ => true,
            },
            ResolvedCondition::Damaged => match subject {
                Subject::Object(id) => state.find_object(id).is_some_and(|(_, o)| o.damage > 0),
                Subject::Hex(hex) => state.object_at(hex).is_some_and(|o| o.damage > 0),
                _ => false,
            },
            ResolvedCondition::Unoccupied => match subject {
                Subject::Hex(hex) => !state.board.contains_key(&hex),
                _ => false,
            },
        }
    }
}

impl Interpreter<'_> {
    /// Resolve a target reference.
    pub fn resolve_target(&mut self, target: &Target, ctx: &ExecutionContext) -> Result<TargetSet, ExecutionError> {
        let alive = |state: &GameState, id: Option<ObjectId>| {
            TargetSet::Objects(id.filter(|id| state.find_object(*id).is_some()).into_iter().collect())
        };
        let state = &*self.state;
        match target {
            Target::This => Ok(alive(state, ctx.this)),
            Target::It => Ok(alive(state, ctx.it.or(ctx.this))),
            Target::That => Ok(alive(state, ctx.that)),
            Target::They => match ctx.they {
                Some(Subject::Object(id)) => Ok(alive(state, Some(id))),
                Some(Subject::Player(player)) => Ok(TargetSet::Players(vec![player])),
                Some(Subject::Hex(hex)) => Ok(TargetSet::Hexes(vec![hex])),
                Some(Subject::Card(id)) => Ok(match state.find_card(id).map(|l| l.zone) {
                    Some(CardZone::Discard) => TargetSet::CardsInDiscardPile(vec![id]),
                    Some(CardZone::Hand) => TargetSet::CardsInHand(vec![id]),
                    _ => TargetSet::CardsInHand(Vec::new()),
                }),
                None => Ok(alive(state, ctx.it.or(ctx.this))),
            },
            Target::Choose(collection) => {
                self.ensure_dynamic("choose")?;
                let candidates = self.evaluate_collection(collection, ctx)?;
                self.choose(candidates, ctx)
            }
            Target::Random { count, collection } => {
                self.ensure_dynamic("random")?;
                let count = self.evaluate_number(count, ctx)?.max(0) as usize;
                let candidates = self.evaluate_collection(collection, ctx)?;
                let indices = self.state.rng.sample_indices(candidates.len(), count);
                Ok(candidates.pick(&indices))
            }
            Target::All(collection) => self.evaluate_collection(collection, ctx),
            Target::Saved(key) => Ok(match self.state.memory.get(key) {
                Some(SavedValue::Targets(set)) => set.clone(),
                _ => TargetSet::Objects(Vec::new()),
            }),
        }
    }

    fn choose(&mut self, candidates: TargetSet, ctx: &ExecutionContext) -> Result<TargetSet, ExecutionError> {
        if candidates.is_empty() {
            tracing::debug!("choice abandoned: no candidates");
            return Ok(candidates);
        }
        let options = candidates.choice_options(self.state);
        match self.state.choice_tape.next_answer() {
            Some(answer) => Ok(candidates.select(answer, self.state).unwrap_or_else(|| {
                tracing::warn!(?answer, "recorded choice is no longer a candidate; target abandoned");
                candidates.empty_like()
            })),
            None => Err(ExecutionError::AwaitingChoice(ChoiceRequest {
                chooser: ctx.controller,
                options,
            })),
        }
    }

    fn ensure_dynamic(&self, what: &str) -> Result<(), ExecutionError> {
        if self.static_only {
            return Err(EngineError::MalformedAbility(format!("{what} is not allowed in a passive ability")).into());
        }
        Ok(())
    }

    /// Resolve a player reference, in seat order.
    pub fn resolve_players(
        &mut self,
        target: &PlayerTarget,
        ctx: &ExecutionContext,
    ) -> Result<Vec<PlayerColor>, ExecutionError> {
        Ok(match target {
            PlayerTarget::Controller => vec![ctx.controller],
            PlayerTarget::Opponent => vec![ctx.controller.opponent()],
            PlayerTarget::AllPlayers => PlayerColor::ALL.to_vec(),
            PlayerTarget::ItP => vec![ctx.it_player],
            PlayerTarget::TheyP => vec![ctx.they.and_then(|s| s.owner(self.state)).unwrap_or(ctx.it_player)],
            PlayerTarget::ControllerOf(target) => self.resolve_target(target, ctx)?.players(self.state),
        })
    }

    /// Evaluate a collection against the current state.
    pub fn evaluate_collection(
        &mut self,
        collection: &Collection,
        ctx: &ExecutionContext,
    ) -> Result<TargetSet, ExecutionError> {
        match collection {
            Collection::Objects { types, conditions } => {
                let conditions = self.resolve_conditions(conditions, ctx)?;
                let state = &*self.state;
                let ids = state
                    .objects()
                    .filter(|(_, o)| types.is_empty() || types.contains(&o.card_type()))
                    .filter(|(_, o)| conditions.iter().all(|c| c.holds(Subject::Object(o.id), state)))
                    .map(|(_, o)| o.id)
                    .collect();
                Ok(TargetSet::Objects(ids))
            }
            Collection::CardsInHand { player, card_type, conditions } => {
                let ids = self.filter_cards(player, *card_type, conditions, CardZone::Hand, ctx)?;
                Ok(TargetSet::CardsInHand(ids))
            }
            Collection::CardsInDiscardPile { player, card_type, conditions } => {
                let ids = self.filter_cards(player, *card_type, conditions, CardZone::Discard, ctx)?;
                Ok(TargetSet::CardsInDiscardPile(ids))
            }
            Collection::AllTiles => Ok(TargetSet::Hexes(HexId::all_within(self.config.board_radius))),
            Collection::EmptyTiles => {
                let hexes = HexId::all_within(self.config.board_radius)
                    .into_iter()
                    .filter(|h| !self.state.board.contains_key(h))
                    .collect();
                Ok(TargetSet::Hexes(hexes))
            }
            Collection::Tiles(conditions) => {
                let conditions = self.resolve_conditions(conditions, ctx)?;
                let state = &*self.state;
                let hexes = HexId::all_within(self.config.board_radius)
                    .into_iter()
                    .filter(|h| conditions.iter().all(|c| c.holds(Subject::Hex(*h), state)))
                    .collect();
                Ok(TargetSet::Hexes(hexes))
            }
        }
    }

    fn filter_cards(
        &mut self,
        player: &PlayerTarget,
        card_type: Option<CardType>,
        conditions: &[Condition],
        zone: CardZone,
        ctx: &ExecutionContext,
    ) -> Result<Vec<CardId>, ExecutionError> {
        let players = self.resolve_players(player, ctx)?;
        let conditions = self.resolve_conditions(conditions, ctx)?;
        let state = &*self.state;
        let mut ids = Vec::new();
        for player in players {
            let ps = &state.players[player];
            let pile = if zone == CardZone::Hand { &ps.hand } else { &ps.discard };
            ids.extend(
                pile.iter()
                    .filter(|c| card_type.map_or(true, |t| c.card_type() == t))
                    .filter(|c| conditions.iter().all(|cond| cond.holds(Subject::Card(c.id), state)))
                    .map(|c| c.id),
            );
        }
        Ok(ids)
    }

    fn resolve_conditions(
        &mut self,
        conditions: &[Condition],
        ctx: &ExecutionContext,
    ) -> Result<Vec<ResolvedCondition>, ExecutionError> {
        conditions
            .iter()
            .map(|condition| -> Result<ResolvedCondition, ExecutionError> {
                Ok(match condition {
                    Condition::ControlledBy(player) => ResolvedCondition::ControlledBy(self.resolve_players(player, ctx)?),
                    Condition::AdjacentTo(target) => ResolvedCondition::Near {
                        hexes: self.resolve_target(target, ctx)?.hexes(self.state),
                        distance: 1,
                    },
                    Condition::WithinDistanceOf { distance, target } => ResolvedCondition::Near {
                        hexes: self.resolve_target(target, ctx)?.hexes(self.state),
                        distance: *distance,
                    },
                    Condition::AttributeComparison { attribute, comparison, value } => ResolvedCondition::Attribute {
                        attribute: *attribute,
                        comparison: *comparison,
                        value: self.evaluate_number(value, ctx)?,
                    },
                    Condition::Other => ResolvedCondition::NotThis(ctx.this),
                    Condition::Damaged => ResolvedCondition::Damaged,
                    Condition::Unoccupied => ResolvedCondition::Unoccupied,
                })
            })
            .collect()
    }

    /// Evaluate a numeric argument.
    pub fn evaluate_number(&mut self, number: &Number, ctx: &ExecutionContext) -> Result<i32, ExecutionError> {
        Ok(match number {
            Number::Literal(n) => *n,
            Number::Count(collection) => self.evaluate_collection(collection, ctx)?.len() as i32,
            Number::AttributeSum { target, attribute } => {
                let set = self.resolve_target(target, ctx)?;
                set.subjects()
                    .into_iter()
                    .filter_map(|s| s.attribute(self.state, *attribute))
                    .sum()
            }
            Number::EnergyOf(player) => self
                .resolve_players(player, ctx)?
                .into_iter()
                .map(|p| self.state.players[p].energy.available)
                .sum(),
            Number::HandSize(player) => self
                .resolve_players(player, ctx)?
                .into_iter()
                .map(|p| self.state.players[p].hand.len() as i32)
                .sum(),
            Number::EventAmount => ctx.event_amount.unwrap_or(0),
            Number::Saved(key) => match self.state.memory.get(key) {
                Some(SavedValue::Number(n)) => *n,
                Some(SavedValue::Targets(set)) => set.len() as i32,
                None => 0,
            },
        })
    }

    /// Evaluate a global condition.
    pub fn check(&mut self, condition: &GlobalCondition, ctx: &ExecutionContext) -> Result<bool, ExecutionError> {
        Ok(match condition {
            GlobalCondition::Exists(collection) => !self.evaluate_collection(collection, ctx)?.is_empty(),
            GlobalCondition::Compare { left, comparison, right } => {
                let left = self.evaluate_number(left, ctx)?;
                let right = self.evaluate_number(right, ctx)?;
                comparison.holds(left, right)
            }
            GlobalCondition::Not(inner) => !self.check(inner, ctx)?,
        })
    }
}
