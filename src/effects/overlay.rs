//! Passive ability overlay.
//!
//! Passive abilities never mutate base data. After every resolution step the
//! overlay recomputes, from scratch, what each passive on the board wants to
//! grant (stat adjustments, statuses, abilities) and rewrites only the
//! holders whose grants changed. Grants feed back into targeting (a buff can
//! make a robot match another passive's condition), so the pass repeats
//! until nothing changes or `max_overlay_passes` is reached.

use std::collections::BTreeMap;

use im::Vector;

use super::command::{Ability, PassiveAbility, PassiveEffect};
use super::resolver::{ExecutionContext, Interpreter};
use super::targeting::TargetSet;
use crate::cards::{AdjustmentSource, StatAdjustment, StatAdjustments, StatFn};
use crate::core::{
    AbilityId, AbilityInstance, CardId, EngineError, ExecutionError, GameConfig, GameState, Object, ObjectId,
    PlayerColor, StatusGrant,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Holder {
    Object(ObjectId),
    Card(CardId),
}

#[derive(Debug, Default)]
struct Grants {
    adjustments: Vec<StatAdjustment>,
    statuses: Vec<StatusGrant>,
    abilities: Vec<(AbilityId, Ability)>,
}

/// Bring every ability-derived grant in line with the passives on the board.
pub fn apply_abilities(state: &mut GameState, config: &GameConfig) -> Result<(), EngineError> {
    for _ in 0..config.max_overlay_passes {
        if !reconcile(state, config)? {
            return Ok(());
        }
    }
    tracing::warn!(passes = config.max_overlay_passes, "passive abilities did not settle");
    Ok(())
}

/// One pass. Returns whether anything changed.
fn reconcile(state: &mut GameState, config: &GameConfig) -> Result<bool, EngineError> {
    let passives: Vec<(AbilityId, ObjectId, PlayerColor, PassiveAbility)> = state
        .objects()
        .flat_map(|(_, object)| {
            object.abilities.iter().filter_map(move |instance| match &instance.ability {
                Ability::Passive(passive) => Some((instance.id, object.id, object.owner, passive.clone())),
                _ => None,
            })
        })
        .collect();

    let mut desired: BTreeMap<Holder, Grants> = BTreeMap::new();
    for (ability, object, controller, passive) in passives {
        let ctx = ExecutionContext::for_object(controller, object, Some(ability));
        let mut interpreter = Interpreter::passive(state, config);
        let targets = interpreter.resolve_target(&passive.targets, &ctx).map_err(into_engine)?;
        let holders = holders_of(&targets, interpreter.state);

        match &passive.effect {
            PassiveEffect::AttributeAdjustment { attribute, func } => {
                let value = interpreter.evaluate_number(&func.operand, &ctx).map_err(into_engine)?;
                let adjustment = StatAdjustment::from_ability(*attribute, StatFn { op: func.op, value }, ability);
                for holder in holders {
                    desired.entry(holder).or_default().adjustments.push(adjustment.clone());
                }
            }
            PassiveEffect::Status(status) => {
                for holder in holders.into_iter().filter(|h| matches!(h, Holder::Object(_))) {
                    desired.entry(holder).or_default().statuses.push(StatusGrant {
                        status: *status,
                        source: ability,
                    });
                }
            }
            PassiveEffect::GrantAbility(granted) => {
                for holder in holders.into_iter().filter(|h| matches!(h, Holder::Object(_))) {
                    desired.entry(holder).or_default().abilities.push((ability, (**granted).clone()));
                }
            }
        }
    }

    let mut changed = false;
    let mut next_id = state.next_id;
    let hexes: Vec<_> = state.board.keys().copied().collect();
    for hex in hexes {
        if let Some(object) = state.object_at_mut(hex) {
            let wanted = desired.remove(&Holder::Object(object.id)).unwrap_or_default();
            changed |= sync_object(object, wanted, &mut next_id);
        }
    }
    state.next_id = next_id;

    for player in PlayerColor::ALL {
        for card in state.players[player].hand.iter_mut() {
            let wanted = desired.remove(&Holder::Card(card.id)).unwrap_or_default();
            changed |= sync_adjustments(&mut card.adjustments, wanted.adjustments);
        }
    }
    Ok(changed)
}

fn into_engine(error: ExecutionError) -> EngineError {
    match error {
        ExecutionError::Engine(error) => error,
        other => EngineError::MalformedAbility(other.to_string()),
    }
}

fn holders_of(targets: &TargetSet, state: &GameState) -> Vec<Holder> {
    match targets {
        TargetSet::CardsInHand(cards) => cards.iter().copied().map(Holder::Card).collect(),
        TargetSet::CardsInDiscardPile(_) => Vec::new(),
        _ => targets.objects(state).into_iter().map(Holder::Object).collect(),
    }
}

fn sync_adjustments(adjustments: &mut StatAdjustments, wanted: Vec<StatAdjustment>) -> bool {
    let current: Vec<StatAdjustment> = adjustments
        .iter()
        .filter(|a| matches!(a.source, AdjustmentSource::Ability(_)))
        .cloned()
        .collect();
    if current == wanted {
        return false;
    }
    for source in adjustments.ability_sources() {
        adjustments.remove_source(source);
    }
    for adjustment in wanted {
        adjustments.push(adjustment);
    }
    true
}

fn sync_object(object: &mut Object, wanted: Grants, next_id: &mut u32) -> bool {
    let mut changed = sync_adjustments(&mut object.adjustments, wanted.adjustments);

    let statuses: Vector<StatusGrant> = wanted.statuses.into_iter().collect();
    if object.statuses != statuses {
        object.statuses = statuses;
        changed = true;
    }

    let current: Vec<(AbilityId, Ability)> = object
        .abilities
        .iter()
        .filter_map(|i| i.granted_by.map(|source| (source, i.ability.clone())))
        .collect();
    if current != wanted.abilities {
        let mut abilities: Vector<AbilityInstance> =
            object.abilities.iter().filter(|i| i.granted_by.is_none()).cloned().collect();
        for (source, ability) in wanted.abilities {
            let existing = object
                .abilities
                .iter()
                .find(|i| i.granted_by == Some(source) && i.ability == ability)
                .map(|i| i.id);
            let id = existing.unwrap_or_else(|| {
                let id = AbilityId(*next_id);
                *next_id += 1;
                id
            });
            abilities.push_back(AbilityInstance {
                id,
                ability,
                granted_by: Some(source),
            });
        }
        object.abilities = abilities;
        changed = true;
    }
    changed
}
