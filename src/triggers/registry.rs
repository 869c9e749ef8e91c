//! Trigger lookup.
//!
//! There is no separate registry to keep in sync: triggered abilities live on
//! the objects that carry them, so matching an event is a scan of the board.
//! Matches are returned in board scan order, then ability binding order,
//! which makes trigger ordering a pure function of the state.

use crate::core::GameState;
use crate::effects::{Ability, ExecutionContext};
use crate::stack::QueuedTrigger;

use super::event::GameEvent;

/// Every triggered ability on the board that responds to `event`.
///
/// Each match carries its execution context, built from the event at the
/// moment it fired, and runs at `depth`.
#[must_use]
pub fn collect_triggers(state: &GameState, event: &GameEvent, depth: u32) -> Vec<QueuedTrigger> {
    let mut matched = Vec::new();
    for (_, object) in state.objects() {
        for instance in object.abilities.iter() {
            let Ability::Triggered(triggered) = &instance.ability else {
                continue;
            };
            if triggered.trigger.matches(event, object.id, object.owner) {
                matched.push(QueuedTrigger {
                    ability: instance.id,
                    owner: object.id,
                    command: triggered.command.clone(),
                    context: ExecutionContext::for_trigger(object.owner, object.id, instance.id, event, depth),
                });
            }
        }
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::HexId;
    use crate::cards::{CardDefinition, CardInGame, CardType};
    use crate::core::{AbilityId, AbilityInstance, CardId, Object, ObjectId, PlayerColor};
    use crate::effects::{Command, PlayerTarget};
    use crate::triggers::{EventKind, TriggerSpec};
    use im::Vector;

    fn watcher(id: u32, spec: TriggerSpec) -> Object {
        let ability = Ability::triggered(spec, Command::Sequence(vec![]));
        let abilities = Vector::from(vec![AbilityInstance {
            id: AbilityId(id + 100),
            ability,
            granted_by: None,
        }]);
        let card = CardInGame::new(CardId(id), CardDefinition::robot("Watcher", 1, 1, 1, 1));
        Object::new(ObjectId(id), PlayerColor::Orange, card, abilities)
    }

    #[test]
    fn test_collect_in_scan_order() {
        let mut state = GameState::new(1);
        let spec = TriggerSpec::player(EventKind::BeginningOfTurn, PlayerTarget::Controller);
        state.insert_object(HexId::new(1, 0), watcher(1, spec.clone()));
        state.insert_object(HexId::new(-1, 0), watcher(2, spec));

        let event = GameEvent::for_player(EventKind::BeginningOfTurn, PlayerColor::Orange);
        let matched = collect_triggers(&state, &event, 1);

        let owners: Vec<_> = matched.iter().map(|t| t.owner).collect();
        assert_eq!(owners, vec![ObjectId(2), ObjectId(1)]);
        assert!(matched.iter().all(|t| t.context.depth == 1));
    }

    #[test]
    fn test_this_trigger_binds_context() {
        let mut state = GameState::new(1);
        let spec = TriggerSpec::this(EventKind::AfterDamageReceived);
        state.insert_object(HexId::new(0, 0), watcher(1, spec));

        let event = GameEvent::for_object(EventKind::AfterDamageReceived, ObjectId(1), CardType::Robot, PlayerColor::Orange)
            .with_other(ObjectId(9))
            .with_amount(3);
        let matched = collect_triggers(&state, &event, 2);

        assert_eq!(matched.len(), 1);
        let ctx = &matched[0].context;
        assert_eq!(ctx.this, Some(ObjectId(1)));
        assert_eq!(ctx.that, Some(ObjectId(9)));
        assert_eq!(ctx.event_amount, Some(3));
        assert_eq!(ctx.source, Some(AbilityId(101)));

        let elsewhere = GameEvent::for_object(EventKind::AfterDamageReceived, ObjectId(7), CardType::Robot, PlayerColor::Orange);
        assert!(collect_triggers(&state, &elsewhere, 2).is_empty());
    }
}
