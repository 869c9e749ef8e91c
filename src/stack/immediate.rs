//! Immediate resolution: drain the trigger queue until the board is quiet.
//!
//! There is no priority window. Queued triggers simply run in order, with
//! state-based checks (passives, deaths, victory) between every step.

use crate::core::{ExecutionError, GameConfig, GameState};
use crate::effects::{apply_abilities, Interpreter};
use crate::game::cleanup;

/// Resolve all pending work.
///
/// Each iteration:
/// 1. Stop if the game is decided (the queue is discarded)
/// 2. Recompute passive abilities
/// 3. Remove dead objects; if any died, start over so their
///    `AfterDestroyed` triggers and any lost auras are accounted for
/// 4. Check for destroyed kernels
/// 5. Run the next queued trigger
pub fn settle(state: &mut GameState, config: &GameConfig) -> Result<(), ExecutionError> {
    loop {
        if state.winner.is_some() {
            state.trigger_queue.clear();
            return Ok(());
        }

        apply_abilities(state, config)?;

        if cleanup::remove_dead(state) {
            continue;
        }
        if cleanup::check_victory(state) {
            continue;
        }

        let Some(trigger) = state.trigger_queue.pop_front() else {
            return Ok(());
        };
        state.trigger_steps += 1;

        if trigger.context.depth > config.max_execution_depth {
            cleanup::declare_draw(state, "Trigger chain too deep");
            continue;
        }
        if state.trigger_steps > config.max_trigger_steps {
            cleanup::declare_draw(state, "Too many triggers in one action");
            continue;
        }

        tracing::trace!(ability = %trigger.ability, depth = trigger.context.depth, "running trigger");
        let outer = state.execution_depth;
        state.execution_depth = trigger.context.depth;
        let result = Interpreter::new(state, config).execute(&trigger.command, &trigger.context);
        state.execution_depth = outer;
        result?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::HexId;
    use crate::cards::{CardDefinition, CardInGame, CardType};
    use crate::core::{AbilityId, AbilityInstance, CardId, Object, ObjectId, PlayerColor};
    use crate::effects::{Ability, Collection, Command, Condition, Number, Target};
    use crate::rules::GameResult;
    use crate::stack::fire;
    use crate::triggers::{EventKind, GameEvent, TriggerSpec};
    use im::Vector;

    fn put(state: &mut GameState, hex: HexId, owner: PlayerColor, card: CardDefinition) -> ObjectId {
        let id = state.alloc_id();
        let abilities = card
            .abilities
            .iter()
            .map(|a| AbilityInstance {
                id: AbilityId(state.alloc_id()),
                ability: a.clone(),
                granted_by: None,
            })
            .collect();
        state.insert_object(hex, Object::new(ObjectId(id), owner, CardInGame::new(CardId(id), card), abilities));
        ObjectId(id)
    }

    fn with_kernels(state: &mut GameState) {
        state.started = true;
        put(state, HexId::new(3, 0), PlayerColor::Orange, CardDefinition::kernel(20));
        put(state, HexId::new(-3, 0), PlayerColor::Blue, CardDefinition::kernel(20));
    }

    fn echo() -> CardDefinition {
        // When this takes damage, deal 1 to every other robot.
        let others = Collection::Objects {
            types: vec![CardType::Robot],
            conditions: vec![Condition::Other],
        };
        CardDefinition::robot("Echo", 1, 0, 50, 1).with_ability(Ability::triggered(
            TriggerSpec::this(EventKind::AfterDamageReceived),
            Command::DealDamage {
                target: Target::All(others),
                amount: Number::Literal(1),
            },
        ))
    }

    #[test]
    fn test_runaway_chain_is_a_draw() {
        let config = GameConfig::default();
        let mut state = GameState::new(1);
        with_kernels(&mut state);
        let a = put(&mut state, HexId::new(0, 0), PlayerColor::Orange, echo());
        put(&mut state, HexId::new(1, 0), PlayerColor::Blue, echo());

        state.object_mut(a).unwrap().damage = 1;
        fire(
            &mut state,
            GameEvent::for_object(EventKind::AfterDamageReceived, a, CardType::Robot, PlayerColor::Orange).with_amount(1),
        );
        settle(&mut state, &config).unwrap();

        assert_eq!(state.winner, Some(GameResult::Draw));
        assert!(state.trigger_queue.is_empty());
        assert_eq!(state.execution_depth, 0);
    }

    #[test]
    fn test_dead_objects_removed_to_discard() {
        let config = GameConfig::default();
        let mut state = GameState::new(1);
        with_kernels(&mut state);
        let bot = put(&mut state, HexId::new(0, 0), PlayerColor::Blue, CardDefinition::robot("Bot", 1, 1, 1, 1));
        state.object_mut(bot).unwrap().damage = 1;

        settle(&mut state, &config).unwrap();

        assert!(state.find_object(bot).is_none());
        assert_eq!(state.players[PlayerColor::Blue].discard.len(), 1);
        assert!(state.winner.is_none());
    }

    #[test]
    fn test_destroyed_kernel_ends_game() {
        let config = GameConfig::default();
        let mut state = GameState::new(1);
        with_kernels(&mut state);
        state.object_at_mut(HexId::new(-3, 0)).unwrap().damage = 20;

        settle(&mut state, &config).unwrap();
        assert_eq!(state.winner, Some(GameResult::Winner(PlayerColor::Orange)));
    }
}
