//! Pure board queries.
//!
//! None of these fail: invalid input (an empty hex, an object that can't
//! act) yields an empty result, which callers treat as an illegal action.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::hex::HexId;
use crate::cards::CardType;
use crate::core::{GameConfig, GameState, PlayerColor};
use crate::effects::StatusEffect;

#[must_use]
pub fn is_occupied(state: &GameState, hex: HexId) -> bool {
    state.board.contains_key(&hex)
}

/// Empty hexes where `player` may place a card of `card_type`.
///
/// Robots anchor on their owner's kernel; structures on any friendly object.
#[must_use]
pub fn valid_placement_hexes(
    state: &GameState,
    config: &GameConfig,
    player: PlayerColor,
    card_type: CardType,
) -> BTreeSet<HexId> {
    let (anchors, range): (Vec<HexId>, i32) = match card_type {
        CardType::Robot => (state.kernel_hex(player).into_iter().collect(), config.robot_placement_range),
        CardType::Structure => (
            state.objects().filter(|(_, o)| o.owner == player).map(|(hex, _)| hex).collect(),
            config.structure_placement_range,
        ),
        CardType::Event | CardType::Kernel => return BTreeSet::new(),
    };

    HexId::all_within(config.board_radius)
        .into_iter()
        .filter(|hex| !is_occupied(state, *hex))
        .filter(|hex| anchors.iter().any(|anchor| anchor.distance(*hex) <= range))
        .collect()
}

/// Reachable empty hexes for the object at `from`, with the steps needed.
///
/// Bounded by remaining speed. Occupied hexes block the path unless the
/// object has `Jump`, in which case they can be passed but not ended on.
#[must_use]
pub fn move_distances(state: &GameState, config: &GameConfig, from: HexId) -> BTreeMap<HexId, i32> {
    let mut reachable = BTreeMap::new();
    let Some(object) = state.object_at(from) else {
        return reachable;
    };
    if !object.can_move() {
        return reachable;
    }
    let budget = object.remaining_speed();
    let jump = object.has_status(StatusEffect::Jump);

    let mut visited = BTreeSet::from([from]);
    let mut frontier = VecDeque::from([(from, 0)]);
    while let Some((hex, steps)) = frontier.pop_front() {
        if steps == budget {
            continue;
        }
        for next in hex.neighbors() {
            if !config.on_board(next) || !visited.insert(next) {
                continue;
            }
            let occupied = is_occupied(state, next);
            if !occupied {
                reachable.insert(next, steps + 1);
            }
            if !occupied || jump {
                frontier.push_back((next, steps + 1));
            }
        }
    }
    reachable
}

/// Hexes the object at `from` may move to this turn.
#[must_use]
pub fn valid_move_hexes(state: &GameState, config: &GameConfig, from: HexId) -> BTreeSet<HexId> {
    move_distances(state, config, from).into_keys().collect()
}

/// Adjacent enemy-occupied hexes the object at `from` may attack.
#[must_use]
pub fn valid_attack_hexes(state: &GameState, from: HexId) -> BTreeSet<HexId> {
    let Some(attacker) = state.object_at(from) else {
        return BTreeSet::new();
    };
    if !attacker.can_attack() {
        return BTreeSet::new();
    }
    from.neighbors()
        .into_iter()
        .filter(|hex| state.object_at(*hex).is_some_and(|o| o.owner != attacker.owner))
        .collect()
}

/// Whether no object stands strictly between `a` and `b`.
#[must_use]
pub fn has_line_of_sight(state: &GameState, a: HexId, b: HexId) -> bool {
    let line = a.line_to(b);
    line.iter()
        .skip(1)
        .take(line.len().saturating_sub(2))
        .all(|hex| !is_occupied(state, *hex))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardInGame};
    use crate::core::{CardId, Object, ObjectId};
    use im::Vector;

    fn put(state: &mut GameState, hex: HexId, owner: PlayerColor, card: CardDefinition) {
        let id = state.alloc_id();
        let object = Object::new(ObjectId(id), owner, CardInGame::new(CardId(id), card), Vector::new());
        state.insert_object(hex, object);
    }

    fn board_with_kernels() -> (GameState, GameConfig) {
        let config = GameConfig::default();
        let mut state = GameState::new(1);
        for (player, hex) in config.kernel_hexes.iter() {
            put(&mut state, *hex, player, CardDefinition::kernel(20));
        }
        (state, config)
    }

    #[test]
    fn test_robot_placement_next_to_kernel() {
        let (state, config) = board_with_kernels();
        let hexes = valid_placement_hexes(&state, &config, PlayerColor::Orange, CardType::Robot);

        // Kernel at the board edge has three on-board neighbors.
        assert_eq!(hexes.len(), 3);
        for hex in &hexes {
            assert!(hex.is_adjacent(HexId::new(3, 0)));
            assert!(config.on_board(*hex));
        }
        assert!(valid_placement_hexes(&state, &config, PlayerColor::Orange, CardType::Event).is_empty());
    }

    #[test]
    fn test_structure_anchors_on_any_friendly_object() {
        let (mut state, config) = board_with_kernels();
        put(&mut state, HexId::new(2, 0), PlayerColor::Orange, CardDefinition::robot("Bot", 1, 1, 1, 1));

        let hexes = valid_placement_hexes(&state, &config, PlayerColor::Orange, CardType::Structure);
        assert!(hexes.contains(&HexId::new(1, 0)));
        assert!(!hexes.contains(&HexId::new(2, 0)));
    }

    #[test]
    fn test_movement_bounded_by_speed() {
        let (mut state, config) = board_with_kernels();
        put(&mut state, HexId::ORIGIN, PlayerColor::Orange, CardDefinition::robot("Bot", 1, 1, 1, 2));

        let distances = move_distances(&state, &config, HexId::ORIGIN);
        assert!(distances.values().all(|&d| d <= 2));
        assert!(distances.keys().all(|hex| hex.distance(HexId::ORIGIN) <= 2));
        assert_eq!(distances.len(), 18);
    }

    #[test]
    fn test_movement_blocked_without_jump() {
        let (mut state, config) = board_with_kernels();
        put(&mut state, HexId::new(3, -1), PlayerColor::Orange, CardDefinition::robot("Bot", 1, 1, 1, 1));
        put(&mut state, HexId::new(2, -1), PlayerColor::Blue, CardDefinition::robot("Wall", 1, 1, 9, 1));

        let moves = valid_move_hexes(&state, &config, HexId::new(3, -1));
        assert!(!moves.contains(&HexId::new(2, -1)));
        assert!(!moves.contains(&HexId::new(3, 0)));
        assert!(moves.iter().all(|hex| !is_occupied(&state, *hex)));
    }

    #[test]
    fn test_attack_hexes_only_enemies() {
        let (mut state, _) = board_with_kernels();
        put(&mut state, HexId::new(2, 0), PlayerColor::Orange, CardDefinition::robot("A", 1, 1, 1, 1));
        put(&mut state, HexId::new(1, 0), PlayerColor::Blue, CardDefinition::robot("B", 1, 1, 1, 1));

        let targets = valid_attack_hexes(&state, HexId::new(2, 0));
        assert_eq!(targets.into_iter().collect::<Vec<_>>(), vec![HexId::new(1, 0)]);
    }

    #[test]
    fn test_line_of_sight() {
        let (mut state, _) = board_with_kernels();
        assert!(has_line_of_sight(&state, HexId::new(-2, 0), HexId::new(2, 0)));

        put(&mut state, HexId::ORIGIN, PlayerColor::Blue, CardDefinition::structure("Wall", 1, 3));
        assert!(!has_line_of_sight(&state, HexId::new(-2, 0), HexId::new(2, 0)));
        assert!(has_line_of_sight(&state, HexId::new(-1, 0), HexId::ORIGIN));
    }
}
