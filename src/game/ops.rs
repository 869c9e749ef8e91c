//! State mutation primitives.
//!
//! Every change to the board, hands or piles made by an action or a command
//! goes through here, so each one fires the right event exactly once. None of
//! these functions validate player intent; callers do that first.

use im::Vector;

use crate::board::HexId;
use crate::cards::{CardDefinition, CardInGame, CardType, StatAdjustments};
use crate::core::{AbilityId, AbilityInstance, CardId, CardZone, GameConfig, GameState, Object, ObjectId, PlayerColor};
use crate::effects::StatusEffect;
use crate::stack::fire;
use crate::triggers::{EventCause, EventKind, GameEvent};

/// Bind a card's printed abilities with fresh ids.
pub(crate) fn bind_abilities(state: &mut GameState, card: &CardDefinition) -> Vector<AbilityInstance> {
    card.abilities
        .iter()
        .map(|ability| AbilityInstance {
            id: AbilityId(state.alloc_id()),
            ability: ability.clone(),
            granted_by: None,
        })
        .collect()
}

/// Put a card on the board without firing anything.
pub(crate) fn enter_play(state: &mut GameState, owner: PlayerColor, mut card: CardInGame, hex: HexId) -> ObjectId {
    card.adjustments = StatAdjustments::new();
    let abilities = bind_abilities(state, &card.definition);
    let id = ObjectId(state.alloc_id());
    state.insert_object(hex, Object::new(id, owner, card, abilities));
    id
}

/// Put a card on the board as a freshly played object and fire `AfterPlayed`.
pub(crate) fn place_object(state: &mut GameState, owner: PlayerColor, card: CardInGame, hex: HexId) -> ObjectId {
    let card_type = card.card_type();
    let name = card.name().to_string();
    let id = enter_play(state, owner, card, hex);
    if let Some(object) = state.object_at_mut(hex) {
        object.just_played = true;
    }
    state.log_event(Some(owner), format!("played {name} at {hex}"));
    fire(state, GameEvent::for_object(EventKind::AfterPlayed, id, card_type, owner));
    id
}

/// Relocate an object and fire `AfterMove`.
pub(crate) fn move_object(state: &mut GameState, from: HexId, to: HexId) -> Option<ObjectId> {
    let object = state.take_object(from)?;
    let (id, card_type, owner) = (object.id, object.card_type(), object.owner);
    state.insert_object(to, object);
    fire(state, GameEvent::for_object(EventKind::AfterMove, id, card_type, owner));
    Some(id)
}

/// Damage an object and fire `AfterDamageReceived`. Returns the damage dealt.
pub(crate) fn deal_damage(
    state: &mut GameState,
    target: ObjectId,
    amount: i32,
    source: Option<ObjectId>,
    cause: EventCause,
) -> i32 {
    let Some(object) = state.object_mut(target) else {
        return 0;
    };
    if amount <= 0 || object.has_status(StatusEffect::CannotTakeDamage) {
        return 0;
    }
    object.damage += amount;
    let mut event = GameEvent::for_object(EventKind::AfterDamageReceived, target, object.card_type(), object.owner)
        .with_amount(amount)
        .with_cause(cause);
    if let Some(source) = source {
        event = event.with_other(source);
    }
    fire(state, event);
    amount
}

/// Mark an object for removal at the next cleanup.
pub(crate) fn destroy(state: &mut GameState, id: ObjectId) {
    if let Some(object) = state.object_mut(id) {
        object.marked_for_destruction = true;
    }
}

/// Take an object off the board, sending its card to the owner's discard.
///
/// No events are fired; `cleanup::remove_dead` fires `AfterDestroyed` first.
pub(crate) fn remove_object(state: &mut GameState, hex: HexId) -> Option<Object> {
    let object = state.take_object(hex)?;
    if object.card_type() != CardType::Kernel {
        let mut card = object.card.clone();
        card.adjustments = StatAdjustments::new();
        state.players[object.owner].discard.push_back(card);
    }
    Some(object)
}

/// Add a card to a hand, burning it to the discard pile if the hand is full.
fn add_to_hand(state: &mut GameState, config: &GameConfig, player: PlayerColor, mut card: CardInGame) {
    card.adjustments = StatAdjustments::new();
    let ps = &mut state.players[player];
    if ps.hand.len() >= config.max_hand_size {
        let name = card.name().to_string();
        ps.discard.push_back(card);
        tracing::debug!(%player, card = %name, "hand full; card burned");
        state.log_event(Some(player), format!("had to discard {name} (hand full)"));
    } else {
        ps.hand.push_back(card);
    }
}

/// Draw from the top of the deck. Drawing from an empty deck does nothing.
pub(crate) fn draw_cards(state: &mut GameState, config: &GameConfig, player: PlayerColor, count: usize) {
    for _ in 0..count {
        let Some(card) = state.players[player].deck.pop_front() else {
            break;
        };
        add_to_hand(state, config, player, card);
    }
}

/// Move a card from its owner's hand to their discard pile.
pub(crate) fn discard_from_hand(state: &mut GameState, card: CardId) -> bool {
    let Some(location) = state.find_card(card).filter(|l| l.zone == CardZone::Hand) else {
        return false;
    };
    let ps = &mut state.players[location.player];
    let mut card = ps.hand.remove(location.index);
    card.adjustments = StatAdjustments::new();
    ps.discard.push_back(card);
    true
}

/// Return an object to its owner's hand. Kernels stay put.
pub(crate) fn return_to_hand(state: &mut GameState, config: &GameConfig, id: ObjectId) {
    let Some((hex, object)) = state.find_object(id) else {
        return;
    };
    if object.card_type() == CardType::Kernel {
        return;
    }
    if let Some(object) = state.take_object(hex) {
        state.log_event(Some(object.owner), format!("{} returned to hand", object.name()));
        add_to_hand(state, config, object.owner, object.card);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;

    fn card(id: u32) -> CardInGame {
        CardInGame::new(CardId(id), CardDefinition::robot("Bot", 1, 1, 2, 1))
    }

    #[test]
    fn test_place_object_is_just_played() {
        let mut state = GameState::new(1);
        let id = place_object(&mut state, PlayerColor::Orange, card(1), HexId::ORIGIN);

        let object = state.object_at(HexId::ORIGIN).unwrap();
        assert_eq!(object.id, id);
        assert!(object.just_played);
        assert!(!object.can_move());
    }

    #[test]
    fn test_draw_burns_at_hand_cap() {
        let config = GameConfig::default().with_max_hand_size(1);
        let mut state = GameState::new(1);
        state.players[PlayerColor::Blue].deck = Vector::from(vec![card(1), card(2)]);

        draw_cards(&mut state, &config, PlayerColor::Blue, 3);

        let ps = &state.players[PlayerColor::Blue];
        assert_eq!(ps.hand.len(), 1);
        assert_eq!(ps.discard.len(), 1);
        assert!(ps.deck.is_empty());
        assert_eq!(ps.hand[0].id, CardId(1));
    }

    #[test]
    fn test_damage_prevented_by_status() {
        let mut state = GameState::new(1);
        let id = enter_play(&mut state, PlayerColor::Orange, card(1), HexId::ORIGIN);
        state.object_mut(id).unwrap().statuses.push_back(crate::core::StatusGrant {
            status: StatusEffect::CannotTakeDamage,
            source: AbilityId(99),
        });

        assert_eq!(deal_damage(&mut state, id, 5, None, EventCause::Effect), 0);
        assert_eq!(state.find_object(id).unwrap().1.damage, 0);
    }

    #[test]
    fn test_return_to_hand() {
        let config = GameConfig::default();
        let mut state = GameState::new(1);
        let id = enter_play(&mut state, PlayerColor::Orange, card(1), HexId::ORIGIN);

        return_to_hand(&mut state, &config, id);
        assert!(state.board.is_empty());
        assert_eq!(state.players[PlayerColor::Orange].hand.len(), 1);
    }
}
