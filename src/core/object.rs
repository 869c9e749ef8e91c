//! Board objects.
//!
//! An `Object` is a kernel, robot or structure occupying one hex. It owns the
//! card it came from, its base stats, the stat adjustments layered on top,
//! the ability instances bound to it, and its per-turn usage flags.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::{AbilityId, ObjectId, PlayerColor};
use crate::cards::{Attribute, CardDefinition, CardInGame, CardType, StatAdjustments, Stats};
use crate::effects::{Ability, ActivatedAbility, StatusEffect};

/// An ability bound to an object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityInstance {
    pub id: AbilityId,
    pub ability: Ability,
    /// Set when a passive `GrantAbility` put this here; the overlay owns it.
    pub granted_by: Option<AbilityId>,
}

/// A status applied by a passive ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusGrant {
    pub status: StatusEffect,
    pub source: AbilityId,
}

/// An entity on the board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Object {
    pub id: ObjectId,
    pub owner: PlayerColor,
    pub card: CardInGame,
    /// Base stats, copied from the card when the object entered play.
    pub stats: Stats,
    pub damage: i32,
    pub adjustments: StatAdjustments,
    pub abilities: Vector<AbilityInstance>,
    pub statuses: Vector<StatusGrant>,

    // === Per-turn flags ===
    /// Hexes moved this turn.
    pub moves_used: i32,
    pub cant_move: bool,
    pub cant_attack: bool,
    pub cant_activate: bool,
    /// Entered play this turn; may not move or attack yet.
    pub just_played: bool,

    /// Destroyed by an effect; removed at the next cleanup.
    pub marked_for_destruction: bool,
}

impl Object {
    /// Create an object for a card entering play.
    ///
    /// `abilities` must already carry freshly allocated ids.
    #[must_use]
    pub fn new(id: ObjectId, owner: PlayerColor, card: CardInGame, abilities: Vector<AbilityInstance>) -> Self {
        let stats = card.definition.stats;
        Self {
            id,
            owner,
            card,
            stats,
            damage: 0,
            adjustments: StatAdjustments::new(),
            abilities,
            statuses: Vector::new(),
            moves_used: 0,
            cant_move: false,
            cant_attack: false,
            cant_activate: false,
            just_played: false,
            marked_for_destruction: false,
        }
    }

    /// Give a face-down object its real card. Base stats and intrinsic
    /// abilities follow the new definition; granted abilities and damage stay.
    pub fn reveal(&mut self, definition: CardDefinition, abilities: Vector<AbilityInstance>) {
        self.stats = definition.stats;
        self.card.replace_definition(definition);
        let granted: Vector<AbilityInstance> = self.abilities.iter().filter(|a| a.granted_by.is_some()).cloned().collect();
        self.abilities = abilities;
        self.abilities.append(granted);
    }

    #[must_use]
    pub fn card_type(&self) -> CardType {
        self.card.card_type()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.card.name()
    }

    /// Effective value of an attribute, or `None` if the object doesn't have it.
    ///
    /// Attack and speed never go below zero. Health has damage subtracted
    /// after every adjustment and may be zero or negative.
    #[must_use]
    pub fn attribute(&self, attribute: Attribute) -> Option<i32> {
        let base = match attribute {
            Attribute::Attack => self.stats.attack,
            Attribute::Health => self.stats.health,
            Attribute::Speed => self.stats.speed,
            Attribute::Cost => Some(self.card.definition.cost),
        }?;
        let adjusted = self.adjustments.apply(attribute, base);
        Some(match attribute {
            Attribute::Health => adjusted - self.damage,
            _ => adjusted.max(0),
        })
    }

    #[must_use]
    pub fn attack(&self) -> i32 {
        self.attribute(Attribute::Attack).unwrap_or(0)
    }

    #[must_use]
    pub fn health(&self) -> i32 {
        self.attribute(Attribute::Health).unwrap_or(0)
    }

    #[must_use]
    pub fn speed(&self) -> i32 {
        self.attribute(Attribute::Speed).unwrap_or(0)
    }

    #[must_use]
    pub fn remaining_speed(&self) -> i32 {
        (self.speed() - self.moves_used).max(0)
    }

    #[must_use]
    pub fn has_status(&self, status: StatusEffect) -> bool {
        self.statuses.iter().any(|s| s.status == status)
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.marked_for_destruction || (self.stats.health.is_some() && self.health() <= 0)
    }

    #[must_use]
    pub fn can_move(&self) -> bool {
        self.card_type() == CardType::Robot
            && !self.cant_move
            && !self.just_played
            && !self.has_status(StatusEffect::CannotMove)
            && self.remaining_speed() > 0
    }

    #[must_use]
    pub fn can_attack(&self) -> bool {
        self.card_type() == CardType::Robot
            && !self.cant_attack
            && !self.just_played
            && !self.has_status(StatusEffect::CannotAttack)
            && self.stats.attack.is_some()
    }

    #[must_use]
    pub fn can_activate(&self) -> bool {
        !self.cant_activate && !self.has_status(StatusEffect::CannotActivate)
    }

    /// Activated abilities in binding order, as indexed by `ACTIVATE_OBJECT`.
    pub fn activated_abilities(&self) -> impl Iterator<Item = (AbilityId, &ActivatedAbility)> {
        self.abilities.iter().filter_map(|instance| match &instance.ability {
            Ability::Activated(activated) => Some((instance.id, activated)),
            _ => None,
        })
    }

    /// Clear per-turn usage.
    pub fn reset_turn_flags(&mut self) {
        self.moves_used = 0;
        self.cant_move = false;
        self.cant_attack = false;
        self.cant_activate = false;
        self.just_played = false;
    }
}
