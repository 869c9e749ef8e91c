//! Stat attributes and lazily-applied adjustments.
//!
//! Effective stats are never stored. An object or card keeps its base stats
//! plus an ordered list of `StatAdjustment`s, and the effective value is
//! recomputed on every read:
//!
//! ```text
//! effective = base ⊕ permanent adjustments ⊕ temporary adjustments
//! ```
//!
//! Adjustments granted by a passive ability are tagged with that ability's
//! id; withdrawing the ability removes exactly its contribution.

use im::Vector;
use serde::{Deserialize, Serialize};

use crate::core::AbilityId;

/// An adjustable stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Attribute {
    Attack,
    Health,
    Speed,
    Cost,
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Attribute::Attack => "attack",
            Attribute::Health => "health",
            Attribute::Speed => "speed",
            Attribute::Cost => "cost",
        };
        f.write_str(name)
    }
}

/// Arithmetic applied to a stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatOp {
    Add,
    Multiply,
    /// Integer division, rounding toward negative infinity.
    Divide,
    Set,
}

/// A one-argument stat function, `x => x <op> value`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatFn {
    pub op: StatOp,
    pub value: i32,
}

impl StatFn {
    #[must_use]
    pub const fn add(value: i32) -> Self {
        Self { op: StatOp::Add, value }
    }

    #[must_use]
    pub const fn set(value: i32) -> Self {
        Self { op: StatOp::Set, value }
    }

    #[must_use]
    pub const fn multiply(value: i32) -> Self {
        Self { op: StatOp::Multiply, value }
    }

    /// Apply the function to a value.
    #[must_use]
    pub fn apply(self, x: i32) -> i32 {
        match self.op {
            StatOp::Add => x.saturating_add(self.value),
            StatOp::Multiply => x.saturating_mul(self.value),
            StatOp::Divide if self.value == 0 => x,
            StatOp::Divide => x.div_euclid(self.value),
            StatOp::Set => self.value,
        }
    }
}

/// How long an adjustment lasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Duration {
    /// Stripped during end-of-turn processing.
    EndOfTurn,
}

/// Where an adjustment came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AdjustmentSource {
    /// Applied once by a command; stays until the card leaves play.
    Command,
    /// Maintained by the overlay on behalf of a passive ability.
    Ability(AbilityId),
}

/// A single lazily-applied stat modification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatAdjustment {
    pub attribute: Attribute,
    pub func: StatFn,
    pub source: AdjustmentSource,
    pub duration: Option<Duration>,
}

impl StatAdjustment {
    /// A permanent adjustment applied by a command.
    #[must_use]
    pub fn permanent(attribute: Attribute, func: StatFn) -> Self {
        Self {
            attribute,
            func,
            source: AdjustmentSource::Command,
            duration: None,
        }
    }

    /// An adjustment owned by a passive ability.
    #[must_use]
    pub fn from_ability(attribute: Attribute, func: StatFn, ability: AbilityId) -> Self {
        Self {
            attribute,
            func,
            source: AdjustmentSource::Ability(ability),
            duration: None,
        }
    }

    /// Set a duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Permanent adjustments are folded in before temporary ones.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.source == AdjustmentSource::Command && self.duration.is_none()
    }
}

/// Ordered list of adjustments attached to an object or a card in hand.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatAdjustments(Vector<StatAdjustment>);

impl StatAdjustments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatAdjustment> {
        self.0.iter()
    }

    pub fn push(&mut self, adjustment: StatAdjustment) {
        self.0.push_back(adjustment);
    }

    /// Fold every adjustment for `attribute` over `base`.
    ///
    /// Permanent adjustments apply first, then temporary ones; each group in
    /// insertion order.
    #[must_use]
    pub fn apply(&self, attribute: Attribute, base: i32) -> i32 {
        let relevant = || self.0.iter().filter(move |a| a.attribute == attribute);
        let after_permanent = relevant()
            .filter(|a| a.is_permanent())
            .fold(base, |x, a| a.func.apply(x));
        relevant()
            .filter(|a| !a.is_permanent())
            .fold(after_permanent, |x, a| a.func.apply(x))
    }

    /// Remove everything owned by `ability`. Returns whether anything was removed.
    pub fn remove_source(&mut self, ability: AbilityId) -> bool {
        let before = self.0.len();
        self.0.retain(|a| a.source != AdjustmentSource::Ability(ability));
        self.0.len() != before
    }

    /// Drop every adjustment with an end-of-turn duration.
    pub fn strip_end_of_turn(&mut self) {
        self.0.retain(|a| a.duration != Some(Duration::EndOfTurn));
    }

    /// Ability ids that currently contribute adjustments.
    #[must_use]
    pub fn ability_sources(&self) -> Vec<AbilityId> {
        let mut sources: Vec<_> = self
            .0
            .iter()
            .filter_map(|a| match a.source {
                AdjustmentSource::Ability(id) => Some(id),
                AdjustmentSource::Command => None,
            })
            .collect();
        sources.sort();
        sources.dedup();
        sources
    }
}
