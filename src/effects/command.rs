//! The ability command language.
//!
//! Card abilities arrive from the card compiler as data: a closed set of
//! tagged variants that the interpreter in `resolver` evaluates. Nothing in
//! here is executable on its own.
//!
//! ## Layers
//!
//! - `Command`: something that changes the game (deal damage, draw, ...)
//! - `Target` / `PlayerTarget`: what a command acts on
//! - `Collection` + `Condition`: sets of objects, tiles or cards filtered by predicates
//! - `GlobalCondition`: guards for `Command::If`
//! - `Number` / `StatExpr`: numeric arguments, evaluated at execution time
//! - `Ability`: passive, triggered and activated abilities built from the above
//!
//! ## Contextual references
//!
//! | Reference | Meaning |
//! |-----------|---------|
//! | `This`    | the object the ability belongs to |
//! | `It`      | the subject of the current event; `This` outside a trigger |
//! | `That`    | the other participant of the event (e.g. the attack target) |
//! | `They`    | the item currently visited by `ForEach`; falls back to `It` |
//! | `ItP`     | the player the event is about; the controller outside a trigger |
//! | `TheyP`   | the controller of `They`; falls back to `ItP` |

use serde::{Deserialize, Serialize};

use crate::cards::{Attribute, CardDefinition, CardType, Duration, StatOp};
use crate::triggers::TriggerSpec;

/// An executable ability body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Command {
    // === Control flow ===

    /// Run each command in order.
    Sequence(Vec<Command>),

    /// Run `then` only if the condition holds.
    If {
        condition: GlobalCondition,
        then: Box<Command>,
    },

    /// Run `body` once per member of the collection, binding `They`.
    ForEach {
        collection: Collection,
        body: Box<Command>,
    },

    // === Objects ===

    DealDamage { target: Target, amount: Number },

    Destroy { target: Target },

    /// Remove all damage.
    RestoreHealth { target: Target },

    ModifyAttribute {
        target: Target,
        attribute: Attribute,
        func: StatExpr,
        #[serde(default)]
        duration: Option<Duration>,
    },

    /// Move an object to a tile, ignoring speed.
    MoveObject { target: Target, destination: Target },

    /// Return objects to their owner's hand.
    ReturnToHand { target: Target },

    /// Create a new object from a card that was never in a deck.
    SpawnObject {
        card: Box<CardDefinition>,
        tile: Target,
        owner: PlayerTarget,
    },

    /// Permanently add an ability to objects.
    GiveAbility { target: Target, ability: Box<Ability> },

    /// Lift a per-turn restriction.
    AllowAgain { target: Target, action: TurnAction },

    // === Players and cards ===

    Draw { player: PlayerTarget, count: Number },

    /// Discard cards from hand.
    Discard { target: Target },

    ModifyEnergy { player: PlayerTarget, func: StatExpr },

    /// Ask the host to recompile cards in hand with new text.
    RewriteCardText { target: Target, text: String },

    // === Memory ===

    Save { key: String, value: SaveValue },
}

/// A per-turn restriction that `AllowAgain` lifts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TurnAction {
    Move,
    Attack,
    Activate,
}

/// What `Save` stores.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SaveValue {
    Target(Target),
    Number(Number),
}

/// A reference to objects, tiles or cards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Target {
    This,
    It,
    That,
    They,
    /// The acting player picks one member; suspends until they do.
    Choose(Collection),
    /// `count` distinct members, drawn with the game RNG.
    Random { count: Number, collection: Collection },
    All(Collection),
    /// A target set stored earlier with `Save`.
    Saved(String),
}

/// A reference to players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerTarget {
    /// The ability's controller.
    #[serde(rename = "self")]
    Controller,
    Opponent,
    AllPlayers,
    ItP,
    TheyP,
    ControllerOf(Box<Target>),
}

/// A typed set produced from current state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    /// Objects of the given types (all types if empty) matching every condition.
    Objects {
        #[serde(default)]
        types: Vec<CardType>,
        #[serde(default)]
        conditions: Vec<Condition>,
    },
    CardsInHand {
        player: PlayerTarget,
        #[serde(default)]
        card_type: Option<CardType>,
        #[serde(default)]
        conditions: Vec<Condition>,
    },
    CardsInDiscardPile {
        player: PlayerTarget,
        #[serde(default)]
        card_type: Option<CardType>,
        #[serde(default)]
        conditions: Vec<Condition>,
    },
    AllTiles,
    EmptyTiles,
    /// Tiles matching every condition.
    Tiles(Vec<Condition>),
}

/// A predicate over a collection member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Condition {
    ControlledBy(PlayerTarget),
    AdjacentTo(Box<Target>),
    /// Within `distance` hexes, excluding the reference itself.
    WithinDistanceOf { distance: i32, target: Box<Target> },
    AttributeComparison {
        attribute: Attribute,
        comparison: Comparison,
        value: Number,
    },
    /// Anything but `This`.
    Other,
    /// Objects with damage on them.
    Damaged,
    Unoccupied,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Comparison {
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

impl Comparison {
    #[must_use]
    pub fn holds(self, left: i32, right: i32) -> bool {
        match self {
            Comparison::Equal => left == right,
            Comparison::NotEqual => left != right,
            Comparison::LessThan => left < right,
            Comparison::LessThanOrEqual => left <= right,
            Comparison::GreaterThan => left > right,
            Comparison::GreaterThanOrEqual => left >= right,
        }
    }
}

/// A guard over the whole game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GlobalCondition {
    Exists(Collection),
    Compare {
        left: Number,
        comparison: Comparison,
        right: Number,
    },
    Not(Box<GlobalCondition>),
}

/// A numeric argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Number {
    Literal(i32),
    Count(Collection),
    /// Sum of an attribute over the targets.
    AttributeSum { target: Box<Target>, attribute: Attribute },
    EnergyOf(PlayerTarget),
    HandSize(PlayerTarget),
    /// The amount carried by the triggering event (e.g. damage taken).
    EventAmount,
    Saved(String),
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Number::Literal(value)
    }
}

/// `x => x <op> operand`, with the operand evaluated when the function is built.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatExpr {
    pub op: StatOp,
    pub operand: Number,
}

impl StatExpr {
    #[must_use]
    pub fn add(value: i32) -> Self {
        Self {
            op: StatOp::Add,
            operand: Number::Literal(value),
        }
    }

    #[must_use]
    pub fn set(value: i32) -> Self {
        Self {
            op: StatOp::Set,
            operand: Number::Literal(value),
        }
    }
}

// === Abilities ===

/// A condition on the board or a player that modifies play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusEffect {
    /// May move through occupied hexes.
    Jump,
    CannotAttack,
    CannotMove,
    CannotActivate,
    CannotFightBack,
    CannotTakeDamage,
}

/// What a passive ability does to each member of its target set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PassiveEffect {
    AttributeAdjustment { attribute: Attribute, func: StatExpr },
    Status(StatusEffect),
    GrantAbility(Box<Ability>),
}

/// Continuously applied while its object is on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveAbility {
    /// Must not contain `Choose` or `Random`.
    pub targets: Target,
    pub effect: PassiveEffect,
}

/// Runs `command` whenever `trigger` matches an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggeredAbility {
    pub trigger: TriggerSpec,
    pub command: Command,
}

/// Player-invoked, once per object per turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivatedAbility {
    #[serde(default)]
    pub cost: i32,
    pub command: Command,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ability {
    Passive(PassiveAbility),
    Triggered(TriggeredAbility),
    Activated(ActivatedAbility),
}

impl Ability {
    /// A passive ability.
    #[must_use]
    pub fn passive(targets: Target, effect: PassiveEffect) -> Self {
        Ability::Passive(PassiveAbility { targets, effect })
    }

    /// A triggered ability.
    #[must_use]
    pub fn triggered(trigger: TriggerSpec, command: Command) -> Self {
        Ability::Triggered(TriggeredAbility { trigger, command })
    }

    /// An activated ability.
    #[must_use]
    pub fn activated(cost: i32, command: Command) -> Self {
        Ability::Activated(ActivatedAbility { cost, command })
    }
}
