//! Ability language and its interpreter.
//!
//! - `command`: the ability AST (commands, targets, collections, conditions)
//! - `targeting`: target, collection and number evaluation
//! - `resolver`: `Interpreter`, which executes commands
//! - `overlay`: continuous application of passive abilities

pub mod command;
mod overlay;
mod resolver;
mod targeting;

pub use command::{
    Ability, ActivatedAbility, Collection, Command, Comparison, Condition, GlobalCondition, Number, PassiveAbility,
    PassiveEffect, PlayerTarget, SaveValue, StatExpr, StatusEffect, Target, TriggeredAbility, TurnAction,
};
pub use overlay::apply_abilities;
pub use resolver::{ExecutionContext, Interpreter};
pub use targeting::{Subject, TargetSet};
