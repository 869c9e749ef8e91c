//! Card data: definitions, instances and stat adjustments.

pub mod attributes;
pub mod definition;
pub mod instance;

pub use attributes::{AdjustmentSource, Attribute, Duration, StatAdjustment, StatAdjustments, StatFn, StatOp};
pub use definition::{CardDefinition, CardType, Stats};
pub use instance::CardInGame;
