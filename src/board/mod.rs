//! Board geometry and board queries.

pub mod hex;
pub mod query;

pub use hex::{HexId, ParseHexError};
pub use query::{
    has_line_of_sight, is_occupied, move_distances, valid_attack_hexes, valid_move_hexes, valid_placement_hexes,
};
