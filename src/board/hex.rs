//! Hex coordinates.
//!
//! Hexes use axial coordinates `(q, r)` with the implied cube coordinate
//! `s = -q - r`. The wire form is the string `"q,r,s"`, which also makes
//! `HexId` usable as a JSON map key.
//!
//! ## Board scan order
//!
//! `HexId` orders by `q`, then `r`. Every iteration over the board uses this
//! order, including trigger collection.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use std::str::FromStr;

/// The six axial direction vectors.
const DIRECTIONS: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (-1, 1), (0, 1)];

/// A board coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HexId {
    pub q: i32,
    pub r: i32,
}

impl HexId {
    /// The center of the board.
    pub const ORIGIN: HexId = HexId { q: 0, r: 0 };

    /// Create a hex from axial coordinates.
    #[must_use]
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// The implied third cube coordinate.
    #[must_use]
    pub const fn s(self) -> i32 {
        -self.q - self.r
    }

    /// The six surrounding hexes, ignoring board bounds.
    #[must_use]
    pub fn neighbors(self) -> SmallVec<[HexId; 6]> {
        DIRECTIONS
            .iter()
            .map(|&(dq, dr)| HexId::new(self.q + dq, self.r + dr))
            .collect()
    }

    /// Hex distance (number of steps between the two hexes).
    #[must_use]
    pub fn distance(self, other: HexId) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = (self.s() - other.s()).abs();
        (dq + dr + ds) / 2
    }

    /// Whether the two hexes share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: HexId) -> bool {
        self.distance(other) == 1
    }

    /// The hexes on the straight line from `self` to `other`, both ends included.
    #[must_use]
    pub fn line_to(self, other: HexId) -> Vec<HexId> {
        let n = self.distance(other);
        if n == 0 {
            return vec![self];
        }
        // Nudge off exact edges so rounding is consistent in both directions.
        let (aq, ar) = (f64::from(self.q) + 1e-6, f64::from(self.r) + 1e-6);
        let (bq, br) = (f64::from(other.q) + 1e-6, f64::from(other.r) + 1e-6);
        (0..=n)
            .map(|i| {
                let t = f64::from(i) / f64::from(n);
                round_cube(aq + (bq - aq) * t, ar + (br - ar) * t)
            })
            .collect()
    }

    /// All hexes of a hexagonal board with the given radius, in scan order.
    #[must_use]
    pub fn all_within(radius: i32) -> Vec<HexId> {
        let mut hexes = Vec::new();
        for q in -radius..=radius {
            for r in (-radius).max(-q - radius)..=radius.min(-q + radius) {
                hexes.push(HexId::new(q, r));
            }
        }
        hexes
    }
}

fn round_cube(q: f64, r: f64) -> HexId {
    let s = -q - r;
    let (mut rq, mut rr, rs) = (q.round(), r.round(), s.round());
    let (dq, dr, ds) = ((rq - q).abs(), (rr - r).abs(), (rs - s).abs());
    if dq > dr && dq > ds {
        rq = -rr - rs;
    } else if dr > ds {
        rr = -rq - rs;
    }
    HexId::new(rq as i32, rr as i32)
}

impl std::fmt::Display for HexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{}", self.q, self.r, self.s())
    }
}

/// Error parsing a `"q,r,s"` hex string.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex id {0:?}")]
pub struct ParseHexError(String);

impl FromStr for HexId {
    type Err = ParseHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<_> = s.split(',').map(|p| p.trim().parse::<i32>()).collect();
        match parts.as_slice() {
            [Ok(q), Ok(r), Ok(s3)] if q + r + s3 == 0 => Ok(HexId::new(*q, *r)),
            [Ok(q), Ok(r)] => Ok(HexId::new(*q, *r)),
            _ => Err(ParseHexError(s.to_string())),
        }
    }
}

impl Serialize for HexId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
