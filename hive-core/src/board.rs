//! Hex board geometry with axial coordinates
//!
//! The Hive board is unbounded, so coordinates are plain `i32` pairs and
//! there is no validity check: every hex exists.

use serde::{Deserialize, Serialize};

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Hex {
    pub q: i32,
    pub r: i32,
}

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=N, 1=NE, 2=SE, 3=S, 4=SW, 5=NW
///
/// Consecutive entries (cyclically) point at hexes that touch each other.
pub const DIRECTIONS: [(i32, i32); 6] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // NW
];

const SQRT_3: f32 = 1.732_050_8;

impl Hex {
    /// The cell every game starts on
    pub const ORIGIN: Hex = Hex::new(0, 0);

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Distance from the origin
    pub fn distance_to_origin(&self) -> i32 {
        self.distance_to(Hex::ORIGIN)
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i32 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = ((self.q + self.r) - (other.q + other.r)).abs();
        (dq + dr + ds) / 2
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: usize) -> Hex {
        let (dq, dr) = DIRECTIONS[direction % 6];
        Hex::new(self.q + dq, self.r + dr)
    }

    /// All six neighbors, in direction order
    pub fn neighbors(&self) -> [Hex; 6] {
        std::array::from_fn(|dir| self.neighbor(dir))
    }

    /// Direction index pointing from `self` to an adjacent `other`
    pub fn direction_to(&self, other: Hex) -> Option<usize> {
        let delta = (other.q - self.q, other.r - self.r);
        DIRECTIONS.iter().position(|&d| d == delta)
    }

    pub fn is_adjacent(&self, other: Hex) -> bool {
        self.direction_to(other).is_some()
    }

    /// The two hexes touching both `self` and `other` (the cells flanking
    /// their shared edge). `None` when the two hexes are not adjacent.
    pub fn flanks(&self, other: Hex) -> Option<[Hex; 2]> {
        let dir = self.direction_to(other)?;
        Some([self.neighbor(dir + 5), self.neighbor(dir + 1)])
    }

    /// Center of the hex in pixel space (flat-top layout, `size` = corner radius)
    pub fn to_pixel(&self, size: f32) -> (f32, f32) {
        let x = size * 1.5 * self.q as f32;
        let y = size * (SQRT_3 / 2.0 * self.q as f32 + SQRT_3 * self.r as f32);
        (x, y)
    }
}

impl std::fmt::Display for Hex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.q, self.r)
    }
}
