use std::fmt;

use serde::{Deserialize, Serialize};

/// Grid coordinate. `x` grows right, `y` grows up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn manhattan(self, other: Coord) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// The four axis-aligned neighbors, unfiltered by bounds.
    pub fn neighbors(self) -> [Coord; 4] {
        [
            Coord { x: self.x + 1, y: self.y },
            Coord { x: self.x - 1, y: self.y },
            Coord { x: self.x, y: self.y + 1 },
            Coord { x: self.x, y: self.y - 1 },
        ]
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One corridor-carving step between two adjacent rooms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub from: Coord,
    pub to: Coord,
}

/// Which phase a corridor belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorridorKind {
    Critical,
    Bonus,
}

impl CorridorKind {
    pub fn is_critical(self) -> bool {
        self == CorridorKind::Critical
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    pub empty: bool,
    pub critical: bool,
    pub base: bool,
    pub boss: bool,
}

impl Room {
    pub const EMPTY: Room = Room { empty: true, critical: false, base: false, boss: false };

    pub fn critical() -> Self {
        Self { empty: false, critical: true, base: false, boss: false }
    }

    pub fn bonus() -> Self {
        Self { empty: false, critical: false, base: false, boss: false }
    }

    pub fn boss() -> Self {
        Self { empty: false, critical: true, base: false, boss: true }
    }

    pub fn base() -> Self {
        Self { empty: false, critical: true, base: true, boss: false }
    }

    pub fn for_corridor(kind: CorridorKind) -> Self {
        Self { critical: kind.is_critical(), ..Self::bonus() }
    }

    pub fn is_occupied(self) -> bool {
        !self.empty
    }
}
