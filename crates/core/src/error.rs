//! Error types for map construction, configuration, and generation attempts.

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::types::Coord;

/// Attempt stage that ran out of candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    GrowCriticalBranches,
    GrowBonusBranches,
    PlaceBase,
}

/// Which room count overshot or undershot its bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CountKind {
    CriticalRooms,
    TotalRooms,
}

/// Reasons a generation attempt is discarded. Every variant is retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    #[error("corridor blocked at {at} while walking toward {target}")]
    BlockedCorridor { at: Coord, target: Coord },

    #[error("nothing to choose from during {stage:?}")]
    EmptyCandidateSet { stage: Stage },

    #[error("{kind:?} count {count} outside [{lower}, {upper}]")]
    BoundExceeded { kind: CountKind, count: usize, lower: usize, upper: usize },
}

/// Violations of the grid model's own invariants. These are programming errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("coordinate {coord} outside {width}x{height} grid")]
    OutOfBounds { coord: Coord, width: usize, height: usize },

    #[error("boss already placed at {existing}, refusing second boss at {attempted}")]
    DuplicateBoss { existing: Coord, attempted: Coord },

    #[error("base already placed at {existing}, refusing second base at {attempted}")]
    DuplicateBase { existing: Coord, attempted: Coord },

    #[error("base room at {coord} is not critical")]
    BaseNotCritical { coord: Coord },

    #[error("room at {coord} would lose its boss or base tag")]
    LandmarkOverwritten { coord: Coord },

    #[error("occupied room at {coord} cannot be emptied")]
    RoomVacated { coord: Coord },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("grid must be at least 2x2, got {width}x{height}")]
    ZeroExtent { width: usize, height: usize },

    #[error("{width}x{height} grid exceeds the {max_cells} cell limit")]
    GridTooLarge { width: usize, height: usize, max_cells: usize },

    #[error("{name} lower bound {lower} exceeds upper bound {upper}")]
    InvertedBounds { name: &'static str, lower: usize, upper: usize },

    #[error("critical room lower bound {critical_lower} exceeds total room upper bound {rooms_upper}")]
    CriticalExceedsRooms { critical_lower: usize, rooms_upper: usize },

    #[error("{name} {value} exceeds grid capacity {capacity}")]
    ExceedsGrid { name: &'static str, value: usize, capacity: usize },

    #[error("critical room lower bound must be at least 2 to separate base from boss, got {lower}")]
    TooFewCriticalRooms { lower: usize },

    #[error("max_attempts must be greater than zero")]
    ZeroAttempts,

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read configuration file: {0}")]
    Io(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("map invariant violated: {0}")]
    Invariant(#[from] MapError),

    #[error("gave up after {attempts} attempts, last failure: {last}")]
    AttemptsExhausted { attempts: u32, last: GenerationFailure },
}
