pub mod config;
pub mod error;
pub mod mapgen;
pub mod render;
pub mod stats;
pub mod types;

pub use config::GeneratorConfig;
pub use error::{ConfigError, CountKind, GenerateError, GenerationFailure, MapError, Stage};
pub use mapgen::{GeneratedMap, Map, MapGenerator, RejectionTally, generate_map, seeded_rng};
pub use types::*;
