//! Critical-path layout generation split into grid model, corridor walking,
//! clustering, and attempt orchestration.

pub mod model;

mod cluster;
mod generator;
mod seed;
mod walker;

pub use cluster::{connect, span};
pub use generator::{GeneratedMap, MapGenerator, RejectionTally};
pub use model::Map;
pub use seed::seeded_rng;
pub use walker::walk;

use crate::config::GeneratorConfig;
use crate::error::GenerateError;

/// Validates `config` and generates one map from a ChaCha stream seeded with `seed`.
pub fn generate_map(config: GeneratorConfig, seed: u64) -> Result<GeneratedMap, GenerateError> {
    MapGenerator::new(config)?.generate(&mut seeded_rng(seed))
}
