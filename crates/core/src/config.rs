//! Generator bounds derived from a single grid size, with per-field overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_GRID_SIZE: usize = 8;
pub const DEFAULT_BATCH_SIZE: usize = 1000;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;
/// Largest grid, in cells, that `validate` accepts.
pub const MAX_GRID_CELLS: usize = 1 << 20;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub width: usize,
    pub height: usize,
    pub critical_keys_lower: usize,
    pub critical_keys_upper: usize,
    pub critical_rooms_lower: usize,
    pub critical_rooms_upper: usize,
    pub rooms_lower: usize,
    pub rooms_upper: usize,
    pub batch_size: usize,
    pub max_attempts: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::for_grid_size(DEFAULT_GRID_SIZE)
    }
}

// Derivations saturate so that oversized grids reach `validate` instead of
// overflowing.

pub fn critical_keys_lower(width: usize) -> usize {
    width.saturating_mul(3) / 4
}

pub fn critical_keys_upper(width: usize) -> usize {
    width
}

pub fn critical_rooms_lower(keys_lower: usize) -> usize {
    keys_lower.saturating_mul(3).saturating_add(1)
}

pub fn critical_rooms_upper(keys_upper: usize) -> usize {
    keys_upper.saturating_mul(3).saturating_sub(1)
}

pub fn rooms_lower(width: usize) -> usize {
    width.saturating_mul(width.saturating_sub(1)).saturating_sub(6)
}

pub fn rooms_upper(width: usize) -> usize {
    width.saturating_mul(width)
}

impl GeneratorConfig {
    pub fn for_grid_size(size: usize) -> Self {
        let keys_lower = critical_keys_lower(size);
        let keys_upper = critical_keys_upper(size);
        Self {
            width: size,
            height: size,
            critical_keys_lower: keys_lower,
            critical_keys_upper: keys_upper,
            critical_rooms_lower: critical_rooms_lower(keys_lower),
            critical_rooms_upper: critical_rooms_upper(keys_upper),
            rooms_lower: rooms_lower(size),
            rooms_upper: rooms_upper(size),
            batch_size: DEFAULT_BATCH_SIZE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Parses a partial TOML document. `grid_size` picks the derivation base,
    /// every other key overrides the derived value.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let overrides: ConfigOverrides = toml::from_str(source)?;
        Ok(overrides.apply())
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Cell count, or `None` when it does not fit in a `usize`.
    pub fn capacity(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 2 || self.height < 2 {
            return Err(ConfigError::ZeroExtent { width: self.width, height: self.height });
        }
        let capacity = match self.capacity() {
            Some(capacity) if capacity <= MAX_GRID_CELLS => capacity,
            _ => {
                return Err(ConfigError::GridTooLarge {
                    width: self.width,
                    height: self.height,
                    max_cells: MAX_GRID_CELLS,
                });
            }
        };
        for (name, lower, upper) in [
            ("critical key", self.critical_keys_lower, self.critical_keys_upper),
            ("critical room", self.critical_rooms_lower, self.critical_rooms_upper),
            ("total room", self.rooms_lower, self.rooms_upper),
        ] {
            if lower > upper {
                return Err(ConfigError::InvertedBounds { name, lower, upper });
            }
        }
        if self.critical_rooms_lower > self.rooms_upper {
            return Err(ConfigError::CriticalExceedsRooms {
                critical_lower: self.critical_rooms_lower,
                rooms_upper: self.rooms_upper,
            });
        }
        for (name, value) in
            [("rooms_upper", self.rooms_upper), ("critical_rooms_lower", self.critical_rooms_lower)]
        {
            if value > capacity {
                return Err(ConfigError::ExceedsGrid { name, value, capacity });
            }
        }
        if self.critical_rooms_lower < 2 {
            return Err(ConfigError::TooFewCriticalRooms { lower: self.critical_rooms_lower });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigOverrides {
    grid_size: Option<usize>,
    width: Option<usize>,
    height: Option<usize>,
    critical_keys_lower: Option<usize>,
    critical_keys_upper: Option<usize>,
    critical_rooms_lower: Option<usize>,
    critical_rooms_upper: Option<usize>,
    rooms_lower: Option<usize>,
    rooms_upper: Option<usize>,
    batch_size: Option<usize>,
    max_attempts: Option<u32>,
}

impl ConfigOverrides {
    fn apply(self) -> GeneratorConfig {
        let mut config = GeneratorConfig::for_grid_size(self.grid_size.unwrap_or(DEFAULT_GRID_SIZE));
        // Key bounds feed the critical room derivation unless those are pinned too.
        if let Some(keys_lower) = self.critical_keys_lower {
            config.critical_keys_lower = keys_lower;
            config.critical_rooms_lower = critical_rooms_lower(keys_lower);
        }
        if let Some(keys_upper) = self.critical_keys_upper {
            config.critical_keys_upper = keys_upper;
            config.critical_rooms_upper = critical_rooms_upper(keys_upper);
        }
        config.width = self.width.unwrap_or(config.width);
        config.height = self.height.unwrap_or(config.height);
        config.critical_rooms_lower = self.critical_rooms_lower.unwrap_or(config.critical_rooms_lower);
        config.critical_rooms_upper = self.critical_rooms_upper.unwrap_or(config.critical_rooms_upper);
        config.rooms_lower = self.rooms_lower.unwrap_or(config.rooms_lower);
        config.rooms_upper = self.rooms_upper.unwrap_or(config.rooms_upper);
        config.batch_size = self.batch_size.unwrap_or(config.batch_size);
        config.max_attempts = self.max_attempts.unwrap_or(config.max_attempts);
        config
    }
}
