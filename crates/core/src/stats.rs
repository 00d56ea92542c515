//! Aggregates over a batch of finished maps. Reads maps only through their
//! public accessors.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::mapgen::Map;
use crate::types::Coord;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BatchStats {
    pub maps: usize,
    pub mean_room_count: f64,
    pub mean_base_boss_distance: f64,
    /// Share of maps whose base sits at each coordinate.
    pub base_frequency: BTreeMap<Coord, f64>,
    /// Share of maps whose boss sits at each coordinate.
    pub boss_frequency: BTreeMap<Coord, f64>,
}

impl BatchStats {
    pub fn base_frequency_at(&self, coord: Coord) -> f64 {
        self.base_frequency.get(&coord).copied().unwrap_or(0.0)
    }

    pub fn boss_frequency_at(&self, coord: Coord) -> f64 {
        self.boss_frequency.get(&coord).copied().unwrap_or(0.0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct BatchAccumulator {
    maps: usize,
    total_rooms: usize,
    total_distance: u64,
    distance_samples: usize,
    base_counts: BTreeMap<Coord, u32>,
    boss_counts: BTreeMap<Coord, u32>,
}

impl BatchAccumulator {
    pub fn add(&mut self, map: &Map) {
        self.maps += 1;
        self.total_rooms += map.occupied_count();
        if let Some(base) = map.base_coord() {
            *self.base_counts.entry(base).or_default() += 1;
        }
        if let Some(boss) = map.boss_coord() {
            *self.boss_counts.entry(boss).or_default() += 1;
        }
        if let (Some(base), Some(boss)) = (map.base_coord(), map.boss_coord()) {
            self.total_distance += u64::from(base.manhattan(boss));
            self.distance_samples += 1;
        }
    }

    /// `None` when no map was added.
    pub fn finish(self) -> Option<BatchStats> {
        if self.maps == 0 {
            return None;
        }
        let maps = self.maps as f64;
        let mean_base_boss_distance = if self.distance_samples == 0 {
            0.0
        } else {
            self.total_distance as f64 / self.distance_samples as f64
        };
        Some(BatchStats {
            maps: self.maps,
            mean_room_count: self.total_rooms as f64 / maps,
            mean_base_boss_distance,
            base_frequency: normalize(self.base_counts, maps),
            boss_frequency: normalize(self.boss_counts, maps),
        })
    }
}

fn normalize(counts: BTreeMap<Coord, u32>, maps: f64) -> BTreeMap<Coord, f64> {
    counts.into_iter().map(|(coord, count)| (coord, f64::from(count) / maps)).collect()
}

pub fn summarize<'a>(maps: impl IntoIterator<Item = &'a Map>) -> Option<BatchStats> {
    let mut accumulator = BatchAccumulator::default();
    for map in maps {
        accumulator.add(map);
    }
    accumulator.finish()
}
