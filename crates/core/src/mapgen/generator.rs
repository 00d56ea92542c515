//! Attempt orchestration: critical path first, then bonus branches, with
//! whole-attempt rejection and a bounded retry loop.

use rand_chacha::rand_core::Rng;
use serde::Serialize;

use crate::config::GeneratorConfig;
use crate::error::{ConfigError, CountKind, GenerateError, GenerationFailure, MapError, Stage};
use crate::types::{Coord, CorridorKind, Room};

use super::cluster::{connect, span};
use super::model::Map;
use super::seed::{choose, random_inclusive};

/// Per-cause count of discarded attempts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RejectionTally {
    pub blocked_corridor: u32,
    pub empty_candidate_set: u32,
    pub bound_exceeded: u32,
}

impl RejectionTally {
    fn record(&mut self, failure: &GenerationFailure) {
        match failure {
            GenerationFailure::BlockedCorridor { .. } => self.blocked_corridor += 1,
            GenerationFailure::EmptyCandidateSet { .. } => self.empty_candidate_set += 1,
            GenerationFailure::BoundExceeded { .. } => self.bound_exceeded += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.blocked_corridor + self.empty_candidate_set + self.bound_exceeded
    }

    pub fn merge(&mut self, other: &RejectionTally) {
        self.blocked_corridor += other.blocked_corridor;
        self.empty_candidate_set += other.empty_candidate_set;
        self.bound_exceeded += other.bound_exceeded;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedMap {
    pub map: Map,
    /// Attempts used, including the successful one.
    pub attempts: u32,
    pub rejections: RejectionTally,
}

enum AttemptError {
    Rejected(GenerationFailure),
    Invariant(MapError),
}

impl From<GenerationFailure> for AttemptError {
    fn from(failure: GenerationFailure) -> Self {
        AttemptError::Rejected(failure)
    }
}

impl From<MapError> for AttemptError {
    fn from(error: MapError) -> Self {
        AttemptError::Invariant(error)
    }
}

pub struct MapGenerator {
    config: GeneratorConfig,
}

impl MapGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GeneratedMap, GenerateError> {
        let mut rejections = RejectionTally::default();
        let mut attempts = 0_u32;
        loop {
            attempts += 1;
            let failure = match self.attempt(rng) {
                Ok(map) => {
                    log::info!(
                        "generated {}x{} map after {attempts} attempt(s): {} rooms, {} critical",
                        map.width(),
                        map.height(),
                        map.occupied_count(),
                        map.critical_count()
                    );
                    return Ok(GeneratedMap { map, attempts, rejections });
                }
                Err(AttemptError::Rejected(failure)) => failure,
                Err(AttemptError::Invariant(error)) => return Err(error.into()),
            };
            log::debug!("attempt {attempts} rejected: {failure}");
            rejections.record(&failure);
            if attempts >= self.config.max_attempts {
                log::warn!("giving up after {attempts} attempts ({rejections:?})");
                return Err(GenerateError::AttemptsExhausted { attempts, last: failure });
            }
        }
    }

    pub fn generate_batch<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
    ) -> Result<Vec<GeneratedMap>, GenerateError> {
        (0..count).map(|_| self.generate(rng)).collect()
    }

    fn attempt<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Map, AttemptError> {
        let config = &self.config;
        let mut map = Map::new(config.width, config.height);

        let boss = self.random_coord(rng);
        map.set(boss, Room::boss())?;

        let corridor_end = self.random_coord(rng);
        connect(&mut map, boss, corridor_end, CorridorKind::Critical, rng)?;

        let critical_target =
            random_inclusive(rng, config.critical_rooms_lower, config.critical_rooms_upper);
        grow_branches(
            &mut map,
            CorridorKind::Critical,
            critical_target,
            Stage::GrowCriticalBranches,
            Map::critical_count,
            rng,
        )?;
        check_bounds(
            CountKind::CriticalRooms,
            map.critical_count(),
            config.critical_rooms_lower,
            config.critical_rooms_upper,
        )?;

        let room_target = random_inclusive(rng, config.rooms_lower, config.rooms_upper);
        grow_branches(
            &mut map,
            CorridorKind::Bonus,
            room_target,
            Stage::GrowBonusBranches,
            Map::occupied_count,
            rng,
        )?;
        check_bounds(
            CountKind::TotalRooms,
            map.occupied_count(),
            config.rooms_lower,
            config.rooms_upper,
        )?;

        let base_candidates: Vec<Coord> =
            map.critical_coords().into_iter().filter(|&coord| coord != boss).collect();
        let Some(base) = choose(rng, &base_candidates) else {
            return Err(GenerationFailure::EmptyCandidateSet { stage: Stage::PlaceBase }.into());
        };
        map.mark_base(base)?;
        Ok(map)
    }

    fn random_coord<R: Rng + ?Sized>(&self, rng: &mut R) -> Coord {
        let x = random_inclusive(rng, 0, self.config.width - 1);
        let y = random_inclusive(rng, 0, self.config.height - 1);
        Coord::new(x as i32, y as i32)
    }
}

/// Attaches random empty coordinates to the nearest branchable room until
/// `count` reaches `target`. Every round occupies at least one room.
fn grow_branches<R: Rng + ?Sized>(
    map: &mut Map,
    kind: CorridorKind,
    target: usize,
    stage: Stage,
    count: fn(&Map) -> usize,
    rng: &mut R,
) -> Result<(), GenerationFailure> {
    while count(map) < target {
        let Some(branch_end) = choose(rng, &map.empty_coords()) else {
            return Err(GenerationFailure::EmptyCandidateSet { stage });
        };
        let hubs = map.branchable();
        if hubs.is_empty() {
            return Err(GenerationFailure::EmptyCandidateSet { stage });
        }
        span(map, vec![branch_end], hubs, kind, rng)?;
    }
    Ok(())
}

fn check_bounds(
    kind: CountKind,
    count: usize,
    lower: usize,
    upper: usize,
) -> Result<(), GenerationFailure> {
    if count < lower || count > upper {
        return Err(GenerationFailure::BoundExceeded { kind, count, lower, upper });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::seed::seeded_rng;

    fn generate(config: GeneratorConfig, seed: u64) -> Result<GeneratedMap, GenerateError> {
        let generator = MapGenerator::new(config).expect("valid config");
        generator.generate(&mut seeded_rng(seed))
    }

    #[test]
    fn default_grid_lands_inside_documented_bounds() {
        for seed in [1_u64, 2, 3, 40, 99, 1_024] {
            let generated = generate(GeneratorConfig::default(), seed).expect("default config");
            let map = &generated.map;
            assert!((50..=64).contains(&map.occupied_count()), "seed={seed}");
            assert!((19..=23).contains(&map.critical_count()), "seed={seed}");
            assert_eq!(generated.attempts, generated.rejections.total() + 1);
        }
    }

    #[test]
    fn base_and_boss_are_distinct_unique_and_critical() {
        let generated = generate(GeneratorConfig::default(), 77).expect("default config");
        let map = &generated.map;
        let base = map.base_coord().expect("base placed");
        let boss = map.boss_coord().expect("boss placed");
        assert_ne!(base, boss);
        assert!(map.get(base).expect("in bounds").critical);
        assert!(map.get(boss).expect("in bounds").critical);

        let critical = map.critical_coords();
        let bases = critical.iter().filter(|&&c| map.get(c).is_ok_and(|room| room.base)).count();
        let bosses = critical.iter().filter(|&&c| map.get(c).is_ok_and(|room| room.boss)).count();
        assert_eq!((bases, bosses), (1, 1));
    }

    #[test]
    fn same_seed_produces_identical_maps() {
        let left = generate(GeneratorConfig::default(), 123_456).expect("default config");
        let right = generate(GeneratorConfig::default(), 123_456).expect("default config");
        assert_eq!(left.map.canonical_bytes(), right.map.canonical_bytes());
        assert_eq!(left.attempts, right.attempts);
    }

    #[test]
    fn different_seeds_change_the_layout() {
        let left = generate(GeneratorConfig::default(), 1).expect("default config");
        let right = generate(GeneratorConfig::default(), 2).expect("default config");
        assert_ne!(left.map.fingerprint(), right.map.fingerprint());
    }

    #[test]
    fn invalid_config_is_rejected_before_generation() {
        let config = GeneratorConfig { rooms_lower: 70, rooms_upper: 60, ..Default::default() };
        assert!(matches!(MapGenerator::new(config), Err(ConfigError::InvertedBounds { .. })));
    }

    #[test]
    fn attempt_ceiling_surfaces_a_terminal_error() {
        // A 32x32 grid only succeeds with two critical rooms when the first
        // corridor ends right next to the boss.
        let config = GeneratorConfig {
            critical_rooms_lower: 2,
            critical_rooms_upper: 2,
            max_attempts: 2,
            ..GeneratorConfig::for_grid_size(32)
        };
        let mut exhausted = 0;
        for seed in 0..20 {
            match generate(config.clone(), seed) {
                Ok(generated) => assert!(generated.attempts <= 2),
                Err(GenerateError::AttemptsExhausted { attempts, .. }) => {
                    exhausted += 1;
                    assert_eq!(attempts, 2);
                }
                Err(other) => panic!("unexpected error {other}"),
            }
        }
        assert!(exhausted > 0);
    }

    #[test]
    fn batch_generation_consumes_one_stream() {
        let generator = MapGenerator::new(GeneratorConfig::for_grid_size(6)).expect("valid config");
        let batch = generator.generate_batch(&mut seeded_rng(5), 4).expect("batch");
        assert_eq!(batch.len(), 4);
        assert_ne!(batch[0].map.fingerprint(), batch[1].map.fingerprint());
    }

    #[test]
    fn check_bounds_rejects_both_sides() {
        assert!(check_bounds(CountKind::TotalRooms, 5, 5, 9).is_ok());
        assert!(check_bounds(CountKind::TotalRooms, 4, 5, 9).is_err());
        assert_eq!(
            check_bounds(CountKind::CriticalRooms, 10, 5, 9),
            Err(GenerationFailure::BoundExceeded {
                kind: CountKind::CriticalRooms,
                count: 10,
                lower: 5,
                upper: 9
            })
        );
    }

    #[test]
    fn critical_growth_from_a_lone_boss_has_no_hub() {
        let mut map = Map::new(4, 4);
        map.set(Coord::new(1, 1), Room::boss()).expect("in bounds");
        let result = grow_branches(
            &mut map,
            CorridorKind::Critical,
            3,
            Stage::GrowCriticalBranches,
            Map::critical_count,
            &mut seeded_rng(9),
        );
        assert_eq!(
            result,
            Err(GenerationFailure::EmptyCandidateSet { stage: Stage::GrowCriticalBranches })
        );
        assert_eq!(map.occupied_count(), 1);
        assert!(map.edges().next().is_none());
    }

    #[test]
    fn bonus_growth_on_a_full_grid_has_no_empty_cell() {
        let mut map = Map::new(2, 2);
        map.set(Coord::new(0, 0), Room::boss()).expect("in bounds");
        for coord in [Coord::new(1, 0), Coord::new(0, 1), Coord::new(1, 1)] {
            map.set(coord, Room::critical()).expect("in bounds");
        }
        let result = grow_branches(
            &mut map,
            CorridorKind::Bonus,
            5,
            Stage::GrowBonusBranches,
            Map::occupied_count,
            &mut seeded_rng(9),
        );
        assert_eq!(
            result,
            Err(GenerationFailure::EmptyCandidateSet { stage: Stage::GrowBonusBranches })
        );
    }

    #[test]
    fn growth_stops_once_the_target_is_reached() {
        let mut map = Map::new(5, 5);
        map.set(Coord::new(0, 0), Room::boss()).expect("in bounds");
        map.set(Coord::new(1, 0), Room::critical()).expect("in bounds");
        grow_branches(
            &mut map,
            CorridorKind::Bonus,
            4,
            Stage::GrowBonusBranches,
            Map::occupied_count,
            &mut seeded_rng(4),
        )
        .expect("open grid");
        assert!(map.occupied_count() >= 4);
        assert_eq!(map.critical_count(), 2);
        assert!(!map.bonus_edges().is_empty());
    }

    #[test]
    fn tally_counts_each_cause() {
        let mut tally = RejectionTally::default();
        tally.record(&GenerationFailure::BlockedCorridor { at: Coord::new(0, 0), target: Coord::new(1, 1) });
        tally.record(&GenerationFailure::EmptyCandidateSet { stage: Stage::GrowCriticalBranches });
        tally.record(&GenerationFailure::EmptyCandidateSet { stage: Stage::PlaceBase });
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.empty_candidate_set, 2);

        let mut merged = RejectionTally::default();
        merged.merge(&tally);
        merged.merge(&tally);
        assert_eq!(merged.blocked_corridor, 2);
    }
}
