use std::collections::{BTreeMap, BTreeSet, VecDeque};

use anyhow::{Result, bail};
use clap::Parser;
use dungeon_core::{Coord, GeneratorConfig, Map, MapGenerator, RejectionTally};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 500)]
    maps: u32,
}

const SIZES: [usize; 7] = [4, 5, 6, 7, 8, 9, 10];

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn check_map(map: &Map, config: &GeneratorConfig) -> Result<()> {
    let occupied = map.occupied_count();
    if !(config.rooms_lower..=config.rooms_upper).contains(&occupied) {
        bail!(
            "Invariant failed: {occupied} rooms outside [{}, {}]",
            config.rooms_lower,
            config.rooms_upper
        );
    }
    let critical = map.critical_count();
    if !(config.critical_rooms_lower..=config.critical_rooms_upper).contains(&critical) {
        bail!("Invariant failed: {critical} critical rooms out of bounds");
    }
    let (Some(base), Some(boss)) = (map.base_coord(), map.boss_coord()) else {
        bail!("Invariant failed: base or boss missing");
    };
    if base == boss || !map.get(base)?.critical {
        bail!("Invariant failed: base {base} must be a critical room apart from the boss");
    }

    let mut adjacency: BTreeMap<Coord, Vec<Coord>> = BTreeMap::new();
    for edge in map.edges() {
        if edge.from.manhattan(edge.to) != 1 {
            bail!("Invariant failed: edge {:?} is not unit length", edge);
        }
        if !map.get(edge.from)?.is_occupied() || !map.get(edge.to)?.is_occupied() {
            bail!("Invariant failed: edge {:?} touches an empty room", edge);
        }
        adjacency.entry(edge.from).or_default().push(edge.to);
        adjacency.entry(edge.to).or_default().push(edge.from);
    }

    let mut reachable = BTreeSet::from([boss]);
    let mut open = VecDeque::from([boss]);
    while let Some(coord) = open.pop_front() {
        for &next in adjacency.get(&coord).into_iter().flatten() {
            if reachable.insert(next) {
                open.push_back(next);
            }
        }
    }
    let occupied_coords: BTreeSet<Coord> = map.branchable().into_iter().chain([boss]).collect();
    if reachable != occupied_coords {
        bail!(
            "Invariant failed: {} of {} occupied rooms reachable from the boss",
            reachable.len(),
            occupied_coords.len()
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting layout fuzz on seed {} for {} maps...", args.seed, args.maps);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut rejections = RejectionTally::default();
    let mut attempts = 0_u64;

    for _ in 0..args.maps {
        let config = GeneratorConfig::for_grid_size(choose(&mut rng, &SIZES));
        let generator = MapGenerator::new(config)?;
        let generated = generator.generate(&mut rng)?;
        check_map(&generated.map, generator.config())?;
        rejections.merge(&generated.rejections);
        attempts += u64::from(generated.attempts);
    }

    println!(
        "Fuzzing completed successfully: {attempts} attempts, {} rejected ({rejections:?}).",
        rejections.total()
    );
    Ok(())
}
