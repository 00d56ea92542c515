use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dungeon_core::stats::{BatchAccumulator, BatchStats};
use dungeon_core::{Coord, GeneratorConfig, MapGenerator, RejectionTally};
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = 8)]
    size: usize,
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of maps to generate; defaults to the config's batch size
    #[arg(short, long)]
    batch: Option<usize>,
    /// Emit the statistics as JSON
    #[arg(long)]
    json: bool,
}

fn frequency_grid(width: usize, height: usize, frequency: impl Fn(Coord) -> f64) -> String {
    let mut text = String::new();
    for y in (0..height).rev() {
        let row: Vec<String> = (0..width)
            .map(|x| format!("{:.3}", frequency(Coord::new(x as i32, y as i32))))
            .collect();
        text.push_str(&row.join(" "));
        text.push('\n');
    }
    text
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GeneratorConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => GeneratorConfig::for_grid_size(args.size),
    };
    let batch = args.batch.unwrap_or(config.batch_size);
    let generator = MapGenerator::new(config).context("Rejected generator configuration")?;
    let (width, height) = (generator.config().width, generator.config().height);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut accumulator = BatchAccumulator::default();
    let mut rejections = RejectionTally::default();
    for index in 0..batch {
        let generated = generator
            .generate(&mut rng)
            .with_context(|| format!("Map {index} of {batch} failed to generate"))?;
        rejections.merge(&generated.rejections);
        accumulator.add(&generated.map);
    }
    let stats: BatchStats = accumulator.finish().context("Batch size must be at least 1")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats).context("Failed to serialize stats")?);
        return Ok(());
    }

    println!("Maps: {}", stats.maps);
    println!("Mean room count: {:.3}", stats.mean_room_count);
    println!("Mean base-boss distance: {:.3}", stats.mean_base_boss_distance);
    println!(
        "Rejected attempts: {} (blocked corridor {}, empty candidates {}, bound exceeded {})",
        rejections.total(),
        rejections.blocked_corridor,
        rejections.empty_candidate_set,
        rejections.bound_exceeded
    );
    println!("\nBase frequency:");
    print!("{}", frequency_grid(width, height, |coord| stats.base_frequency_at(coord)));
    println!("\nBoss frequency:");
    print!("{}", frequency_grid(width, height, |coord| stats.boss_frequency_at(coord)));

    Ok(())
}
