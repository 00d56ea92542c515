use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use dungeon_core::render::render_text;
use dungeon_core::{GeneratorConfig, MapGenerator};
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Grid size used to derive every bound; ignored when --config is given
    #[arg(long, default_value_t = 8)]
    size: usize,
    /// TOML file with generator overrides
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Print the map as JSON instead of the text picture
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GeneratorConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => GeneratorConfig::for_grid_size(args.size),
    };
    let generator = MapGenerator::new(config).context("Rejected generator configuration")?;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let generated = generator.generate(&mut rng).context("Map generation failed")?;
    let map = &generated.map;

    if args.json {
        println!("{}", serde_json::to_string_pretty(map).context("Failed to serialize map")?);
        return Ok(());
    }

    print!("{}", render_text(map));
    println!();
    println!("Rooms: {} ({} critical)", map.occupied_count(), map.critical_count());
    if let (Some(base), Some(boss)) = (map.base_coord(), map.boss_coord()) {
        println!("Base: {base}  Boss: {boss}  Distance: {}", base.manhattan(boss));
    }
    println!(
        "Attempts: {} (blocked corridor {}, empty candidates {}, bound exceeded {})",
        generated.attempts,
        generated.rejections.blocked_corridor,
        generated.rejections.empty_candidate_set,
        generated.rejections.bound_exceeded
    );
    println!("Fingerprint: {:016x}", map.fingerprint());

    Ok(())
}
