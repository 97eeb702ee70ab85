//! Generate a procedural image from a random expression tree
//!
//! Run with: cargo run --bin imgen -- --seed 42 -o out.png

use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use tracing_subscriber::EnvFilter;

use artgen::palette::Palette;
use artgen_synth::{synthesize_field, BuildConfig, Grid, Interval, RescalePolicy};

#[derive(Parser)]
#[command(about = "Render a random expression tree to a PNG image")]
struct Args {
    /// RNG seed; drawn from OS entropy if omitted
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 400)]
    width: usize,

    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Minimum tree depth before terminals are allowed
    #[arg(long, default_value_t = 7)]
    depth_min: u32,

    /// Maximum tree depth; only terminals are chosen at this depth
    #[arg(long, default_value_t = 20)]
    depth_max: u32,

    /// JSON build-config preset; overrides the depth flags
    #[arg(long)]
    config: Option<PathBuf>,

    /// Normalize for display using the percentile rescale
    #[arg(long)]
    robust: bool,

    /// Output path
    #[arg(short, long, default_value = "out.png")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => serde_json::from_str::<BuildConfig>(&std::fs::read_to_string(path)?)?,
        None => BuildConfig::new(args.depth_min, args.depth_max)?,
    };
    if args.robust {
        config.rescale_policy = RescalePolicy::Percentile;
    }

    let seed = args.seed.unwrap_or_else(|| rand::random::<u64>());
    let mut rng = Pcg32::seed_from_u64(seed);
    println!("Seed: {seed}");

    let registry = artgen_synth::Registry::standard();
    let grid = Grid::new(args.width, args.height, Interval::new(-1.0, 1.0));
    tracing::info!(
        width = args.width,
        height = args.height,
        depth_min = config.depth_min,
        depth_max = config.depth_max,
        "synthesizing field"
    );

    let field = synthesize_field(&registry, &config, &grid, &mut rng)?;
    let normalized = field.normalized(Interval::UNIT, config.rescale_policy);
    let palette = Palette::random(&mut rng);

    let mut img = image::RgbImage::new(args.width as u32, args.height as u32);
    for (i, &t) in normalized.values().iter().enumerate() {
        let x = (i % args.width) as u32;
        let y = (i / args.width) as u32;
        img.put_pixel(x, y, image::Rgb(palette.color(t)));
    }
    img.save(&args.output)?;

    println!("Saved {}", args.output.display());
    Ok(())
}
