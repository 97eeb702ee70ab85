//! Generate a random GLSL shader pair
//!
//! Run with: cargo run --bin shadergen -- --seed 42
//!
//! Prints the fragment shader to stdout, or writes fragment and vertex
//! sources next to each other when -o is given. Depth bounds default lower
//! than imgen's: emitted expression size grows exponentially with depth.

use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use tracing_subscriber::EnvFilter;

use artgen_synth::{synthesize_program, BuildConfig, Registry};

#[derive(Parser)]
#[command(about = "Emit a random expression tree as a GLSL shader pair")]
struct Args {
    /// RNG seed; drawn from OS entropy if omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Minimum tree depth before terminals are allowed
    #[arg(long, default_value_t = 3)]
    depth_min: u32,

    /// Maximum tree depth; only terminals are chosen at this depth
    #[arg(long, default_value_t = 8)]
    depth_max: u32,

    /// Write the fragment shader here (and the vertex shader alongside,
    /// with a .vert extension) instead of printing
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = BuildConfig::new(args.depth_min, args.depth_max)?;

    let seed = args.seed.unwrap_or_else(|| rand::random::<u64>());
    let mut rng = Pcg32::seed_from_u64(seed);
    eprintln!("Seed: {seed}");

    let registry = Registry::standard();
    let program = synthesize_program(&registry, &config, &mut rng)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &program.fragment)?;
            let vertex_path = path.with_extension("vert");
            std::fs::write(&vertex_path, &program.vertex)?;
            eprintln!("Saved {} and {}", path.display(), vertex_path.display());
        }
        None => {
            println!("{}", program.fragment);
        }
    }
    Ok(())
}
