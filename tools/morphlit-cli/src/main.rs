//! Morphlit CLI - evaluate morph/toon-shading draws on the CPU
//!
//! # Commands
//!
//! - `morphlit eval` - Run a scene's draw and print per-vertex results as JSON
//! - `morphlit check` - Validate a scene's bindings without evaluating
//!
//! # Usage
//!
//! ```bash
//! # Evaluate with the scene's own morph weights
//! morphlit eval face.toml
//!
//! # Override weights and write to a file
//! morphlit eval face.toml -m smile=1 -m blink=0.5 -o out.json
//!
//! # Verbose pipeline logging
//! RUST_LOG=morphlit_pipeline=debug morphlit eval face.toml
//! ```
//!
//! # Scene (TOML)
//!
//! ```toml
//! [config]
//! variant = "standard-full"   # minimal | textured | standard-subset | standard-full
//! normal_transform = "legacy" # optional; default inverse-model
//!
//! [frame]
//! eye = [0, 1, 4]
//!
//! [material]
//! ambient = [0.2, 0.2, 0.2]
//! env_blend_mode = "multiply"
//!
//! [textures.base]
//! color = [1, 1, 1, 1]
//!
//! [textures.toon]
//! width = 1
//! height = 2
//! texels = [[1, 1, 1, 1], [0.6, 0.6, 0.7, 1]]
//!
//! [[vertices]]
//! position = [0, 0, 0]
//! normal = [0, 0, 1]
//!
//! [[morphs]]
//! name = "smile"
//! kind = "vertex"
//! weight = 0.5
//! offsets = [{ vertex = 0, offset = [0, 0.1, 0] }]
//! ```

mod check;
mod eval;
mod report;
mod scene;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Morphlit CLI - evaluate morph/toon-shading draws on the CPU
#[derive(Parser)]
#[command(name = "morphlit")]
#[command(about = "Evaluate morph-animated toon-shading draws on the CPU")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scene's draw and print per-vertex results as JSON
    Eval(eval::EvalArgs),

    /// Validate a scene's bindings without evaluating
    Check(check::CheckArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Eval(args) => eval::execute(args),
        Commands::Check(args) => check::execute(args),
    }
}
