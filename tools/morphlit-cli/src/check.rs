//! Check command - validate a scene without evaluating it

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::scene::{PreparedScene, Scene};

/// Arguments for the check command
#[derive(Args)]
pub struct CheckArgs {
    /// Scene TOML file
    pub scene: PathBuf,
}

/// Execute the check command
pub fn execute(args: CheckArgs) -> Result<()> {
    let scene = Scene::load(&args.scene)?;
    let prepared = PreparedScene::new(&scene, &[])?;
    prepared
        .inputs()
        .validate()
        .with_context(|| format!("{} is not drawable", args.scene.display()))?;

    let attributes = &prepared.bundle.attributes;
    let vertex_entries: u32 = attributes.iter().map(|a| a.vertex_morph_count).sum();
    let uv_entries: u32 = attributes.iter().map(|a| a.uv_morph_count).sum();

    println!("{}: ok", args.scene.display());
    println!("  Variant:    {}", scene.config.variant.name());
    println!("  Features:   {:#08b}", prepared.config.features.bits());
    println!("  Normals:    {:?}", prepared.config.normal_transform);
    println!("  Instances:  {}", prepared.instances.len());
    println!("  Vertices:   {}", prepared.vertices.len());
    println!(
        "  Morphs:     {} ({} vertex entries, {} uv entries)",
        prepared.controller.len(),
        vertex_entries,
        uv_entries
    );
    Ok(())
}
