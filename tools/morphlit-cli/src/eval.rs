//! Eval command - run a scene's draw and write the per-vertex results

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use morphlit_pipeline::Draw;

use crate::report::{DrawReport, VertexReport, active_coefficients};
use crate::scene::{PreparedScene, Scene};

/// Arguments for the eval command
#[derive(Args)]
pub struct EvalArgs {
    /// Scene TOML file
    pub scene: PathBuf,

    /// Write the JSON report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override a morph weight, as `name=value` (repeatable)
    #[arg(short = 'm', long = "morph", value_parser = parse_morph_weight)]
    pub morphs: Vec<(String, f32)>,

    /// Emit compact JSON
    #[arg(long)]
    pub compact: bool,
}

fn parse_morph_weight(value: &str) -> Result<(String, f32)> {
    let (name, weight) = value
        .split_once('=')
        .context("expected `name=value`")?;
    let weight = weight
        .trim()
        .parse::<f32>()
        .with_context(|| format!("invalid weight '{weight}'"))?;
    Ok((name.trim().to_string(), weight))
}

/// Execute the eval command
pub fn execute(args: EvalArgs) -> Result<()> {
    let scene = Scene::load(&args.scene)?;
    let prepared = PreparedScene::new(&scene, &args.morphs)?;
    let report = evaluate(&scene, &prepared)?;

    let json = if args.compact {
        serde_json::to_string(&report)?
    } else {
        serde_json::to_string_pretty(&report)?
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write report: {}", path.display()))?;
            tracing::info!(path = %path.display(), outputs = report.outputs.len(), "wrote report");
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Run every vertex invocation and shade each output as a fragment
pub fn evaluate(scene: &Scene, prepared: &PreparedScene) -> Result<DrawReport> {
    let draw = Draw::new(prepared.inputs()).context("Scene failed draw validation")?;
    let outputs = draw.run();
    let colors = draw.shade_vertices(&outputs);

    let names: Vec<String> = scene.morphs.iter().map(|m| m.name.clone()).collect();
    Ok(DrawReport {
        variant: scene.config.variant,
        features: prepared.config.features.bits(),
        instances: prepared.instances.len(),
        vertices: prepared.vertices.len(),
        coefficients: active_coefficients(&prepared.controller, &names),
        outputs: outputs
            .iter()
            .zip(colors)
            .map(|(output, color)| VertexReport::new(output, color))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIFT_SCENE: &str = r#"
        [config]
        variant = "standard-subset"

        [textures.base]
        color = [1, 1, 1, 1]

        [[instances]]

        [[instances]]
        translation = [2, 0, 0]

        [[vertices]]
        position = [0, 0, 0]

        [[vertices]]
        position = [1, 0, 0]

        [[morphs]]
        name = "lift"
        kind = "vertex"
        offsets = [{ vertex = 1, offset = [0, 1, 0] }]
    "#;

    #[test]
    fn test_parse_morph_weight() {
        assert_eq!(parse_morph_weight("lift=0.5").unwrap(), ("lift".to_string(), 0.5));
        assert_eq!(parse_morph_weight(" lift = 1 ").unwrap(), ("lift".to_string(), 1.0));
        assert!(parse_morph_weight("lift").is_err());
        assert!(parse_morph_weight("lift=abc").is_err());
    }

    #[test]
    fn test_evaluate_instance_major() {
        let scene = Scene::parse(LIFT_SCENE).unwrap();
        let prepared = PreparedScene::new(&scene, &[("lift".to_string(), 1.0)]).unwrap();
        let report = evaluate(&scene, &prepared).unwrap();

        assert_eq!(report.outputs.len(), 4);
        assert_eq!(
            report
                .outputs
                .iter()
                .map(|o| (o.instance, o.vertex))
                .collect::<Vec<_>>(),
            vec![(0, 0), (0, 1), (1, 0), (1, 1)]
        );
        assert_eq!(report.outputs[1].world_position, [1.0, 1.0, 0.0]);
        assert_eq!(report.outputs[3].world_position, [3.0, 1.0, 0.0]);
        assert_eq!(report.outputs[0].world_position, [0.0, 0.0, 0.0]);
        assert_eq!(report.coefficients.len(), 1);
    }

    #[test]
    fn test_evaluate_rejects_missing_texture() {
        let scene = Scene::parse(
            r#"
            [config]
            variant = "textured"

            [[vertices]]
            position = [0, 0, 0]
            "#,
        )
        .unwrap();
        let prepared = PreparedScene::new(&scene, &[]).unwrap();
        assert!(evaluate(&scene, &prepared).is_err());
    }

    #[test]
    fn test_report_serializes() {
        let scene = Scene::parse(LIFT_SCENE).unwrap();
        let prepared = PreparedScene::new(&scene, &[]).unwrap();
        let report = evaluate(&scene, &prepared).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["variant"], "standard-subset");
        assert_eq!(json["outputs"].as_array().unwrap().len(), 4);
        assert!(json["coefficients"].as_array().unwrap().is_empty());
    }
}
