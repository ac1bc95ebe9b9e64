//! Whole-draw scenarios: bind inputs, run vertices, shade fragments

use glam::{Mat4, Vec2, Vec3, Vec4};
use morphlit_pipeline::shared::{EnvBlendMode, InstanceColumns, ShadingVariant};
use morphlit_pipeline::{
    Draw, DrawInputs, FrameState, InstanceTransform, Light, Material, MorphCoefficients,
    MorphController, MorphDefinition, MorphKind, MorphTableBuilder, NormalTransform,
    ShadingConfig, Texture, TextureBindings, Vertex,
};

const EPSILON: f32 = 1e-5;

/// Unit UV sphere with outward normals
fn sphere(rings: u32, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::new();
    for ring in 0..=rings {
        let v = ring as f32 / rings as f32;
        let theta = v * std::f32::consts::PI;
        for segment in 0..segments {
            let u = segment as f32 / segments as f32;
            let phi = u * std::f32::consts::TAU;
            let normal = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
            vertices.push(Vertex::new(normal, normal, Vec2::new(u, v)));
        }
    }
    vertices
}

#[test]
fn test_flat_lit_sphere_is_white() {
    let frame = FrameState::look_at(
        Vec3::new(0.0, 0.0, 4.0),
        Vec3::ZERO,
        Vec3::Y,
        std::f32::consts::FRAC_PI_3,
        1.0,
        0.1,
        100.0,
    );
    let material = Material {
        ambient_color: Vec3::splat(0.2),
        diffuse_color: Vec4::ONE,
        specular_strength: 0.0,
        light: Light::directional(Vec3::ONE, Vec3::new(-1.0, -1.0, -1.0)),
        env_blend_mode: EnvBlendMode::Disabled,
        ..Material::default()
    };
    let textures = TextureBindings::default().with_base(Texture::solid(Vec4::ONE));
    let instances = [InstanceTransform::default()];
    let vertices = sphere(8, 12);
    let coefficients = MorphCoefficients::ZERO;

    let draw = Draw::new(DrawInputs {
        frame: &frame,
        config: ShadingConfig::for_variant(ShadingVariant::Textured),
        material: &material,
        instances: &instances,
        vertices: &vertices,
        morph_tables: None,
        coefficients: &coefficients,
        textures: &textures,
    })
    .unwrap();

    let outputs = draw.run();
    assert_eq!(outputs.len(), vertices.len());
    for color in draw.shade_vertices(&outputs) {
        assert_eq!(color, Vec4::ONE);
    }
}

#[test]
fn test_flat_lit_sphere_full_variant_with_neutral_terms() {
    // Toon and environment bound but neutral: still white
    let frame = FrameState::default();
    let material = Material {
        ambient_color: Vec3::splat(0.2),
        env_blend_mode: EnvBlendMode::Multiply,
        ..Material::default()
    };
    let textures = TextureBindings::default()
        .with_base(Texture::solid(Vec4::ONE))
        .with_toon(Texture::solid(Vec4::ONE))
        .with_environment(Texture::solid(Vec4::ONE));
    let instances = [InstanceTransform::default()];
    let vertices = sphere(4, 6);
    let builder = MorphTableBuilder::new(vertices.len() as u32);
    let bundle = builder.build().unwrap();
    let coefficients = MorphCoefficients::ZERO;

    let draw = Draw::new(DrawInputs {
        frame: &frame,
        config: ShadingConfig::for_variant(ShadingVariant::StandardFull),
        material: &material,
        instances: &instances,
        vertices: &vertices,
        morph_tables: Some(bundle.tables.as_set()),
        coefficients: &coefficients,
        textures: &textures,
    })
    .unwrap();

    let fragments: Vec<_> = draw.run().iter().map(|o| o.fragment()).collect();
    for color in draw.shade_fragments(&fragments) {
        assert_eq!(color, Vec4::ONE);
    }
}

#[test]
fn test_single_morph_offsets_clip_y() {
    let mut builder = MorphTableBuilder::new(1).with_width(16);
    builder.add_vertex_morph(0, [(0, Vec3::Y)]).unwrap();
    let bundle = builder.build().unwrap();

    let mut morphs = MorphController::new(vec![MorphDefinition::new("lift", MorphKind::Vertex)])
        .unwrap();
    morphs.set_morph("lift", 1.0);
    assert!(morphs.take_dirty());
    let coefficients = morphs.coefficients();

    let frame = FrameState::default();
    let material = Material::default();
    let textures = TextureBindings::default().with_base(Texture::solid(Vec4::ONE));
    let instances = [InstanceTransform::from_columns(&InstanceColumns::default())];
    let vertices = [Vertex::new(Vec3::ZERO, Vec3::Y, Vec2::ZERO).with_morph(bundle.attributes[0])];

    let run = |coefficients: &MorphCoefficients| {
        Draw::new(DrawInputs {
            frame: &frame,
            config: ShadingConfig::for_variant(ShadingVariant::StandardSubset),
            material: &material,
            instances: &instances,
            vertices: &vertices,
            morph_tables: Some(bundle.tables.as_set()),
            coefficients,
            textures: &textures,
        })
        .unwrap()
        .run()[0]
    };

    let rest = run(&MorphCoefficients::ZERO);
    let morphed = run(&coefficients);
    assert!((morphed.clip_position.y - rest.clip_position.y - 1.0).abs() < EPSILON);
    assert!((morphed.clip_position.x - rest.clip_position.x).abs() < EPSILON);
}

#[test]
fn test_legacy_and_corrected_normals_diverge_under_scale() {
    let model = Mat4::from_scale(Vec3::new(4.0, 1.0, 1.0));
    let instances = [InstanceTransform::with_inverse(model, model.inverse())];
    let frame = FrameState::default();
    let material = Material::default();
    let textures = TextureBindings::default().with_base(Texture::solid(Vec4::ONE));
    let coefficients = MorphCoefficients::ZERO;
    let normal = Vec3::new(1.0, 1.0, 0.0).normalize();
    let vertices = [Vertex::new(Vec3::ZERO, normal, Vec2::ZERO)];

    let run = |path: NormalTransform| {
        Draw::new(DrawInputs {
            frame: &frame,
            config: ShadingConfig::for_variant(ShadingVariant::Textured)
                .with_normal_transform(path),
            material: &material,
            instances: &instances,
            vertices: &vertices,
            morph_tables: None,
            coefficients: &coefficients,
            textures: &textures,
        })
        .unwrap()
        .run()[0]
        .world_normal
    };

    let legacy = run(NormalTransform::Legacy);
    let corrected = run(NormalTransform::InverseModel);
    assert!(legacy.x > legacy.y);
    assert!(corrected.x < corrected.y);
}
