//! Scene file parsing
//!
//! A scene is a TOML description of one draw: camera, material, light,
//! shading configuration, instances, vertices, morphs and textures.
//! Textures are given as a solid color or a small inline texel list.

use std::path::Path;

use anyhow::{Context, Result, bail};
use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use morphlit_pipeline::morph::{GroupMorphElement, MaterialMorphOffset, UvMorphTarget};
use morphlit_pipeline::{
    BoundTexture, DrawInputs, FrameState, InstanceTransform, Light, Material, MorphAccumulation,
    MorphCoefficients, MorphController, MorphDefinition, MorphKind, MorphTableBuilder,
    MorphTableBundle, NormalTransform, Sampler, ShadingConfig, Texture, TextureBindings, TintPair,
    Vertex,
};
use morphlit_shared::{DEFAULT_MORPH_TABLE_WIDTH, EnvBlendMode, ShadingVariant};
use serde::Deserialize;

/// Scene file structure
#[derive(Debug, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub frame: FrameSection,
    #[serde(default)]
    pub material: MaterialSection,
    #[serde(default)]
    pub light: LightSection,
    #[serde(default)]
    pub config: ConfigSection,
    #[serde(default)]
    pub textures: TexturesSection,
    #[serde(default = "default_instances")]
    pub instances: Vec<InstanceSection>,
    pub vertices: Vec<VertexSection>,
    #[serde(default)]
    pub morphs: Vec<MorphSection>,
}

fn default_instances() -> Vec<InstanceSection> {
    vec![InstanceSection::default()]
}

// ============================================================================
// Sections
// ============================================================================

/// Camera. Without an `eye` the camera and view are identity.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FrameSection {
    pub eye: Option<[f32; 3]>,
    pub target: [f32; 3],
    pub up: [f32; 3],
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for FrameSection {
    fn default() -> Self {
        Self {
            eye: None,
            target: [0.0; 3],
            up: [0.0, 1.0, 0.0],
            fov_y_degrees: 60.0,
            aspect: 1.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TintSection {
    pub mul: [f32; 4],
    pub add: [f32; 4],
}

impl Default for TintSection {
    fn default() -> Self {
        Self {
            mul: [1.0; 4],
            add: [0.0; 4],
        }
    }
}

impl From<&TintSection> for TintPair {
    fn from(section: &TintSection) -> Self {
        TintPair {
            mul: Vec4::from_array(section.mul),
            add: Vec4::from_array(section.add),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MaterialSection {
    /// Index matched against material-morph targets
    pub index: u32,
    pub diffuse: [f32; 4],
    pub ambient: [f32; 3],
    pub specular: [f32; 3],
    pub specular_strength: f32,
    pub env_blend_mode: EnvBlendMode,
    pub texture_tint: TintSection,
    pub environment_tint: TintSection,
    pub toon_tint: TintSection,
}

impl Default for MaterialSection {
    fn default() -> Self {
        Self {
            index: 0,
            diffuse: [1.0; 4],
            ambient: [0.0; 3],
            specular: [0.0; 3],
            specular_strength: 0.0,
            env_blend_mode: EnvBlendMode::Disabled,
            texture_tint: TintSection::default(),
            environment_tint: TintSection::default(),
            toon_tint: TintSection::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LightSection {
    pub color: [f32; 3],
    pub direction: [f32; 3],
}

impl Default for LightSection {
    fn default() -> Self {
        Self {
            color: [1.0; 3],
            direction: [0.0, -1.0, 0.0],
        }
    }
}

/// Variant defaults, optionally overridden per field
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfigSection {
    pub variant: ShadingVariant,
    pub normal_transform: Option<NormalTransform>,
    pub morph_accumulation: Option<MorphAccumulation>,
    /// Width of the packed morph tables
    pub morph_table_width: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TexturesSection {
    pub base: Option<TextureSection>,
    pub toon: Option<TextureSection>,
    pub environment: Option<TextureSection>,
}

/// Either `color` or `width`/`height`/`texels`
#[derive(Debug, Default, Deserialize)]
pub struct TextureSection {
    pub color: Option<[f32; 4]>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    #[serde(default)]
    pub texels: Vec<[f32; 4]>,
    pub sampler: Option<Sampler>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct InstanceSection {
    pub translation: [f32; 3],
    /// Quaternion `[x, y, z, w]`
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    /// Bind the inverse-model columns
    pub inverse: bool,
}

impl Default for InstanceSection {
    fn default() -> Self {
        Self {
            translation: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0; 3],
            inverse: true,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VertexSection {
    pub position: [f32; 3],
    #[serde(default = "default_normal")]
    pub normal: [f32; 3],
    #[serde(default)]
    pub uv: [f32; 2],
    #[serde(default)]
    pub additional_uv: [f32; 4],
}

fn default_normal() -> [f32; 3] {
    [0.0, 1.0, 0.0]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MorphKindTag {
    Vertex,
    Uv,
    Group,
    Material,
}

#[derive(Debug, Deserialize)]
pub struct VertexOffset {
    pub vertex: u32,
    pub offset: [f32; 3],
}

#[derive(Debug, Deserialize)]
pub struct UvOffset {
    pub vertex: u32,
    #[serde(default = "default_uv_target")]
    pub target: UvMorphTarget,
    pub offset: [f32; 4],
}

fn default_uv_target() -> UvMorphTarget {
    UvMorphTarget::Primary
}

/// One named morph; the coefficient slot is its position in the list
#[derive(Debug, Deserialize)]
pub struct MorphSection {
    pub name: String,
    pub kind: MorphKindTag,
    /// Initial weight
    #[serde(default)]
    pub weight: f32,
    #[serde(default)]
    pub offsets: Vec<VertexOffset>,
    #[serde(default)]
    pub uv_offsets: Vec<UvOffset>,
    #[serde(default)]
    pub elements: Vec<GroupMorphElement>,
    #[serde(default)]
    pub material_offsets: Vec<MaterialMorphOffset>,
}

// ============================================================================
// Loading
// ============================================================================

impl Scene {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("In scene {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse scene TOML")
    }

    pub fn shading_config(&self) -> ShadingConfig {
        let mut config = ShadingConfig::for_variant(self.config.variant);
        if let Some(path) = self.config.normal_transform {
            config = config.with_normal_transform(path);
        }
        if let Some(accumulation) = self.config.morph_accumulation {
            config = config.with_morph_accumulation(accumulation);
        }
        config
    }

    pub fn frame_state(&self) -> FrameState {
        let frame = &self.frame;
        match frame.eye {
            Some(eye) => FrameState::look_at(
                Vec3::from_array(eye),
                Vec3::from_array(frame.target),
                Vec3::from_array(frame.up),
                frame.fov_y_degrees.to_radians(),
                frame.aspect,
                frame.near,
                frame.far,
            ),
            None => FrameState::default(),
        }
    }

    /// The material before material morphs
    pub fn base_material(&self) -> Material {
        let m = &self.material;
        Material {
            diffuse_color: Vec4::from_array(m.diffuse),
            ambient_color: Vec3::from_array(m.ambient),
            specular_color: Vec3::from_array(m.specular),
            specular_strength: m.specular_strength,
            light: Light::directional(
                Vec3::from_array(self.light.color),
                Vec3::from_array(self.light.direction),
            ),
            env_blend_mode: m.env_blend_mode,
            texture_tint: (&m.texture_tint).into(),
            environment_tint: (&m.environment_tint).into(),
            toon_tint: (&m.toon_tint).into(),
        }
    }

    pub fn instance_transforms(&self) -> Vec<InstanceTransform> {
        self.instances
            .iter()
            .map(|instance| {
                let model = Mat4::from_scale_rotation_translation(
                    Vec3::from_array(instance.scale),
                    Quat::from_array(instance.rotation).normalize(),
                    Vec3::from_array(instance.translation),
                );
                if instance.inverse {
                    InstanceTransform::with_inverse(model, model.inverse())
                } else {
                    InstanceTransform::from_model(model)
                }
            })
            .collect()
    }

    pub fn morph_controller(&self) -> Result<MorphController> {
        let definitions = self
            .morphs
            .iter()
            .map(|morph| {
                let kind = match morph.kind {
                    MorphKindTag::Vertex => MorphKind::Vertex,
                    MorphKindTag::Uv => MorphKind::Uv,
                    MorphKindTag::Group => MorphKind::Group {
                        elements: morph.elements.clone(),
                    },
                    MorphKindTag::Material => MorphKind::Material {
                        offsets: morph.material_offsets.clone(),
                    },
                };
                MorphDefinition::new(morph.name.clone(), kind)
            })
            .collect();
        let mut controller = MorphController::new(definitions).context("Invalid morph list")?;
        for morph in &self.morphs {
            controller.set_morph(&morph.name, morph.weight);
        }
        Ok(controller)
    }

    pub fn morph_tables(&self) -> Result<MorphTableBundle> {
        let width = self
            .config
            .morph_table_width
            .unwrap_or(DEFAULT_MORPH_TABLE_WIDTH);
        let mut builder = MorphTableBuilder::new(self.vertices.len() as u32).with_width(width);
        for (index, morph) in self.morphs.iter().enumerate() {
            let index = index as u32;
            builder
                .add_vertex_morph(
                    index,
                    morph
                        .offsets
                        .iter()
                        .map(|o| (o.vertex, Vec3::from_array(o.offset))),
                )
                .with_context(|| format!("Morph '{}'", morph.name))?;
            builder
                .add_uv_morph(
                    index,
                    morph
                        .uv_offsets
                        .iter()
                        .map(|o| (o.vertex, o.target, Vec4::from_array(o.offset))),
                )
                .with_context(|| format!("Morph '{}'", morph.name))?;
        }
        builder.build().context("Failed to pack morph tables")
    }

    /// Vertices, with morph ranges from `bundle` when given
    pub fn vertices(&self, bundle: Option<&MorphTableBundle>) -> Vec<Vertex> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(index, v)| {
                let vertex = Vertex::new(
                    Vec3::from_array(v.position),
                    Vec3::from_array(v.normal),
                    Vec2::from_array(v.uv),
                )
                .with_additional_uv(Vec4::from_array(v.additional_uv));
                match bundle.and_then(|b| b.attributes.get(index)) {
                    Some(attributes) => vertex.with_morph(*attributes),
                    None => vertex,
                }
            })
            .collect()
    }

    pub fn texture_bindings(&self) -> Result<TextureBindings> {
        Ok(TextureBindings {
            base: bind(self.textures.base.as_ref(), Sampler::CLAMP_LINEAR)
                .context("Invalid base texture")?,
            toon: bind(self.textures.toon.as_ref(), Sampler::CLAMP_LINEAR)
                .context("Invalid toon texture")?,
            environment: bind(self.textures.environment.as_ref(), Sampler::CLAMP_LINEAR)
                .context("Invalid environment texture")?,
        })
    }
}

// ============================================================================
// Prepared Draw
// ============================================================================

/// Owned draw state built from a scene
#[derive(Debug)]
pub struct PreparedScene {
    pub frame: FrameState,
    pub config: ShadingConfig,
    pub material: Material,
    pub instances: Vec<InstanceTransform>,
    pub vertices: Vec<Vertex>,
    pub bundle: MorphTableBundle,
    pub controller: MorphController,
    pub coefficients: MorphCoefficients,
    pub textures: TextureBindings,
}

impl PreparedScene {
    /// Build draw state, applying `overrides` (morph name, weight) on top of
    /// the scene's initial weights
    pub fn new(scene: &Scene, overrides: &[(String, f32)]) -> Result<Self> {
        let mut controller = scene.morph_controller()?;
        for (name, weight) in overrides {
            if controller.morph_index(name).is_none() {
                bail!("Unknown morph '{name}'");
            }
            controller.set_morph(name, *weight);
        }

        let bundle = scene.morph_tables()?;
        let material = controller.material_values(&scene.base_material(), scene.material.index);

        Ok(Self {
            frame: scene.frame_state(),
            config: scene.shading_config(),
            material,
            instances: scene.instance_transforms(),
            vertices: scene.vertices(Some(&bundle)),
            coefficients: controller.coefficients(),
            controller,
            bundle,
            textures: scene.texture_bindings()?,
        })
    }

    pub fn inputs(&self) -> DrawInputs<'_> {
        DrawInputs {
            frame: &self.frame,
            config: self.config,
            material: &self.material,
            instances: &self.instances,
            vertices: &self.vertices,
            morph_tables: Some(self.bundle.tables.as_set()),
            coefficients: &self.coefficients,
            textures: &self.textures,
        }
    }
}

fn bind(section: Option<&TextureSection>, default_sampler: Sampler) -> Result<Option<BoundTexture>> {
    let Some(section) = section else {
        return Ok(None);
    };
    let texture = match (section.color, section.width, section.height) {
        (Some(color), None, None) => Texture::solid(Vec4::from_array(color)),
        (None, Some(width), Some(height)) => Texture::new(
            width,
            height,
            section.texels.iter().map(|t| Vec4::from_array(*t)).collect(),
        )?,
        _ => bail!("give either `color` or `width`, `height` and `texels`"),
    };
    let sampler = section.sampler.unwrap_or(default_sampler);
    Ok(Some(BoundTexture::new(texture, sampler)))
}
