use std::collections::BTreeMap;

use hashbrown::HashMap;
use morphlit_shared::{MAX_MORPH_COUNT, MORPH_CHANGE_EPSILON};
use serde::{Deserialize, Serialize};

use super::coefficients::MorphCoefficients;
use super::material_offset::MaterialMorphOffset;
use crate::error::{Result, ShadeError};
use crate::shading::Material;

/// A member of a group morph
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupMorphElement {
    pub morph_index: u32,
    /// Scales the group's coefficient for this member
    pub coefficient: f32,
}

/// What a named morph drives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum MorphKind {
    /// Vertex positions, through the vertex morph tables
    Vertex,
    /// UVs, through the UV morph tables
    Uv,
    /// Drives other morphs. Nested groups are ignored.
    Group { elements: Vec<GroupMorphElement> },
    /// Material parameters, through [`MorphController::material_values`]
    Material { offsets: Vec<MaterialMorphOffset> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MorphDefinition {
    pub name: String,
    #[serde(flatten)]
    pub kind: MorphKind,
}

impl MorphDefinition {
    pub fn new(name: impl Into<String>, kind: MorphKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// CPU-side owner of a model's morph weights
///
/// Produces the coefficient table a draw binds. Morph `i` always lands in
/// slot `i`.
#[derive(Debug, Clone)]
pub struct MorphController {
    names: HashMap<String, u32>,
    kinds: Vec<MorphKind>,
    individual: Vec<f32>,
    /// Per morph: group index -> contribution
    group_contributions: Vec<BTreeMap<u32, f32>>,
    dirty: bool,
    material_dirty: bool,
}

impl MorphController {
    pub fn new(morphs: Vec<MorphDefinition>) -> Result<Self> {
        if morphs.len() > MAX_MORPH_COUNT {
            return Err(ShadeError::TooManyMorphs {
                count: morphs.len(),
            });
        }

        let mut names = HashMap::with_capacity(morphs.len());
        let mut kinds = Vec::with_capacity(morphs.len());
        for (index, morph) in morphs.into_iter().enumerate() {
            names.insert(morph.name, index as u32);
            kinds.push(morph.kind);
        }

        // Group members pointing past the morph list would index out of bounds
        for (group, kind) in kinds.iter().enumerate() {
            let MorphKind::Group { elements } = kind else {
                continue;
            };
            if let Some(bad) = elements.iter().find(|e| e.morph_index as usize >= kinds.len()) {
                return Err(ShadeError::GroupMemberOutOfRange {
                    group,
                    member: bad.morph_index,
                });
            }
        }

        let count = kinds.len();
        Ok(Self {
            names,
            kinds,
            individual: vec![0.0; count],
            group_contributions: vec![BTreeMap::new(); count],
            dirty: false,
            material_dirty: false,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn morph_index(&self, name: &str) -> Option<u32> {
        self.names.get(name).copied()
    }

    pub fn kind(&self, index: u32) -> Option<&MorphKind> {
        self.kinds.get(index as usize)
    }

    /// Set a morph by name. Unknown names are ignored.
    ///
    /// Returns whether the stored value changed.
    pub fn set_morph(&mut self, name: &str, coefficient: f32) -> bool {
        match self.morph_index(name) {
            Some(index) => self.apply_coefficient(index, coefficient),
            None => {
                tracing::trace!(name, "ignoring unknown morph");
                false
            }
        }
    }

    pub fn set_morph_by_index(&mut self, index: u32, coefficient: f32) -> Result<bool> {
        if index as usize >= self.kinds.len() {
            return Err(ShadeError::CoefficientIndexOutOfRange { index });
        }
        Ok(self.apply_coefficient(index, coefficient))
    }

    fn apply_coefficient(&mut self, index: u32, coefficient: f32) -> bool {
        let slot = index as usize;
        if (self.individual[slot] - coefficient).abs() <= MORPH_CHANGE_EPSILON {
            return false;
        }

        tracing::trace!(index, coefficient, "morph coefficient changed");
        self.individual[slot] = coefficient;
        self.dirty = true;

        match &self.kinds[slot] {
            MorphKind::Group { elements } => {
                let cleared = coefficient.abs() <= MORPH_CHANGE_EPSILON;
                for element in elements {
                    let member = element.morph_index as usize;
                    match &self.kinds[member] {
                        MorphKind::Group { .. } => continue,
                        MorphKind::Material { .. } => self.material_dirty = true,
                        _ => {}
                    }
                    if cleared {
                        self.group_contributions[member].remove(&index);
                    } else {
                        self.group_contributions[member]
                            .insert(index, coefficient * element.coefficient);
                    }
                }
            }
            MorphKind::Material { .. } => self.material_dirty = true,
            MorphKind::Vertex | MorphKind::Uv => {}
        }
        true
    }

    /// Own coefficient plus every group contribution
    pub fn final_coefficient(&self, index: u32) -> f32 {
        let slot = index as usize;
        let Some(own) = self.individual.get(slot) else {
            return 0.0;
        };
        own + self.group_contributions[slot].values().sum::<f32>()
    }

    /// The packed table to bind. Unused slots are zero.
    pub fn coefficients(&self) -> MorphCoefficients {
        let mut values = [0.0; MAX_MORPH_COUNT];
        for (index, value) in values.iter_mut().enumerate().take(self.kinds.len()) {
            *value = self.final_coefficient(index as u32);
        }
        MorphCoefficients::from_array(values)
    }

    /// Whether coefficients changed since the last call
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Whether any material morph changed since the last call
    pub fn take_material_dirty(&mut self) -> bool {
        std::mem::take(&mut self.material_dirty)
    }

    /// Zero every coefficient
    pub fn reset(&mut self) {
        let had_weights = self.individual.iter().any(|c| *c != 0.0);
        self.individual.iter_mut().for_each(|c| *c = 0.0);
        self.group_contributions.iter_mut().for_each(BTreeMap::clear);
        if had_weights {
            self.dirty = true;
            self.material_dirty = true;
        }
    }

    /// `base` with every active material morph applied, lowest index first
    pub fn material_values(&self, base: &Material, material_index: u32) -> Material {
        let mut material = *base;
        for (index, kind) in self.kinds.iter().enumerate() {
            let MorphKind::Material { offsets } = kind else {
                continue;
            };
            let weight = self.final_coefficient(index as u32);
            if weight.abs() <= MORPH_CHANGE_EPSILON {
                continue;
            }
            for offset in offsets.iter().filter(|o| o.targets(material_index)) {
                offset.apply(&mut material, weight);
            }
        }
        material
    }
}
