//! Tests for morph tables, evaluation, packing and the controller

use super::*;
use crate::error::ShadeError;
use crate::shading::Material;
use glam::{UVec2, UVec3, Vec2, Vec3, Vec4};
use morphlit_shared::MorphVertexAttributes;
use proptest::prelude::*;
use std::num::NonZeroU32;

const EPSILON: f32 = 1e-5;

fn approx_vec3(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

/// One vertex, one displacement per morph, packed at `width`
fn single_vertex_bundle(displacements: &[Vec3], width: u32) -> MorphTableBundle {
    let mut builder = MorphTableBuilder::new(1).with_width(width);
    for (morph, displacement) in displacements.iter().enumerate() {
        builder
            .add_vertex_morph(morph as u32, [(0, *displacement)])
            .unwrap();
    }
    builder.build().unwrap()
}

fn coefficients(values: &[f32]) -> MorphCoefficients {
    MorphCoefficients::from_slice(values).unwrap()
}

// ============================================================================
// Tables
// ============================================================================

#[test]
fn test_unwrap_index_is_row_major() {
    let width = NonZeroU32::new(3).unwrap();
    assert_eq!(unwrap_index(0, width), UVec2::new(0, 0));
    assert_eq!(unwrap_index(2, width), UVec2::new(2, 0));
    assert_eq!(unwrap_index(7, width), UVec2::new(1, 2));
}

#[test]
fn test_packed_table_rejects_bad_shapes() {
    assert_eq!(
        PackedTable::<Vec3>::new(0, vec![]),
        Err(ShadeError::ZeroTableWidth)
    );
    assert_eq!(
        PackedTable::new(4, vec![Vec3::ZERO; 5]),
        Err(ShadeError::TableSizeMismatch { len: 5, width: 4 })
    );
}

#[test]
fn test_packed_table_from_entries_pads_rows() {
    let table = PackedTable::from_entries(4, vec![UVec2::ONE; 5]).unwrap();
    assert_eq!(table.height(), 2);
    assert_eq!(table.len(), 8);
    assert_eq!(table.fetch(4), UVec2::ONE);
    assert_eq!(table.fetch(5), UVec2::ZERO);

    let empty = PackedTable::<Vec4>::from_entries(16, Vec::new()).unwrap();
    assert_eq!(empty.height(), 1);
}

#[test]
fn test_packed_table_out_of_bounds_loads_default() {
    let table = PackedTable::new(2, vec![Vec3::ONE; 4]).unwrap();
    assert_eq!(table.load(UVec2::new(1, 1)), Vec3::ONE);
    assert_eq!(table.load(UVec2::new(2, 0)), Vec3::ZERO);
    assert_eq!(table.load(UVec2::new(0, 2)), Vec3::ZERO);
    assert_eq!(table.fetch(100), Vec3::ZERO);
}

// ============================================================================
// Evaluation
// ============================================================================

#[test]
fn test_single_morph_full_weight() {
    let bundle = single_vertex_bundle(&[Vec3::Y], 1024);
    let position = morph_position(
        Vec3::ZERO,
        &bundle.attributes[0],
        &bundle.tables.as_set(),
        &coefficients(&[1.0]),
        MorphAccumulation::Thresholded,
    );
    assert!(approx_vec3(position, Vec3::Y));
}

#[test]
fn test_threshold_skips_small_and_negative_weights() {
    let bundle = single_vertex_bundle(&[Vec3::X, Vec3::Y, Vec3::Z], 8);
    let weights = coefficients(&[0.0009, -0.5, 0.001]);
    let tables = bundle.tables.as_set();

    let thresholded = morph_position(
        Vec3::ZERO,
        &bundle.attributes[0],
        &tables,
        &weights,
        MorphAccumulation::Thresholded,
    );
    assert!(approx_vec3(thresholded, Vec3::new(0.0, 0.0, 0.001)));

    let unconditional = morph_position(
        Vec3::ZERO,
        &bundle.attributes[0],
        &tables,
        &weights,
        MorphAccumulation::Unconditional,
    );
    assert!(approx_vec3(unconditional, Vec3::new(0.0009, -0.5, 0.001)));
}

#[test]
fn test_weights_are_not_clamped() {
    let bundle = single_vertex_bundle(&[Vec3::X], 8);
    let position = morph_position(
        Vec3::ONE,
        &bundle.attributes[0],
        &bundle.tables.as_set(),
        &coefficients(&[2.5]),
        MorphAccumulation::Thresholded,
    );
    assert!(approx_vec3(position, Vec3::new(3.5, 1.0, 1.0)));
}

#[test]
fn test_table_width_is_read_live() {
    let displacements = [Vec3::X, Vec3::Y, Vec3::Z];
    let weights = coefficients(&[1.0, 2.0, 3.0]);
    let expected = Vec3::new(1.0, 2.0, 3.0);

    for width in [1, 2, 3, 1024] {
        let bundle = single_vertex_bundle(&displacements, width);
        let position = morph_position(
            Vec3::ZERO,
            &bundle.attributes[0],
            &bundle.tables.as_set(),
            &weights,
            MorphAccumulation::Thresholded,
        );
        assert!(approx_vec3(position, expected), "width {width}");
    }
}

#[test]
fn test_out_of_range_coefficient_index_contributes_nothing() {
    let tables = MorphTables {
        vertex_index: PackedTable::new(2, vec![UVec2::new(200, 0), UVec2::new(0, 1)]).unwrap(),
        vertex_displacement: PackedTable::new(2, vec![Vec3::X, Vec3::Y]).unwrap(),
        uv_index: PackedTable::from_entries(1, Vec::new()).unwrap(),
        uv_displacement: PackedTable::from_entries(1, Vec::new()).unwrap(),
    };
    let attributes = MorphVertexAttributes {
        vertex_morph_index_start: 0,
        vertex_morph_count: 2,
        ..MorphVertexAttributes::NONE
    };
    let position = morph_position(
        Vec3::ZERO,
        &attributes,
        &tables.as_set(),
        &coefficients(&[1.0]),
        MorphAccumulation::Unconditional,
    );
    assert!(approx_vec3(position, Vec3::Y));
}

#[test]
fn test_uv_morph_routes_by_target_kind() {
    let mut builder = MorphTableBuilder::new(1).with_width(4);
    builder
        .add_uv_morph(
            0,
            [
                (0, UvMorphTarget::Primary, Vec4::new(0.25, 0.5, 9.0, 9.0)),
                (0, UvMorphTarget::Secondary, Vec4::new(1.0, 2.0, 3.0, 4.0)),
            ],
        )
        .unwrap();
    let bundle = builder.build().unwrap();

    let (uv, additional_uv) = morph_uvs(
        Vec2::ZERO,
        Vec4::ZERO,
        &bundle.attributes[0],
        &bundle.tables.as_set(),
        &coefficients(&[0.5]),
        MorphAccumulation::Thresholded,
    );
    assert!((uv - Vec2::new(0.125, 0.25)).abs().max_element() < EPSILON);
    assert!((additional_uv - Vec4::new(0.5, 1.0, 1.5, 2.0)).abs().max_element() < EPSILON);
}

#[test]
fn test_uv_morph_ignores_unknown_kind() {
    let tables = MorphTables {
        vertex_index: PackedTable::from_entries(1, Vec::new()).unwrap(),
        vertex_displacement: PackedTable::from_entries(1, Vec::new()).unwrap(),
        uv_index: PackedTable::new(1, vec![UVec3::new(7, 0, 0)]).unwrap(),
        uv_displacement: PackedTable::new(1, vec![Vec4::ONE]).unwrap(),
    };
    let attributes = MorphVertexAttributes {
        uv_morph_index_start: 0,
        uv_morph_count: 1,
        ..MorphVertexAttributes::NONE
    };
    let (uv, additional_uv) = morph_uvs(
        Vec2::ONE,
        Vec4::ONE,
        &attributes,
        &tables.as_set(),
        &coefficients(&[1.0]),
        MorphAccumulation::Unconditional,
    );
    assert_eq!(uv, Vec2::ONE);
    assert_eq!(additional_uv, Vec4::ONE);
}

#[test]
fn test_morph_vertex_without_entries_is_identity() {
    let bundle = single_vertex_bundle(&[], 4);
    let morphed = morph_vertex(
        Vec3::new(1.0, 2.0, 3.0),
        Vec2::new(0.5, 0.5),
        Vec4::splat(0.25),
        &bundle.attributes[0],
        &bundle.tables.as_set(),
        &coefficients(&[1.0; 4]),
        MorphAccumulation::Thresholded,
    );
    assert_eq!(morphed.position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(morphed.uv, Vec2::new(0.5, 0.5));
    assert_eq!(morphed.additional_uv, Vec4::splat(0.25));
}

// ============================================================================
// Builder
// ============================================================================

#[test]
fn test_builder_keeps_vertex_entries_contiguous() {
    let mut builder = MorphTableBuilder::new(3).with_width(2);
    builder
        .add_vertex_morph(0, [(0, Vec3::X), (2, Vec3::Y)])
        .unwrap();
    builder.add_vertex_morph(1, [(2, Vec3::Z)]).unwrap();
    let bundle = builder.build().unwrap();

    let attrs = &bundle.attributes;
    assert_eq!((attrs[0].vertex_morph_index_start, attrs[0].vertex_morph_count), (0, 1));
    assert_eq!((attrs[1].vertex_morph_index_start, attrs[1].vertex_morph_count), (1, 0));
    assert_eq!((attrs[2].vertex_morph_index_start, attrs[2].vertex_morph_count), (1, 2));

    let index = &bundle.tables.vertex_index;
    assert_eq!(index.fetch(1).x, 0);
    assert_eq!(index.fetch(2).x, 1);
}

#[test]
fn test_builder_merges_repeated_offsets() {
    let mut builder = MorphTableBuilder::new(1).with_width(4);
    builder
        .add_vertex_morph(0, [(0, Vec3::X), (0, Vec3::X)])
        .unwrap();
    let bundle = builder.build().unwrap();

    assert_eq!(bundle.attributes[0].vertex_morph_count, 1);
    assert_eq!(bundle.tables.vertex_displacement.fetch(0), Vec3::new(2.0, 0.0, 0.0));
}

#[test]
fn test_builder_validation() {
    let mut builder = MorphTableBuilder::new(2);
    assert_eq!(
        builder.add_vertex_morph(0, [(2, Vec3::X)]),
        Err(ShadeError::VertexIndexOutOfRange {
            index: 2,
            vertex_count: 2
        })
    );
    assert_eq!(
        builder.add_vertex_morph(128, [(0, Vec3::X)]),
        Err(ShadeError::CoefficientIndexOutOfRange { index: 128 })
    );
    assert_eq!(
        MorphTableBuilder::new(1).with_width(0).build(),
        Err(ShadeError::ZeroTableWidth)
    );
}

// ============================================================================
// Controller
// ============================================================================

fn controller() -> MorphController {
    MorphController::new(vec![
        MorphDefinition::new("smile", MorphKind::Vertex),
        MorphDefinition::new("blink", MorphKind::Vertex),
        MorphDefinition::new(
            "happy",
            MorphKind::Group {
                elements: vec![
                    GroupMorphElement {
                        morph_index: 0,
                        coefficient: 0.5,
                    },
                    GroupMorphElement {
                        morph_index: 1,
                        coefficient: 1.0,
                    },
                    GroupMorphElement {
                        morph_index: 3,
                        coefficient: 1.0,
                    },
                ],
            },
        ),
        MorphDefinition::new(
            "nested",
            MorphKind::Group {
                elements: vec![GroupMorphElement {
                    morph_index: 0,
                    coefficient: 1.0,
                }],
            },
        ),
    ])
    .unwrap()
}

#[test]
fn test_set_morph_marks_dirty() {
    let mut morphs = controller();
    assert!(!morphs.take_dirty());
    assert!(morphs.set_morph("smile", 0.75));
    assert!(morphs.take_dirty());
    assert!(!morphs.take_dirty());
    assert_eq!(morphs.coefficients().get(0), 0.75);
}

#[test]
fn test_set_morph_ignores_tiny_changes_and_unknown_names() {
    let mut morphs = controller();
    assert!(!morphs.set_morph("smile", 0.0005));
    assert!(!morphs.set_morph("frown", 1.0));
    assert!(!morphs.take_dirty());
    assert_eq!(morphs.coefficients(), MorphCoefficients::ZERO);
}

#[test]
fn test_group_contributes_scaled_weight() {
    let mut morphs = controller();
    morphs.set_morph("smile", 0.25);
    morphs.set_morph("happy", 0.8);

    assert!((morphs.final_coefficient(0) - (0.25 + 0.8 * 0.5)).abs() < EPSILON);
    assert!((morphs.final_coefficient(1) - 0.8).abs() < EPSILON);
    // Nested group member is skipped
    assert_eq!(morphs.final_coefficient(3), 0.0);

    let table = morphs.coefficients();
    assert!((table.get(0) - 0.65).abs() < EPSILON);
    assert_eq!(table.get(4), 0.0);
}

#[test]
fn test_clearing_group_removes_contribution() {
    let mut morphs = controller();
    morphs.set_morph("happy", 1.0);
    morphs.set_morph("happy", 0.0);
    assert_eq!(morphs.final_coefficient(0), 0.0);
    assert_eq!(morphs.final_coefficient(1), 0.0);
}

#[test]
fn test_reset_zeroes_everything() {
    let mut morphs = controller();
    morphs.set_morph("happy", 1.0);
    morphs.take_dirty();
    morphs.reset();
    assert!(morphs.take_dirty());
    assert_eq!(morphs.coefficients(), MorphCoefficients::ZERO);
}

#[test]
fn test_controller_rejects_bad_definitions() {
    let too_many = (0..129)
        .map(|i| MorphDefinition::new(format!("m{i}"), MorphKind::Vertex))
        .collect();
    assert_eq!(
        MorphController::new(too_many).unwrap_err(),
        ShadeError::TooManyMorphs { count: 129 }
    );

    let dangling = vec![MorphDefinition::new(
        "group",
        MorphKind::Group {
            elements: vec![GroupMorphElement {
                morph_index: 5,
                coefficient: 1.0,
            }],
        },
    )];
    assert_eq!(
        MorphController::new(dangling).unwrap_err(),
        ShadeError::GroupMemberOutOfRange { group: 0, member: 5 }
    );
}

#[test]
fn test_set_morph_by_index_bounds() {
    let mut morphs = controller();
    assert_eq!(morphs.set_morph_by_index(1, 1.0), Ok(true));
    assert_eq!(
        morphs.set_morph_by_index(4, 1.0),
        Err(ShadeError::CoefficientIndexOutOfRange { index: 4 })
    );
}

// ============================================================================
// Material morphs
// ============================================================================

fn material_controller() -> MorphController {
    let darken = MaterialMorphOffset {
        material_index: Some(0),
        diffuse_color: Vec4::new(0.5, 0.5, 0.5, 1.0),
        texture_tint: Vec4::new(0.0, 0.0, 0.0, 1.0),
        ..MaterialMorphOffset::identity(MaterialOffsetMode::Multiply)
    };
    let glow = MaterialMorphOffset {
        material_index: None,
        ambient_color: Vec3::splat(0.2),
        toon_tint: Vec4::new(0.1, 0.1, 0.1, 0.0),
        ..MaterialMorphOffset::identity(MaterialOffsetMode::Additive)
    };
    MorphController::new(vec![
        MorphDefinition::new("darken", MorphKind::Material { offsets: vec![darken] }),
        MorphDefinition::new("glow", MorphKind::Material { offsets: vec![glow] }),
        MorphDefinition::new(
            "both",
            MorphKind::Group {
                elements: vec![
                    GroupMorphElement {
                        morph_index: 0,
                        coefficient: 1.0,
                    },
                    GroupMorphElement {
                        morph_index: 1,
                        coefficient: 1.0,
                    },
                ],
            },
        ),
    ])
    .unwrap()
}

#[test]
fn test_multiply_material_morph_lerps() {
    let mut morphs = material_controller();
    morphs.set_morph("darken", 0.5);
    assert!(morphs.take_material_dirty());

    let base = Material::default();
    let adjusted = morphs.material_values(&base, 0);
    assert!((adjusted.diffuse_color - Vec4::new(0.75, 0.75, 0.75, 1.0)).abs().max_element() < EPSILON);
    assert!((adjusted.texture_tint.mul - Vec4::new(0.5, 0.5, 0.5, 1.0)).abs().max_element() < EPSILON);

    // Targets material 0 only
    assert_eq!(morphs.material_values(&base, 1), base);
}

#[test]
fn test_additive_material_morph_targets_all_materials() {
    let mut morphs = material_controller();
    morphs.set_morph("glow", 1.0);
    let base = Material::default();
    for index in 0..3 {
        let adjusted = morphs.material_values(&base, index);
        assert!((adjusted.ambient_color - Vec3::splat(0.2)).abs().max_element() < EPSILON);
        assert!((adjusted.toon_tint.add - Vec4::new(0.1, 0.1, 0.1, 0.0)).abs().max_element() < EPSILON);
        assert_eq!(adjusted.toon_tint.mul, Vec4::ONE);
    }
}

#[test]
fn test_group_drives_material_morphs() {
    let mut morphs = material_controller();
    morphs.set_morph("both", 1.0);
    assert!(morphs.take_material_dirty());

    let adjusted = morphs.material_values(&Material::default(), 0);
    assert!((adjusted.diffuse_color.x - 0.5).abs() < EPSILON);
    assert!((adjusted.ambient_color.x - 0.2).abs() < EPSILON);
}

#[test]
fn test_inactive_material_morph_is_identity() {
    let morphs = material_controller();
    let base = Material::default();
    assert_eq!(morphs.material_values(&base, 0), base);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_below_threshold_contributes_zero(
        coefficient in -100.0f32..0.001,
        displacement in prop::array::uniform3(-10.0f32..10.0),
    ) {
        let bundle = single_vertex_bundle(&[Vec3::from_array(displacement)], 16);
        let position = morph_position(
            Vec3::ZERO,
            &bundle.attributes[0],
            &bundle.tables.as_set(),
            &coefficients(&[coefficient]),
            MorphAccumulation::Thresholded,
        );
        prop_assert_eq!(position, Vec3::ZERO);
    }

    #[test]
    fn prop_displacement_is_linear_in_weights(
        weights in prop::collection::vec(0.001f32..4.0, 1..8),
        seed in prop::array::uniform3(-2.0f32..2.0),
    ) {
        let displacements: Vec<Vec3> = (0..weights.len())
            .map(|i| Vec3::from_array(seed) * (i as f32 + 1.0))
            .collect();
        let bundle = single_vertex_bundle(&displacements, 3);
        let tables = bundle.tables.as_set();
        let doubled: Vec<f32> = weights.iter().map(|w| w * 2.0).collect();

        let single = morph_position(
            Vec3::ZERO,
            &bundle.attributes[0],
            &tables,
            &coefficients(&weights),
            MorphAccumulation::Thresholded,
        );
        let double = morph_position(
            Vec3::ZERO,
            &bundle.attributes[0],
            &tables,
            &coefficients(&doubled),
            MorphAccumulation::Thresholded,
        );
        let tolerance = 1e-3 * (1.0 + single.abs().max_element());
        prop_assert!((double - single * 2.0).abs().max_element() < tolerance);
    }
}
