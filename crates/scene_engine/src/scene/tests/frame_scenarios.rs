//! End-to-end frame scenarios: mutate, call `draw_items`, inspect output

use crate::foundation::math::{translation_of, Transform, Vec3};
use crate::render::{Material, MaterialLibrary, Mesh, MeshId, Shader};
use crate::scene::RenderWorld;
use approx::assert_relative_eq;
use std::f32::consts::FRAC_PI_2;

fn cube() -> Mesh {
    Mesh::new(MeshId(7), 0, 24, 0, 36)
}

fn library_material() -> (MaterialLibrary, Material) {
    let mut library = MaterialLibrary::new();
    let shader = library.register_shader(Shader::new("void main() {}", "void main() {}"));
    let material = library.create_material(shader, Some("default")).unwrap();
    (library, material)
}

#[test]
fn test_single_entity_reparented_under_new_root() {
    let (_library, material) = library_material();
    let mut world = RenderWorld::new();

    let entity = world.spawn(
        Transform::from_position(Vec3::new(1.0, 0.0, 0.0)),
        cube(),
        material,
        None,
    );
    let items = world.draw_items();
    assert_eq!(items.len(), 1);
    assert_relative_eq!(translation_of(&items[0].world_matrix), Vec3::new(1.0, 0.0, 0.0));

    let root = world.spawn(
        Transform::from_position(Vec3::new(0.0, 2.0, 0.0)),
        cube(),
        material,
        None,
    );
    world.attach(entity, root).unwrap();

    let item = world
        .draw_items()
        .iter()
        .find(|item| item.entity == entity)
        .cloned()
        .unwrap();
    assert_relative_eq!(translation_of(&item.world_matrix), Vec3::new(1.0, 2.0, 0.0));
}

#[test]
fn test_reattach_avoids_duplicate_children() {
    let mut world = RenderWorld::new();
    let parent_a = world.spawn(Transform::identity(), cube(), Material::NONE, None);
    let parent_b = world.spawn(Transform::identity(), cube(), Material::NONE, None);
    let child = world.spawn(Transform::identity(), cube(), Material::NONE, None);

    world.attach(child, parent_a).unwrap();
    world.attach(child, parent_b).unwrap();

    assert!(!world.children(parent_a).unwrap().any(|c| c == child));
    assert_eq!(world.children(parent_b).unwrap().filter(|&c| c == child).count(), 1);
    assert_eq!(world.parent_of(child), Ok(Some(parent_b)));
}

#[test]
fn test_draw_list_membership_after_destroy() {
    let (_library, material) = library_material();
    let mut world = RenderWorld::new();
    let entities: Vec<_> = (0..5)
        .map(|i| {
            world.spawn(
                Transform::from_position(Vec3::new(i as f32, 0.0, 0.0)),
                cube(),
                material,
                None,
            )
        })
        .collect();
    world.draw_items();

    world.destroy(entities[1]).unwrap();
    world.destroy(entities[3]).unwrap();

    let items = world.draw_items();
    assert_eq!(items.len(), 3);
    let mut drawn: Vec<_> = items.iter().map(|item| item.entity).collect();
    drawn.sort_by_key(|entity| entity.index());
    assert_eq!(drawn, vec![entities[0], entities[2], entities[4]]);
    assert!(drawn.iter().all(|&entity| world.is_valid(entity)));
}

#[test]
fn test_rotating_parent_carries_children_over_frames() {
    let (_library, material) = library_material();
    let mut world = RenderWorld::new();

    let sun = world.spawn(Transform::identity(), cube(), material, None);
    let planet = world.spawn(
        Transform::from_position(Vec3::new(10.0, 0.0, 0.0)),
        cube(),
        material,
        Some(sun),
    );
    let moon = world.spawn(
        Transform::from_position(Vec3::new(1.0, 0.0, 0.0)),
        cube(),
        material,
        Some(planet),
    );
    world.draw_items();

    // Quarter turn of the sun about Y swings +X onto -Z
    world
        .set_transform(sun, Transform::identity().with_rotation_axis_angle(Vec3::y(), FRAC_PI_2))
        .unwrap();
    assert!(!world.is_draw_list_dirty());

    let moon_item = world
        .draw_items()
        .iter()
        .find(|item| item.entity == moon)
        .cloned()
        .unwrap();
    assert_relative_eq!(
        translation_of(&moon_item.world_matrix),
        Vec3::new(0.0, 0.0, -11.0),
        epsilon = 1e-4
    );
}

#[test]
fn test_scaled_parent_scales_child_offset() {
    let mut world = RenderWorld::new();
    let parent = world.spawn(
        Transform::from_position(Vec3::new(0.0, 1.0, 0.0)).with_uniform_scale(3.0),
        cube(),
        Material::NONE,
        None,
    );
    let child = world.spawn(
        Transform::from_position(Vec3::new(1.0, 0.0, 0.0)),
        cube(),
        Material::NONE,
        Some(parent),
    );

    assert_relative_eq!(
        translation_of(&world.world_matrix(child).unwrap()),
        Vec3::new(3.0, 1.0, 0.0),
        epsilon = 1e-5
    );
}

#[test]
fn test_frame_without_mutation_is_stable() {
    let (_library, material) = library_material();
    let mut world = RenderWorld::new();
    for i in 0..4 {
        world.spawn(
            Transform::from_position(Vec3::new(0.0, i as f32, 0.0)),
            cube(),
            material,
            None,
        );
    }

    let first = world.draw_items().to_vec();
    assert!(!world.is_draw_list_dirty());
    assert_eq!(world.dirty_root_count(), 0);
    let second = world.draw_items().to_vec();
    assert_eq!(first, second);
}
