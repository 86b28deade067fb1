//! Property checks over handles, hierarchy, transforms and draw ordering

use crate::foundation::math::{translation_of, Transform, Vec3};
use crate::render::{Material, MaterialId, Mesh, MeshId, ShaderId};
use crate::scene::{Entity, RenderWorld};
use approx::assert_relative_eq;

fn mesh(id: u32) -> Mesh {
    Mesh::new(MeshId(id), 0, 24, 0, 36)
}

fn material(id: u32, shader: u32) -> Material {
    Material::new(MaterialId(id), ShaderId(shader))
}

fn spawn_at(world: &mut RenderWorld, position: Vec3, parent: Option<Entity>) -> Entity {
    world.spawn(Transform::from_position(position), mesh(1), material(1, 1), parent)
}

#[test]
fn test_handle_validity_round_trip() {
    let mut world = RenderWorld::new();
    let handles: Vec<_> = (0..8)
        .map(|i| spawn_at(&mut world, Vec3::new(i as f32, 0.0, 0.0), None))
        .collect();
    assert!(handles.iter().all(|&h| world.is_valid(h)));

    for &old in &handles {
        world.destroy(old).unwrap();
        assert!(!world.is_valid(old));

        let reused = spawn_at(&mut world, Vec3::zeros(), None);
        assert_eq!(reused.index(), old.index());
        assert!(reused.generation() > old.generation());
        assert_ne!(reused, old);
        assert!(!world.is_valid(old));

        world.destroy(reused).unwrap();
    }
}

#[test]
fn test_orphan_on_destroy() {
    let mut world = RenderWorld::new();
    let a = spawn_at(&mut world, Vec3::zeros(), None);
    let b = spawn_at(&mut world, Vec3::zeros(), Some(a));
    let c = spawn_at(&mut world, Vec3::zeros(), Some(b));

    world.destroy(a).unwrap();

    assert_eq!(world.parent_of(b), Ok(None));
    assert_eq!(world.parent_of(c), Ok(Some(b)));
    assert_eq!(world.children(b).unwrap().collect::<Vec<_>>(), vec![c]);
    assert!(world.is_valid(b));
    assert!(world.is_valid(c));
}

#[test]
fn test_transform_propagation_along_chain() {
    let step = Vec3::new(0.5, -1.0, 2.0);

    for n in [1_usize, 2, 10, 100] {
        let mut world = RenderWorld::new();
        let mut parent = None;
        let mut last = None;
        for _ in 0..n {
            let entity = spawn_at(&mut world, step, parent);
            parent = Some(entity);
            last = Some(entity);
        }

        let last = last.unwrap();
        let world_matrix = world.world_matrix(last).unwrap();
        assert_relative_eq!(translation_of(&world_matrix), step * n as f32, epsilon = 1e-3);
    }
}

#[test]
fn test_deep_chain_does_not_recurse() {
    let mut world = RenderWorld::new();
    let mut parent = None;
    for _ in 0..10_000 {
        parent = Some(spawn_at(&mut world, Vec3::new(0.0, 0.0, 1.0), parent));
    }

    let tip = world.world_matrix(parent.unwrap()).unwrap();
    assert_relative_eq!(translation_of(&tip).z, 10_000.0, max_relative = 1e-4);
}

#[test]
fn test_dirty_root_minimality() {
    let mut world = RenderWorld::new();
    let root = spawn_at(&mut world, Vec3::zeros(), None);
    let x = spawn_at(&mut world, Vec3::zeros(), Some(root));
    let y = spawn_at(&mut world, Vec3::zeros(), Some(x));
    let z = spawn_at(&mut world, Vec3::zeros(), Some(y));
    world.draw_items();
    assert_eq!(world.dirty_root_count(), 0);

    world.set_transform(x, Transform::from_position(Vec3::x())).unwrap();
    world.set_transform(z, Transform::from_position(Vec3::y())).unwrap();
    world.set_transform(y, Transform::from_position(Vec3::z())).unwrap();
    assert_eq!(world.dirty_root_count(), 1);

    // Changes in separate trees record separate roots
    let other = spawn_at(&mut world, Vec3::zeros(), None);
    world.draw_items();
    world.set_transform(z, Transform::identity()).unwrap();
    world.set_transform(other, Transform::identity()).unwrap();
    assert_eq!(world.dirty_root_count(), 2);
}

#[test]
fn test_draw_list_determinism() {
    let mut world = RenderWorld::new();
    for i in 0..32_u32 {
        world.spawn(
            Transform::identity(),
            mesh(i % 5),
            material(i % 3 + 1, i % 2 + 1),
            None,
        );
    }

    let first: Vec<_> = world.draw_items().iter().map(|item| item.entity).collect();
    world.invalidate_all();
    let second: Vec<_> = world.draw_items().iter().map(|item| item.entity).collect();
    assert_eq!(first, second);

    let keys: Vec<_> = world.draw_items().iter().map(|item| item.sort_key).collect();
    assert!(keys.windows(2).all(|pair| pair[0] <= pair[1]));
}

#[test]
fn test_sort_grouping_by_shader() {
    let mut world = RenderWorld::new();
    for i in 0..40_u32 {
        // Spread ids so material and mesh fields vary against the shader field
        world.spawn(
            Transform::identity(),
            mesh(1000 - i),
            material(40 - i, (i * 7) % 5 + 1),
            None,
        );
    }

    let items = world.draw_items();
    for (i, a) in items.iter().enumerate() {
        for b in &items[i + 1..] {
            assert!(
                a.material.shader_id() <= b.material.shader_id(),
                "shader {:?} sorted after {:?}",
                a.material.shader_id(),
                b.material.shader_id()
            );
        }
    }
}

#[test]
fn test_undrawable_items_sort_last() {
    let mut world = RenderWorld::new();
    let none = world.spawn(Transform::identity(), mesh(1), Material::NONE, None);
    let empty = world.spawn(Transform::identity(), Mesh::EMPTY, material(1, 1), None);
    let drawable = world.spawn(Transform::identity(), mesh(1), material(1, u32::MAX), None);

    let order: Vec<_> = world.draw_items().iter().map(|item| item.entity).collect();
    assert_eq!(order, vec![drawable, none, empty]);
}
