//! # Scene Engine
//!
//! The scene core of a real-time renderer: entities with transforms, meshes
//! and materials arranged in a parent/child hierarchy, flattened once per
//! frame into a draw list sorted for minimal GPU state changes.
//!
//! ## Features
//!
//! - **Generational Handles**: Stale entity handles are detected, never aliased
//! - **Intrusive Hierarchy**: Parent and sibling links with O(1) attach/detach
//! - **Incremental Transforms**: Only subtrees under dirty roots are recomputed
//! - **Sorted Draw List**: Grouped by shader, then material, then mesh
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_engine::prelude::*;
//!
//! let mut library = MaterialLibrary::new();
//! let shader = library.register_shader(Shader::new("vert", "frag"));
//! let material = library.create_material(shader, Some("stone")).unwrap();
//! let cube = Mesh::new(MeshId(1), 0, 24, 0, 36);
//!
//! let mut world = RenderWorld::new();
//! let root = world.spawn(Transform::from_position(Vec3::new(0.0, 2.0, 0.0)), cube, material, None);
//! let child = world.spawn(Transform::from_position(Vec3::new(1.0, 0.0, 0.0)), cube, material, Some(root));
//!
//! let items = world.draw_items();
//! assert_eq!(items.len(), 2);
//! assert!(world.is_child_of(root, child));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod foundation;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, RenderWorldConfig},
        foundation::{
            math::{Mat4, Quat, Transform, Vec3},
            object_pool::{Handle, ObjectPool},
        },
        render::{Material, MaterialId, MaterialLibrary, Mesh, MeshId, Shader, ShaderId},
        scene::{DrawItem, Entity, RenderWorld, WorldError, WorldResult},
    };
}
