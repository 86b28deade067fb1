//! Per-entity payload stored in the render world's pool

use crate::foundation::math::{Mat4, Transform};
use crate::foundation::object_pool::Handle;
use crate::render::{Material, Mesh};

/// Handle to an entity in a [`RenderWorld`](super::RenderWorld)
pub type Entity = Handle<EntityData>;

/// Pool payload for one entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityData {
    /// Transform relative to the parent
    pub local_transform: Transform,
    /// Last resolved world matrix
    pub world_matrix: Mat4,
    /// Geometry to draw
    pub mesh: Mesh,
    /// Material to draw with
    pub material: Material,
}

impl EntityData {
    /// Payload for a freshly spawned entity; the world matrix stays identity
    /// until the next transform resolve
    pub fn new(local_transform: Transform, mesh: Mesh, material: Material) -> Self {
        Self {
            local_transform,
            world_matrix: Mat4::identity(),
            mesh,
            material,
        }
    }

    /// Editable view of the user-facing fields
    pub fn properties(&self) -> EntityProperties {
        EntityProperties {
            transform: self.local_transform,
            mesh: self.mesh,
            material: self.material,
        }
    }
}

/// The fields callers may edit in one batch through
/// [`RenderWorld::modify`](super::RenderWorld::modify)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityProperties {
    /// Local transform
    pub transform: Transform,
    /// Mesh reference
    pub mesh: Mesh,
    /// Material reference
    pub material: Material,
}
