//! Flat, sorted draw list
//!
//! Following Game Engine Architecture Chapter 11.3 - Render Queues, items
//! are ordered by a packed 64-bit key so the backend switches shader, then
//! material, as rarely as possible:
//!
//! ```text
//!  63            32 31        16 15          0
//! +----------------+------------+-------------+
//! |   shader id    | material id| mesh hash   |
//! +----------------+------------+-------------+
//! ```

use super::entity::{Entity, EntityData};
use crate::foundation::math::Mat4;
use crate::foundation::object_pool::{ObjectPool, INVALID_INDEX};
use crate::render::{Material, Mesh};

/// Key given to items that cannot be drawn (no material or empty mesh)
pub const UNDRAWABLE_SORT_KEY: u64 = u64::MAX;

/// Pack shader, material and mesh identities into a sort key
pub fn sort_key(material: &Material, mesh: &Mesh) -> u64 {
    if material.is_none() || mesh.is_empty() {
        return UNDRAWABLE_SORT_KEY;
    }

    let shader = u64::from(material.shader_id().0);
    let material = u64::from(material.material_id().0) & 0xFFFF;
    let mesh = mix64(u64::from(mesh.id.0)) & 0xFFFF;

    (shader << 32) | (material << 16) | mesh
}

/// SplitMix64 finalizer
const fn mix64(mut x: u64) -> u64 {
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    x ^ (x >> 31)
}

/// One entity's renderable state for the current frame
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    /// World-space matrix
    pub world_matrix: Mat4,
    /// Geometry to draw
    pub mesh: Mesh,
    /// Material to draw with
    pub material: Material,
    /// Packed ordering key
    pub sort_key: u64,
    /// Entity the item was built from
    pub entity: Entity,
}

impl DrawItem {
    /// Pool index of the source entity
    pub const fn entity_index(&self) -> u32 {
        self.entity.index()
    }

    /// False for items carrying [`UNDRAWABLE_SORT_KEY`]
    pub const fn is_drawable(&self) -> bool {
        self.sort_key != UNDRAWABLE_SORT_KEY
    }
}

/// Sorted draw items plus an entity-index to draw-slot map
#[derive(Debug)]
pub struct DrawList {
    items: Vec<DrawItem>,
    slots: Vec<u32>,
    dirty: bool,
}

impl DrawList {
    /// Create an empty list that needs a rebuild
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            slots: Vec::new(),
            dirty: true,
        }
    }

    /// Create an empty list with room for `capacity` items
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            dirty: true,
        }
    }

    /// Grow the slot map to cover `len` entity indices
    pub fn resize(&mut self, len: usize) {
        if self.slots.len() < len {
            self.slots.resize(len, INVALID_INDEX);
        }
    }

    /// Items in draw order; stale while [`DrawList::is_dirty`]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    /// Whether membership or sort keys changed since the last rebuild
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Request a rebuild on the next frame
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Draw slot currently holding `entity_index`'s item
    pub fn slot_of(&self, entity_index: u32) -> Option<usize> {
        self.slots
            .get(entity_index as usize)
            .copied()
            .filter(|&slot| slot != INVALID_INDEX)
            .map(|slot| slot as usize)
    }

    /// Forget the slot mapping for `entity_index`
    pub fn unmap(&mut self, entity_index: u32) {
        if let Some(slot) = self.slots.get_mut(entity_index as usize) {
            *slot = INVALID_INDEX;
        }
    }

    /// Patch the world matrix of `entity_index`'s item in place
    ///
    /// Returns false when the entity has no item yet.
    pub fn sync_transform(&mut self, entity_index: u32, world_matrix: &Mat4) -> bool {
        match self.slot_of(entity_index).and_then(|slot| self.items.get_mut(slot)) {
            Some(item) => {
                item.world_matrix = *world_matrix;
                true
            }
            None => false,
        }
    }

    /// Drop every item and mapping
    pub fn clear(&mut self) {
        self.items.clear();
        self.slots.fill(INVALID_INDEX);
        self.dirty = true;
    }

    /// Rebuild from every live entity in `pool` and clear the dirty flag
    ///
    /// Items are ordered by ascending sort key; equal keys fall back to
    /// ascending entity index so identical input always yields identical
    /// output.
    pub fn rebuild(&mut self, pool: &ObjectPool<EntityData>) {
        self.items.clear();
        self.slots.fill(INVALID_INDEX);
        self.resize(pool.capacity());

        self.items.extend(pool.iter().map(|(entity, data)| DrawItem {
            world_matrix: data.world_matrix,
            mesh: data.mesh,
            material: data.material,
            sort_key: sort_key(&data.material, &data.mesh),
            entity,
        }));

        self.items
            .sort_unstable_by_key(|item| (item.sort_key, item.entity.index()));

        for (slot, item) in self.items.iter().enumerate() {
            self.slots[item.entity.index() as usize] = slot as u32;
        }

        self.dirty = false;
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}
