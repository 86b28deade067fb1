//! Mesh references
//!
//! The scene core never touches vertex data. A [`Mesh`] is the range of a
//! shared vertex/index buffer that the backend packed for it, plus an id the
//! draw list hashes for sort locality.

/// Identifier of a packed mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MeshId(pub u32);

/// Sub-range of the shared geometry buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mesh {
    /// Mesh identity
    pub id: MeshId,
    /// First vertex in the shared vertex buffer
    pub vertex_offset: u32,
    /// Number of vertices
    pub vertex_count: u32,
    /// First index in the shared index buffer
    pub index_offset: u32,
    /// Number of indices
    pub index_count: u32,
}

impl Mesh {
    /// Mesh with nothing to draw
    pub const EMPTY: Self = Self {
        id: MeshId(0),
        vertex_offset: 0,
        vertex_count: 0,
        index_offset: 0,
        index_count: 0,
    };

    /// Describe a packed mesh range
    pub const fn new(
        id: MeshId,
        vertex_offset: u32,
        vertex_count: u32,
        index_offset: u32,
        index_count: u32,
    ) -> Self {
        Self {
            id,
            vertex_offset,
            vertex_count,
            index_offset,
            index_count,
        }
    }

    /// True when there are no indices to draw
    pub const fn is_empty(&self) -> bool {
        self.index_count == 0
    }

    /// Number of triangles, assuming a triangle list
    pub const fn triangle_count(&self) -> u32 {
        self.index_count / 3
    }
}
