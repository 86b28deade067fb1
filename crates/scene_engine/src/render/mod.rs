//! Rendering-layer references consumed by the scene core
//!
//! Only identities live here: what a draw item points at and the keys it
//! sorts by. GPU buffers and shader compilation belong to the backend.

pub mod material;
pub mod mesh;

pub use material::{Material, MaterialEntry, MaterialError, MaterialId, MaterialLibrary, Shader, ShaderId};
pub use mesh::{Mesh, MeshId};
