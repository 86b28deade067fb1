//! Shader and material identities
//!
//! Materials reach the scene core as small copyable values carrying the two
//! identities the draw list sorts by: the shader program and the material
//! itself. [`MaterialLibrary`] owns the shader sources and assigns ids.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Shader program identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderId(pub u32);

/// Unique identifier for materials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

impl MaterialId {
    /// Reserved id meaning "no material"
    pub const NONE: Self = Self(0);
}

/// Shader source pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shader {
    /// Vertex stage source
    pub vertex_source: String,
    /// Fragment stage source
    pub fragment_source: String,
    id: ShaderId,
}

impl Shader {
    /// Create a shader; its id is derived from both sources
    pub fn new(vertex_source: impl Into<String>, fragment_source: impl Into<String>) -> Self {
        let vertex_source = vertex_source.into();
        let fragment_source = fragment_source.into();
        let id = Self::hash_sources(&vertex_source, &fragment_source);
        Self {
            vertex_source,
            fragment_source,
            id,
        }
    }

    /// Identity shared by every shader built from the same sources
    pub const fn id(&self) -> ShaderId {
        self.id
    }

    fn hash_sources(vertex: &str, fragment: &str) -> ShaderId {
        let mut hasher = DefaultHasher::new();
        vertex.hash(&mut hasher);
        fragment.hash(&mut hasher);
        let hash = hasher.finish();
        ShaderId((hash ^ (hash >> 32)) as u32)
    }
}

/// Material reference as seen by the scene core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Material {
    /// Material identity
    pub id: MaterialId,
    /// Shader program the material renders with
    pub shader: ShaderId,
}

impl Material {
    /// Sentinel for entities without a material; such entities sort last
    pub const NONE: Self = Self {
        id: MaterialId::NONE,
        shader: ShaderId(0),
    };

    /// Build a material reference from raw identities
    pub const fn new(id: MaterialId, shader: ShaderId) -> Self {
        Self { id, shader }
    }

    /// True for [`Material::NONE`] or any material with the reserved id
    pub fn is_none(&self) -> bool {
        self.id == MaterialId::NONE
    }

    /// Shader identity used by the sort key
    pub const fn shader_id(&self) -> ShaderId {
        self.shader
    }

    /// Material identity used by the sort key
    pub const fn material_id(&self) -> MaterialId {
        self.id
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::NONE
    }
}

/// Material library errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MaterialError {
    /// The shader was never registered with this library
    #[error("unknown shader {0:?}")]
    UnknownShader(ShaderId),

    /// Material ids are packed into 16 bits of the draw sort key
    #[error("maximum number of materials reached ({0})")]
    LibraryFull(usize),
}

/// Named material entry kept by the library
#[derive(Debug, Clone)]
pub struct MaterialEntry {
    /// The material reference handed to the scene
    pub material: Material,
    /// Optional name for debugging
    pub name: Option<String>,
}

/// Registry of shaders and materials
#[derive(Debug)]
pub struct MaterialLibrary {
    shaders: HashMap<ShaderId, Shader>,
    materials: HashMap<MaterialId, MaterialEntry>,
    next_id: u32,
    max_materials: usize,
}

impl MaterialLibrary {
    /// Largest id that still fits the material field of a sort key
    pub const MAX_MATERIALS: usize = u16::MAX as usize;

    /// Create an empty library
    pub fn new() -> Self {
        Self::with_limit(Self::MAX_MATERIALS)
    }

    /// Create an empty library holding at most `max_materials` materials
    pub fn with_limit(max_materials: usize) -> Self {
        Self {
            shaders: HashMap::new(),
            materials: HashMap::new(),
            next_id: 1, // 0 is reserved for "no material"
            max_materials: max_materials.min(Self::MAX_MATERIALS),
        }
    }

    /// Register a shader, returning its id; identical sources share an id
    pub fn register_shader(&mut self, shader: Shader) -> ShaderId {
        let id = shader.id();
        self.shaders.entry(id).or_insert(shader);
        id
    }

    /// Create a material rendered with `shader`
    pub fn create_material(
        &mut self,
        shader: ShaderId,
        name: Option<&str>,
    ) -> Result<Material, MaterialError> {
        if !self.shaders.contains_key(&shader) {
            return Err(MaterialError::UnknownShader(shader));
        }
        if self.materials.len() >= self.max_materials {
            return Err(MaterialError::LibraryFull(self.max_materials));
        }

        let material = Material::new(MaterialId(self.next_id), shader);
        self.next_id += 1;
        self.materials.insert(
            material.id,
            MaterialEntry {
                material,
                name: name.map(str::to_owned),
            },
        );

        log::debug!("Registered material {:?} with shader {:?}", material.id, shader);
        Ok(material)
    }

    /// Look up a shader
    pub fn shader(&self, id: ShaderId) -> Option<&Shader> {
        self.shaders.get(&id)
    }

    /// Look up a material entry
    pub fn material(&self, id: MaterialId) -> Option<&MaterialEntry> {
        self.materials.get(&id)
    }

    /// Number of registered materials
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Number of registered shaders
    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }
}

impl Default for MaterialLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shader_id_depends_on_sources() {
        let a = Shader::new("vs", "fs");
        let b = Shader::new("vs", "fs");
        let c = Shader::new("vs", "fs2");

        assert_eq!(a.id(), b.id());
        assert_ne!(a.id(), c.id());
    }

    #[test]
    fn test_create_material_assigns_sequential_ids() {
        let mut library = MaterialLibrary::new();
        let shader = library.register_shader(Shader::new("vs", "fs"));

        let first = library.create_material(shader, Some("first")).unwrap();
        let second = library.create_material(shader, None).unwrap();

        assert_eq!(first.id, MaterialId(1));
        assert_eq!(second.id, MaterialId(2));
        assert_eq!(first.shader_id(), shader);
        assert_eq!(library.material(first.id).unwrap().name.as_deref(), Some("first"));
        assert_eq!(library.material_count(), 2);
        assert!(!first.is_none());
    }

    #[test]
    fn test_duplicate_shader_is_shared() {
        let mut library = MaterialLibrary::new();
        let a = library.register_shader(Shader::new("vs", "fs"));
        let b = library.register_shader(Shader::new("vs", "fs"));
        assert_eq!(a, b);
        assert_eq!(library.shader_count(), 1);
        assert_eq!(library.shader(a).unwrap().fragment_source, "fs");
    }

    #[test]
    fn test_material_errors() {
        let mut library = MaterialLibrary::with_limit(1);
        assert_eq!(
            library.create_material(ShaderId(42), None),
            Err(MaterialError::UnknownShader(ShaderId(42)))
        );

        let shader = library.register_shader(Shader::new("vs", "fs"));
        library.create_material(shader, None).unwrap();
        assert_eq!(
            library.create_material(shader, None),
            Err(MaterialError::LibraryFull(1))
        );
    }

    #[test]
    fn test_none_material() {
        assert!(Material::NONE.is_none());
        assert!(Material::default().is_none());
    }
}
