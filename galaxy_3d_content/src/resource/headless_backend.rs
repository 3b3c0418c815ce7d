/// Headless render backend (no GPU required)
///
/// Keeps CPU copies of everything uploaded, so tools and tests can run the
/// whole content pipeline and inspect what reached the backend.

use std::sync::{Mutex, MutexGuard, PoisonError};
use crate::content::{
    ElementType, MaterialInitInfo, PrimitiveTopology, SubmeshView, TextureInfo, TextureView,
};
use crate::content::material::NO_ID;
use crate::engine_error;
use crate::error::{Error, Result};
use crate::resource::{MaterialId, RenderBackend, SubmeshId, TextureId};
use crate::utils::{FreeList, GenerationalId};

// ============================================================================
// Stored resources
// ============================================================================

/// CPU copy of an uploaded submesh
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessSubmesh {
    pub element_type: ElementType,
    pub primitive_topology: PrimitiveTopology,
    pub element_size: u32,
    pub vertex_count: u32,
    pub index_count: u32,
    pub positions: Vec<u8>,
    pub elements: Vec<u8>,
    pub indices: Vec<u8>,
}

/// CPU copy of an uploaded texture
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessTexture {
    pub info: TextureInfo,
    /// Array-major subresource bytes
    pub subresources: Vec<Vec<u8>>,
}

// ============================================================================
// Headless backend
// ============================================================================

/// [`RenderBackend`] storing uploads in free lists, one lock per kind
pub struct HeadlessBackend {
    submeshes: Mutex<FreeList<HeadlessSubmesh>>,
    textures: Mutex<FreeList<HeadlessTexture>>,
    materials: Mutex<FreeList<MaterialInitInfo>>,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self {
            submeshes: Mutex::new(FreeList::new()),
            textures: Mutex::new(FreeList::new()),
            materials: Mutex::new(FreeList::new()),
        }
    }

    /// Copy of a live submesh
    pub fn submesh(&self, id: SubmeshId) -> Option<HeadlessSubmesh> {
        lock(&self.submeshes).get(id.id()).cloned()
    }

    /// Header of a live texture
    pub fn texture_info(&self, id: TextureId) -> Option<TextureInfo> {
        lock(&self.textures).get(id.id()).map(|texture| texture.info)
    }

    /// Copy of a live texture
    pub fn texture(&self, id: TextureId) -> Option<HeadlessTexture> {
        lock(&self.textures).get(id.id()).cloned()
    }

    /// Copy of a live material
    pub fn material(&self, id: MaterialId) -> Option<MaterialInitInfo> {
        lock(&self.materials).get(id.id()).copied()
    }

    pub fn submesh_count(&self) -> u32 {
        lock(&self.submeshes).len()
    }

    pub fn texture_count(&self) -> u32 {
        lock(&self.textures).len()
    }

    pub fn material_count(&self) -> u32 {
        lock(&self.materials).len()
    }
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl RenderBackend for HeadlessBackend {
    fn add_submesh(&self, submesh: &SubmeshView<'_>) -> Result<SubmeshId> {
        let stored = HeadlessSubmesh {
            element_type: submesh.element_type,
            primitive_topology: submesh.primitive_topology,
            element_size: submesh.element_size,
            vertex_count: submesh.vertex_count,
            index_count: submesh.index_count,
            positions: submesh.positions.to_vec(),
            elements: submesh.elements.to_vec(),
            indices: submesh.indices.to_vec(),
        };
        let mut submeshes = lock(&self.submeshes);
        Ok(SubmeshId::from(submeshes.add(stored)))
    }

    fn remove_submesh(&self, id: SubmeshId) {
        lock(&self.submeshes).remove(id.id());
    }

    fn add_texture(&self, texture: &TextureView<'_>) -> Result<TextureId> {
        // Copy outside the lock, uploads can be large
        let stored = HeadlessTexture {
            info: texture.info,
            subresources: texture.subresources.iter().map(|s| s.pixels.to_vec()).collect(),
        };
        let mut textures = lock(&self.textures);
        Ok(TextureId::from(textures.add(stored)))
    }

    fn remove_texture(&self, id: TextureId) {
        lock(&self.textures).remove(id.id());
    }

    fn add_material(&self, info: &MaterialInitInfo) -> Result<MaterialId> {
        {
            let textures = lock(&self.textures);
            for &raw in info.textures() {
                if raw == NO_ID || !textures.contains(GenerationalId::from_raw(raw)) {
                    let message = format!(
                        "Material references texture {} which is not loaded",
                        GenerationalId::from_raw(raw)
                    );
                    engine_error!("galaxy3d::HeadlessBackend", "{}", message);
                    return Err(Error::BackendError(message));
                }
            }
        }
        let mut materials = lock(&self.materials);
        Ok(MaterialId::from(materials.add(*info)))
    }

    fn remove_material(&self, id: MaterialId) {
        lock(&self.materials).remove(id.id());
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "headless_backend_tests.rs"]
mod tests;
