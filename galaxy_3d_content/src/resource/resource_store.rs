//! Resource creation dispatch.
//!
//! The store turns blobs into backend-resident resources and tracks the
//! CPU-side records that belong to no single backend object: geometry
//! hierarchies (which submesh ids make up which LOD) and shader groups.
//!
//! # Locking
//!
//! Each kind of record has its own `Mutex`. Records never leave their lock:
//! accessors copy out ids or hand out `Arc`s, never references into a slot.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use crate::asset::AssetType;
use crate::content::geometry::read_geometry_blob;
use crate::content::material::unpack_material;
use crate::content::shader::unpack_shader_group;
use crate::content::texture::read_texture_blob;
use crate::content::CompiledShader;
use crate::error::Result;
use crate::resource::{
    MaterialId, RenderBackend, ResourceId, ShaderGroupId, SubmeshId, TextureId,
};
use crate::utils::FreeList;
use crate::{engine_bail, engine_debug, engine_error, engine_trace};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// GEOMETRY RECORDS
// ============================================================================

/// Range of a LOD's submeshes inside a geometry's submesh id list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LodOffset {
    pub offset: u16,
    pub count: u16,
}

/// Result of uploading a geometry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryInfo {
    /// Id of the geometry hierarchy (what the asset registry pairs with)
    pub resource_id: ResourceId,
    /// Backend ids of every submesh, LOD 0 first
    pub submesh_ids: Vec<SubmeshId>,
}

impl GeometryInfo {
    pub fn submesh_count(&self) -> u32 {
        self.submesh_ids.len() as u32
    }
}

/// LOD structure of one uploaded geometry
struct GeometryHierarchy {
    thresholds: Vec<f32>,
    lod_offsets: Vec<LodOffset>,
    gpu_ids: Vec<SubmeshId>,
}

impl GeometryHierarchy {
    /// LOD to draw at `threshold`: the last LOD whose threshold is not
    /// above it, LOD 0 if none
    fn select_lod(&self, threshold: f32) -> usize {
        (1..self.thresholds.len())
            .rev()
            .find(|&lod| self.thresholds[lod] <= threshold)
            .unwrap_or(0)
    }
}

/// Compiled shaders of one group, keyed by caller-chosen keys
struct ShaderGroup {
    shaders: Vec<(u32, Arc<CompiledShader>)>,
}

impl ShaderGroup {
    fn find(&self, key: u32) -> Option<&Arc<CompiledShader>> {
        self.shaders.iter().find(|(k, _)| *k == key).map(|(_, shader)| shader)
    }
}

// ============================================================================
// RESOURCE STORE
// ============================================================================

/// Creates and destroys resources from blobs, per [`AssetType`]
pub struct ResourceStore {
    backend: Arc<dyn RenderBackend>,
    geometries: Mutex<FreeList<GeometryHierarchy>>,
    shader_groups: Mutex<FreeList<ShaderGroup>>,
    last_created_geometry: Mutex<Option<GeometryInfo>>,
}

impl ResourceStore {
    pub fn new(backend: Arc<dyn RenderBackend>) -> Self {
        Self {
            backend,
            geometries: Mutex::new(FreeList::new()),
            shader_groups: Mutex::new(FreeList::new()),
            last_created_geometry: Mutex::new(None),
        }
    }

    /// Backend the store uploads to
    pub fn backend(&self) -> &Arc<dyn RenderBackend> {
        &self.backend
    }

    // ===== DISPATCH =====

    /// Create a backend resource from a blob of the given kind
    ///
    /// Malformed blobs and backend refusals are errors; no partial resource
    /// is left behind.
    ///
    /// # Panics
    ///
    /// Panics for kinds without a resource representation (`Unknown`,
    /// `PhysicsShape`, `Animation`, `Audio`, `Skeleton`).
    pub fn create_resource_from_blob(&self, blob: &[u8], asset_type: AssetType) -> Result<ResourceId> {
        let result = match asset_type {
            AssetType::Mesh => self.create_geometry_resource(blob).map(|info| {
                let id = info.resource_id;
                *lock(&self.last_created_geometry) = Some(info);
                id
            }),
            AssetType::Texture => self.create_texture_resource(blob).map(|id| ResourceId::from(id.id())),
            AssetType::Material => self.create_material_resource(blob).map(|id| ResourceId::from(id.id())),
            AssetType::Shader => self.create_shader_group_resource(blob).map(|id| ResourceId::from(id.id())),
            AssetType::Unknown
            | AssetType::PhysicsShape
            | AssetType::Animation
            | AssetType::Audio
            | AssetType::Skeleton => unsupported_asset_type("create", asset_type),
        };

        if let Err(e) = &result {
            engine_error!("galaxy3d::ResourceStore",
                "Failed to create {:?} resource from {}-byte blob: {}", asset_type, blob.len(), e);
        }
        result
    }

    /// Destroy a resource created by [`create_resource_from_blob`](Self::create_resource_from_blob)
    ///
    /// # Panics
    ///
    /// Panics if `id` is invalid or not live, or for kinds without a
    /// resource representation.
    pub fn destroy_resource(&self, id: ResourceId, asset_type: AssetType) {
        assert!(id.is_valid(), "destroy_resource: invalid {:?} id", asset_type);
        match asset_type {
            AssetType::Mesh => self.destroy_geometry_resource(id),
            AssetType::Texture => self.backend.remove_texture(TextureId::from(id.id())),
            AssetType::Material => self.backend.remove_material(MaterialId::from(id.id())),
            AssetType::Shader => self.remove_shader_group(ShaderGroupId::from(id.id())),
            AssetType::Unknown
            | AssetType::PhysicsShape
            | AssetType::Animation
            | AssetType::Audio
            | AssetType::Skeleton => unsupported_asset_type("destroy", asset_type),
        }
        engine_debug!("galaxy3d::ResourceStore", "Destroyed {:?} resource {}", asset_type, id);
    }

    /// Geometry info of the most recent mesh created through
    /// [`create_resource_from_blob`](Self::create_resource_from_blob)
    ///
    /// Only one result is kept: a later mesh creation from any thread
    /// replaces it. Callers that need the submesh ids of a specific geometry
    /// should use [`create_geometry_resource`](Self::create_geometry_resource)
    /// or [`get_submesh_gpu_ids`](Self::get_submesh_gpu_ids) instead.
    pub fn last_created_geometry(&self) -> Option<GeometryInfo> {
        lock(&self.last_created_geometry).clone()
    }

    // ===== GEOMETRY =====

    /// Upload every submesh of a geometry blob and record its LOD structure
    ///
    /// If any submesh upload fails, the submeshes already uploaded are
    /// removed again and the error is returned.
    pub fn create_geometry_resource(&self, blob: &[u8]) -> Result<GeometryInfo> {
        let lods = read_geometry_blob(blob)?;
        let total: usize = lods.iter().map(|lod| lod.submeshes.len()).sum();
        if total > u16::MAX as usize {
            engine_bail!("galaxy3d::ResourceStore",
                "Geometry has {} submeshes, at most {} are supported", total, u16::MAX);
        }

        let mut geometries = lock(&self.geometries);

        let mut gpu_ids = Vec::with_capacity(total);
        let mut lod_offsets = Vec::with_capacity(lods.len());
        let mut thresholds = Vec::with_capacity(lods.len());
        for (lod_index, lod) in lods.iter().enumerate() {
            lod_offsets.push(LodOffset {
                offset: gpu_ids.len() as u16,
                count: lod.submeshes.len() as u16,
            });
            thresholds.push(lod.threshold);

            for (submesh_index, submesh) in lod.submeshes.iter().enumerate() {
                match self.backend.add_submesh(submesh) {
                    Ok(id) => {
                        engine_trace!("galaxy3d::ResourceStore",
                            "Uploaded submesh {} of LOD {} as {}", submesh_index, lod_index, id);
                        gpu_ids.push(id);
                    }
                    Err(e) => {
                        for id in gpu_ids.drain(..) {
                            self.backend.remove_submesh(id);
                        }
                        return Err(e);
                    }
                }
            }
        }

        let resource_id = ResourceId::from(geometries.add(GeometryHierarchy {
            thresholds,
            lod_offsets,
            gpu_ids: gpu_ids.clone(),
        }));
        engine_debug!("galaxy3d::ResourceStore",
            "Created geometry {} ({} LODs, {} submeshes)", resource_id, lods.len(), gpu_ids.len());

        Ok(GeometryInfo { resource_id, submesh_ids: gpu_ids })
    }

    fn destroy_geometry_resource(&self, id: ResourceId) {
        let hierarchy = lock(&self.geometries).remove(id.id());
        for submesh_id in hierarchy.gpu_ids {
            self.backend.remove_submesh(submesh_id);
        }
    }

    /// Backend ids of every submesh of a geometry, LOD 0 first
    ///
    /// # Panics
    ///
    /// Panics if `geometry_id` is not a live geometry.
    pub fn get_submesh_gpu_ids(&self, geometry_id: ResourceId) -> Vec<SubmeshId> {
        lock(&self.geometries)[geometry_id.id()].gpu_ids.clone()
    }

    /// For each geometry, the submesh range of the LOD selected by its threshold
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length or an id is not a live geometry.
    pub fn get_lod_offsets(&self, geometry_ids: &[ResourceId], thresholds: &[f32]) -> Vec<LodOffset> {
        assert_eq!(
            geometry_ids.len(),
            thresholds.len(),
            "get_lod_offsets: one threshold per geometry"
        );
        let geometries = lock(&self.geometries);
        geometry_ids
            .iter()
            .zip(thresholds)
            .map(|(id, &threshold)| {
                let hierarchy = &geometries[id.id()];
                hierarchy.lod_offsets[hierarchy.select_lod(threshold)]
            })
            .collect()
    }

    /// Number of live geometries
    pub fn geometry_count(&self) -> u32 {
        lock(&self.geometries).len()
    }

    // ===== TEXTURE / MATERIAL =====

    /// Upload an engine texture blob
    pub fn create_texture_resource(&self, blob: &[u8]) -> Result<TextureId> {
        let view = read_texture_blob(blob)?;
        let id = self.backend.add_texture(&view)?;
        engine_debug!("galaxy3d::ResourceStore",
            "Created texture {} ({}x{}, {} subresources)",
            id, view.info.width, view.info.height, view.subresources.len());
        Ok(id)
    }

    /// Create a material from its blob
    pub fn create_material_resource(&self, blob: &[u8]) -> Result<MaterialId> {
        let info = unpack_material(blob)?;
        self.backend.add_material(&info)
    }

    // ===== SHADER GROUPS =====

    fn create_shader_group_resource(&self, blob: &[u8]) -> Result<ShaderGroupId> {
        let shaders = unpack_shader_group(blob)?;
        for (i, (key, _)) in shaders.iter().enumerate() {
            if shaders[..i].iter().any(|(k, _)| k == key) {
                engine_bail!("galaxy3d::ResourceStore", "Shader group blob repeats key {}", key);
            }
        }
        Ok(self.insert_shader_group(
            shaders.into_iter().map(|(key, shader)| (key, Arc::new(shader))).collect(),
        ))
    }

    fn insert_shader_group(&self, shaders: Vec<(u32, Arc<CompiledShader>)>) -> ShaderGroupId {
        let count = shaders.len();
        let id = ShaderGroupId::from(lock(&self.shader_groups).add(ShaderGroup { shaders }));
        engine_debug!("galaxy3d::ResourceStore", "Added shader group {} ({} shaders)", id, count);
        id
    }

    /// Store copies of `shaders`, the i-th one under `keys[i]`
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length or a key repeats.
    pub fn add_shader_group(&self, shaders: &[CompiledShader], keys: &[u32]) -> ShaderGroupId {
        assert_eq!(shaders.len(), keys.len(), "add_shader_group: one key per shader");
        for (i, key) in keys.iter().enumerate() {
            assert!(!keys[..i].contains(key), "add_shader_group: duplicate key {}", key);
        }
        self.insert_shader_group(
            keys.iter()
                .copied()
                .zip(shaders.iter().cloned().map(Arc::new))
                .collect(),
        )
    }

    /// Release a shader group
    ///
    /// `Arc`s handed out by [`get_shader`](Self::get_shader) stay usable.
    pub fn remove_shader_group(&self, id: ShaderGroupId) {
        lock(&self.shader_groups).remove(id.id());
    }

    /// Shader stored under `key` in a group
    ///
    /// # Panics
    ///
    /// Panics if the group is not live or has no shader under `key`.
    pub fn get_shader(&self, id: ShaderGroupId, key: u32) -> Arc<CompiledShader> {
        let groups = lock(&self.shader_groups);
        match groups[id.id()].find(key) {
            Some(shader) => Arc::clone(shader),
            None => panic!("shader group {} has no shader with key {}", id, key),
        }
    }

    /// Like [`get_shader`](Self::get_shader), `None` when the group or key is missing
    pub fn find_shader(&self, id: ShaderGroupId, key: u32) -> Option<Arc<CompiledShader>> {
        lock(&self.shader_groups).get(id.id())?.find(key).cloned()
    }

    /// Number of live shader groups
    pub fn shader_group_count(&self) -> u32 {
        lock(&self.shader_groups).len()
    }
}

fn unsupported_asset_type(operation: &str, asset_type: AssetType) -> ! {
    panic!("cannot {} a resource for asset type {:?}: not supported", operation, asset_type)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "resource_store_tests.rs"]
mod tests;
